use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use png_mend::{StdinTagProvider, fix_file};

#[derive(Parser)]
#[command(name = "png-mend")]
#[command(about = "Detect and repair structural corruption in PNG files")]
struct Cli {
    /// Path to the possibly damaged PNG
    input: PathBuf,

    /// Path the repaired PNG is written to
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    // A usage problem is not a failure; print the message and leave quietly.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            process::exit(0);
        }
    };

    let mut provider = StdinTagProvider;
    fix_file(&cli.input, &cli.output, &mut provider)
        .with_context(|| format!("failed to repair {}", cli.input.display()))?;

    Ok(())
}
