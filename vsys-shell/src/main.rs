use anyhow::Result;
use clap::Parser;

use vsys_shell::{Args, init_tracing, run};

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref())?;
    let output = run(&args.command)?;
    println!("{output}");
    Ok(())
}
