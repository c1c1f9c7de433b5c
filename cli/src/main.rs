use std::process::ExitCode;

use admin_console::cli::Args;
use admin_console::logging::init_logging;
use anyhow::Result;
use clap::Parser;

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging(args.verbose);

    let ok = admin_console::run(args)?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
