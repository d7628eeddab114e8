//! # Fairbill CLI Entry Point
//!
//! ```text
//! $ fairbill init
//! $ fairbill check medicine "Paracetamol 500mg" 7.50 --save
//! $ fairbill verify --item medicine:Paracetamol:3 --item medicine:Metformin:10 \
//!       --patient "Asha Rao" --hospital "City Hospital" --save
//! $ fairbill stats --json
//! ```
//!
//! The actual setup is in lib.rs for testability.

use std::process::ExitCode;

use clap::Parser;
use fairbill_cli::{init_tracing, run, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(output) => {
            println!("{}", output.trim_end());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("✗ {err:#}");
            ExitCode::FAILURE
        }
    }
}
