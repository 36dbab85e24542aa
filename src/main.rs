use std::process::ExitCode;

use clap::Parser;
use ok_server::cli::Cli;
use ok_server::lifecycle::startup;

fn main() -> ExitCode {
    let config = Cli::parse().into_config();

    match startup::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ok-server: {e}");
            ExitCode::FAILURE
        }
    }
}
