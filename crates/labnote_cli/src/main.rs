//! LabNote command-line shell.
//!
//! # Responsibility
//! - Parse arguments, resolve configuration and start logging.
//! - Delegate every use-case to `labnote_core`.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use labnote_core::init_logging;
use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match commands::load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        // Logging is best-effort; commands still run without it.
        eprintln!("warning: logging disabled: {err}");
    }

    match commands::run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
