// SPDX-License-Identifier: MPL-2.0
use backpack_configurator::app::cli::{self, Command};
use backpack_configurator::{app, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let command = match cli::parse(pico_args::Arguments::from_env()) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("error: {err}\n\n{}", cli::USAGE);
            return ExitCode::from(2);
        }
    };

    let (flags, log_level) = match command {
        Command::Help => {
            print!("{}", cli::USAGE);
            return ExitCode::SUCCESS;
        }
        Command::Run { flags, log_level } => (flags, log_level),
    };

    if let Err(err) = logging::init(log_level) {
        eprintln!("warning: {err}");
    }

    match app::run(flags) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "application exited with an error");
            ExitCode::FAILURE
        }
    }
}
