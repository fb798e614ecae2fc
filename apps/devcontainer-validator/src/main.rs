use std::path::Path;
use std::process::ExitCode;

use env_logger::Env;

mod config;
mod report;
mod validation;

const SUCCESS_MESSAGE: &str = "All validations passed successfully";

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    // The workspace is the current working directory
    let outcome = match config::Inputs::load() {
        Ok(inputs) => validation::run(&inputs, Path::new("")).await.map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match outcome {
        Ok(()) => {
            report::info(SUCCESS_MESSAGE);
            ExitCode::SUCCESS
        }
        Err(message) => {
            log::debug!("An error occurred during validation");
            report::set_failed(&message);
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let default_level = if config::runner_debug() { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();
}
