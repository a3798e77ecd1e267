use std::process::ExitCode;

use log::error;
use utils_toolkit::cli::Cli;

fn main() -> ExitCode {
    // .env is optional
    dotenvy::dotenv().ok();
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse_lenient(std::env::args_os());
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
