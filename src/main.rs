use std::process::ExitCode;

use env_logger::Env;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("keyword_trends=info")).init();

    match keyword_trends::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("exiting with code {}", err.exit_code());
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
