use std::process::ExitCode;

use lswap::output as out;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = lswap::cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            out::print_error(&app::diagnostic(&e));
            ExitCode::from(app::exit_code(&e))
        }
    }
}
