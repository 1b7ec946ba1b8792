use std::process::ExitCode;

use expense_core::cli::{output, run_cli};

fn main() -> ExitCode {
    expense_core::init();
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", output::styled(output::MessageKind::Error, &err.to_string()));
            ExitCode::FAILURE
        }
    }
}
