use std::process::ExitCode;

fn main() -> ExitCode {
    sierra_cli::run()
}
