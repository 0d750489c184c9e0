use std::process::ExitCode;

fn main() -> ExitCode {
    landscape_cli::run()
}
