use std::process::ExitCode;

fn main() -> ExitCode {
    docbrain_lib::run()
}
