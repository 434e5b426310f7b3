use std::process::ExitCode;

fn main() -> ExitCode {
    privguard_cli::run()
}
