use scenarist::{core, signals, status::ExitStatus};

/// Entry point - catches Ctrl+C and calls core::run()
///
/// Returns ExitStatus directly, which implements std::process::Termination.
fn main() -> ExitStatus {
    signals::install_handler();

    let args: Vec<String> = std::env::args().collect();
    let status = core::run(args);

    if signals::was_interrupted() {
        return ExitStatus::Interrupted;
    }

    status
}
