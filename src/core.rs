//! Main execution logic behind the binary

use clap::Parser;

use crate::cli::{Args, LogFormat};
use crate::errors::ScenaristError;
use crate::logging;
use crate::pipeline;
use crate::status::ExitStatus;

/// Parse `args`, set up logging and the runtime, and run the suite
pub fn run(args: Vec<String>) -> ExitStatus {
    let parsed = match Args::try_parse_from(&args) {
        Ok(args) => args,
        Err(e) => {
            e.print().ok();
            return if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                ExitStatus::Success
            } else {
                ExitStatus::Error
            };
        }
    };

    logging::init(parsed.debug, parsed.log_format == LogFormat::Json);
    tracing::debug!(?parsed, "Parsed arguments");

    // Scenarios run strictly one after another; one thread is enough
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => return handle_error(ScenaristError::Io(e), parsed.debug),
    };

    match runtime.block_on(pipeline::run_suite(&parsed)) {
        Ok(status) => status,
        Err(e) => handle_error(e, parsed.debug),
    }
}

fn handle_error(error: ScenaristError, debug: bool) -> ExitStatus {
    if debug {
        eprintln!("Error: {:?}", error);
    } else {
        eprintln!("Error: {}", error);
    }
    ExitStatus::Error
}
