//! Interrupt handling between scenarios
//!
//! Ctrl+C only raises a flag. The runner checks it before starting the next
//! scenario; a stage that is already in flight always runs to completion.

use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Check if the run was interrupted (Ctrl+C pressed)
#[inline]
pub fn was_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Set the interrupted flag (called from signal handler)
#[inline]
pub fn set_interrupted() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Reset the interrupted flag
#[inline]
pub fn reset_interrupted() {
    INTERRUPTED.store(false, Ordering::SeqCst);
}

/// Install the Ctrl+C handler
///
/// The first interrupt asks the runner to stop before the next scenario.
/// A second one exits immediately.
pub fn install_handler() {
    let installed = ctrlc::set_handler(move || {
        static SECOND_CTRL_C: AtomicBool = AtomicBool::new(false);

        set_interrupted();
        eprintln!("\nInterrupted, stopping after the current scenario");

        if SECOND_CTRL_C.swap(true, Ordering::SeqCst) {
            std::process::exit(crate::status::ExitStatus::Interrupted as i32);
        }
    });

    if let Err(e) = installed {
        tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_flag() {
        reset_interrupted();
        assert!(!was_interrupted());

        set_interrupted();
        assert!(was_interrupted());

        reset_interrupted();
        assert!(!was_interrupted());
    }
}
