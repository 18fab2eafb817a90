//! Diagnostic logging
//!
//! Tracing output goes to stderr and never mixes with reporter output on
//! stdout. The filter comes from `SCENARIST_LOG` when set.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "SCENARIST_LOG";

/// Filter used when `SCENARIST_LOG` is unset or invalid
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "scenarist=debug,warn"
    } else {
        "warn"
    }
}

/// Install the global subscriber, emitting JSON lines when `json` is set
///
/// Safe to call more than once; later calls are ignored.
pub fn init(debug: bool, json: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));
    let registry = tracing_subscriber::registry().with(filter);

    let _ = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr).with_current_span(true))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "warn");
        assert!(default_directive(true).contains("scenarist=debug"));
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false, false);
        init(true, true);
        tracing::debug!("still alive");
    }
}
