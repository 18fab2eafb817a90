//! Scenario pipeline: ordering, stages, execution and reporting

pub mod assertions;
pub mod command;
pub mod dependency;
pub mod extract;
pub mod fake_data;
pub mod interpolate;
pub mod report;
pub mod request;
pub mod runner;
pub mod store;

pub use dependency::{execution_order, resolve_order, DependencyError};
pub use interpolate::interpolate;
pub use report::{ConsoleReporter, JsonReporter, Reporter};
pub use runner::{RunOptions, RunSummary, ScenarioOutcome, ScenarioRunner, Stage, StageFailure};
pub use store::{LastResponse, RunContext, Store, StoreValue};

use std::io;

use tracing::info;

use crate::cli::{Args, LogFormat};
use crate::config::GlobalConfig;
use crate::errors::ScenaristError;
use crate::output::terminal::{color_supported, Painter};
use crate::scenario::load_scenarios;
use crate::signals;
use crate::status::ExitStatus;

/// Apply command-line overrides on top of the config file
///
/// Values given on the command line replace config values; flags can only
/// switch behaviour on.
pub fn apply_overrides(config: &mut GlobalConfig, args: &Args) {
    if let Some(ref base_url) = args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    config.verbose |= args.verbose;
    config.stop_on_error |= args.stop_on_error;
}

/// Load everything the arguments point at and run (or list) the scenarios
pub async fn run_suite(args: &Args) -> Result<ExitStatus, ScenaristError> {
    args.validate()?;

    let mut config = GlobalConfig::load(&args.config)?;
    apply_overrides(&mut config, args);

    let scenarios = load_scenarios(&args.folders, Some(args.config.as_path()))?;
    info!(count = scenarios.len(), folders = args.folders.len(), "Loaded scenarios");

    let painter = Painter::new(!args.no_color && color_supported());

    if args.list {
        let ordered = execution_order(&scenarios)?;
        let mut out = io::stdout();
        match args.log_format {
            LogFormat::Text => report::write_plan(&mut out, &ordered, painter)?,
            LogFormat::Json => report::write_plan_json(&mut out, &ordered)?,
        }
        return Ok(ExitStatus::Success);
    }

    let runner = ScenarioRunner::new(&config)?.with_interrupt_check(signals::was_interrupted);

    let summary = match args.log_format {
        LogFormat::Text => {
            let mut reporter = ConsoleReporter::stdout(painter, config.verbose);
            runner.run(&scenarios, &mut reporter).await?
        }
        LogFormat::Json => {
            let mut reporter = JsonReporter::stdout();
            runner.run(&scenarios, &mut reporter).await?
        }
    };

    info!(
        total = summary.total,
        passed = summary.passed(),
        failed = summary.failed(),
        interrupted = summary.interrupted,
        "Run finished"
    );

    Ok(summary.exit_status())
}
