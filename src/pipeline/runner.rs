//! Scenario execution engine
//!
//! Runs resolved scenarios one at a time through a fixed sequence of stages,
//! sharing a single [`RunContext`] for the whole run.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info_span, Instrument};

use super::assertions::validate_response;
use super::command::execute_command;
use super::dependency::execution_order;
use super::extract::extract_data;
use super::fake_data::generate_fake_data;
use super::interpolate::substitute_scenario;
use super::report::{FailureReport, Position, Reporter};
use super::request::HttpExecutor;
use super::store::RunContext;
use crate::config::GlobalConfig;
use crate::errors::{ScenaristError, StageError};
use crate::fake::{FakeGenerator, Faker};
use crate::scenario::Scenario;
use crate::status::ExitStatus;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    GenerateFakeData,
    SubstituteVariables,
    RunCommand,
    SendRequest,
    ValidateResponse,
    ExtractData,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::GenerateFakeData => "generate fake data",
            Stage::SubstituteVariables => "substitute variables",
            Stage::RunCommand => "run command",
            Stage::SendRequest => "send request",
            Stage::ValidateResponse => "validate response",
            Stage::ExtractData => "extract data",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The stage a scenario failed in and why
#[derive(Debug)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: StageError,
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.error)
    }
}

/// Result of running a single scenario
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub name: String,
    pub failure: Option<StageFailure>,
    pub duration: Duration,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Aggregate result of a run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Outcomes of the scenarios that ran, in execution order
    pub outcomes: Vec<ScenarioOutcome>,
    /// Number of scenarios planned for the run
    pub total: usize,
    /// The run was cut short by an interrupt
    pub interrupted: bool,
    pub duration: Duration,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    /// Scenarios skipped by stop-on-error or an interrupt
    pub fn not_run(&self) -> usize {
        self.total.saturating_sub(self.outcomes.len())
    }

    /// Percentage of planned scenarios that passed; `None` for an empty run
    pub fn pass_rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.passed() as f64 / self.total as f64 * 100.0)
        }
    }

    pub fn exit_status(&self) -> ExitStatus {
        if self.interrupted {
            ExitStatus::Interrupted
        } else {
            ExitStatus::from_failures(self.failed())
        }
    }
}

/// Run behaviour switches
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Abort the remaining scenarios after the first failure
    pub stop_on_error: bool,
}

impl RunOptions {
    pub fn from_config(config: &GlobalConfig) -> Self {
        Self {
            stop_on_error: config.stop_on_error,
        }
    }
}

/// Drives scenarios through the pipeline
pub struct ScenarioRunner {
    options: RunOptions,
    http: HttpExecutor,
    generator: Box<dyn FakeGenerator>,
    interrupted: fn() -> bool,
}

impl ScenarioRunner {
    pub fn new(config: &GlobalConfig) -> Result<Self, ScenaristError> {
        Ok(Self {
            options: RunOptions::from_config(config),
            http: HttpExecutor::new(config)?,
            generator: Box::new(Faker),
            interrupted: || false,
        })
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_generator(mut self, generator: Box<dyn FakeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Polled between scenarios; a `true` result ends the run
    pub fn with_interrupt_check(mut self, check: fn() -> bool) -> Self {
        self.interrupted = check;
        self
    }

    /// Resolve the execution order and run every scenario with a fresh context
    ///
    /// Dependency errors abort before any scenario runs. Scenario failures
    /// are reported and counted, never returned as errors.
    pub async fn run(
        &self,
        scenarios: &[Scenario],
        reporter: &mut dyn Reporter,
    ) -> Result<RunSummary, ScenaristError> {
        let ordered = execution_order(scenarios)?;
        let mut ctx = RunContext::new();
        Ok(self.run_ordered(&ordered, &mut ctx, reporter).await)
    }

    /// Run already ordered scenarios against an existing context
    pub async fn run_ordered(
        &self,
        scenarios: &[&Scenario],
        ctx: &mut RunContext,
        reporter: &mut dyn Reporter,
    ) -> RunSummary {
        let start = Instant::now();
        let total = scenarios.len();
        let mut summary = RunSummary {
            outcomes: Vec::with_capacity(total),
            total,
            ..Default::default()
        };

        reporter.run_started(total);

        for (i, scenario) in scenarios.iter().enumerate() {
            if (self.interrupted)() {
                debug!(remaining = total - i, "Run interrupted");
                summary.interrupted = true;
                break;
            }

            let position = Position { index: i + 1, total };
            reporter.scenario_started(position, scenario);

            // Substitution rewrites a per-execution copy, never the loaded scenario
            let mut working = (*scenario).clone();
            let span = info_span!("scenario", name = %scenario.name, index = i + 1);
            let scenario_start = Instant::now();
            let result = self
                .execute(&mut working, ctx, reporter)
                .instrument(span)
                .await;

            let outcome = ScenarioOutcome {
                name: scenario.name.clone(),
                failure: result.err(),
                duration: scenario_start.elapsed(),
            };

            let stop = outcome.failure.is_some() && self.options.stop_on_error;
            if outcome.passed() {
                reporter.scenario_passed(position, &outcome);
            } else {
                let report = FailureReport {
                    scenario: &working,
                    outcome: &outcome,
                    request_url: working.request.as_ref().map(|r| self.http.url_for(&r.url)),
                };
                reporter.scenario_failed(position, &report, ctx);
            }
            summary.outcomes.push(outcome);

            if stop {
                debug!(scenario = %scenario.name, "Stopping after failure");
                break;
            }
        }

        summary.duration = start.elapsed();
        reporter.run_finished(&summary);
        summary
    }

    async fn execute(
        &self,
        scenario: &mut Scenario,
        ctx: &mut RunContext,
        reporter: &mut dyn Reporter,
    ) -> Result<(), StageFailure> {
        let fail = |stage: Stage| move |error: StageError| StageFailure { stage, error };

        generate_fake_data(&scenario.fake, self.generator.as_ref(), ctx)
            .map_err(fail(Stage::GenerateFakeData))?;
        self.completed(scenario, Stage::GenerateFakeData, ctx, reporter);

        if scenario.request.is_none() && scenario.command.is_none() {
            return Err(fail(Stage::SubstituteVariables)(StageError::NothingToExecute));
        }
        substitute_scenario(scenario, &ctx.store);
        self.completed(scenario, Stage::SubstituteVariables, ctx, reporter);

        if scenario.command.is_some() {
            execute_command(scenario.command.as_ref(), ctx)
                .await
                .map_err(fail(Stage::RunCommand))?;
            self.completed(scenario, Stage::RunCommand, ctx, reporter);
        }

        if scenario.request.is_some() {
            self.http
                .execute(scenario.request.as_ref(), ctx)
                .await
                .map_err(fail(Stage::SendRequest))?;
            self.completed(scenario, Stage::SendRequest, ctx, reporter);
        }

        if !scenario.inspects_response() {
            return Ok(());
        }

        validate_response(&scenario.expect, ctx).map_err(fail(Stage::ValidateResponse))?;
        self.completed(scenario, Stage::ValidateResponse, ctx, reporter);

        extract_data(&scenario.extract, ctx).map_err(fail(Stage::ExtractData))?;
        self.completed(scenario, Stage::ExtractData, ctx, reporter);

        Ok(())
    }

    fn completed(
        &self,
        scenario: &Scenario,
        stage: Stage,
        ctx: &RunContext,
        reporter: &mut dyn Reporter,
    ) {
        debug!(scenario = %scenario.name, %stage, "Stage completed");
        reporter.stage_completed(scenario, stage, ctx);
    }
}
