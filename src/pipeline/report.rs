//! Run reporting
//!
//! Reporters observe a run as it happens and own all user-facing output.
//! [`ConsoleReporter`] prints colored progress for humans, [`JsonReporter`]
//! prints one JSON object per line for CI log collectors.

use std::io::{self, Write};

use serde::Serialize;

use super::runner::{RunSummary, ScenarioOutcome, Stage};
use super::store::{RunContext, Store};
use crate::output::terminal::Painter;
use crate::scenario::Scenario;

const BOX_TOP: &str = "┌─────────────────────────────────┐";
const BOX_BOTTOM: &str = "└─────────────────────────────────┘";

/// 1-based position of a scenario within the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub index: usize,
    pub total: usize,
}

/// Everything known about a failed scenario
#[derive(Debug)]
pub struct FailureReport<'a> {
    /// The scenario after substitution
    pub scenario: &'a Scenario,
    pub outcome: &'a ScenarioOutcome,
    /// Full URL of the scenario request, if it has one
    pub request_url: Option<String>,
}

/// Observer of run progress
pub trait Reporter {
    fn run_started(&mut self, total: usize);

    fn scenario_started(&mut self, position: Position, scenario: &Scenario);

    /// Called after each stage that ran successfully
    fn stage_completed(&mut self, scenario: &Scenario, stage: Stage, ctx: &RunContext);

    fn scenario_passed(&mut self, position: Position, outcome: &ScenarioOutcome);

    /// `ctx` is the run state as the failed scenario left it
    fn scenario_failed(&mut self, position: Position, report: &FailureReport<'_>, ctx: &RunContext);

    fn run_finished(&mut self, summary: &RunSummary);
}

/// Human-readable progress output
pub struct ConsoleReporter<W: Write = io::Stdout> {
    out: W,
    painter: Painter,
    verbose: bool,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(painter: Painter, verbose: bool) -> Self {
        Self::new(io::stdout(), painter, verbose)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, painter: Painter, verbose: bool) -> Self {
        Self { out, painter, verbose }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // Output is best effort; a closed stdout must not fail the run
    fn line(&mut self, text: impl AsRef<str>) {
        let _ = writeln!(self.out, "{}", text.as_ref());
    }

    fn stage_detail(&mut self, scenario: &Scenario, stage: Stage, ctx: &RunContext) {
        let p = self.painter;
        match stage {
            Stage::GenerateFakeData if !scenario.fake.is_empty() => {
                let tags: Vec<String> =
                    scenario.fake.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                self.line(format!("    {}: {}", p.info("Fake"), tags.join(", ")));
            }
            Stage::SubstituteVariables => {
                if let Some(ref request) = scenario.request {
                    self.line(format!(
                        "    {}: {} {}",
                        p.info("Request"),
                        p.http_method(&request.method),
                        request.url
                    ));
                }
            }
            Stage::RunCommand => {
                if let Some(ref command) = scenario.command {
                    self.line(format!("    {}: {}", p.info("Command"), command.command));
                }
            }
            Stage::SendRequest => {
                if let Some(ref response) = ctx.last_response {
                    self.line(format!(
                        "    {}: {} {}",
                        p.info("Response"),
                        p.http_status(response.status),
                        p.muted(&format!("({:?})", response.elapsed))
                    ));
                }
            }
            Stage::ExtractData if !scenario.extract.is_empty() => {
                let keys: Vec<&str> = scenario.extract.iter().map(|e| e.var.as_str()).collect();
                self.line(format!("    {}: {}", p.info("Extracted"), keys.join(", ")));
            }
            _ => {}
        }
    }

    fn failure_details(&mut self, report: &FailureReport<'_>, ctx: &RunContext) {
        let p = self.painter;
        let scenario = report.scenario;

        self.line("");
        self.line(p.error("❯ Scenario Failure Details:"));
        self.line(format!("  {}: {}", p.info("Scenario"), p.label(&scenario.name)));
        if !scenario.description.is_empty() {
            self.line(format!("  {}: {}", p.info("Description"), scenario.description));
        }
        if let Some(ref failure) = report.outcome.failure {
            self.line(format!("  {}: {}", p.info("Stage"), failure.stage));
        }

        if let Some(ref request) = scenario.request {
            self.line(format!("\n  {}:", p.info("Request")));
            self.line(format!("    {}: {}", p.info("Method"), p.http_method(&request.method)));
            let url = report.request_url.as_deref().unwrap_or(&request.url);
            self.line(format!("    {}: {}", p.info("URL"), url));
            if !request.headers.is_empty() {
                self.line(format!("    {}:", p.info("Headers")));
                for (name, value) in &request.headers {
                    self.line(format!("      {}: {}", p.key(name), value));
                }
            }
            if let Some(ref body) = request.body {
                self.line(format!("    {}: {}", p.info("Body"), body));
            }
        }

        if let Some(ref command) = scenario.command {
            self.line(format!("\n  {}:", p.info("Command")));
            self.line(format!("    {}: {}", p.info("Command"), command.command));
            if let Some(dir) = command.directory.as_deref().filter(|d| !d.is_empty()) {
                self.line(format!("    {}: {}", p.info("Directory"), dir));
            }
        }

        if let Some(ref response) = ctx.last_response {
            self.line(format!("\n  {}:", p.info("Response")));
            self.line(format!("    {}: {}", p.info("Status"), p.http_status(response.status)));
            if !response.headers.is_empty() {
                self.line(format!("    {}:", p.info("Headers")));
                for (name, value) in &response.headers {
                    self.line(format!("      {}: {}", p.key(name), value));
                }
            }
            self.line(format!("    {}: {}", p.info("Body"), response.body));
        }

        if !ctx.store.is_empty() {
            self.line(format!("\n  {}:", p.info("Store")));
            for (key, value) in ctx.store.iter() {
                self.line(format!("    {}: {}", p.key(key), p.value(&value.to_string())));
            }
        }

        let expect = &scenario.expect;
        if !expect.is_empty() {
            self.line(format!("\n  {}:", p.info("Expected")));
            if let Some(status) = expect.status {
                self.line(format!("    {}: {}", p.info("Status"), status));
            }
            if !expect.headers.is_empty() {
                self.line(format!("    {}:", p.info("Headers")));
                for (name, value) in &expect.headers {
                    self.line(format!("      {}: {}", p.key(name), value));
                }
            }
            if !expect.json.is_empty() {
                self.line(format!("    {}:", p.info("JSON")));
                for (path, value) in &expect.json {
                    let text = crate::jsonpath::value_text(value);
                    self.line(format!("      {}: {}", p.key(path), text));
                }
            }
        }
        self.line("");
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn run_started(&mut self, _total: usize) {
        let p = self.painter;
        self.line(p.header(BOX_TOP));
        self.line(p.header("            Scenarios            "));
    }

    fn scenario_started(&mut self, position: Position, scenario: &Scenario) {
        if !self.verbose {
            return;
        }
        let p = self.painter;
        self.line(format!(
            "\n{} {} {}",
            p.info("▶"),
            p.label(&scenario.name),
            p.muted(&format!("({}/{})", position.index, position.total))
        ));
        if !scenario.description.is_empty() {
            self.line(format!("  {}: {}", p.info("Description"), scenario.description));
        }
    }

    fn stage_completed(&mut self, scenario: &Scenario, stage: Stage, ctx: &RunContext) {
        if !self.verbose {
            return;
        }
        let p = self.painter;
        self.line(format!("  {} {}", p.info("•"), stage));
        self.stage_detail(scenario, stage, ctx);
    }

    fn scenario_passed(&mut self, position: Position, outcome: &ScenarioOutcome) {
        let p = self.painter;
        let mut line = format!(
            "[{}/{}] {} {}",
            position.index,
            position.total,
            p.success("✓"),
            outcome.name
        );
        if self.verbose {
            line.push_str(&format!(" {}", p.muted(&format!("({:?})", outcome.duration))));
        }
        self.line(line);
    }

    fn scenario_failed(
        &mut self,
        position: Position,
        report: &FailureReport<'_>,
        ctx: &RunContext,
    ) {
        let p = self.painter;
        self.line(format!(
            "[{}/{}] {} {}",
            position.index,
            position.total,
            p.error("✗"),
            report.outcome.name
        ));
        if let Some(ref failure) = report.outcome.failure {
            self.line(format!("       {} {}", p.error("→"), failure.error));
        }
        self.failure_details(report, ctx);
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        let p = self.painter;
        self.line("");
        self.line(p.header(BOX_BOTTOM));
        self.line(p.header(BOX_TOP));
        self.line(p.header("             Summary             "));

        self.line(format!("Total: {}", summary.total));
        self.line(format!("{}: {}", p.success("Passed"), summary.passed()));
        self.line(format!("{}: {}", p.error("Failed"), summary.failed()));
        if summary.not_run() > 0 {
            self.line(format!("{}: {}", p.warning("Not run"), summary.not_run()));
        }
        self.line(format!("Pass rate: {}", format_pass_rate(summary.pass_rate())));
        if summary.interrupted {
            self.line(p.warning("Interrupted"));
        }
        self.line(p.muted(&format!("Duration: {:.2?}", summary.duration)));

        self.line("");
        self.line(p.header(BOX_BOTTOM));
        let _ = self.out.flush();
    }
}

/// `Some(66.666)` → `66.7%`, `None` → `N/A`
pub fn format_pass_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.1}%", rate),
        None => "N/A".to_string(),
    }
}

/// Print the resolved execution order, one scenario per line
pub fn write_plan<W: Write>(
    out: &mut W,
    ordered: &[&Scenario],
    painter: Painter,
) -> io::Result<()> {
    let width = ordered.len().to_string().len();
    for (i, scenario) in ordered.iter().enumerate() {
        write!(out, "{:>width$}. {}", i + 1, painter.label(&scenario.name), width = width)?;
        if !scenario.depends.is_empty() {
            write!(out, " {}", painter.muted(&format!("(after {})", scenario.depends.join(", "))))?;
        }
        writeln!(out)?;
    }
    out.flush()
}

/// JSON form of [`write_plan`]
pub fn write_plan_json<W: Write>(out: &mut W, ordered: &[&Scenario]) -> io::Result<()> {
    let plan = serde_json::json!({
        "level": "info",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "event": "plan",
        "order": ordered.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
    });
    writeln!(out, "{}", plan)?;
    out.flush()
}

/// Machine-readable output, one JSON object per line
pub struct JsonReporter<W: Write = io::Stdout> {
    out: W,
}

impl JsonReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: &impl Serialize) {
        if let Ok(line) = serde_json::to_string(event) {
            let _ = writeln!(self.out, "{}", line);
        }
    }
}

/// `scenario_result` line of a failed scenario
///
/// Serialized directly so store numbers keep their exact text.
#[derive(Serialize)]
struct FailedScenarioEvent<'a> {
    level: &'static str,
    timestamp: String,
    event: &'static str,
    index: usize,
    scenario: &'a str,
    passed: bool,
    duration_ms: u64,
    stage: Option<&'static str>,
    error: Option<String>,
    request_url: Option<&'a str>,
    status_code: Option<u16>,
    store: &'a Store,
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn run_started(&mut self, total: usize) {
        self.emit(&serde_json::json!({
            "level": "info",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "event": "run_started",
            "total": total,
        }));
    }

    fn scenario_started(&mut self, _position: Position, _scenario: &Scenario) {}

    fn stage_completed(&mut self, _scenario: &Scenario, _stage: Stage, _ctx: &RunContext) {}

    fn scenario_passed(&mut self, position: Position, outcome: &ScenarioOutcome) {
        self.emit(&serde_json::json!({
            "level": "info",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "event": "scenario_result",
            "index": position.index,
            "scenario": outcome.name,
            "passed": true,
            "duration_ms": outcome.duration.as_millis() as u64,
        }));
    }

    fn scenario_failed(
        &mut self,
        position: Position,
        report: &FailureReport<'_>,
        ctx: &RunContext,
    ) {
        let failure = report.outcome.failure.as_ref();
        self.emit(&FailedScenarioEvent {
            level: "error",
            timestamp: chrono::Utc::now().to_rfc3339(),
            event: "scenario_result",
            index: position.index,
            scenario: &report.outcome.name,
            passed: false,
            duration_ms: report.outcome.duration.as_millis() as u64,
            stage: failure.map(|f| f.stage.as_str()),
            error: failure.map(|f| f.error.to_string()),
            request_url: report.request_url.as_deref(),
            status_code: ctx.last_response.as_ref().map(|r| r.status),
            store: &ctx.store,
        });
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        self.emit(&serde_json::json!({
            "level": if summary.failed() == 0 { "info" } else { "error" },
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "event": "run_summary",
            "total": summary.total,
            "passed": summary.passed(),
            "failed": summary.failed(),
            "not_run": summary.not_run(),
            "pass_rate": summary.pass_rate(),
            "interrupted": summary.interrupted,
            "duration_ms": summary.duration.as_millis() as u64,
            "success": summary.failed() == 0 && !summary.interrupted,
        }));
        let _ = self.out.flush();
    }
}
