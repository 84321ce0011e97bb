use std::io::Write;

use anyhow::{Context, Result};
use prove_core::TestUnit;
use serde_json::json;

use crate::args::Format;
use crate::runner::Outcome;
use crate::Conclusion;

/// Writes run events in the selected format.
pub struct Reporter<'w, W: Write> {
    out: &'w mut W,
    format: Format,
    quiet: bool,
}

impl<'w, W: Write> Reporter<'w, W> {
    pub fn new(out: &'w mut W, format: Format, quiet: bool) -> Self {
        Self { out, format, quiet }
    }

    pub fn plan(&mut self, count: usize) -> Result<()> {
        match self.format {
            Format::Pretty => writeln!(self.out, "running {count} unit(s)"),
            Format::Json => writeln!(self.out, "{}", json!({ "type": "plan", "count": count })),
        }
        .context("failed to write plan")
    }

    pub fn listed(&mut self, unit: &TestUnit) -> Result<()> {
        match self.format {
            Format::Pretty => writeln!(self.out, "{}: test", unit.full_name()),
            Format::Json => writeln!(
                self.out,
                "{}",
                json!({
                    "type": "unit",
                    "event": "listed",
                    "suite": unit.suite(),
                    "name": unit.name(),
                    "location": unit.location(),
                })
            ),
        }
        .context("failed to write unit listing")
    }

    pub fn rejected(&mut self, suite: &str, error: &anyhow::Error) -> Result<()> {
        match self.format {
            Format::Pretty => writeln!(self.out, "REJECTED {suite}: {error:#}"),
            Format::Json => writeln!(
                self.out,
                "{}",
                json!({
                    "type": "suite",
                    "event": "rejected",
                    "suite": suite,
                    "message": format!("{error:#}"),
                })
            ),
        }
        .context("failed to write registration error")
    }

    pub fn outcome(&mut self, unit: &TestUnit, outcome: &Outcome) -> Result<()> {
        match self.format {
            Format::Pretty => self.pretty_outcome(unit, outcome),
            Format::Json => {
                let mut event = json!({
                    "type": "unit",
                    "event": outcome.status(),
                    "suite": unit.suite(),
                    "name": unit.name(),
                });
                match outcome {
                    Outcome::Passed => {}
                    Outcome::Failed(failure) => {
                        event["message"] = json!(failure.to_string());
                        event["operator"] = json!(failure.operator);
                        event["left"] = json!(failure.left);
                        event["right"] = json!(failure.right);
                    }
                    Outcome::Errored(message) | Outcome::Panicked(message) => {
                        event["message"] = json!(message);
                    }
                }
                writeln!(self.out, "{event}")
            }
        }
        .context("failed to write unit outcome")
    }

    fn pretty_outcome(&mut self, unit: &TestUnit, outcome: &Outcome) -> std::io::Result<()> {
        let name = unit.full_name();
        match outcome {
            Outcome::Passed if self.quiet => Ok(()),
            Outcome::Passed => writeln!(self.out, "PASS {name}"),
            Outcome::Failed(failure) => {
                writeln!(self.out, "FAIL {name}")?;
                writeln!(self.out, "    {failure}")?;
                writeln!(self.out, "    left:  {}", failure.left)?;
                writeln!(self.out, "    right: {}", failure.right)?;
                writeln!(self.out, "    at {}", unit.location())
            }
            Outcome::Errored(message) => {
                writeln!(self.out, "ERROR {name}")?;
                writeln!(self.out, "    {message}")?;
                writeln!(self.out, "    at {}", unit.location())
            }
            Outcome::Panicked(message) => {
                writeln!(self.out, "PANIC {name}")?;
                writeln!(self.out, "    {message}")?;
                writeln!(self.out, "    at {}", unit.location())
            }
        }
    }

    pub fn summary(&mut self, conclusion: &Conclusion) -> Result<()> {
        match self.format {
            Format::Pretty => {
                writeln!(
                    self.out,
                    "\nSummary: {} passed, {} failed, {} filtered out",
                    conclusion.passed, conclusion.failed, conclusion.filtered_out
                )?;
                if conclusion.rejected_suites > 0 {
                    writeln!(
                        self.out,
                        "{} suite(s) rejected during registration",
                        conclusion.rejected_suites
                    )?;
                }
                Ok(())
            }
            Format::Json => writeln!(
                self.out,
                "{}",
                json!({
                    "type": "summary",
                    "passed": conclusion.passed,
                    "failed": conclusion.failed,
                    "filtered_out": conclusion.filtered_out,
                    "not_run": conclusion.not_run,
                    "rejected_suites": conclusion.rejected_suites,
                })
            ),
        }
        .context("failed to write summary")
    }
}
