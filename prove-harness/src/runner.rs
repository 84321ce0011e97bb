use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use prove_core::{ProveFailure, TestUnit};
use tracing::debug;

/// How one unit ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Passed,
    /// The assertion did not hold.
    Failed(ProveFailure),
    /// An operand or setup statement returned an error.
    Errored(String),
    Panicked(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Failed(_) => "failed",
            Outcome::Errored(_) => "errored",
            Outcome::Panicked(_) => "panicked",
        }
    }
}

/// Runs one unit, containing any panic so the next unit still runs.
pub fn execute(unit: &TestUnit) -> Outcome {
    debug!(suite = unit.suite(), name = unit.name(), "running unit");
    match panic::catch_unwind(AssertUnwindSafe(|| unit.run())) {
        Ok(Ok(())) => Outcome::Passed,
        Ok(Err(error)) => match error.downcast::<ProveFailure>() {
            Ok(failure) => Outcome::Failed(failure),
            Err(error) => Outcome::Errored(format!("{error:#}")),
        },
        Err(payload) => Outcome::Panicked(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unit panicked with a non-string payload".to_string()
    }
}
