use serde::Serialize;
use thiserror::Error;

use crate::location::Location;
use crate::operator::Operator;
use crate::value::Value;

/// Raised while a suite is being registered; the offending declaration
/// produces no unit.
#[derive(Debug, Clone, Error)]
pub enum RegistrationError {
    #[error("{location}: unsupported expression: {rendered}")]
    Unsupported { rendered: String, location: Location },
    #[error("{location}: batch \"{prefix}\": a batch may only contain assertion declarations")]
    NotAnAssertion { prefix: String, location: Location },
    #[error("{location}: batch \"{prefix}\": setup statement is not followed by an assertion")]
    TrailingSetup { prefix: String, location: Location },
}

impl RegistrationError {
    pub fn location(&self) -> &Location {
        match self {
            RegistrationError::Unsupported { location, .. }
            | RegistrationError::NotAnAssertion { location, .. }
            | RegistrationError::TrailingSetup { location, .. } => location,
        }
    }
}

/// The structured failure of a unit whose assertion did not hold.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("Prove with {operator} failed")]
pub struct ProveFailure {
    pub operator: Operator,
    pub left: Value,
    pub right: Value,
}

#[derive(Debug, Clone, Error)]
pub enum EvalError {
    #[error("cannot match {left} against {right}: `=~` expects a string on the left and a string or pattern on the right")]
    NotMatchable { left: Value, right: Value },
}
