use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use crate::error::{ProveFailure, RegistrationError};
use crate::location::Location;
use crate::operator::{scan_operators, Operator};
use crate::value::Value;

type OperandFn = dyn Fn() -> Result<Value> + Send + Sync;
type SetupFn = dyn Fn() -> Result<()> + Send + Sync;
type BodyFn = dyn Fn() -> Result<()> + Send + Sync;

/// A deferred operand. Nothing runs until the unit body does.
#[derive(Clone)]
pub struct Operand(Arc<OperandFn>);

impl Operand {
    pub fn new<F>(thunk: F) -> Self
    where
        F: Fn() -> Result<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(thunk))
    }

    /// An operand that always evaluates to a clone of `value`.
    pub fn value(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::new(move || Ok(value.clone()))
    }

    pub fn evaluate(&self) -> Result<Value> {
        (self.0)()
    }
}

impl fmt::Debug for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Operand(..)")
    }
}

/// A preparatory statement re-run before later assertions of a batch.
#[derive(Clone)]
pub struct Setup(Arc<SetupFn>);

impl Setup {
    pub fn new<F>(statement: F) -> Self
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(statement))
    }

    pub fn run(&self) -> Result<()> {
        (self.0)()
    }
}

impl fmt::Debug for Setup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Setup(..)")
    }
}

/// An assertion as declared, before the grammar has looked at it.
#[derive(Debug, Clone)]
pub struct Shape {
    pub rendered: String,
    pub operator: String,
    pub left: Option<Operand>,
    pub right: Option<Operand>,
}

impl Shape {
    pub fn binary(
        left_source: &str,
        operator: &str,
        right_source: &str,
        left: Operand,
        right: Operand,
    ) -> Self {
        Self {
            rendered: format!("{} {} {}", left_source.trim(), operator.trim(), right_source.trim()),
            operator: operator.to_string(),
            left: Some(left),
            right: Some(right),
        }
    }

    /// A declaration the grammar cannot take apart; registering it fails.
    pub fn unsupported(rendered: &str) -> Self {
        Self {
            rendered: rendered.trim().to_string(),
            operator: String::new(),
            left: None,
            right: None,
        }
    }
}

/// A validated `left OP right` assertion.
#[derive(Debug, Clone)]
pub struct AssertionExpr {
    operator: Operator,
    left: Operand,
    right: Operand,
    rendered: String,
}

impl AssertionExpr {
    /// Checks the shape against the operator grammar: a known operator, both
    /// operands present, and exactly one top-level operator in the rendered
    /// text.
    pub fn from_shape(shape: Shape, location: &Location) -> Result<Self, RegistrationError> {
        let unsupported = || RegistrationError::Unsupported {
            rendered: shape.rendered.clone(),
            location: location.clone(),
        };

        let operator = Operator::from_token(&shape.operator).ok_or_else(unsupported)?;
        let operators = scan_operators(&shape.rendered);
        if operators.len() != 1 || operators[0].1 != operator {
            return Err(unsupported());
        }
        match (shape.left.clone(), shape.right.clone()) {
            (Some(left), Some(right)) => Ok(Self {
                operator,
                left,
                right,
                rendered: shape.rendered.clone(),
            }),
            _ => Err(unsupported()),
        }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    /// Evaluates left, then right, then the operator. Operand errors are
    /// returned as they were raised; a false assertion becomes a
    /// [`ProveFailure`].
    pub fn evaluate(&self) -> Result<()> {
        let left = self.left.evaluate()?;
        let right = self.right.evaluate()?;
        if self.operator.holds(&left, &right)? {
            Ok(())
        } else {
            Err(ProveFailure {
                operator: self.operator,
                left,
                right,
            }
            .into())
        }
    }
}

/// One named, independently runnable assertion.
#[derive(Clone)]
pub struct TestUnit {
    suite: String,
    name: String,
    location: Location,
    operator: Operator,
    body: Arc<BodyFn>,
}

impl TestUnit {
    pub(crate) fn new(
        suite: &str,
        name: String,
        location: Location,
        expr: AssertionExpr,
        setups: Vec<Setup>,
    ) -> Self {
        let operator = expr.operator();
        let body = move || {
            for setup in &setups {
                setup.run()?;
            }
            expr.evaluate()
        };
        Self {
            suite: suite.to_string(),
            name,
            location,
            operator,
            body: Arc::new(body),
        }
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `suite::name`, the identity a host filters on.
    pub fn full_name(&self) -> String {
        format!("{}::{}", self.suite, self.name)
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn run(&self) -> Result<()> {
        (self.body)()
    }
}

impl fmt::Debug for TestUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestUnit")
            .field("suite", &self.suite)
            .field("name", &self.name)
            .field("location", &self.location)
            .field("operator", &self.operator)
            .finish_non_exhaustive()
    }
}

/// The test framework that takes ownership of registered units.
pub trait Host {
    fn register(&mut self, unit: TestUnit);
}

impl Host for Vec<TestUnit> {
    fn register(&mut self, unit: TestUnit) {
        self.push(unit);
    }
}
