use crate::describe::compose;
use crate::error::RegistrationError;
use crate::location::Location;
use crate::unit::{AssertionExpr, Setup, Shape};

/// One statement inside a batch body.
#[derive(Debug, Clone)]
pub enum Statement {
    Assertion {
        description: Option<String>,
        shape: Shape,
        location: Location,
    },
    /// Preparatory code re-run before every assertion that follows it.
    Setup(Setup),
    /// Batches do not nest; registering one inside another is rejected.
    Batch(Batch),
}

impl Statement {
    pub fn assertion(description: Option<&str>, shape: Shape, location: Location) -> Self {
        Statement::Assertion {
            description: description.map(str::to_string),
            shape,
            location,
        }
    }
}

/// A shared description prefix over an ordered list of statements.
#[derive(Debug, Clone)]
pub struct Batch {
    prefix: String,
    location: Location,
    statements: Vec<Statement>,
}

pub(crate) struct PlannedAssertion {
    pub description: String,
    pub expr: AssertionExpr,
    pub setups: Vec<Setup>,
    pub location: Location,
}

impl Batch {
    pub fn new(prefix: impl Into<String>, location: Location) -> Self {
        Self {
            prefix: prefix.into(),
            location,
            statements: Vec::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn statement(mut self, statement: Statement) -> Self {
        self.push(statement);
        self
    }

    pub fn prove(self, description: Option<&str>, shape: Shape, location: Location) -> Self {
        self.statement(Statement::assertion(description, shape, location))
    }

    pub fn setup<F>(self, statement: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.statement(Statement::Setup(Setup::new(statement)))
    }

    /// Validates every statement and plans one assertion per declaration,
    /// each carrying the setups declared before it.
    pub(crate) fn expand(self) -> Result<Vec<PlannedAssertion>, RegistrationError> {
        let mut planned = Vec::new();
        let mut setups: Vec<Setup> = Vec::new();
        let mut pending_setup = false;

        for statement in self.statements {
            match statement {
                Statement::Assertion {
                    description,
                    shape,
                    location,
                } => {
                    let expr = AssertionExpr::from_shape(shape, &location)?;
                    planned.push(PlannedAssertion {
                        description: compose(Some(&self.prefix), description.as_deref()),
                        expr,
                        setups: setups.clone(),
                        location,
                    });
                    pending_setup = false;
                }
                Statement::Setup(setup) => {
                    setups.push(setup);
                    pending_setup = true;
                }
                Statement::Batch(_) => {
                    return Err(RegistrationError::NotAnAssertion {
                        prefix: self.prefix,
                        location: self.location,
                    });
                }
            }
        }

        if pending_setup {
            return Err(RegistrationError::TrailingSetup {
                prefix: self.prefix,
                location: self.location,
            });
        }
        Ok(planned)
    }
}
