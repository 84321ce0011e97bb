use std::env;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use crate::batch::{Batch, PlannedAssertion};
use crate::counter::{unique_name, UniquenessCounter};
use crate::describe::{compose, join_fragments};
use crate::error::RegistrationError;
use crate::location::Location;
use crate::unit::{AssertionExpr, Host, Setup, Shape, TestUnit};

pub const NAMING_ENV: &str = "PROVE_NAMING";

/// What the uniqueness counter buckets on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Naming {
    /// The description plus the rendered expression form the bucket, so the
    /// suffix only separates exact duplicates: `"one identity(5) > 1 (1)"`.
    #[default]
    PerExpression,
    /// Only the description forms the bucket; every assertion under one
    /// description shares a counter and the name omits the expression:
    /// `"one (1)"`, `"one (2)"`.
    PerDescription,
}

impl FromStr for Naming {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "expression" | "per-expression" => Ok(Naming::PerExpression),
            "description" | "per-description" => Ok(Naming::PerDescription),
            other => Err(anyhow!(
                "unknown naming convention `{other}` (expected `expression` or `description`)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SuiteOptions {
    pub naming: Naming,
}

impl SuiteOptions {
    /// Reads `PROVE_NAMING`; unset means the defaults.
    pub fn from_env() -> Result<Self> {
        match env::var(NAMING_ENV) {
            Ok(value) => {
                let naming = value
                    .parse()
                    .with_context(|| format!("invalid {NAMING_ENV}"))?;
                Ok(Self { naming })
            }
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(err) => Err(err).with_context(|| format!("failed to read {NAMING_ENV}")),
        }
    }
}

/// One suite's registration pass.
///
/// Declarations are registered in source order; the uniqueness counter lives
/// here and is dropped by [`Suite::finish`].
#[derive(Debug)]
pub struct Suite {
    name: String,
    options: SuiteOptions,
    counter: UniquenessCounter,
    units: Vec<TestUnit>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, SuiteOptions::default())
    }

    pub fn with_options(name: impl Into<String>, options: SuiteOptions) -> Self {
        Self {
            name: name.into(),
            options,
            counter: UniquenessCounter::new(),
            units: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &SuiteOptions {
        &self.options
    }

    pub fn units(&self) -> &[TestUnit] {
        &self.units
    }

    /// Registers one assertion and returns the name it was given.
    pub fn prove(
        &mut self,
        description: Option<&str>,
        shape: Shape,
        location: Location,
    ) -> Result<&str, RegistrationError> {
        let expr = AssertionExpr::from_shape(shape, &location).map_err(|err| {
            warn!(suite = %self.name, %err, "rejected declaration");
            err
        })?;
        Ok(self.register(description, expr, Vec::new(), location))
    }

    /// Registers every assertion of a batch, or none of them.
    ///
    /// The whole batch is validated before the first unit is registered, so
    /// a rejected batch leaves the counter exactly as it was.
    pub fn batch(&mut self, batch: Batch) -> Result<Vec<String>, RegistrationError> {
        let prefix = batch.prefix().to_string();
        let planned = batch.expand().map_err(|err| {
            warn!(suite = %self.name, batch = %prefix, %err, "rejected batch");
            err
        })?;

        let mut names = Vec::with_capacity(planned.len());
        for PlannedAssertion {
            description,
            expr,
            setups,
            location,
        } in planned
        {
            let name = self.register(Some(&description), expr, setups, location);
            names.push(name.to_string());
        }
        Ok(names)
    }

    fn register(
        &mut self,
        description: Option<&str>,
        expr: AssertionExpr,
        setups: Vec<Setup>,
        location: Location,
    ) -> &str {
        let described = compose(None, description);
        let base = match self.options.naming {
            Naming::PerExpression => join_fragments([described.as_str(), expr.rendered()]),
            Naming::PerDescription => described,
        };
        let sequence = self.counter.next(&base);
        let name = unique_name(&base, sequence);
        debug!(suite = %self.name, %name, %location, "registered unit");

        let unit = TestUnit::new(&self.name, name, location, expr, setups);
        self.units.push(unit);
        let last = self.units.len() - 1;
        self.units[last].name()
    }

    /// Ends the registration pass and hands back the units in declaration
    /// order.
    pub fn finish(self) -> Vec<TestUnit> {
        self.units
    }

    /// Ends the registration pass and gives every unit to `host`. Returns the
    /// number of units handed over.
    pub fn register_into<H: Host + ?Sized>(self, host: &mut H) -> usize {
        let units = self.finish();
        let count = units.len();
        for unit in units {
            host.register(unit);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::Operand;

    fn shape(left: i64, operator: &str, right: i64) -> Shape {
        Shape::binary(
            &left.to_string(),
            operator,
            &right.to_string(),
            Operand::value(left),
            Operand::value(right),
        )
    }

    #[test]
    fn naming_parses_both_conventions() {
        assert_eq!("expression".parse::<Naming>().ok(), Some(Naming::PerExpression));
        assert_eq!("Description".parse::<Naming>().ok(), Some(Naming::PerDescription));
        assert!("neither".parse::<Naming>().is_err());
    }

    #[test]
    fn options_follow_the_naming_variable() {
        // Every case lives in one test: the variable is process-wide.
        env::set_var(NAMING_ENV, "sideways");
        let error = SuiteOptions::from_env().unwrap_err();
        let message = format!("{error:#}");
        assert!(message.starts_with("invalid PROVE_NAMING"), "{message}");
        assert!(message.contains("unknown naming convention `sideways`"), "{message}");

        env::set_var(NAMING_ENV, "description");
        assert_eq!(SuiteOptions::from_env().ok().map(|o| o.naming), Some(Naming::PerDescription));

        env::remove_var(NAMING_ENV);
        assert_eq!(SuiteOptions::from_env().ok().map(|o| o.naming), Some(Naming::PerExpression));
    }

    #[test]
    fn returns_the_registered_name() {
        let mut suite = Suite::new("math");
        let name = suite
            .prove(Some("adds"), shape(2, "==", 2), Location::caller())
            .map(str::to_string);
        assert_eq!(name.ok().as_deref(), Some("adds 2 == 2 (1)"));
    }

    #[test]
    fn rejected_declaration_registers_nothing() {
        let mut suite = Suite::new("math");
        let result = suite.prove(None, shape(1, "+", 2), Location::caller());
        assert!(matches!(result, Err(RegistrationError::Unsupported { .. })));
        assert!(suite.units().is_empty());
    }

    #[test]
    fn register_into_hands_over_every_unit() {
        let mut suite = Suite::new("math");
        for _ in 0..3 {
            let _ = suite.prove(None, shape(1, "<", 2), Location::caller());
        }
        let mut host: Vec<TestUnit> = Vec::new();
        assert_eq!(suite.register_into(&mut host), 3);
        let names: Vec<_> = host.iter().map(TestUnit::name).collect();
        assert_eq!(names, ["1 < 2 (1)", "1 < 2 (2)", "1 < 2 (3)"]);
        assert!(host.iter().all(|unit| unit.suite() == "math"));
    }
}
