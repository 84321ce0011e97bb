//! Declarative test-unit generation.
//!
//! A prove declaration is one binary assertion (`left OP right`) plus an
//! optional description. Registering declarations on a [`Suite`] produces a
//! flat list of uniquely named [`TestUnit`]s that a host test framework runs
//! later. Operands are deferred thunks: registration only inspects the shape
//! of an assertion, never the values it compares.
//!
//! ```ignore
//! use prove_core::{prove, batch, Suite};
//!
//! let mut suite = Suite::new("math");
//! prove!(suite, 1 + 1 == 2)?;
//! prove!(suite, "addition commutes", 2 + 3 == 3 + 2)?;
//! batch!(suite, "identity", {
//!     prove 5 > 1;
//!     prove "still five", 5 === 5;
//! })?;
//! let units = suite.finish();
//! ```

mod batch;
mod counter;
mod describe;
mod error;
mod location;
mod macros;
mod operator;
mod suite;
mod unit;
mod value;

pub use crate::batch::{Batch, Statement};
pub use crate::counter::{unique_name, UniquenessCounter};
pub use crate::describe::{compose, join_fragments};
pub use crate::error::{EvalError, ProveFailure, RegistrationError};
pub use crate::location::Location;
pub use crate::operator::{scan_operators, Operator};
pub use crate::suite::{Naming, Suite, SuiteOptions, NAMING_ENV};
pub use crate::unit::{AssertionExpr, Host, Operand, Setup, Shape, TestUnit};
pub use crate::value::{Pattern, Value};
