//! A small host test framework for prove units.
//!
//! Point a test target at it with `harness = false`:
//!
//! ```ignore
//! use prove_core::prove;
//! use prove_harness::Harness;
//!
//! fn main() {
//!     Harness::from_args()
//!         .suite("math", |suite| {
//!             prove!(suite, 1 + 1 == 2)?;
//!             Ok(())
//!         })
//!         .run()
//!         .exit();
//! }
//! ```

mod args;
mod logging;
mod report;
mod runner;

use std::io::{self, Write};
use std::process;

use anyhow::Result;
use prove_core::{Host, Suite, SuiteOptions, TestUnit};
use tracing::{info, warn};

pub use crate::args::{Arguments, Format};
pub use crate::logging::{init as init_logging, LOG_ENV};
pub use crate::report::Reporter;
pub use crate::runner::{execute, Outcome};

/// Tallies of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conclusion {
    pub passed: usize,
    pub failed: usize,
    pub filtered_out: usize,
    /// Selected units left unrun after `--fail-fast` stopped the run.
    pub not_run: usize,
    pub rejected_suites: usize,
}

impl Conclusion {
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.rejected_suites > 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            1
        } else {
            0
        }
    }

    pub fn exit(self) -> ! {
        process::exit(self.exit_code())
    }
}

/// Collects units from suites and runs them.
pub struct Harness {
    args: Arguments,
    units: Vec<TestUnit>,
    rejected: Vec<(String, anyhow::Error)>,
}

impl Host for Harness {
    fn register(&mut self, unit: TestUnit) {
        self.units.push(unit);
    }
}

impl Harness {
    pub fn new(args: Arguments) -> Self {
        Self {
            args,
            units: Vec::new(),
            rejected: Vec::new(),
        }
    }

    /// Parses the process arguments and installs logging.
    pub fn from_args() -> Self {
        logging::init();
        Self::new(Arguments::from_args())
    }

    pub fn units(&self) -> &[TestUnit] {
        &self.units
    }

    /// Runs one suite's registration pass with options from the environment.
    pub fn suite<F>(self, name: &str, declare: F) -> Self
    where
        F: FnOnce(&mut Suite) -> Result<()>,
    {
        match SuiteOptions::from_env() {
            Ok(options) => self.suite_with_options(name, options, declare),
            Err(error) => self.reject(name, error),
        }
    }

    /// Runs one suite's registration pass. If `declare` fails, the suite is
    /// recorded as rejected and none of its units are kept.
    pub fn suite_with_options<F>(mut self, name: &str, options: SuiteOptions, declare: F) -> Self
    where
        F: FnOnce(&mut Suite) -> Result<()>,
    {
        let mut suite = Suite::with_options(name, options);
        match declare(&mut suite) {
            Ok(()) => {
                let count = suite.register_into(&mut self);
                info!(suite = name, count, "registered suite");
                self
            }
            Err(error) => self.reject(name, error),
        }
    }

    fn reject(mut self, name: &str, error: anyhow::Error) -> Self {
        warn!(suite = name, error = %format!("{error:#}"), "suite rejected");
        self.rejected.push((name.to_string(), error));
        self
    }

    /// Runs everything selected, reporting to stdout.
    pub fn run(self) -> Conclusion {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        match self.run_with(&mut out) {
            Ok(conclusion) => conclusion,
            Err(error) => {
                eprintln!("error: {error:#}");
                Conclusion {
                    failed: 1,
                    ..Conclusion::default()
                }
            }
        }
    }

    /// Runs everything selected, reporting to `out`.
    pub fn run_with<W: Write>(self, out: &mut W) -> Result<Conclusion> {
        let Harness {
            args,
            units,
            rejected,
        } = self;
        let mut reporter = Reporter::new(out, args.format, args.quiet);
        let mut conclusion = Conclusion {
            rejected_suites: rejected.len(),
            ..Conclusion::default()
        };

        for (suite, error) in &rejected {
            reporter.rejected(suite, error)?;
        }

        let total = units.len();
        let selected: Vec<TestUnit> = units
            .into_iter()
            .filter(|unit| args.selects(unit.suite(), unit.name()))
            .collect();
        conclusion.filtered_out = total - selected.len();

        if args.list {
            for unit in &selected {
                reporter.listed(unit)?;
            }
            return Ok(conclusion);
        }

        reporter.plan(selected.len())?;
        for (index, unit) in selected.iter().enumerate() {
            let outcome = runner::execute(unit);
            reporter.outcome(unit, &outcome)?;
            if outcome.is_success() {
                conclusion.passed += 1;
            } else {
                conclusion.failed += 1;
                if args.fail_fast {
                    conclusion.not_run = selected.len() - index - 1;
                    break;
                }
            }
        }

        reporter.summary(&conclusion)?;
        info!(
            passed = conclusion.passed,
            failed = conclusion.failed,
            filtered_out = conclusion.filtered_out,
            "run finished"
        );
        Ok(conclusion)
    }
}
