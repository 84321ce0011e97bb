use std::ffi::OsString;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    #[value(alias = "terse")]
    Pretty,
    Json,
}

/// Command-line options, shaped after what `cargo test` forwards to a test
/// binary. libtest flags the harness has no use for are accepted and ignored.
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "prove",
    about = "Run the prove units registered by this test binary."
)]
pub struct Arguments {
    /// Only run units whose `suite::name` contains this substring (case-insensitive).
    #[arg(value_name = "FILTER")]
    pub filter: Option<String>,

    /// List registered units without running them.
    #[arg(long)]
    pub list: bool,

    /// Match FILTER against the whole `suite::name` or unit name exactly.
    #[arg(long)]
    pub exact: bool,

    /// Skip units whose `suite::name` contains this substring. May be repeated.
    #[arg(long = "skip", value_name = "PATTERN", action = ArgAction::Append)]
    pub skip: Vec<String>,

    /// Stop after the first failing unit.
    #[arg(long)]
    pub fail_fast: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Pretty)]
    pub format: Format,

    /// Only report failures and the summary.
    #[arg(short, long)]
    pub quiet: bool,

    #[arg(long, hide = true)]
    nocapture: bool,
    #[arg(long, hide = true)]
    show_output: bool,
    #[arg(long, hide = true)]
    ignored: bool,
    #[arg(long, hide = true)]
    include_ignored: bool,
    #[arg(long, hide = true)]
    test: bool,
    #[arg(long, hide = true)]
    bench: bool,
    #[arg(long, hide = true, value_name = "N")]
    test_threads: Option<usize>,
    #[arg(long, hide = true, value_name = "WHEN")]
    color: Option<String>,
    #[arg(short = 'Z', hide = true, value_name = "FLAG")]
    unstable: Vec<String>,
}

impl Arguments {
    pub fn from_args() -> Self {
        Self::parse()
    }

    pub fn from_argv<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args)
    }

    /// Whether a unit identified by `suite` and `name` is selected.
    pub fn selects(&self, suite: &str, name: &str) -> bool {
        let full_name = format!("{suite}::{name}");
        let lowered = full_name.to_lowercase();

        if self
            .skip
            .iter()
            .any(|pattern| lowered.contains(&pattern.to_lowercase()))
        {
            return false;
        }

        match &self.filter {
            None => true,
            Some(filter) if self.exact => filter == &full_name || filter == name,
            Some(filter) => lowered.contains(&filter.to_lowercase()),
        }
    }
}
