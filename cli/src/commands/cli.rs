use std::path::PathBuf;

use clap::{CommandFactory, Parser};

/// Flag names accepted with a single leading dash, e.g. `-input file.pdf`.
const LONG_FLAGS: &[&str] = &[
    "input",
    "output",
    "employee",
    "manager",
    "signature",
    "init",
    "show-config",
    "help",
];

#[derive(Parser, Debug, Default, Clone, PartialEq, Eq)]
#[command(
    name = "hours-signer",
    version,
    about = "Sign the last page of a timesheet PDF",
    long_about = "Sign the last page of a timesheet PDF.\n\nRun without flags to start the interactive session."
)]
pub struct Args {
    /// Input PDF file (required)
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Output PDF file (default: Urenstaat-<year>-<month>-Joel-Grimberg.pdf)
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Employee name
    #[arg(long, value_name = "NAME")]
    pub employee: Option<String>,

    /// Manager name
    #[arg(long, value_name = "NAME")]
    pub manager: Option<String>,

    /// Path to signature image (PNG/JPG)
    #[arg(long, value_name = "PATH")]
    pub signature: Option<String>,

    /// Initialize config file with defaults
    #[arg(long)]
    pub init: bool,

    /// Show current configuration
    #[arg(long = "show-config")]
    pub show_config: bool,
}

impl Args {
    /// Parse process arguments, accepting both `-flag` and `--flag` spellings.
    pub fn try_parse_normalized<I, T>(argv: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::try_parse_from(normalize_flags(argv))
    }
}

/// One-shot mode is selected by any flag-like first argument.
pub fn is_flag_mode(argv: &[String]) -> bool {
    argv.get(1).is_some_and(|a| a.starts_with('-'))
}

/// Rewrite single-dash long flags (`-input`, `-show-config=…`) to clap's `--` form.
///
/// Only known flag names are rewritten so values that start with a dash pass through.
pub fn normalize_flags<I, T>(argv: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    argv.into_iter()
        .map(Into::into)
        .enumerate()
        .map(|(idx, arg)| {
            if idx == 0 || arg.starts_with("--") {
                return arg;
            }
            let Some(rest) = arg.strip_prefix('-') else {
                return arg;
            };
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if LONG_FLAGS.contains(&name) {
                format!("-{arg}")
            } else {
                arg
            }
        })
        .collect()
}

pub fn usage() -> String {
    Args::command().render_help().to_string()
}
