use std::path::PathBuf;

use clap::{ArgGroup, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "codebench", about = "Live lint feedback and remote execution for Python snippets", version)]
#[command(group(ArgGroup::new("mode").args(["check", "run", "list_examples"]).multiple(false)))]
#[command(group(ArgGroup::new("seed").args(["example", "list_examples"]).multiple(false)))]
pub struct Cli {
    /// Source file to open (or to check/run in one-shot modes).
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Lint FILE once and print the findings table.
    #[arg(long, requires = "file")]
    pub check: bool,

    /// Run FILE once and print its output.
    #[arg(long, requires = "file")]
    pub run: bool,

    /// Start the workbench with a canned example (1-7).
    #[arg(short = 'x', long, conflicts_with = "file")]
    pub example: Option<String>,

    /// List the canned examples.
    #[arg(short = 'l', long = "list-examples")]
    pub list_examples: bool,

    /// Base URL of the lint/run service (overrides API_BASE).
    #[arg(long = "api-base")]
    pub api_base: Option<String>,

    /// Seconds to wait for a run before giving up (overrides RUN_TIMEOUT).
    #[arg(long = "run-timeout")]
    pub run_timeout: Option<u64>,

    /// Write debug-level logs.
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
