//! CLI argument definitions for the `parcel` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "parcel",
    version,
    about = "Deduplicate property records from a listing feed",
    long_about = "Deduplicate property records from a listing feed.\n\n\
                  Records sharing a source identifier are dropped first; the\n\
                  remaining records are merged when their normalized addresses\n\
                  are similar enough for the source's threshold."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow addresses and identifiers in trace output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Deduplicate one input file for a named source.
    Dedup(DedupArgs),

    /// List the configured sources and their thresholds.
    Sources(SourcesArgs),
}

#[derive(Parser)]
pub struct DedupArgs {
    /// Input file (.csv or .json).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Source name from the catalog (e.g. mls, assessor, aggregator).
    #[arg(long = "source", short = 's')]
    pub source: String,

    /// Source catalog TOML (default: built-in catalog).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Survivors CSV (default: <INPUT stem>.dedup.csv).
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Merge report JSON (default: <INPUT stem>.merges.json).
    #[arg(long = "merges", value_name = "FILE")]
    pub merges: Option<PathBuf>,

    /// Override the source's fuzzy threshold (0-100).
    #[arg(long = "threshold", value_name = "N")]
    pub threshold: Option<i64>,

    /// Only compare records that share a zip code.
    #[arg(long = "partition-by-zip")]
    pub partition_by_zip: bool,

    /// Merge chains of near-duplicates into one group.
    ///
    /// By default a record merges into the earliest survivor it matches and
    /// is not compared again. With this flag, matching is transitive: if A
    /// matches B and B matches C, all three collapse into A.
    #[arg(long = "transitive")]
    pub transitive: bool,

    /// Run and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct SourcesArgs {
    /// Source catalog TOML (default: built-in catalog).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
