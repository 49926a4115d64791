use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "rsgc - strip aliphatic side chains from crystal molecules, keeping the conjugated backbone.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Number of threads used to strip molecules in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Strip the side chains of every molecule in a BGF structure.
    Strip(StripArgs),
    /// Print the ring and branch classification of every molecule without editing it.
    Analyze(AnalyzeArgs),
}

/// Options shared by every command that builds a stripping configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Leave ethyl instead of methyl stubs on the backbone.
    #[arg(long)]
    pub ethyl: bool,

    /// Give every surviving alpha carbon four neighbors after pruning.
    #[arg(long)]
    pub complete_alpha_carbons: bool,

    /// Give every carbon that looks sp3 four neighbors after pruning.
    #[arg(long)]
    pub complete_sp3_carbons: bool,
}

#[derive(Args, Debug)]
pub struct StripArgs {
    /// Path to the input structure (BGF).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the stripped structure (BGF).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// What to do with molecules that end up with no atoms.
    #[arg(long, value_enum, default_value_t = OnEmpty::Ask, value_name = "ACTION")]
    pub on_empty: OnEmpty,

    /// Append ring diagnostics to this file, one molecule per line.
    #[arg(long, value_name = "PATH")]
    pub ring_report: Option<PathBuf>,

    /// Write per-molecule stripping counts to this file (TOML).
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Path to the input structure (BGF).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnEmpty {
    /// Prompt on the terminal for each empty molecule.
    Ask,
    /// Remove empty molecules from the output.
    Drop,
    /// Fail without writing any output.
    Abort,
}
