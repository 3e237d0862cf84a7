use clap::{Args, Parser, Subcommand};
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
    about = "Metropolis Monte Carlo temperature scan of the 2-D Ising ferromagnet.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output and the progress bar
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to run temperatures in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the temperature scan and write one magnetization series per temperature.
    Scan(ScanArgs),
    /// Print the effective configuration (defaults, file and flags merged) as TOML.
    Config(ScanArgs),
}

/// Scan parameters. Every flag overrides the corresponding config file value.
#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Lattice side length L (the lattice has L*L spins).
    #[arg(short = 'L', long, value_name = "INT", allow_hyphen_values = true)]
    pub size: Option<i64>,

    /// First temperature of the scan.
    #[arg(long, value_name = "FLOAT", allow_hyphen_values = true)]
    pub t_start: Option<f64>,

    /// Last temperature of the scan.
    #[arg(long, value_name = "FLOAT", allow_hyphen_values = true)]
    pub t_stop: Option<f64>,

    /// Number of linearly spaced temperatures.
    #[arg(long, value_name = "INT")]
    pub t_count: Option<usize>,

    /// Single-spin trials between two recorded magnetizations.
    #[arg(long, value_name = "INT")]
    pub steps_per_sample: Option<usize>,

    /// Magnetizations recorded per temperature.
    #[arg(long, value_name = "INT")]
    pub samples: Option<usize>,

    /// Base seed; temperature k uses seed + k.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Run temperatures one after another on the main thread.
    #[arg(long)]
    pub sequential: bool,

    /// Directory receiving the per-temperature series and summary.csv.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}
