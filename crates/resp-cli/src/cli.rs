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
    about = "resp CLI - Deterministic geometry tooling for RESP charge derivation: van der Waals surface grids and conformer orientations.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sample the van der Waals surface grid of a molecule.
    Grid(GridArgs),
    /// Generate the orientation set of a conformer from a TOML configuration.
    Orient(OrientArgs),
}

/// Arguments for the `grid` subcommand.
#[derive(Args, Debug)]
pub struct GridArgs {
    /// Path to the input geometry in XYZ format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output grid file (one "x y z" row per surface point).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Surface point density in points per square Angstrom.
    #[arg(short, long, value_name = "FLOAT")]
    pub density: Option<f64>,

    /// Which built-in van der Waals radius set to use (msk or bondi).
    #[arg(long, value_name = "NAME")]
    pub radii: Option<String>,

    /// CSV file of per-element radius overrides (element,radius).
    #[arg(long, value_name = "PATH")]
    pub radii_csv: Option<PathBuf>,

    /// Comma-separated shell scale factors.
    #[arg(long, value_name = "F,F,..", value_delimiter = ',')]
    pub scale_factors: Option<Vec<f64>>,

    /// Inner exclusion bound as a multiple of each scaled radius.
    #[arg(long, value_name = "FLOAT")]
    pub rmin: Option<f64>,

    /// Outer bound as a multiple of each scaled radius; negative disables it.
    #[arg(long, value_name = "FLOAT", allow_hyphen_values = true)]
    pub rmax: Option<f64>,
}

/// Arguments for the `orient` subcommand.
#[derive(Args, Debug)]
pub struct OrientArgs {
    /// Path to the input geometry in XYZ format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to the orientation configuration in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Directory to write one XYZ file per orientation into.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub outdir: PathBuf,

    /// Name used for the conformer (and the orientation file names).
    /// Defaults to the input file stem.
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,
}
