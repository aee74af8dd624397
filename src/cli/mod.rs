use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use mite::corpus::QuartileScope;
use mite::map::TraversalOrder;
use mite::reduce::ThresholdNormalization;

mod cluster;
mod config;
mod distance;
mod info;
mod nexus;
mod sweep;

pub use config::Config;

/// mite - Ion intensity maps for phyloproteomics
#[derive(Parser)]
#[command(name = "mite")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Order in which reduced maps are flattened into characters.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OrderArg {
    /// Append row after row (retention time slices)
    Row,
    /// Append column after column (m/z slices)
    Column,
}

impl From<OrderArg> for TraversalOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Row => TraversalOrder::RowMajor,
            OrderArg::Column => TraversalOrder::ColumnMajor,
        }
    }
}

/// How the common grid is cut into regions.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum PartitionArg {
    /// A single region covering the grid
    #[default]
    Whole,
    /// `--parts R C` slices per axis
    Uniform,
    /// Regions of `--parts R C` cells
    Fixed,
}

/// Source of quartile cut points for non-binary maps.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum QuartilesArg {
    /// Intensities of every sample in the input directory
    Global,
    /// Each sample's own intensities
    Local,
}

impl From<QuartilesArg> for QuartileScope {
    fn from(arg: QuartilesArg) -> Self {
        match arg {
            QuartilesArg::Global => QuartileScope::Global,
            QuartilesArg::Local => QuartileScope::Local,
        }
    }
}

/// Denominator of the binary window threshold.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum NormalizationArg {
    /// Cells covered by the window
    Area,
    /// Square of the covered row count
    RowSquared,
}

impl From<NormalizationArg> for ThresholdNormalization {
    fn from(arg: NormalizationArg) -> Self {
        match arg {
            NormalizationArg::Area => ThresholdNormalization::WindowArea,
            NormalizationArg::RowSquared => ThresholdNormalization::RowCountSquared,
        }
    }
}

/// Direction of a partition sweep.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SweepArg {
    /// Parameters are part counts
    Uniform,
    /// Parameters are part sizes
    Fixed,
}

#[derive(Subcommand)]
enum Commands {
    /// Reduce every sample and write a NEXUS character matrix
    Nexus {
        /// Directory of APML (.xml) or CSV feature lists
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Output NEXUS file path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Reduction window width (m/z cells)
        #[arg(long)]
        window_width: Option<usize>,

        /// Reduction window height (retention time cells)
        #[arg(long)]
        window_height: Option<usize>,

        /// Use presence maps instead of quartile classes
        #[arg(long, requires = "fraction")]
        binary: bool,

        /// Occupied fraction a window needs to stay present
        #[arg(long = "f", value_name = "F", requires = "binary")]
        fraction: Option<f64>,

        /// Reduce at least this many times
        #[arg(long)]
        min_iterations: Option<usize>,

        /// Keep reducing while a map has more cells than this
        #[arg(long)]
        max_cells: Option<usize>,

        /// Flatten reduced maps by row or by column
        #[arg(long, value_enum)]
        order: OrderArg,

        /// Partition applied before reduction
        #[arg(long, value_enum, default_value_t = PartitionArg::Whole)]
        partition: PartitionArg,

        /// Partition parameters (part counts or sizes)
        #[arg(long, num_args = 2, value_names = ["ROWS", "COLS"])]
        parts: Option<Vec<usize>>,

        /// Quartile cut points for non-binary maps
        #[arg(long, value_enum)]
        quartiles: Option<QuartilesArg>,

        /// Keep characters that are identical across every taxon
        #[arg(long)]
        keep_constant_columns: bool,

        /// Denominator of the binary window threshold
        #[arg(long, value_enum)]
        normalization: Option<NormalizationArg>,

        /// Path to TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Pairwise symmetric-difference distances between samples
    Distance {
        /// Directory of APML (.xml) or CSV feature lists
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Output CSV path (stdout if omitted)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Use presence maps instead of quartile classes
        #[arg(long)]
        binary: bool,

        /// Quartile cut points for non-binary maps
        #[arg(long, value_enum, default_value = "global", conflicts_with = "binary")]
        quartiles: QuartilesArg,

        /// Remove the cells present in every sample before comparing
        #[arg(long, requires = "binary")]
        intersect_core: bool,
    },

    /// Write a NEXUS matrix of discretized equal-window sums
    ClusterEncode {
        /// Directory of APML (.xml) or CSV feature lists
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Output NEXUS file path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Side of the square summing window
        #[arg(long, default_value = "5")]
        window_side: usize,

        /// Sum presence instead of raw intensities
        #[arg(long)]
        binary: bool,
    },

    /// Score a range of partitions by their informative character count
    Sweep {
        /// Directory of APML (.xml) or CSV feature lists
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Directory receiving one NEXUS file per step
        #[arg(value_name = "OUTPUT_DIR")]
        output: PathBuf,

        /// Partition parameters fed by the sweep
        #[arg(long, value_enum, default_value = "uniform")]
        kind: SweepArg,

        /// First parameters
        #[arg(long, num_args = 2, value_names = ["ROWS", "COLS"], default_values_t = [1, 1])]
        start: Vec<usize>,

        /// Last parameters, inclusive
        #[arg(long, num_args = 2, value_names = ["ROWS", "COLS"], required = true)]
        end: Vec<usize>,

        /// Increment applied to both parameters
        #[arg(long, default_value = "1")]
        step: usize,

        /// Reduction window width (m/z cells)
        #[arg(long, default_value = "2")]
        window_width: usize,

        /// Reduction window height (retention time cells)
        #[arg(long, default_value = "2")]
        window_height: usize,

        /// Flatten reduced maps by row or by column
        #[arg(long, value_enum)]
        order: OrderArg,
    },

    /// Display information about a feature list
    Info {
        /// Input APML or CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print a JSON summary instead of text
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Nexus {
            input,
            output,
            window_width,
            window_height,
            binary,
            fraction,
            min_iterations,
            max_cells,
            order,
            partition,
            parts,
            quartiles,
            keep_constant_columns,
            normalization,
            config,
        } => nexus::run(nexus::NexusArgs {
            input,
            output,
            window_width,
            window_height,
            fraction: if binary { fraction } else { None },
            min_iterations,
            max_cells,
            order: order.into(),
            partition,
            parts,
            quartiles: quartiles.map(QuartileScope::from),
            keep_constant_columns,
            normalization: normalization.map(ThresholdNormalization::from),
            config,
        }),
        Commands::Distance {
            input,
            output,
            binary,
            quartiles,
            intersect_core,
        } => distance::run(input, output, binary, quartiles.into(), intersect_core),
        Commands::ClusterEncode {
            input,
            output,
            window_side,
            binary,
        } => cluster::run(input, output, window_side, binary),
        Commands::Sweep {
            input,
            output,
            kind,
            start,
            end,
            step,
            window_width,
            window_height,
            order,
        } => sweep::run(sweep::SweepArgs {
            input,
            output,
            kind,
            start: pair(&start)?,
            end: pair(&end)?,
            step,
            window_width,
            window_height,
            order: order.into(),
        }),
        Commands::Info { file, json } => info::run(file, json),
    }
}

/// Two-valued `num_args = 2` argument as a tuple
fn pair(values: &[usize]) -> Result<(usize, usize)> {
    match values {
        [rows, cols] => Ok((*rows, *cols)),
        _ => anyhow::bail!("expected two values, got {}", values.len()),
    }
}
