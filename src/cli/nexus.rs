use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mite::corpus::{Corpus, MapMode, QuartileScope};
use mite::encode::{encode_maps, Discretizer};
use mite::map::TraversalOrder;
use mite::nexus::NexusWriter;
use mite::partition::PartitionStrategy;
use mite::reduce::{
    ReductionConfig, ReductionRule, ThresholdNormalization, Window, WindowedReducer,
    DEFAULT_MAX_CELLS,
};

use super::{Config, PartitionArg};

/// Arguments of the `nexus` command after clap validation
pub struct NexusArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub window_width: Option<usize>,
    pub window_height: Option<usize>,
    /// Set only together with `--binary`
    pub fraction: Option<f64>,
    pub min_iterations: Option<usize>,
    pub max_cells: Option<usize>,
    pub order: TraversalOrder,
    pub partition: PartitionArg,
    pub parts: Option<Vec<usize>>,
    pub quartiles: Option<QuartileScope>,
    pub keep_constant_columns: bool,
    pub normalization: Option<ThresholdNormalization>,
    pub config: Option<PathBuf>,
}

/// Reduce every sample of a directory and write one NEXUS matrix
pub fn run(args: NexusArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let reduction = &config.reduction;

    let window_width = args
        .window_width
        .or(reduction.window_width)
        .context("Window width is required (--window-width or [reduction] window_width)")?;
    let window_height = args
        .window_height
        .or(reduction.window_height)
        .context("Window height is required (--window-height or [reduction] window_height)")?;
    let min_iterations = args.min_iterations.or(reduction.min_iterations).unwrap_or(0);
    let max_cells = args
        .max_cells
        .or(reduction.max_cells)
        .unwrap_or(DEFAULT_MAX_CELLS);
    let normalization = args
        .normalization
        .or(reduction.normalization)
        .unwrap_or_default();
    let quartiles = args
        .quartiles
        .or(config.encoding.quartiles)
        .unwrap_or_default();
    let keep_constant_columns =
        args.keep_constant_columns || config.encoding.keep_constant_columns.unwrap_or(false);

    let (mode, rule, discretizer) = match args.fraction {
        Some(fraction) => (
            MapMode::Binary,
            ReductionRule::Threshold {
                fraction,
                normalization,
            },
            Discretizer::Binary,
        ),
        None => (
            MapMode::Quartile(quartiles),
            ReductionRule::RoundedMean,
            Discretizer::Classes,
        ),
    };
    let strategy = partition_strategy(args.partition, args.parts.as_deref())?;

    info!("mite - NEXUS encoding");
    info!("Input:  {}", args.input.display());
    info!("Output: {}", args.output.display());
    info!("Window: {}x{} ({:?})", window_width, window_height, rule);
    info!("Maps: {}, partition: {}", mode, strategy);
    info!("Budget: {} cells, at least {} iterations", max_cells, min_iterations);

    let reducer = WindowedReducer::new(
        ReductionConfig::new(Window::new(window_width, window_height), rule)
            .with_min_iterations(min_iterations)
            .with_max_cells(Some(max_cells)),
    )?;

    let corpus = Corpus::load(&args.input)
        .with_context(|| format!("Failed to load samples from {}", args.input.display()))?;
    let maps = corpus.build_maps(mode)?;
    let mut matrix = encode_maps(&maps, strategy, &reducer, args.order, &discretizer)
        .context("Failed to encode maps")?;
    if !keep_constant_columns {
        matrix = matrix.strip_constant_columns();
        info!("{} characters vary across taxa", matrix.nchar());
    }

    NexusWriter::new()
        .write_file(&matrix, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!(
        "Wrote {} taxa x {} characters to {}",
        matrix.ntax(),
        matrix.nchar(),
        args.output.display()
    );
    Ok(())
}

/// Resolve `--partition` and `--parts` into a strategy
pub fn partition_strategy(kind: PartitionArg, parts: Option<&[usize]>) -> Result<PartitionStrategy> {
    let parts = match (kind, parts) {
        (PartitionArg::Whole, _) => return Ok(PartitionStrategy::Whole),
        (_, Some([rows, cols])) => (*rows, *cols),
        (_, _) => anyhow::bail!("--partition {:?} requires --parts ROWS COLS", kind),
    };
    Ok(match kind {
        PartitionArg::Uniform => PartitionStrategy::Uniform {
            row_parts: parts.0,
            col_parts: parts.1,
        },
        _ => PartitionStrategy::FixedSize {
            part_rows: parts.0,
            part_cols: parts.1,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_strategy() {
        assert_eq!(
            partition_strategy(PartitionArg::Whole, None).unwrap(),
            PartitionStrategy::Whole
        );
        assert_eq!(
            partition_strategy(PartitionArg::Uniform, Some(&[2, 3])).unwrap(),
            PartitionStrategy::Uniform {
                row_parts: 2,
                col_parts: 3
            }
        );
        assert_eq!(
            partition_strategy(PartitionArg::Fixed, Some(&[10, 20])).unwrap(),
            PartitionStrategy::FixedSize {
                part_rows: 10,
                part_cols: 20
            }
        );
        assert!(partition_strategy(PartitionArg::Fixed, None).is_err());
    }
}
