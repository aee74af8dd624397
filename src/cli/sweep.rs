use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mite::corpus::{Corpus, MapMode, QuartileScope};
use mite::encode::{encode_maps, Discretizer};
use mite::map::TraversalOrder;
use mite::nexus::NexusWriter;
use mite::partition::{Partition, PartitionStrategy};
use mite::reduce::{ReductionConfig, ReductionRule, Window, WindowedReducer, DEFAULT_MAX_CELLS};
use mite::sweep::{PartitionSweep, ScoreError, SweepKind};

use super::SweepArg;

/// Arguments of the `sweep` command
pub struct SweepArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub kind: SweepArg,
    pub start: (usize, usize),
    pub end: (usize, usize),
    pub step: usize,
    pub window_width: usize,
    pub window_height: usize,
    pub order: TraversalOrder,
}

/// Encode the corpus under each partition of a range and keep the one with
/// the most variable characters
pub fn run(args: SweepArgs) -> Result<()> {
    let kind = match args.kind {
        SweepArg::Uniform => SweepKind::Uniform,
        SweepArg::Fixed => SweepKind::FixedSize,
    };
    let sweep = PartitionSweep::new(kind, args.start, args.end, args.step);
    let reducer = WindowedReducer::new(
        ReductionConfig::new(
            Window::new(args.window_width, args.window_height),
            ReductionRule::RoundedMean,
        )
        .with_max_cells(Some(DEFAULT_MAX_CELLS)),
    )?;

    let corpus = Corpus::load(&args.input)
        .with_context(|| format!("Failed to load samples from {}", args.input.display()))?;
    let maps = corpus.build_maps(MapMode::Quartile(QuartileScope::Global))?;
    let shape = mite::encode::common_shape(&maps);

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let writer = NexusWriter::new();

    let mut scorer = |step: usize,
                      strategy: &PartitionStrategy,
                      _: &Partition|
     -> Result<f64, ScoreError> {
        let matrix = encode_maps(&maps, *strategy, &reducer, args.order, &Discretizer::Classes)?
            .strip_constant_columns();
        writer.write_file(&matrix, args.output.join(format!("step-{step}.nex")))?;
        Ok(matrix.nchar() as f64)
    };

    let outcome = sweep.run(shape, &mut scorer)?;
    match &outcome.best {
        Some(best) => println!(
            "Best partition: {} (step {}, {} characters)",
            best.strategy, best.step, best.score
        ),
        None => println!("No partition scored"),
    }
    info!("{}", outcome);
    Ok(())
}
