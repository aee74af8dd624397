use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mite::corpus::{Corpus, MapMode};
use mite::encode::{encode_window_sums, Discretizer};
use mite::nexus::NexusWriter;
use mite::partition::WindowGrid;

/// Encode equal-window sums of every sample as a NEXUS matrix
pub fn run(input: PathBuf, output: PathBuf, window_side: usize, binary: bool) -> Result<()> {
    let grid = WindowGrid::new(window_side)?;
    let corpus = Corpus::load(&input)
        .with_context(|| format!("Failed to load samples from {}", input.display()))?;

    // sums of presence are counts; only occupancy is kept
    let (mode, discretizer) = if binary {
        (MapMode::Binary, Discretizer::Binary)
    } else {
        (
            MapMode::Intensity,
            Discretizer::Quartile(corpus.global_quartiles()?),
        )
    };
    info!("Window sums over {}x{} windows ({})", window_side, window_side, mode);

    let maps = corpus.build_maps(mode)?;
    let matrix = encode_window_sums(&maps, &grid, &discretizer)
        .context("Failed to encode window sums")?;

    NexusWriter::new()
        .write_file(&matrix, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}
