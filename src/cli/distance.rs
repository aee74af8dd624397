use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mite::algebra::{difference, intersection_all, DistanceMatrix};
use mite::corpus::{Corpus, MapMode, QuartileScope};

/// Write the pairwise distance matrix of a directory of samples
pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    binary: bool,
    quartiles: QuartileScope,
    intersect_core: bool,
) -> Result<()> {
    let mode = if binary {
        MapMode::Binary
    } else {
        MapMode::Quartile(quartiles)
    };

    let corpus = Corpus::load(&input)
        .with_context(|| format!("Failed to load samples from {}", input.display()))?;
    let mut maps = corpus.build_maps(mode)?;

    if intersect_core {
        if let Some(core) = intersection_all(&maps) {
            info!("Removing {} core cells from every map", core.nonzero_count());
            maps = maps
                .iter()
                .map(|m| difference(m, &core).with_name(m.name()))
                .collect();
        }
    }

    let matrix = DistanceMatrix::compute(&maps);
    info!(
        "{} samples, {} pairwise comparisons",
        matrix.len(),
        matrix.comparisons()
    );

    match output {
        Some(path) => matrix
            .write_csv_file(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => matrix
            .write_csv(std::io::stdout().lock())
            .context("Failed to write distance matrix")?,
    }
    Ok(())
}
