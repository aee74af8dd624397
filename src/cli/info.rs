use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use mite::feature::{FeatureList, Quartiles, SourceFormat};
use mite::map::{CellMode, IntensityMap};
use mite::quantize::GridQuantizer;

/// Summary of one feature list and the map it produces
#[derive(Debug, Serialize)]
struct SampleSummary {
    file: String,
    name: String,
    format: &'static str,
    features: usize,
    declared_features: Option<usize>,
    retention_time: AxisSummary,
    mz: AxisSummary,
    rows: usize,
    cols: usize,
    nonzero_cells: usize,
    quartiles: Option<Quartiles>,
}

#[derive(Debug, Serialize)]
struct AxisSummary {
    min: String,
    max: String,
    precision: u32,
    bins: usize,
}

impl SampleSummary {
    fn collect(file: &Path, list: &FeatureList) -> Result<Self> {
        let quantizer = GridQuantizer::for_features(&list.bounds, &list.features)
            .context("Failed to build the sample grid")?;
        let map = IntensityMap::from_feature_list(list, CellMode::Binary)
            .context("Failed to build the sample map")?;
        let shape = map.shape();
        let rt = quantizer.retention_time_axis();
        let mz = quantizer.mz_axis();

        Ok(Self {
            file: file.display().to_string(),
            name: list.name.clone(),
            format: match list.format {
                SourceFormat::Apml => "APML",
                SourceFormat::Csv => "CSV",
            },
            features: list.len(),
            declared_features: list.declared_count,
            retention_time: AxisSummary {
                min: rt.min().to_string(),
                max: rt.max().to_string(),
                precision: rt.precision(),
                bins: rt.len(),
            },
            mz: AxisSummary {
                min: mz.min().to_string(),
                max: mz.max().to_string(),
                precision: mz.precision(),
                bins: mz.len(),
            },
            rows: shape.rows,
            cols: shape.cols,
            nonzero_cells: map.nonzero_count(),
            quartiles: list.local_quartiles().ok(),
        })
    }

    fn print(&self) {
        #[cfg(feature = "colorized_output")]
        let heading = |s: &str| console::style(s.to_string()).bold().cyan().to_string();
        #[cfg(not(feature = "colorized_output"))]
        let heading = |s: &str| s.to_string();

        println!("{}", heading("mite Sample Information"));
        println!("{}", heading("======================="));
        println!("File: {}", self.file);
        println!("Sample: {}", self.name);
        println!("Format: {}", self.format);
        println!();

        println!("{}", heading("Features:"));
        match self.declared_features {
            Some(declared) => println!("  Count: {} (declared {})", self.features, declared),
            None => println!("  Count: {}", self.features),
        }
        if let Some(q) = &self.quartiles {
            println!("  Intensity quartiles: {}", q);
        }
        println!();

        println!("{}", heading("Grid:"));
        for (label, axis) in [("Retention time", &self.retention_time), ("m/z", &self.mz)] {
            println!(
                "  {}: {} .. {} (precision {}, {} bins)",
                label, axis.min, axis.max, axis.precision, axis.bins
            );
        }
        println!("  Shape: {} x {}", self.rows, self.cols);
        println!("  Occupied cells: {}", self.nonzero_cells);
    }
}

/// Display information about a feature list
pub fn run(file: PathBuf, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let list = FeatureList::from_path(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let summary = SampleSummary::collect(&file, &list)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        summary.print();
    }
    Ok(())
}
