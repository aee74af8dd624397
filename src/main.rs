//! # mite
//!
//! Command-line front end for building ion intensity maps and encoding them
//! for phylogenetic and clustering analyses.
//!
//! ## Usage
//!
//! ```bash
//! # Binary maps reduced with 2x2 windows, flattened by row
//! mite nexus samples/ out.nex --window-width 2 --window-height 2 --binary --f 0.5 --order row
//!
//! # Pairwise symmetric-difference distances
//! mite distance samples/ distances.csv --binary
//!
//! # Summary of one feature list
//! mite info samples/a.xml
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
