//! # stepclamp
//!
//! Command-line tool for measuring holding-current responses to UV and drug
//! steps in voltage-clamp recordings.
//!
//! ## Usage
//!
//! ```bash
//! # Measure every recording in cs4_cell1/holds_UV
//! stepclamp analyze cs4_cell1 --branch exp
//!
//! # Negative control, drug holds, appending to an existing table
//! stepclamp analyze cs4_cell2 --experiment drug --branch neg --append
//!
//! # Look at a single recording
//! stepclamp inspect cs4_cell1/holds_UV/hold_0001.parquet
//!
//! # Generate a demo cell folder
//! stepclamp demo demo_cs1_cell1
//! ```

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
