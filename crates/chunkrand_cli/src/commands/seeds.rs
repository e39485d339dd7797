//! Seeds command implementation
//!
//! Derives sub-seeds from a parent seed.

use anyhow::Result;
use std::io::Write;

use super::OutputFormat;
use chunkrand_core::seed::{try_derive_seeds, GeneratorState};

/// Run the seeds command
pub fn run(seed: u64, count: i64, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    let mut state = GeneratorState::from_seed(seed);
    let seeds = try_derive_seeds(&mut state, count)?;

    match format {
        OutputFormat::Table => {
            for (i, s) in seeds.iter().enumerate() {
                writeln!(out, "{:>6}  {}", i, s)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, &seeds)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
