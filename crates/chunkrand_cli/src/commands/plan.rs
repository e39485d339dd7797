//! Plan command implementation
//!
//! Shows how a shape is partitioned and which sub-seed each chunk receives.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use tracing::info;

use super::OutputFormat;
use chunkrand_core::chunks::{ChunkPlan, ChunkSpec};
use chunkrand_core::seed::{GeneratorState, SubSeed};
use chunkrand_core::types::Shape;

#[derive(Serialize)]
struct PlannedChunk {
    index: Vec<usize>,
    shape: Shape,
    offset: Vec<usize>,
    seed: SubSeed,
}

#[derive(Serialize)]
struct PlanReport {
    shape: Shape,
    chunks: Vec<Vec<usize>>,
    num_chunks: usize,
    plan: Vec<PlannedChunk>,
}

/// Run the plan command
pub fn run(
    size: &str,
    chunks: &str,
    seed: Option<u64>,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let shape: Shape = size.parse().with_context(|| format!("invalid size '{}'", size))?;
    let spec: ChunkSpec = chunks
        .parse()
        .with_context(|| format!("invalid chunks '{}'", chunks))?;
    let plan = ChunkPlan::new(shape.clone(), spec)?;

    let mut state = match seed {
        Some(seed) => GeneratorState::from_seed(seed),
        None => GeneratorState::from_entropy(),
    };
    let seeds = state.derive_seeds(plan.num_chunks());
    info!(shape = %shape, chunks = plan.num_chunks(), "planned");

    let report = PlanReport {
        shape,
        chunks: plan.chunks().to_vec(),
        num_chunks: plan.num_chunks(),
        plan: plan
            .iter()
            .zip(seeds)
            .map(|(chunk, seed)| PlannedChunk {
                index: chunk.index,
                shape: chunk.shape,
                offset: chunk.offset,
                seed,
            })
            .collect(),
    };

    match format {
        OutputFormat::Table => {
            writeln!(out, "shape:  {}", report.shape)?;
            writeln!(out, "chunks: {:?}", report.chunks)?;
            writeln!(out, "{:<16} {:<16} {:<16} seed", "index", "shape", "offset")?;
            for chunk in &report.plan {
                writeln!(
                    out,
                    "{:<16} {:<16} {:<16} {}",
                    format!("{:?}", chunk.index),
                    chunk.shape.to_string(),
                    format!("{:?}", chunk.offset),
                    chunk.seed
                )?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(size: &str, chunks: &str, seed: u64) -> serde_json::Value {
        let mut out = Vec::new();
        run(size, chunks, Some(seed), OutputFormat::Json, &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn test_plan_json() {
        let value = json("10", "4", 42);
        assert_eq!(value["num_chunks"], 3);
        assert_eq!(value["chunks"], serde_json::json!([[4, 4, 2]]));
        assert_eq!(value["plan"][2]["offset"], serde_json::json!([8]));
    }

    #[test]
    fn test_plan_is_reproducible() {
        assert_eq!(json("6,6", "3", 1), json("6,6", "3", 1));
        assert_ne!(json("6,6", "3", 1), json("6,6", "3", 2));
    }

    #[test]
    fn test_plan_table() {
        let mut out = Vec::new();
        run("4,6", "2,3", Some(0), OutputFormat::Table, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("shape:  (4, 6)"));
        assert_eq!(text.lines().count(), 3 + 4);
    }

    #[test]
    fn test_plan_mismatch() {
        let mut out = Vec::new();
        let err = run("10", "3+3+3", Some(0), OutputFormat::Table, &mut out).unwrap_err();
        assert!(err.to_string().contains("Shape mismatch"));
    }
}
