//! List command implementation
//!
//! Prints the distribution catalogue.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use super::OutputFormat;
use chunkrand_core::types::ElementType;
use chunkrand_graph::registry::DistributionRegistry;

#[derive(Serialize)]
struct Entry {
    name: &'static str,
    params: Vec<String>,
    dtype: ElementType,
}

/// Run the list command
pub fn run(format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    let registry = DistributionRegistry::new();

    match format {
        OutputFormat::Table => {
            for spec in registry.iter() {
                writeln!(out, "{}", spec.signature())?;
            }
        }
        OutputFormat::Json => {
            let entries: Vec<Entry> = registry
                .iter()
                .map(|spec| Entry {
                    name: spec.name,
                    params: spec.params.iter().map(|p| p.to_string()).collect(),
                    dtype: spec.dtype,
                })
                .collect();
            serde_json::to_writer_pretty(&mut *out, &entries)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
