//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Commands write to a
//! caller-supplied writer so they can be exercised without a terminal.

pub mod generate;
pub mod list;
pub mod plan;
pub mod seeds;

use clap::ValueEnum;

/// Output format for tabular commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON document
    Json,
}
