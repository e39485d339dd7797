//! Element types of sampled arrays.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ChunkRandError;

/// Element type of a sampled array.
///
/// Continuous distributions produce `Float64`; counting and index-valued
/// distributions produce `Int64`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// 64-bit IEEE 754 floating point.
    Float64,
    /// 64-bit signed integer.
    Int64,
}

impl ElementType {
    /// Canonical lowercase name (`"float64"`, `"int64"`).
    pub fn name(&self) -> &'static str {
        match self {
            ElementType::Float64 => "float64",
            ElementType::Int64 => "int64",
        }
    }

    /// Size of one element in bytes.
    pub fn item_size(&self) -> usize {
        8
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ElementType {
    type Err = ChunkRandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "float64" | "f64" => Ok(ElementType::Float64),
            "int64" | "i64" => Ok(ElementType::Int64),
            other => Err(ChunkRandError::InvalidArgument(format!(
                "unknown element type '{}'",
                other
            ))),
        }
    }
}
