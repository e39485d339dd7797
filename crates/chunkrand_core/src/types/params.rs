//! Distribution parameter values.
//!
//! Parameters travel from the public entry points, through the registry's
//! binding step, into every graph node. They are immutable once bound and
//! shared read-only between nodes.

use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::ChunkRandError;

/// A single distribution parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Absent optional parameter (e.g. `high` of `randint`).
    None,
    /// Boolean flag.
    Bool(bool),
    /// Integer parameter.
    Int(i64),
    /// Floating point parameter.
    Float(f64),
    /// Vector parameter (e.g. the probabilities of `choice`).
    FloatArray(Vec<f64>),
}

impl ParamValue {
    /// Numeric value as `f64`; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => v.to_f64(),
            _ => None,
        }
    }

    /// Numeric value as `i64`; floats are accepted only when integral.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            ParamValue::Float(v) if v.fract() == 0.0 => v.to_i64(),
            _ => None,
        }
    }

    /// Numeric value as `u64`; negative values are rejected.
    pub fn as_u64(&self) -> Option<u64> {
        self.as_i64().and_then(|v| v.to_u64())
    }

    /// Boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Vector value.
    pub fn as_slice(&self) -> Option<&[f64]> {
        match self {
            ParamValue::FloatArray(v) => Some(v),
            _ => None,
        }
    }

    /// Returns `true` for [`ParamValue::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, ParamValue::None)
    }

    /// Appends a canonical, platform-independent byte encoding.
    ///
    /// Floats are encoded by bit pattern so that `0.0` and `-0.0` (and
    /// distinct NaN payloads) stay distinguishable.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            ParamValue::None => out.push(0),
            ParamValue::Bool(b) => {
                out.push(1);
                out.push(u8::from(*b));
            }
            ParamValue::Int(v) => {
                out.push(2);
                out.extend_from_slice(&v.to_le_bytes());
            }
            ParamValue::Float(v) => {
                out.push(3);
                out.extend_from_slice(&v.to_bits().to_le_bytes());
            }
            ParamValue::FloatArray(values) => {
                out.push(4);
                out.extend_from_slice(&(values.len() as u64).to_le_bytes());
                for v in values {
                    out.extend_from_slice(&v.to_bits().to_le_bytes());
                }
            }
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        v.to_i64().map_or(ParamValue::Float(v as f64), ParamValue::Int)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(v: Vec<f64>) -> Self {
        ParamValue::FloatArray(v)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ParamValue::None, Into::into)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::None => write!(f, "None"),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{:?}", v),
            ParamValue::FloatArray(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl FromStr for ParamValue {
    type Err = ChunkRandError;

    /// Parses `none`, `true`/`false`, integers, floats and `[a, b, ...]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ChunkRandError::InvalidArgument(format!("invalid parameter value '{}'", s));

        match s.to_lowercase().as_str() {
            "none" | "null" => return Ok(ParamValue::None),
            "true" => return Ok(ParamValue::Bool(true)),
            "false" => return Ok(ParamValue::Bool(false)),
            _ => {}
        }
        if let Some(body) = s.strip_prefix('[').and_then(|b| b.strip_suffix(']')) {
            return body
                .split(',')
                .filter(|t| !t.trim().is_empty())
                .map(|t| t.trim().parse::<f64>().map_err(|_| invalid()))
                .collect::<Result<Vec<_>, _>>()
                .map(ParamValue::FloatArray);
        }
        if let Ok(v) = s.parse::<i64>() {
            return Ok(ParamValue::Int(v));
        }
        s.parse::<f64>().map(ParamValue::Float).map_err(|_| invalid())
    }
}

/// Bound parameters of one distribution request.
///
/// `args` hold parameters in the distribution's declared order; `kwargs`
/// hold extra named parameters for capabilities that accept them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Params {
    args: Vec<ParamValue>,
    kwargs: BTreeMap<String, ParamValue>,
}

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parameter set from positional values.
    pub fn from_args(args: Vec<ParamValue>) -> Self {
        Self {
            args,
            kwargs: BTreeMap::new(),
        }
    }

    /// Appends a positional value.
    pub fn with_arg(mut self, value: impl Into<ParamValue>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Sets a keyword value.
    pub fn with_kwarg(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.kwargs.insert(name.into(), value.into());
        self
    }

    /// Positional values.
    pub fn args(&self) -> &[ParamValue] {
        &self.args
    }

    /// Keyword values, ordered by name.
    pub fn kwargs(&self) -> &BTreeMap<String, ParamValue> {
        &self.kwargs
    }

    /// Positional value at `index`.
    pub fn arg(&self, index: usize) -> Option<&ParamValue> {
        self.args.get(index)
    }

    /// Keyword value by name.
    pub fn kwarg(&self, name: &str) -> Option<&ParamValue> {
        self.kwargs.get(name)
    }

    /// Appends the canonical encoding of all values.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.args.len() as u64).to_le_bytes());
        for value in &self.args {
            value.encode_into(out);
        }
        out.extend_from_slice(&(self.kwargs.len() as u64).to_le_bytes());
        for (name, value) in &self.kwargs {
            out.extend_from_slice(&(name.len() as u64).to_le_bytes());
            out.extend_from_slice(name.as_bytes());
            value.encode_into(out);
        }
    }
}
