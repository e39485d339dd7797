//! Generate command implementation
//!
//! Builds a lazy chunked array for one distribution, materialises it with
//! the configured engine and prints a summary or the full array.

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use tracing::info;

use crate::config::CliConfig;
use chunkrand_core::chunks::ChunkSpec;
use chunkrand_core::seed::GeneratorState;
use chunkrand_core::types::{ElementType, ParamValue, SampleArray, Shape};
use chunkrand_graph::RandomState;

/// Output format of the generate command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GenerateFormat {
    /// Shape, chunking and sample statistics
    #[default]
    Summary,
    /// The materialised array as JSON
    Json,
}

/// Arguments of one generate request
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    /// Distribution name
    pub distribution: String,
    /// Positional parameter values
    pub params: Vec<String>,
    /// `name=value` keyword parameters
    pub kwargs: Vec<String>,
    /// Array shape, e.g. `"100,100"`
    pub size: String,
    /// Chunk specification; the configured chunk size when absent
    pub chunks: Option<String>,
    /// Output format
    pub format: GenerateFormat,
}

#[derive(Debug, Serialize)]
struct Summary {
    name: String,
    shape: Shape,
    dtype: ElementType,
    chunks: Vec<Vec<usize>>,
    num_chunks: usize,
    mean: Option<f64>,
    std: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
}

#[derive(Serialize)]
struct Materialised<'a> {
    name: &'a str,
    dtype: ElementType,
    chunks: &'a [Vec<usize>],
    array: &'a SampleArray,
}

fn parse_kwargs(pairs: &[String]) -> Result<BTreeMap<String, ParamValue>> {
    let mut kwargs = BTreeMap::new();
    for pair in pairs {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("keyword parameter '{}' is not of the form name=value", pair))?;
        let value: ParamValue = value
            .parse()
            .with_context(|| format!("invalid value for '{}'", name))?;
        if kwargs.insert(name.trim().to_string(), value).is_some() {
            return Err(anyhow!("keyword parameter '{}' given twice", name.trim()));
        }
    }
    Ok(kwargs)
}

fn summarise(name: &str, chunks: &[Vec<usize>], array: &SampleArray) -> Summary {
    let values = array.to_f64_vec();
    let n = values.len() as f64;
    let (mean, std, min, max) = if values.is_empty() {
        (None, None, None, None)
    } else {
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (Some(mean), Some(var.sqrt()), Some(min), Some(max))
    };
    Summary {
        name: name.to_string(),
        shape: array.shape().clone(),
        dtype: array.element_type(),
        chunks: chunks.to_vec(),
        num_chunks: chunks.iter().map(|axis| axis.len()).product(),
        mean,
        std,
        min,
        max,
    }
}

fn fmt_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.6}", v))
}

/// Run the generate command
pub fn run(request: &GenerateRequest, config: &CliConfig, out: &mut dyn Write) -> Result<()> {
    let args = request
        .params
        .iter()
        .map(|p| p.parse::<ParamValue>())
        .collect::<Result<Vec<_>, _>>()
        .context("invalid positional parameter")?;
    let kwargs = parse_kwargs(&request.kwargs)?;
    let size: Shape = request
        .size
        .parse()
        .with_context(|| format!("invalid size '{}'", request.size))?;
    let chunks = match &request.chunks {
        Some(text) => text
            .parse::<ChunkSpec>()
            .with_context(|| format!("invalid chunks '{}'", text))?,
        None => ChunkSpec::Uniform(config.generation.chunk_size),
    };

    let generator = match config.generation.seed {
        Some(seed) => GeneratorState::from_seed(seed),
        None => GeneratorState::from_entropy(),
    };
    let mut state = RandomState::from_generator(generator);
    let lazy = state.sample(&request.distribution, args, kwargs, size, chunks)?;

    let engine = config.engine_config()?.build_engine()?;
    info!(
        name = lazy.name(),
        chunks = lazy.num_chunks(),
        engine = engine.name(),
        "materialising"
    );
    let array = lazy
        .compute_with(engine.as_ref())
        .with_context(|| format!("failed to materialise {}", lazy.name()))?;

    match request.format {
        GenerateFormat::Summary => {
            let summary = summarise(lazy.name(), lazy.chunks(), &array);
            writeln!(out, "name:       {}", summary.name)?;
            writeln!(out, "shape:      {}", summary.shape)?;
            writeln!(out, "dtype:      {}", summary.dtype)?;
            writeln!(out, "chunks:     {:?}", summary.chunks)?;
            writeln!(out, "num_chunks: {}", summary.num_chunks)?;
            writeln!(out, "mean:       {}", fmt_stat(summary.mean))?;
            writeln!(out, "std:        {}", fmt_stat(summary.std))?;
            writeln!(out, "min:        {}", fmt_stat(summary.min))?;
            writeln!(out, "max:        {}", fmt_stat(summary.max))?;
        }
        GenerateFormat::Json => {
            let doc = Materialised {
                name: lazy.name(),
                dtype: lazy.dtype(),
                chunks: lazy.chunks(),
                array: &array,
            };
            serde_json::to_writer(&mut *out, &doc)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunkrand_graph::EngineKind;

    fn seeded(seed: u64, engine: EngineKind) -> CliConfig {
        let mut config = CliConfig::default();
        config.generation.seed = Some(seed);
        config.generation.engine = engine;
        config
    }

    fn request(distribution: &str, params: &[&str], size: &str, chunks: &str) -> GenerateRequest {
        GenerateRequest {
            distribution: distribution.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            kwargs: Vec::new(),
            size: size.to_string(),
            chunks: Some(chunks.to_string()),
            format: GenerateFormat::Json,
        }
    }

    fn json(request: &GenerateRequest, config: &CliConfig) -> serde_json::Value {
        let mut out = Vec::new();
        run(request, config, &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn test_json_output() {
        let value = json(&request("normal", &[], "10", "4"), &seeded(1, EngineKind::Serial));
        assert!(value["name"].as_str().unwrap().starts_with("random.normal-"));
        assert_eq!(value["dtype"], "float64");
        assert_eq!(value["array"]["shape"], serde_json::json!([10]));
        assert_eq!(value["array"]["data"]["float64"].as_array().unwrap().len(), 10);
    }

    #[test]
    fn test_engines_agree() {
        let req = request("poisson", &["3.0"], "6,6", "4");
        let serial = json(&req, &seeded(9, EngineKind::Serial));
        let parallel = json(&req, &seeded(9, EngineKind::Rayon));
        assert_eq!(serial, parallel);
        assert_eq!(serial["dtype"], "int64");
    }

    #[test]
    fn test_kwargs() {
        let mut req = request("uniform", &[], "100", "25");
        req.kwargs = vec!["low=5".to_string(), "high=6".to_string()];
        let value = json(&req, &seeded(3, EngineKind::Serial));
        for v in value["array"]["data"]["float64"].as_array().unwrap() {
            let v = v.as_f64().unwrap();
            assert!((5.0..6.0).contains(&v));
        }
    }

    #[test]
    fn test_summary() {
        let mut req = request("randint", &["3"], "2,5", "1,5");
        req.format = GenerateFormat::Summary;
        let mut out = Vec::new();
        run(&req, &seeded(5, EngineKind::Serial), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("shape:      (2, 5)"));
        assert!(text.contains("dtype:      int64"));
        assert!(text.contains("num_chunks: 2"));
    }

    #[test]
    fn test_empty_summary() {
        let mut req = request("normal", &[], "0", "5");
        req.format = GenerateFormat::Summary;
        let mut out = Vec::new();
        run(&req, &seeded(5, EngineKind::Serial), &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("mean:       -"));
    }

    #[test]
    fn test_default_chunks_from_config() {
        let mut req = request("normal", &[], "30", "1");
        req.chunks = None;
        let mut config = seeded(2, EngineKind::Serial);
        config.generation.chunk_size = 7;
        let value = json(&req, &config);
        assert_eq!(value["chunks"], serde_json::json!([[7, 7, 7, 7, 2]]));
    }

    #[test]
    fn test_errors() {
        let config = seeded(1, EngineKind::Serial);
        let mut out = Vec::new();

        let err = run(&request("nope", &[], "10", "5"), &config, &mut out).unwrap_err();
        assert!(err.to_string().starts_with("Unknown distribution"));

        let err = run(&request("normal", &[], "10", "3+3+3"), &config, &mut out).unwrap_err();
        assert!(err.to_string().starts_with("Shape mismatch"));

        let mut req = request("normal", &[], "10", "5");
        req.kwargs = vec!["scale".to_string()];
        assert!(run(&req, &config, &mut out).is_err());
        assert!(out.is_empty());
    }
}
