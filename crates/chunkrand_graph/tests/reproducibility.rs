//! Integration tests for reproducible chunked generation.
//!
//! Verifies determinism, execution-order independence, empty and scalar
//! shapes, and that failing requests never build graphs or consume seeds.

use std::collections::BTreeMap;
use std::sync::Arc;

use chunkrand_core::chunks::ChunkSpec;
use chunkrand_core::seed::GeneratorState;
use chunkrand_core::types::{
    CapabilityError, ChunkRandError, ElementType, ParamValue, Params, SampleArray, Shape,
};
use chunkrand_graph::engine::{ExecutionEngine, RayonEngine, SerialEngine};
use chunkrand_graph::graph::GraphBuilder;
use chunkrand_graph::{Distribution, RandDistrSampler, RandomState, Sampler};
use proptest::prelude::*;
use rand::RngCore;

/// Same seed and request: same name, same values.
#[test]
fn test_determinism() {
    let a = RandomState::new(1234).normal(3.0, 0.5, [40_usize, 25], [16_usize, 10]).unwrap();
    let b = RandomState::new(1234).normal(3.0, 0.5, [40_usize, 25], [16_usize, 10]).unwrap();
    assert_eq!(a.name(), b.name());
    assert_eq!(a.compute().unwrap(), b.compute().unwrap());
}

/// Different seeds give different names and values.
#[test]
fn test_seed_sensitivity() {
    let a = RandomState::new(1).random_sample(100_usize, 10_usize).unwrap();
    let b = RandomState::new(2).random_sample(100_usize, 10_usize).unwrap();
    assert_ne!(a.name(), b.name());
    assert_ne!(a.compute().unwrap(), b.compute().unwrap());
}

/// Serial, global-pool and dedicated-pool execution agree bit for bit.
#[test]
fn test_execution_order_independence() {
    let lazy = RandomState::new(77)
        .gamma(2.0, 3.0, [64_usize, 32], [7_usize, 5])
        .unwrap();

    let serial = lazy.compute_with(&SerialEngine::new()).unwrap();
    let global = lazy.compute_with(&RayonEngine::new()).unwrap();
    let pooled = lazy
        .compute_with(&RayonEngine::with_threads(3).unwrap())
        .unwrap();

    assert_eq!(serial, global);
    assert_eq!(serial, pooled);
}

/// Running nodes in reverse order reproduces the same chunks.
#[test]
fn test_reverse_node_order() {
    struct ReverseEngine;

    impl ExecutionEngine for ReverseEngine {
        fn name(&self) -> &str {
            "reverse"
        }

        fn execute(
            &self,
            graph: &chunkrand_graph::RandomGraph,
        ) -> chunkrand_core::types::Result<Vec<SampleArray>> {
            let nodes: Vec<_> = graph.nodes().collect();
            let mut out = Vec::with_capacity(nodes.len());
            for node in nodes.iter().rev() {
                out.push(graph.execute_node(node)?);
            }
            out.reverse();
            Ok(out)
        }
    }

    let lazy = RandomState::new(5).poisson(3.0, [30_usize, 30], 8_usize).unwrap();
    assert_eq!(
        lazy.compute_with(&ReverseEngine).unwrap(),
        lazy.compute_with(&SerialEngine::new()).unwrap()
    );
}

/// Successive requests on one state draw disjoint seeds.
#[test]
fn test_successive_requests_independent() {
    let mut rs = RandomState::new(10);
    let first = rs.random_sample(50_usize, 10_usize).unwrap();
    let second = rs.random_sample(50_usize, 10_usize).unwrap();
    assert_ne!(first.name(), second.name());
    assert_ne!(first.compute().unwrap(), second.compute().unwrap());
}

/// A chunk's values depend only on its own seed, not on its neighbours.
#[test]
fn test_chunk_values_depend_only_on_seed() {
    let mut state = GeneratorState::from_seed(21);
    let builder = GraphBuilder::new(Arc::new(RandDistrSampler::new()));
    let (graph, _, _) = builder
        .build(Distribution::StandardNormal, Params::new(), 12_usize, 4_usize, &mut state)
        .unwrap();

    for node in graph.nodes() {
        let task = node.task();
        let mut rng = task.seed().generator();
        let direct = RandDistrSampler::new()
            .sample(task.distribution(), task.params(), &mut rng, task.shape())
            .unwrap();
        assert_eq!(graph.execute_node(node).unwrap(), direct);
    }
}

/// Shape (0,) gives one empty chunk and an empty array.
#[test]
fn test_empty_shape() {
    let lazy = RandomState::new(3).standard_normal(0_usize, 5_usize).unwrap();
    assert_eq!(lazy.num_chunks(), 1);
    assert_eq!(lazy.chunks(), &[vec![0]]);
    let values = lazy.compute().unwrap();
    assert!(values.is_empty());
    assert_eq!(values.shape(), &Shape::from(0_usize));
    assert_eq!(values.element_type(), ElementType::Float64);
}

/// An empty axis among non-empty ones still yields empty output.
#[test]
fn test_empty_axis_in_2d() {
    let lazy = RandomState::new(3).randint(10, None, [0_usize, 6], [2_usize, 4]).unwrap();
    assert_eq!(lazy.chunks(), &[vec![0], vec![4, 2]]);
    let values = lazy.compute().unwrap();
    assert!(values.is_empty());
    assert_eq!(values.element_type(), ElementType::Int64);
}

/// Shape () gives a single-element array in one chunk.
#[test]
fn test_scalar_shape() {
    let lazy = RandomState::new(3)
        .uniform(5.0, 6.0, Shape::default(), ChunkSpec::PerAxis(vec![]))
        .unwrap();
    assert_eq!(lazy.num_chunks(), 1);
    let values = lazy.compute().unwrap();
    assert_eq!(values.len(), 1);
    let x = values.as_f64().unwrap()[0];
    assert!((5.0..6.0).contains(&x));
}

/// Explicit chunks [3, 3, 3] on (10,) fail before any seed is drawn.
#[test]
fn test_shape_mismatch_before_any_node() {
    let mut rs = RandomState::new(42);
    let err = rs
        .standard_normal(10_usize, ChunkSpec::explicit(vec![vec![3, 3, 3]]))
        .unwrap_err();
    assert!(matches!(err, ChunkRandError::ShapeMismatch(_)));
    assert_eq!(rs.generator().issued(), 0);

    // The state is untouched: the next request matches a fresh state
    let after = rs.standard_normal(10_usize, 5_usize).unwrap();
    let fresh = RandomState::new(42).standard_normal(10_usize, 5_usize).unwrap();
    assert_eq!(after.name(), fresh.name());
}

/// Zero chunk size is an invalid argument.
#[test]
fn test_zero_chunk_size() {
    let err = RandomState::new(1).random_sample(10_usize, 0_usize).unwrap_err();
    assert!(matches!(err, ChunkRandError::InvalidArgument(_)));
}

/// Chunk spec rank must match shape rank.
#[test]
fn test_rank_mismatch() {
    let err = RandomState::new(1)
        .random_sample([4_usize, 4], ChunkSpec::explicit(vec![vec![4]]))
        .unwrap_err();
    assert!(matches!(err, ChunkRandError::ShapeMismatch(_)));
}

/// Invalid parameters are caught by the probe, before any seed is drawn.
#[test]
fn test_invalid_parameters_rejected_at_build() {
    let mut rs = RandomState::new(1);
    let err = rs.beta(-1.0, 2.0, 10_usize, 5_usize).unwrap_err();
    assert!(matches!(err, ChunkRandError::Capability { chunk: None, .. }));
    assert_eq!(rs.generator().issued(), 0);
}

/// Binding errors surface as invalid arguments.
#[test]
fn test_binding_errors() {
    let mut rs = RandomState::new(1);
    let mut kwargs = BTreeMap::new();
    kwargs.insert("sigma".to_string(), ParamValue::Float(1.0));
    let err = rs.sample("normal", vec![], kwargs, 4_usize, 2_usize).unwrap_err();
    assert!(matches!(err, ChunkRandError::InvalidArgument(_)));

    let err = rs
        .sample(
            "choice",
            vec![ParamValue::Int(5), ParamValue::Bool(false)],
            BTreeMap::new(),
            4_usize,
            2_usize,
        )
        .unwrap_err();
    assert!(matches!(err, ChunkRandError::InvalidArgument(_)));
}

/// Probed dtype equals the dtype of every materialised chunk.
#[test]
fn test_probe_consistency() {
    let mut rs = RandomState::new(6);
    for distribution in Distribution::all() {
        let args = typical_args(distribution);
        let lazy = rs.draw(distribution, args, [9_usize, 2], [4_usize, 1]).unwrap();
        let values = lazy.compute().unwrap();
        assert_eq!(values.element_type(), lazy.dtype(), "{}", distribution);
        assert_eq!(lazy.dtype(), distribution.element_type(), "{}", distribution);
        assert_eq!(values.shape(), &Shape::from([9_usize, 2]), "{}", distribution);
    }
}

/// A sampler that fails on non-empty chunks reports the chunk index.
#[test]
fn test_chunk_failure_tagged_with_index() {
    struct FailsWhenNonEmpty;

    impl Sampler for FailsWhenNonEmpty {
        fn name(&self) -> &str {
            "fails_when_non_empty"
        }

        fn sample(
            &self,
            distribution: Distribution,
            _params: &Params,
            _rng: &mut dyn RngCore,
            size: &Shape,
        ) -> Result<SampleArray, CapabilityError> {
            if size.size() == 0 {
                Ok(SampleArray::from_f64(size.clone(), vec![]))
            } else {
                Err(CapabilityError::new(distribution.name(), "backend unavailable"))
            }
        }
    }

    let mut rs = RandomState::new(1).with_sampler(Arc::new(FailsWhenNonEmpty));
    let lazy = rs.standard_normal(10_usize, 5_usize).unwrap();
    let err = lazy.compute_with(&SerialEngine::new()).unwrap_err();
    assert!(matches!(
        err,
        ChunkRandError::Capability { chunk: Some(ref index), .. } if index == &vec![0]
    ));

    let err = lazy.compute_chunk(&[1]).unwrap_err();
    assert!(matches!(
        err,
        ChunkRandError::Capability { chunk: Some(ref index), .. } if index == &vec![1]
    ));

    // Every chunk fails; the parallel engines still report the first one
    let wide = rs.standard_normal([8_usize, 8], 1_usize).unwrap();
    let pooled = RayonEngine::with_threads(4).unwrap();
    for _ in 0..5 {
        for engine in [&RayonEngine::new() as &dyn ExecutionEngine, &pooled] {
            let err = wide.compute_with(engine).unwrap_err();
            assert!(matches!(
                err,
                ChunkRandError::Capability { chunk: Some(ref index), .. } if index == &vec![0, 0]
            ));
        }
    }
}

fn typical_args(distribution: Distribution) -> Vec<ParamValue> {
    use ParamValue::{Float as F, Int as I};
    match distribution {
        Distribution::Beta => vec![F(2.0), F(2.0)],
        Distribution::Binomial => vec![I(20), F(0.5)],
        Distribution::Chisquare | Distribution::StandardT => vec![F(3.0)],
        Distribution::Choice => vec![I(6)],
        Distribution::F => vec![F(4.0), F(6.0)],
        Distribution::Gamma | Distribution::StandardGamma => vec![F(2.0)],
        Distribution::Geometric => vec![F(0.3)],
        Distribution::Hypergeometric => vec![I(7), I(5), I(3)],
        Distribution::Logseries => vec![F(0.7)],
        Distribution::NegativeBinomial => vec![F(2.0), F(0.5)],
        Distribution::NoncentralChisquare => vec![F(2.0), F(1.0)],
        Distribution::NoncentralF => vec![F(2.0), F(5.0), F(1.0)],
        Distribution::Pareto | Distribution::Power | Distribution::Weibull => vec![F(2.0)],
        Distribution::Randint | Distribution::RandomIntegers => vec![I(1), I(100)],
        Distribution::Triangular => vec![F(-1.0), F(0.0), F(2.0)],
        Distribution::Vonmises => vec![F(0.5), F(2.0)],
        Distribution::Wald => vec![F(1.0), F(3.0)],
        Distribution::Zipf => vec![F(3.0)],
        _ => vec![],
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Materialised values are independent of the chunking-independent
    /// engine choice and the array always has the requested shape.
    #[test]
    fn prop_materialised_shape(
        seed in any::<u64>(),
        rows in 0usize..20,
        cols in 1usize..12,
        chunk_rows in 1usize..8,
        chunk_cols in 1usize..8,
    ) {
        let lazy = RandomState::new(seed)
            .random_sample([rows, cols], [chunk_rows, chunk_cols])
            .unwrap();
        let serial = lazy.compute_with(&SerialEngine::new()).unwrap();
        let parallel = lazy.compute().unwrap();
        prop_assert_eq!(serial.shape(), &Shape::from([rows, cols]));
        prop_assert_eq!(serial, parallel);
    }

    /// Equal requests produce equal graph names.
    #[test]
    fn prop_name_determinism(seed in any::<u64>(), len in 0usize..200, chunk in 1usize..50) {
        let a = RandomState::new(seed).standard_exponential(len, chunk).unwrap();
        let b = RandomState::new(seed).standard_exponential(len, chunk).unwrap();
        prop_assert_eq!(a.name(), b.name());
    }
}
