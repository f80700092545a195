//! # tenrso-tangent
//!
//! Sparse tangent-space projection for fixed-rank Tensor Train manifolds.
//!
//! **Version:** 0.1.0-alpha.2
//!
//! ## Overview
//!
//! Riemannian tensor completion in TT format spends most of each iteration
//! projecting the sparse residual (a weight at every observed entry) onto the
//! tangent space at the current iterate. This crate provides that kernel.
//!
//! Given left-orthogonal cores U, right-orthogonal cores V and weighted
//! multi-indices, [`tt_tangent_project`] returns one accumulator per core, shaped
//! like that core. The cost is O(samples × d × r²); no full tensor is formed.
//!
//! **Key Features:**
//! - ✅ **Serial projection** - Left/right environment sweeps per sample
//! - ✅ **Parallel projection** - Sample chunks with private accumulators (feature `parallel`)
//! - ✅ **Batch accumulation** - Add further sample batches into existing results
//! - ✅ **Validated inputs** - Shapes, ranks, core lengths and indices checked up front
//! - ✅ **Layout interop** - Convert `(r_left, n, r_right)` cores to and from slice-contiguous storage
//!
//! ## Quick Start
//!
//! ```rust
//! use tenrso_tangent::{tt_tangent_project, CoreFamily, SampleSet, TtShape};
//!
//! // 3-way tensor of size 4 × 5 × 6 with TT ranks (1, 2, 3, 1)
//! let shape = TtShape::new(vec![4, 5, 6], vec![1, 2, 3, 1]).unwrap();
//!
//! // Flat cores: n_i slices of r_i × r_{i+1} column-major matrices
//! let u: Vec<Vec<f64>> = (0..3).map(|i| vec![0.1; shape.core_len(i)]).collect();
//! let v: Vec<Vec<f64>> = (0..3).map(|i| vec![0.2; shape.core_len(i)]).collect();
//! let u = CoreFamily::from_vecs("U", &shape, &u).unwrap();
//! let v = CoreFamily::from_vecs("V", &shape, &v).unwrap();
//!
//! // Two observed entries (one-based) with their residuals
//! let samples = SampleSet::from_one_based(3, vec![1, 1, 1, 4, 5, 6], vec![0.5, -0.25]).unwrap();
//!
//! let delta = tt_tangent_project(&u, &v, &samples).unwrap();
//! assert_eq!(delta.core(1).len(), 2 * 5 * 3);
//! ```
//!
//! ## Features
//!
//! - `parallel` (default) - Parallel projection using rayon via `scirs2_core::parallel_ops`
//! - `tracing` (default) - Structured logging with `tracing` / `tracing-subscriber`
//!
//! ## SciRS2 Integration
//!
//! This crate uses `scirs2-core` for array views, numeric traits and parallelism.
//! Direct use of `ndarray`, `rand`, or `num-traits` is not permitted.

pub mod accumulator;
pub mod config;
pub mod cores;
pub mod dense;
pub mod error;
pub mod projection;
pub mod samples;
pub mod shape;
pub mod tracing_support;

#[cfg(test)]
mod property_tests;

// Re-exports
pub use accumulator::TangentCores;
pub use config::{ExecutionStrategy, ProjectionConfig};
pub use cores::{pack_core, pack_cores, unpack_core, CoreFamily};
pub use error::{ProjectionError, ProjectionResult};
pub use projection::*;
pub use samples::SampleSet;
pub use shape::TtShape;
pub use tracing_support::{init_tracing, record_projection, TracingConfig, TracingFormat};
