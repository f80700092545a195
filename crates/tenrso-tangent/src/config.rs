//! Execution configuration for the projection kernel.
//!
//! The projection result does not depend on the configuration beyond
//! floating-point summation order; only how samples are scheduled changes.
//!
//! # Environment Variables
//!
//! [`ProjectionConfig::from_env`] reads:
//!
//! - `TENRSO_PROJECTION_STRATEGY`: `serial`, `parallel` or `auto` (default: `auto`)
//! - `TENRSO_PROJECTION_THRESHOLD`: minimum sample count for `auto` to go parallel
//! - `TENRSO_PROJECTION_CHUNK`: samples per parallel work item

use crate::error::{ProjectionError, ProjectionResult};

/// Default sample count at which [`ExecutionStrategy::Auto`] switches to parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Default number of samples per parallel chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// How the sample loop is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// One pass over all samples on the calling thread
    Serial,
    /// Chunks of samples on the rayon pool, partial accumulators summed in chunk order
    Parallel,
    /// Parallel when the sample count reaches the configured threshold
    #[default]
    Auto,
}

impl ExecutionStrategy {
    /// Parse from string, falling back to [`ExecutionStrategy::Auto`]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "serial" | "sequential" => ExecutionStrategy::Serial,
            "parallel" => ExecutionStrategy::Parallel,
            _ => ExecutionStrategy::Auto,
        }
    }
}

/// Projection configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionConfig {
    /// Scheduling strategy
    pub strategy: ExecutionStrategy,
    /// Sample count from which `Auto` runs in parallel
    pub parallel_threshold: usize,
    /// Samples per parallel work item
    pub chunk_size: usize,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            strategy: ExecutionStrategy::Auto,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ProjectionConfig {
    /// Serial configuration.
    pub fn serial() -> Self {
        Self::default().with_strategy(ExecutionStrategy::Serial)
    }

    /// Parallel configuration with the given chunk size.
    pub fn parallel(chunk_size: usize) -> Self {
        Self::default()
            .with_strategy(ExecutionStrategy::Parallel)
            .with_chunk_size(chunk_size)
    }

    /// Defaults overridden by `TENRSO_PROJECTION_*` environment variables.
    ///
    /// Unset or unparsable variables keep their default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let strategy = std::env::var("TENRSO_PROJECTION_STRATEGY")
            .map(|s| ExecutionStrategy::parse(&s))
            .unwrap_or(defaults.strategy);

        let parallel_threshold = std::env::var("TENRSO_PROJECTION_THRESHOLD")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.parallel_threshold);

        let chunk_size = std::env::var("TENRSO_PROJECTION_CHUNK")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .filter(|&c: &usize| c > 0)
            .unwrap_or(defaults.chunk_size);

        Self {
            strategy,
            parallel_threshold,
            chunk_size,
        }
    }

    /// Set the strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the `Auto` threshold.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Set the chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// [`ProjectionError::InvalidConfig`] if `chunk_size` is zero.
    pub fn validate(&self) -> ProjectionResult<()> {
        if self.chunk_size == 0 {
            return Err(ProjectionError::invalid_config(
                "chunk size must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Whether a batch of `num_samples` should run in parallel.
    ///
    /// Always `false` without the `parallel` feature.
    pub fn use_parallel(&self, num_samples: usize) -> bool {
        if !cfg!(feature = "parallel") {
            return false;
        }

        match self.strategy {
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::Parallel => true,
            ExecutionStrategy::Auto => num_samples >= self.parallel_threshold,
        }
    }
}
