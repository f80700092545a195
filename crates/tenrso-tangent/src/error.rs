//! Error types for tangent-space projection
//!
//! Every error here is a violation of the projection's input contract. They are
//! raised while binding and validating inputs, before any accumulator is touched,
//! so a failed call never leaves partial results behind.

use thiserror::Error;

/// Error type for tangent-space projection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    /// Tensor order below two; the sweep needs a boundary core on each side
    #[error("Invalid tensor order {order}: tangent projection requires at least 2 modes")]
    InvalidOrder { order: usize },

    /// Number of ranks does not equal order + 1
    #[error("Rank count mismatch: expected {expected} ranks, got {actual}")]
    RankCount { expected: usize, actual: usize },

    /// First or last rank is not one
    #[error("Boundary rank r[{position}] must be 1, got {rank}")]
    BoundaryRank { position: usize, rank: usize },

    /// A rank is zero
    #[error("Rank r[{position}] must be positive")]
    ZeroRank { position: usize },

    /// A mode size is zero
    #[error("Mode size n[{mode}] must be positive")]
    ZeroModeSize { mode: usize },

    /// A core buffer has the wrong length for its declared shape
    #[error(
        "Dimension mismatch in {family} core {core}: expected {expected} elements, got {actual}"
    )]
    DimensionMismatch {
        family: String,
        core: usize,
        expected: usize,
        actual: usize,
    },

    /// A core family has the wrong number of cores
    #[error("Core count mismatch in {family}: expected {expected} cores, got {actual}")]
    CoreCount {
        family: String,
        expected: usize,
        actual: usize,
    },

    /// Sample multi-indices have a different order than the cores
    #[error("Order mismatch: cores have {expected} modes, samples have {actual}")]
    OrderMismatch { expected: usize, actual: usize },

    /// Index buffer and weight buffer describe different sample counts
    #[error("Length mismatch: {indices} index entries but {weights} weights")]
    LengthMismatch { indices: usize, weights: usize },

    /// A coordinate lies outside its mode
    #[error("Index out of range: sample {sample}, mode {mode}: index {index} exceeds mode size {bound}")]
    IndexOutOfRange {
        sample: usize,
        mode: usize,
        index: usize,
        bound: usize,
    },

    /// A one-based coordinate is zero
    #[error("Index out of range: sample {sample}, mode {mode}: one-based index must be >= 1")]
    ZeroIndex { sample: usize, mode: usize },

    /// Two shaped objects that must agree do not
    #[error("Shape mismatch: {context}")]
    ShapeMismatch { context: String },

    /// Projection configuration is unusable
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Result type for projection operations
pub type ProjectionResult<T> = Result<T, ProjectionError>;

impl ProjectionError {
    /// Create a dimension mismatch error
    pub fn dimension_mismatch(
        family: impl Into<String>,
        core: usize,
        expected: usize,
        actual: usize,
    ) -> Self {
        ProjectionError::DimensionMismatch {
            family: family.into(),
            core,
            expected,
            actual,
        }
    }

    /// Create a core count error
    pub fn core_count(family: impl Into<String>, expected: usize, actual: usize) -> Self {
        ProjectionError::CoreCount {
            family: family.into(),
            expected,
            actual,
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(context: impl Into<String>) -> Self {
        ProjectionError::ShapeMismatch {
            context: context.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        ProjectionError::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Whether this error was caused by a sampled coordinate
    pub fn is_index_error(&self) -> bool {
        matches!(
            self,
            ProjectionError::IndexOutOfRange { .. } | ProjectionError::ZeroIndex { .. }
        )
    }
}
