//! Sampled multi-indices and their weights.
//!
//! A sample set holds `len` observations of a d-way tensor. Observation j owns a
//! multi-index with one coordinate per mode and a scalar weight (usually the
//! residual at that entry). Coordinates are stored zero-based and flat,
//! sample-major: the coordinates of sample j occupy `[j·d, (j+1)·d)`, which is
//! the column-major layout of a `d × len` index matrix.
//!
//! Index data arriving from one-based producers is converted once on
//! construction via [`SampleSet::from_one_based`].

use crate::error::{ProjectionError, ProjectionResult};
use crate::shape::TtShape;
use scirs2_core::numeric::Float;

/// Multi-indices and weights of sampled tensor entries.
///
/// # Example
///
/// ```rust
/// use tenrso_tangent::SampleSet;
///
/// // Two samples of a 3-way tensor, one-based: (1, 2, 1) and (2, 2, 3)
/// let samples = SampleSet::from_one_based(3, vec![1, 2, 1, 2, 2, 3], vec![0.5, -1.0]).unwrap();
/// assert_eq!(samples.len(), 2);
/// assert_eq!(samples.index(1), &[1, 1, 2]);
/// assert_eq!(samples.weight(0), 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet<T> {
    order: usize,
    indices: Vec<usize>,
    weights: Vec<T>,
}

impl<T: Float> SampleSet<T> {
    /// Build a sample set from zero-based coordinates.
    ///
    /// # Errors
    ///
    /// - [`ProjectionError::InvalidOrder`] if `order < 2`
    /// - [`ProjectionError::LengthMismatch`] if `indices.len() != order · weights.len()`
    pub fn from_zero_based(
        order: usize,
        indices: Vec<usize>,
        weights: Vec<T>,
    ) -> ProjectionResult<Self> {
        if order < 2 {
            return Err(ProjectionError::InvalidOrder { order });
        }

        if indices.len() != order * weights.len() {
            return Err(ProjectionError::LengthMismatch {
                indices: indices.len(),
                weights: weights.len(),
            });
        }

        Ok(Self {
            order,
            indices,
            weights,
        })
    }

    /// Build a sample set from one-based coordinates.
    ///
    /// # Errors
    ///
    /// As [`SampleSet::from_zero_based`], plus [`ProjectionError::ZeroIndex`] if
    /// any coordinate is 0.
    pub fn from_one_based(
        order: usize,
        indices: Vec<usize>,
        weights: Vec<T>,
    ) -> ProjectionResult<Self> {
        let mut set = Self::from_zero_based(order, indices, weights)?;

        for (pos, idx) in set.indices.iter_mut().enumerate() {
            if *idx == 0 {
                return Err(ProjectionError::ZeroIndex {
                    sample: pos / order,
                    mode: pos % order,
                });
            }
            *idx -= 1;
        }

        Ok(set)
    }

    /// Build a sample set of `order`-mode samples from per-sample zero-based
    /// multi-indices. An empty batch is valid.
    ///
    /// # Errors
    ///
    /// As [`SampleSet::from_zero_based`], plus [`ProjectionError::OrderMismatch`]
    /// if a multi-index does not have `order` coordinates.
    pub fn from_multi_indices(
        order: usize,
        multi_indices: &[Vec<usize>],
        weights: Vec<T>,
    ) -> ProjectionResult<Self> {
        if order < 2 {
            return Err(ProjectionError::InvalidOrder { order });
        }

        if multi_indices.len() != weights.len() {
            return Err(ProjectionError::LengthMismatch {
                indices: multi_indices.len(),
                weights: weights.len(),
            });
        }

        if let Some(bad) = multi_indices.iter().find(|m| m.len() != order) {
            return Err(ProjectionError::OrderMismatch {
                expected: order,
                actual: bad.len(),
            });
        }

        let indices = multi_indices.iter().flatten().copied().collect();
        Self::from_zero_based(order, indices, weights)
    }

    /// Number of modes of each multi-index.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether there are no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Zero-based multi-index of sample `sample`.
    #[inline]
    pub fn index(&self, sample: usize) -> &[usize] {
        &self.indices[sample * self.order..(sample + 1) * self.order]
    }

    /// Weight of sample `sample`.
    #[inline]
    pub fn weight(&self, sample: usize) -> T {
        self.weights[sample]
    }

    /// All weights.
    pub fn weights(&self) -> &[T] {
        &self.weights
    }

    /// Flat zero-based coordinates, sample-major.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Iterate over `(multi_index, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&[usize], T)> + '_ {
        self.indices
            .chunks_exact(self.order)
            .zip(self.weights.iter().copied())
    }

    /// Contiguous sub-range of samples `[start, end)` as a new set.
    ///
    /// # Panics
    ///
    /// Panics if `start > end` or `end > self.len()`, like slice indexing.
    pub fn subset(&self, start: usize, end: usize) -> Self {
        Self {
            order: self.order,
            indices: self.indices[start * self.order..end * self.order].to_vec(),
            weights: self.weights[start..end].to_vec(),
        }
    }

    /// Same multi-indices with different weights.
    ///
    /// # Errors
    ///
    /// [`ProjectionError::LengthMismatch`] if the weight count differs.
    pub fn with_weights(&self, weights: Vec<T>) -> ProjectionResult<Self> {
        if weights.len() != self.len() {
            return Err(ProjectionError::LengthMismatch {
                indices: self.indices.len(),
                weights: weights.len(),
            });
        }

        Ok(Self {
            order: self.order,
            indices: self.indices.clone(),
            weights,
        })
    }

    /// Check every coordinate against the mode sizes of `shape`.
    ///
    /// The whole batch is checked before any projection work starts.
    ///
    /// # Errors
    ///
    /// - [`ProjectionError::OrderMismatch`] if the orders differ
    /// - [`ProjectionError::IndexOutOfRange`] for the first offending coordinate,
    ///   reported one-based
    pub fn validate_against(&self, shape: &TtShape) -> ProjectionResult<()> {
        if self.order != shape.order() {
            return Err(ProjectionError::OrderMismatch {
                expected: shape.order(),
                actual: self.order,
            });
        }

        let bounds = shape.mode_sizes();
        for (sample, multi_index) in self.indices.chunks_exact(self.order).enumerate() {
            for (mode, (&idx, &bound)) in multi_index.iter().zip(bounds.iter()).enumerate() {
                if idx >= bound {
                    return Err(ProjectionError::IndexOutOfRange {
                        sample,
                        mode,
                        index: idx + 1,
                        bound,
                    });
                }
            }
        }

        Ok(())
    }
}
