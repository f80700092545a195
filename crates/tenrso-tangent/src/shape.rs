//! Tensor Train shape metadata and core slice addressing.
//!
//! A TT tensor of order d is described by its mode sizes n₀, …, n_{d-1} and its
//! ranks r₀, …, r_d with r₀ = r_d = 1. Core i holds r_i · n_i · r_{i+1} values,
//! stored as n_i consecutive slices. Slice k of core i is an r_i × r_{i+1}
//! column-major matrix occupying
//!
//! ```text
//! [k · r_i · r_{i+1}, (k + 1) · r_i · r_{i+1})
//! ```
//!
//! of the flat core buffer. The same addressing is used for reading U and V and
//! for writing accumulators.

use crate::error::{ProjectionError, ProjectionResult};
use std::ops::Range;

/// Mode sizes and ranks of a Tensor Train.
///
/// Construction validates the TT invariants, so a `TtShape` in hand always has
/// order ≥ 2, positive mode sizes and ranks, and unit boundary ranks.
///
/// # Example
///
/// ```rust
/// use tenrso_tangent::TtShape;
///
/// let shape = TtShape::new(vec![4, 3, 5], vec![1, 2, 3, 1]).unwrap();
/// assert_eq!(shape.order(), 3);
/// assert_eq!(shape.max_rank(), 3);
/// assert_eq!(shape.core_len(1), 2 * 3 * 3);
/// assert_eq!(shape.slice_range(1, 2), 12..18);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtShape {
    mode_sizes: Vec<usize>,
    ranks: Vec<usize>,
}

impl TtShape {
    /// Build a shape from mode sizes and ranks.
    ///
    /// # Errors
    ///
    /// - [`ProjectionError::InvalidOrder`] if fewer than two modes are given
    /// - [`ProjectionError::RankCount`] if `ranks.len() != mode_sizes.len() + 1`
    /// - [`ProjectionError::ZeroModeSize`] / [`ProjectionError::ZeroRank`] for zero entries
    /// - [`ProjectionError::BoundaryRank`] if the first or last rank is not 1
    pub fn new(mode_sizes: Vec<usize>, ranks: Vec<usize>) -> ProjectionResult<Self> {
        let order = mode_sizes.len();
        if order < 2 {
            return Err(ProjectionError::InvalidOrder { order });
        }

        if ranks.len() != order + 1 {
            return Err(ProjectionError::RankCount {
                expected: order + 1,
                actual: ranks.len(),
            });
        }

        if let Some(mode) = mode_sizes.iter().position(|&n| n == 0) {
            return Err(ProjectionError::ZeroModeSize { mode });
        }

        if let Some(position) = ranks.iter().position(|&r| r == 0) {
            return Err(ProjectionError::ZeroRank { position });
        }

        for position in [0, order] {
            if ranks[position] != 1 {
                return Err(ProjectionError::BoundaryRank {
                    position,
                    rank: ranks[position],
                });
            }
        }

        Ok(Self { mode_sizes, ranks })
    }

    /// Shape with the same rank `r` on every interior bond.
    pub fn uniform(mode_sizes: Vec<usize>, rank: usize) -> ProjectionResult<Self> {
        let order = mode_sizes.len();
        let ranks = (0..=order)
            .map(|i| if i == 0 || i == order { 1 } else { rank })
            .collect();
        Self::new(mode_sizes, ranks)
    }

    /// Number of modes d.
    #[inline]
    pub fn order(&self) -> usize {
        self.mode_sizes.len()
    }

    /// Mode sizes n₀, …, n_{d-1}.
    #[inline]
    pub fn mode_sizes(&self) -> &[usize] {
        &self.mode_sizes
    }

    /// Ranks r₀, …, r_d.
    #[inline]
    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }

    /// Largest rank over all bonds.
    pub fn max_rank(&self) -> usize {
        self.ranks.iter().copied().max().unwrap_or(1)
    }

    /// Number of values in one slice of core `core`.
    #[inline]
    pub fn slice_len(&self, core: usize) -> usize {
        self.ranks[core] * self.ranks[core + 1]
    }

    /// Number of values in core `core`.
    #[inline]
    pub fn core_len(&self, core: usize) -> usize {
        self.slice_len(core) * self.mode_sizes[core]
    }

    /// `(r_left, n, r_right)` of core `core`.
    #[inline]
    pub fn core_dims(&self, core: usize) -> (usize, usize, usize) {
        (
            self.ranks[core],
            self.mode_sizes[core],
            self.ranks[core + 1],
        )
    }

    /// Flat range of slice `value` (zero-based) inside core `core`.
    #[inline]
    pub fn slice_range(&self, core: usize, value: usize) -> Range<usize> {
        let len = self.slice_len(core);
        let start = value * len;
        start..start + len
    }

    /// Total number of values stored across all cores.
    pub fn num_parameters(&self) -> usize {
        (0..self.order()).map(|i| self.core_len(i)).sum()
    }

    /// Number of entries of the full tensor, saturating on overflow.
    pub fn full_size(&self) -> usize {
        self.mode_sizes
            .iter()
            .fold(1usize, |acc, &n| acc.saturating_mul(n))
    }
}
