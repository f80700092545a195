//! Per-core result accumulators.
//!
//! [`TangentCores`] owns one zero-initialized buffer per TT core, laid out like
//! the input cores. The projection adds each sample's contribution into the
//! slices addressed by its multi-index.

use crate::cores::{slice_matrix, unpack_core};
use crate::error::{ProjectionError, ProjectionResult};
use crate::shape::TtShape;
use scirs2_core::ndarray_ext::{Array3, ArrayView2};
use scirs2_core::numeric::Float;

/// Accumulated tangent-space components, one buffer per core.
#[derive(Debug, Clone, PartialEq)]
pub struct TangentCores<T> {
    shape: TtShape,
    cores: Vec<Vec<T>>,
}

impl<T: Float> TangentCores<T> {
    /// Zero accumulators for `shape`.
    pub fn zeros(shape: &TtShape) -> Self {
        let cores = (0..shape.order())
            .map(|i| vec![T::zero(); shape.core_len(i)])
            .collect();

        Self {
            shape: shape.clone(),
            cores,
        }
    }

    /// Shape of the accumulated cores.
    pub fn shape(&self) -> &TtShape {
        &self.shape
    }

    /// Number of cores.
    pub fn order(&self) -> usize {
        self.cores.len()
    }

    /// Flat buffer of core `core`.
    pub fn core(&self, core: usize) -> &[T] {
        &self.cores[core]
    }

    /// Column-major slice `value` of core `core`.
    #[inline]
    pub fn slice(&self, core: usize, value: usize) -> &[T] {
        &self.cores[core][self.shape.slice_range(core, value)]
    }

    /// Mutable column-major slice `value` of core `core`.
    #[inline]
    pub fn slice_mut(&mut self, core: usize, value: usize) -> &mut [T] {
        let range = self.shape.slice_range(core, value);
        &mut self.cores[core][range]
    }

    /// Slice `value` of core `core` as an `(r_core, r_{core+1})` matrix view.
    pub fn slice_view(&self, core: usize, value: usize) -> ProjectionResult<ArrayView2<'_, T>> {
        if core >= self.order() || value >= self.shape.mode_sizes()[core] {
            return Err(ProjectionError::shape_mismatch(format!(
                "accumulator slice ({}, {}) outside mode sizes {:?}",
                core,
                value,
                self.shape.mode_sizes()
            )));
        }
        slice_matrix(
            self.slice(core, value),
            self.shape.ranks()[core],
            self.shape.ranks()[core + 1],
        )
    }

    /// Core `core` in `(r_left, n, r_right)` form.
    pub fn to_array3(&self, core: usize) -> ProjectionResult<Array3<T>> {
        if core >= self.order() {
            return Err(ProjectionError::shape_mismatch(format!(
                "core {} outside {} accumulated cores",
                core,
                self.order()
            )));
        }
        let (r_left, n, r_right) = self.shape.core_dims(core);
        unpack_core(&self.cores[core], r_left, n, r_right)
    }

    /// Add another accumulator of the same shape into this one.
    ///
    /// # Errors
    ///
    /// [`ProjectionError::ShapeMismatch`] if the shapes differ.
    pub fn merge(&mut self, other: &Self) -> ProjectionResult<()> {
        if self.shape != other.shape {
            return Err(ProjectionError::shape_mismatch(format!(
                "cannot merge accumulators of ranks {:?} / modes {:?} with ranks {:?} / modes {:?}",
                self.shape.ranks(),
                self.shape.mode_sizes(),
                other.shape.ranks(),
                other.shape.mode_sizes()
            )));
        }

        for (dst, src) in self.cores.iter_mut().zip(other.cores.iter()) {
            for (d, &s) in dst.iter_mut().zip(src.iter()) {
                *d = *d + s;
            }
        }

        Ok(())
    }

    /// Multiply every entry by `alpha`.
    pub fn scale(&mut self, alpha: T) {
        self.cores
            .iter_mut()
            .flat_map(|core| core.iter_mut())
            .for_each(|x| *x = *x * alpha);
    }

    /// Whether every entry is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.cores.iter().flatten().all(|x| x.is_zero())
    }

    /// Largest absolute entry-wise difference to `other`, or `None` if shapes differ.
    pub fn max_abs_diff(&self, other: &Self) -> Option<T> {
        if self.shape != other.shape {
            return None;
        }

        Some(
            self.cores
                .iter()
                .flatten()
                .zip(other.cores.iter().flatten())
                .fold(T::zero(), |acc, (&a, &b)| acc.max((a - b).abs())),
        )
    }

    /// Sum of squares over all cores (Euclidean norm squared of the stacked cores).
    pub fn frobenius_norm_squared(&self) -> T {
        self.cores
            .iter()
            .flatten()
            .fold(T::zero(), |acc, &x| acc + x * x)
    }

    /// Give up ownership of the flat core buffers.
    pub fn into_cores(self) -> Vec<Vec<T>> {
        self.cores
    }
}
