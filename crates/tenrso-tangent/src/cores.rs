//! Borrowed TT core families and layout conversion.
//!
//! The projection reads two families of cores, the left factors U and the right
//! factors V. Both are owned by the caller and borrowed for the duration of one
//! call through [`CoreFamily`].
//!
//! Cores are stored slice-contiguous (see [`crate::shape`]). Cores produced by
//! tenrso TT routines use the `(r_left, n, r_right)` [`Array3`] convention;
//! [`pack_core`] and [`unpack_core`] convert between the two.

use crate::error::{ProjectionError, ProjectionResult};
use crate::shape::TtShape;
use scirs2_core::ndarray_ext::{Array3, ArrayView2, ArrayView3};
use scirs2_core::numeric::Float;

/// Read-only view of the d cores of one TT factor family.
#[derive(Debug, Clone)]
pub struct CoreFamily<'a, T> {
    name: &'static str,
    shape: &'a TtShape,
    cores: Vec<&'a [T]>,
}

impl<'a, T: Float> CoreFamily<'a, T> {
    /// Bind flat core buffers to a shape.
    ///
    /// `name` labels the family in error messages (typically `"U"` or `"V"`).
    ///
    /// # Errors
    ///
    /// - [`ProjectionError::CoreCount`] if `cores.len()` differs from the order
    /// - [`ProjectionError::DimensionMismatch`] if core i does not hold exactly
    ///   `r_i · n_i · r_{i+1}` values
    pub fn bind(
        name: &'static str,
        shape: &'a TtShape,
        cores: &[&'a [T]],
    ) -> ProjectionResult<Self> {
        if cores.len() != shape.order() {
            return Err(ProjectionError::core_count(
                name,
                shape.order(),
                cores.len(),
            ));
        }

        for (i, core) in cores.iter().enumerate() {
            let expected = shape.core_len(i);
            if core.len() != expected {
                return Err(ProjectionError::dimension_mismatch(
                    name,
                    i,
                    expected,
                    core.len(),
                ));
            }
        }

        Ok(Self {
            name,
            shape,
            cores: cores.to_vec(),
        })
    }

    /// Bind owned core buffers, e.g. the output of [`pack_cores`].
    pub fn from_vecs(
        name: &'static str,
        shape: &'a TtShape,
        cores: &'a [Vec<T>],
    ) -> ProjectionResult<Self> {
        let borrowed: Vec<&'a [T]> = cores.iter().map(|c| c.as_slice()).collect();
        Self::bind(name, shape, &borrowed)
    }

    /// Label used in error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Shape the family was bound to.
    pub fn shape(&self) -> &'a TtShape {
        self.shape
    }

    /// Flat buffer of core `core`.
    #[inline]
    pub fn core(&self, core: usize) -> &'a [T] {
        self.cores[core]
    }

    /// Column-major `r_core × r_{core+1}` slice selected by the zero-based `value`.
    #[inline]
    pub fn slice(&self, core: usize, value: usize) -> &'a [T] {
        &self.cores[core][self.shape.slice_range(core, value)]
    }

    /// Slice `value` of core `core` as an `(r_core, r_{core+1})` matrix view.
    pub fn slice_view(&self, core: usize, value: usize) -> ProjectionResult<ArrayView2<'a, T>> {
        if core >= self.shape.order() || value >= self.shape.mode_sizes()[core] {
            return Err(ProjectionError::shape_mismatch(format!(
                "slice ({}, {}) outside {} cores of mode sizes {:?}",
                core,
                value,
                self.name,
                self.shape.mode_sizes()
            )));
        }
        slice_matrix(
            self.slice(core, value),
            self.shape.ranks()[core],
            self.shape.ranks()[core + 1],
        )
    }
}

/// View a column-major flat slice as a `(rows, cols)` matrix.
pub(crate) fn slice_matrix<T>(
    data: &[T],
    rows: usize,
    cols: usize,
) -> ProjectionResult<ArrayView2<'_, T>> {
    ArrayView2::from_shape((cols, rows), data)
        .map(|view| view.reversed_axes())
        .map_err(|e| {
            ProjectionError::shape_mismatch(format!(
                "cannot view {} values as {}x{} matrix: {}",
                data.len(),
                rows,
                cols,
                e
            ))
        })
}

/// Convert a `(r_left, n, r_right)` core into the slice-contiguous layout.
///
/// # Example
///
/// ```rust
/// use scirs2_core::ndarray_ext::Array3;
/// use tenrso_tangent::{pack_core, unpack_core};
///
/// let core = Array3::from_shape_fn((2, 3, 2), |(a, k, b)| (a + 10 * k + 100 * b) as f64);
/// let flat = pack_core(&core.view());
///
/// // Slice k = 1 is the 2x2 matrix core[.., 1, ..] in column-major order
/// assert_eq!(&flat[4..8], &[10.0, 11.0, 110.0, 111.0]);
///
/// let back = unpack_core(&flat, 2, 3, 2).unwrap();
/// assert_eq!(back, core);
/// ```
pub fn pack_core<T: Float>(core: &ArrayView3<T>) -> Vec<T> {
    let (r_left, n, r_right) = (core.shape()[0], core.shape()[1], core.shape()[2]);
    let mut flat = Vec::with_capacity(r_left * n * r_right);

    for k in 0..n {
        for b in 0..r_right {
            for a in 0..r_left {
                flat.push(core[[a, k, b]]);
            }
        }
    }

    flat
}

/// Convert a slice-contiguous core back into `(r_left, n, r_right)` form.
///
/// # Errors
///
/// Returns [`ProjectionError::ShapeMismatch`] if `data` does not hold
/// `r_left · n · r_right` values.
pub fn unpack_core<T: Float>(
    data: &[T],
    r_left: usize,
    n: usize,
    r_right: usize,
) -> ProjectionResult<Array3<T>> {
    if data.len() != r_left * n * r_right {
        return Err(ProjectionError::shape_mismatch(format!(
            "core buffer of {} values cannot hold shape ({}, {}, {})",
            data.len(),
            r_left,
            n,
            r_right
        )));
    }

    let slice_len = r_left * r_right;
    Ok(Array3::from_shape_fn((r_left, n, r_right), |(a, k, b)| {
        data[k * slice_len + b * r_left + a]
    }))
}

/// Derive the TT shape of `(r_left, n, r_right)` cores and pack them.
///
/// # Errors
///
/// Fails if consecutive ranks disagree or the derived shape violates the TT
/// invariants (see [`TtShape::new`]).
pub fn pack_cores<T: Float>(cores: &[ArrayView3<T>]) -> ProjectionResult<(TtShape, Vec<Vec<T>>)> {
    let mut mode_sizes = Vec::with_capacity(cores.len());
    let mut ranks = Vec::with_capacity(cores.len() + 1);

    for (i, core) in cores.iter().enumerate() {
        let (r_left, n, r_right) = (core.shape()[0], core.shape()[1], core.shape()[2]);
        if i == 0 {
            ranks.push(r_left);
        } else if ranks[i] != r_left {
            return Err(ProjectionError::shape_mismatch(format!(
                "rank mismatch between cores {} and {}: {} vs {}",
                i - 1,
                i,
                ranks[i],
                r_left
            )));
        }
        mode_sizes.push(n);
        ranks.push(r_right);
    }

    if ranks.is_empty() {
        ranks.push(1);
    }

    let shape = TtShape::new(mode_sizes, ranks)?;
    let packed = cores.iter().map(pack_core).collect();
    Ok((shape, packed))
}
