//! Small dense kernels on column-major slices
//!
//! The projection sweep only needs a handful of level-1/level-2 operations on
//! matrices of size at most maxRank × maxRank. They operate directly on flat
//! slices so that the per-sample loop never allocates.
//!
//! A matrix `a` with `rows` rows is stored column-major: element (i, j) lives at
//! `a[i + j * rows]`.

use scirs2_core::numeric::Float;

/// `y ← x`
#[inline]
pub fn copy<T: Float>(x: &[T], y: &mut [T]) {
    y.copy_from_slice(x);
}

/// `y ← y + alpha · x`
#[inline]
pub fn axpy<T: Float>(alpha: T, x: &[T], y: &mut [T]) {
    debug_assert_eq!(x.len(), y.len());
    for (yi, &xi) in y.iter_mut().zip(x.iter()) {
        *yi = *yi + alpha * xi;
    }
}

/// `y ← aᵀ · x` for a `rows × cols` matrix `a`.
///
/// `x` has length `rows`, `y` has length `cols`. Each output entry is a dot
/// product with one contiguous column of `a`.
#[inline]
pub fn gemv_t<T: Float>(a: &[T], rows: usize, cols: usize, x: &[T], y: &mut [T]) {
    debug_assert_eq!(a.len(), rows * cols);
    debug_assert_eq!(x.len(), rows);
    debug_assert_eq!(y.len(), cols);

    for (col, yj) in a.chunks_exact(rows).zip(y.iter_mut()) {
        *yj = col
            .iter()
            .zip(x.iter())
            .fold(T::zero(), |acc, (&aij, &xi)| acc + aij * xi);
    }
}

/// `y ← a · x` for a `rows × cols` matrix `a`.
///
/// `x` has length `cols`, `y` has length `rows`.
#[inline]
pub fn gemv_n<T: Float>(a: &[T], rows: usize, cols: usize, x: &[T], y: &mut [T]) {
    debug_assert_eq!(a.len(), rows * cols);
    debug_assert_eq!(x.len(), cols);
    debug_assert_eq!(y.len(), rows);

    y.iter_mut().for_each(|yi| *yi = T::zero());
    for (col, &xj) in a.chunks_exact(rows).zip(x.iter()) {
        axpy(xj, col, y);
    }
}

/// Rank-1 update `a ← a + alpha · x · yᵀ` for a `rows × cols` matrix `a`.
///
/// `x` has length `rows`, `y` has length `cols`.
#[inline]
pub fn ger<T: Float>(alpha: T, x: &[T], y: &[T], a: &mut [T], rows: usize, cols: usize) {
    debug_assert_eq!(a.len(), rows * cols);
    debug_assert_eq!(x.len(), rows);
    debug_assert_eq!(y.len(), cols);

    for (col, &yj) in a.chunks_exact_mut(rows).zip(y.iter()) {
        axpy(alpha * yj, x, col);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2 × 3 matrix [[1, 3, 5], [2, 4, 6]] in column-major order
    const A: [f64; 6] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];

    #[test]
    fn test_axpy() {
        let mut y = vec![1.0, 1.0, 1.0];
        axpy(2.0, &[1.0, 2.0, 3.0], &mut y);
        assert_eq!(y, vec![3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_copy() {
        let mut y = vec![0.0; 3];
        copy(&[4.0, 5.0, 6.0], &mut y);
        assert_eq!(y, vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_gemv_t() {
        let mut y = vec![f64::NAN; 3];
        gemv_t(&A, 2, 3, &[1.0, 1.0], &mut y);
        assert_eq!(y, vec![3.0, 7.0, 11.0]);
    }

    #[test]
    fn test_gemv_n() {
        let mut y = vec![f64::NAN; 2];
        gemv_n(&A, 2, 3, &[1.0, 0.0, 2.0], &mut y);
        assert_eq!(y, vec![11.0, 14.0]);
    }

    #[test]
    fn test_ger() {
        let mut a = A.to_vec();
        ger(0.5, &[2.0, 4.0], &[1.0, 0.0, -1.0], &mut a, 2, 3);
        assert_eq!(a, vec![2.0, 4.0, 3.0, 4.0, 4.0, 4.0]);
    }

    #[test]
    fn test_single_element() {
        let mut y = vec![0.0];
        gemv_t(&[3.0], 1, 1, &[2.0], &mut y);
        assert_eq!(y, vec![6.0]);
        gemv_n(&[3.0], 1, 1, &[2.0], &mut y);
        assert_eq!(y, vec![6.0]);
    }
}
