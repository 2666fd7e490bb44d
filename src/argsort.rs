//! ArgSortTransform: reorders the top half of a symmetric
//! residual matrix by the sorted order of the (already-reconstructed, hence
//! available to the decoder for free) domain model, so that nearby values in
//! the encoded stream tend to be close in magnitude. No permutation is ever
//! stored — both sides derive it from the shared model matrix.
//!
//! The closed form `cumshift_cols(M, -1)[i, j] == M[(i + j) mod n, j]`
//! (immediate from the definition of a per-column cyclic roll) gives a
//! direct reconstruction of a symmetric `M` from the kept top rows, used
//! here in place of the zero-pad/shift/mirror matrix dance: for any `(r, c)`
//! let `i = (r - c) mod n`; if `i` falls among the kept rows, `M[r, c]` is
//! `kept[i, c]` directly, otherwise symmetry (`M[r, c] == M[c, r]`) and the
//! complementary index `(c - r) mod n` (which always does fall among the
//! kept rows) recover it.

use crate::cumshift::cumshift_cols;
use crate::error::{HicmcError, Result};
use crate::matrix::Matrix;
use crate::statistics::assert_square;

fn kept_rows(n: usize) -> usize {
    n / 2 + 1
}

/// Stable ascending sort, ties broken by index — a total order recoverable
/// from the sorted values alone via [`invert_permutation`].
fn argsort(values: &[f64]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    idx
}

fn invert_permutation(perm: &[usize]) -> Vec<usize> {
    let mut inv = vec![0usize; perm.len()];
    for (k, &p) in perm.iter().enumerate() {
        inv[p] = k;
    }
    inv
}

fn check_same_shape(x: &Matrix<f64>, c_hat: &Matrix<f64>) -> Result<usize> {
    let n = assert_square(x)?;
    let m = assert_square(c_hat)?;
    if n != m {
        return Err(HicmcError::InvalidArgument(format!(
            "argsort transform shape mismatch: {n} vs {m}"
        )));
    }
    Ok(n)
}

/// Forward `A(X, Ĉ) -> Y`.
pub fn forward(x: &Matrix<f64>, c_hat: &Matrix<f64>) -> Result<Matrix<f64>> {
    let n = check_same_shape(x, c_hat)?;
    let rows = kept_rows(n);

    let x_top = cumshift_cols(x, -1).submatrix(0, rows, 0, n);
    let c_top = cumshift_cols(c_hat, -1).submatrix(0, rows, 0, n);

    let perm = argsort(c_top.as_slice());
    let x_flat = x_top.as_slice();
    let y_flat: Vec<f64> = perm.iter().map(|&p| x_flat[p]).collect();
    Ok(Matrix::from_vec(rows, n, y_flat))
}

/// Inverse `A⁻¹(Y, Ĉ) -> X`.
pub fn inverse(y: &Matrix<f64>, c_hat: &Matrix<f64>) -> Result<Matrix<f64>> {
    let n = assert_square(c_hat)?;
    let rows = kept_rows(n);
    if y.rows != rows || y.cols != n {
        return Err(HicmcError::InvalidArgument(format!(
            "argsort inverse expected a {rows}x{n} matrix, got {}x{}",
            y.rows, y.cols
        )));
    }

    let c_top = cumshift_cols(c_hat, -1).submatrix(0, rows, 0, n);
    let perm = argsort(c_top.as_slice());
    let inv = invert_permutation(&perm);

    let y_flat = y.as_slice();
    let x_top_flat: Vec<f64> = (0..y_flat.len()).map(|p| y_flat[inv[p]]).collect();
    let x_top = Matrix::from_vec(rows, n, x_top_flat);

    let mut out = Matrix::<f64>::new(n, n);
    for r in 0..n {
        for c in 0..n {
            let i = (r as i64 - c as i64).rem_euclid(n as i64) as usize;
            if i < rows {
                out.set(r, c, *x_top.get(i, c));
            } else {
                let i2 = (c as i64 - r as i64).rem_euclid(n as i64) as usize;
                out.set(r, c, *x_top.get(i2, r));
            }
        }
    }
    Ok(out)
}
