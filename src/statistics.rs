//! Scalar reducers over contact values and the domain-statistic map,
//! grounded in `statistics.py`'s `STATISTIC_FUNCS`/`map_domains`. The
//! original `sparsity` recurses into itself instead of returning
//! `1 - density`; this is a bug in the reference, not a contract, so this
//! module implements the corrected `1 - nonzero_count / size` directly.

use crate::error::{HicmcError, Result};
use crate::matrix::Matrix;

pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Population standard deviation (`np.std` default `ddof=0`).
pub fn deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = average(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

pub fn sparsity(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let nonzero = values.iter().filter(|v| **v != 0.0).count();
    1.0 - (nonzero as f64 / values.len() as f64)
}

pub fn assert_square<T>(matrix: &Matrix<T>) -> Result<usize> {
    if matrix.rows != matrix.cols {
        return Err(HicmcError::Integrity(format!(
            "matrix is not square: {}x{}",
            matrix.rows, matrix.cols
        )));
    }
    Ok(matrix.rows)
}

/// `[start, end)` range of domain `idx`, with virtual boundaries `0` and `n`.
pub(crate) fn domain_range(idx: usize, boundaries: &[usize], n: usize) -> (usize, usize) {
    let start = if idx == 0 { 0 } else { boundaries[idx - 1] };
    let end = if idx == boundaries.len() { n } else { boundaries[idx] };
    (start, end)
}

/// `S[p, q] = stat_f(C[rows_of_p, cols_of_q])` for `p <= q`, mirrored into
/// the lower triangle.
pub fn map_domains<F>(contact_mat: &Matrix<f64>, boundaries: &[usize], stat_f: F) -> Result<Matrix<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let n = assert_square(contact_mat)?;
    let ndomains = boundaries.len() + 1;
    let mut out = Matrix::<f64>::new(ndomains, ndomains);

    for p in 0..ndomains {
        for q in p..ndomains {
            let (row_start, row_end) = domain_range(p, boundaries, n);
            let (col_start, col_end) = domain_range(q, boundaries, n);
            let sub = contact_mat.submatrix(row_start, row_end, col_start, col_end);
            let value = stat_f(sub.as_slice());
            out.set(p, q, value);
            if p != q {
                out.set(q, p, value);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_and_deviation_match_known_values() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(average(&values), 5.0);
        assert!((deviation(&values) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn sparsity_counts_nonzero_fraction() {
        let values = [0.0, 0.0, 1.0, 2.0];
        assert_eq!(sparsity(&values), 0.5);
    }

    #[test]
    fn assert_square_rejects_rectangular() {
        let m = Matrix::from_vec(2, 3, vec![0.0; 6]);
        assert!(assert_square(&m).is_err());
    }

    #[test]
    fn map_domains_is_symmetric_and_uses_boundaries() {
        let m = Matrix::from_vec(
            4,
            4,
            vec![
                1.0, 2.0, 0.0, 0.0, 2.0, 1.0, 0.0, 0.0, 0.0, 0.0, 3.0, 4.0, 0.0, 0.0, 4.0, 3.0,
            ],
        );
        let boundaries = [2usize];
        let s = map_domains(&m, &boundaries, average).unwrap();
        assert_eq!(s.rows, 2);
        assert_eq!(s.cols, 2);
        assert_eq!(*s.get(0, 1), *s.get(1, 0));
        assert_eq!(*s.get(0, 0), 1.5);
        assert_eq!(*s.get(1, 1), 3.5);
    }
}
