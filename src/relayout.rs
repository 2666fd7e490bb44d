//! Diagonal re-layout (mode 0): packs the unique entries of a symmetric
//! matrix into a dense rectangle suitable for 2D binary/byte compression,
//! and its inverse. The originating `transform_diagonal_mode0`/
//! `inverse_tranform_diagonal_mode0` routines live outside the captured
//! reference source, so this module is built directly from the algorithmic
//! description and checked by hand-tracing a small symmetric matrix through
//! both directions.

use crate::cumshift::cumshift_cols;
use crate::matrix::Matrix;

fn diagonal<T: Clone>(m: &Matrix<T>, offset: i64) -> Vec<T> {
    let n = m.rows;
    let len = n - offset.unsigned_abs() as usize;
    let mut out = Vec::with_capacity(len);
    for k in 0..len {
        let (r, c) = if offset >= 0 {
            (k, k + offset as usize)
        } else {
            (k + (-offset) as usize, k)
        };
        out.push(m.get(r, c).clone());
    }
    out
}

fn roll_rows<T: Clone + Default>(mat: &Matrix<T>, shift: i64) -> Matrix<T> {
    let n = mat.rows;
    let mut out = Matrix::new(mat.rows, mat.cols);
    for i in 0..n {
        let src = (i as i64 - shift).rem_euclid(n as i64) as usize;
        let row = mat.row(src).to_vec();
        for c in 0..mat.cols {
            out.set(i, c, row[c].clone());
        }
    }
    out
}

/// Forward `φ(M)`: pack the unique entries of symmetric `M` (n×n) into the
/// top `n/2 + 1` rows of the diagonal-concatenated n×n layout.
pub fn transform_diagonal<T: Clone + Default>(m: &Matrix<T>) -> Matrix<T> {
    assert!(m.is_square(), "diagonal relayout requires a square matrix");
    let n = m.rows;

    let mut offsets = Vec::with_capacity(2 * n - 1);
    for o in 0..n as i64 {
        offsets.push(o);
    }
    for o in 1..n as i64 {
        offsets.push(-o);
    }

    let mut flat = Vec::with_capacity(n * n);
    for o in offsets {
        flat.extend(diagonal(m, o));
    }

    let full = Matrix::from_vec(n, n, flat);
    let target_rows = n / 2 + 1;
    full.submatrix(0, target_rows, 0, n)
}

/// Inverse `φ⁻¹(P)`: reconstruct the symmetric n×n matrix from the packed
/// layout produced by [`transform_diagonal`]. `n` is `p.cols`.
pub fn inverse_transform_diagonal<T: Clone + Default>(p: &Matrix<T>) -> Matrix<T> {
    let n = p.cols;
    let flat = p.as_slice();

    let mut tmp = Matrix::<T>::new(n, n);
    let mut cursor = 0usize;
    for idx in 0..n {
        let count = n - idx;
        let row = n - idx - 1;
        for k in 0..count {
            tmp.set(row, idx + k, flat[cursor + k].clone());
        }
        cursor += count;
    }

    let shifted = cumshift_cols(&tmp, 1);
    let rolled = roll_rows(&shifted, 1);

    let mut out = Matrix::<T>::new(n, n);
    for i in 0..n {
        for j in 0..n {
            if j >= i {
                out.set(i, j, rolled.get(i, j).clone());
            } else {
                out.set(i, j, rolled.get(j, i).clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symmetric_sample(n: usize) -> Matrix<f64> {
        let mut m = Matrix::<f64>::new(n, n);
        for i in 0..n {
            for j in 0..n {
                let (a, b) = if i <= j { (i, j) } else { (j, i) };
                m.set(i, j, (a * 10 + b) as f64);
            }
        }
        m
    }

    #[test]
    fn round_trips_even_and_odd_sizes() {
        for n in 2..=9 {
            let m = symmetric_sample(n);
            let packed = transform_diagonal(&m);
            assert_eq!(packed.rows, n / 2 + 1);
            assert_eq!(packed.cols, n);
            let restored = inverse_transform_diagonal(&packed);
            assert_eq!(restored, m);
        }
    }

    #[test]
    fn matches_hand_traced_four_by_four() {
        let m = symmetric_sample(4);
        let packed = transform_diagonal(&m);
        assert_eq!(
            packed.as_slice(),
            &[0.0, 11.0, 22.0, 33.0, 1.0, 12.0, 23.0, 2.0, 13.0, 3.0, 1.0, 12.0]
        );
    }
}
