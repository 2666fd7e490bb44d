//! The cumulative column shift primitive shared by [`crate::distance`],
//! [`crate::relayout`] and [`crate::argsort`].

use crate::matrix::Matrix;

/// Cyclically roll `v` right by `shift` positions (numpy `roll` semantics):
/// `out[i] == v[(i - shift) mod n]`. `shift` may be negative or exceed `n`.
pub fn roll_vec<T: Clone>(v: &[T], shift: i64) -> Vec<T> {
    let n = v.len();
    if n == 0 {
        return Vec::new();
    }
    let shift = shift.rem_euclid(n as i64) as usize;
    (0..n).map(|i| v[(i + n - shift) % n].clone()).collect()
}

/// For each column `c`, cyclically roll that column by `k * c`.
pub fn cumshift_cols<T: Clone + Default>(mat: &Matrix<T>, k: i64) -> Matrix<T> {
    let mut out = Matrix::new(mat.rows, mat.cols);
    for c in 0..mat.cols {
        let col = mat.col(c);
        let shifted = roll_vec(&col, k * c as i64);
        out.set_col(c, &shifted);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_matches_numpy_semantics() {
        assert_eq!(roll_vec(&[0, 1, 2, 3], 1), vec![3, 0, 1, 2]);
        assert_eq!(roll_vec(&[0, 1, 2, 3], -1), vec![1, 2, 3, 0]);
        assert_eq!(roll_vec(&[0, 1, 2, 3], 0), vec![0, 1, 2, 3]);
        assert_eq!(roll_vec(&[0, 1, 2, 3], 4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn cumshift_is_invertible_by_negation() {
        let m = Matrix::from_vec(4, 4, vec![0u32, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3]);
        let shifted = cumshift_cols(&m, 1);
        let restored = cumshift_cols(&shifted, -1);
        assert_eq!(restored, m);
    }
}
