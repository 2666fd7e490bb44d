//! Genomic-distance matrix construction, grounded in the
//! `_gen_dist_mat` routine's `cumshift_cols` + triangle-mirror derivation.

use crate::cumshift::cumshift_cols;
use crate::matrix::Matrix;

/// Build the `n x n` distance matrix `G` where `G[i, j] == |i - j|`, via a
/// cumulative column shift of the row-index broadcast followed by mirroring
/// the lower triangle across the diagonal.
pub fn gen_dist_mat(n: usize) -> Matrix<u32> {
    let mut d0 = Matrix::<u32>::new(n, n);
    for i in 0..n {
        for j in 0..n {
            d0.set(i, j, i as u32);
        }
    }
    let shifted = cumshift_cols(&d0, 1);

    let mut out = Matrix::<u32>::new(n, n);
    for i in 0..n {
        for j in 0..=i {
            out.set(i, j, *shifted.get(i, j));
        }
        for j in 0..i {
            out.set(j, i, *shifted.get(i, j));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_absolute_difference() {
        let n = 6;
        let g = gen_dist_mat(n);
        for i in 0..n {
            for j in 0..n {
                assert_eq!(*g.get(i, j), (i as i64 - j as i64).unsigned_abs() as u32);
            }
        }
    }

    #[test]
    fn is_symmetric() {
        let g = gen_dist_mat(5);
        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(g.get(i, j), g.get(j, i));
            }
        }
    }
}
