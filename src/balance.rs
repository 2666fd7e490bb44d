//! ICE-style weight rescaling, grounded in `transform.py`'s `balance_matrix`.

use crate::error::{HicmcError, Result};
use crate::matrix::Matrix;
use crate::statistics::assert_square;

fn sanitize_weights(weights: &[f64]) -> Vec<f64> {
    weights.iter().map(|w| if w.is_finite() { *w } else { 1.0 }).collect()
}

/// Mirror the upper triangle (including the diagonal) across it. A safeguard
/// only: dividing or multiplying by `w[i] * w[j]` is symmetric by
/// construction, but floating-point order of operations can disagree by an
/// ULP between `[i, j]` and `[j, i]`.
fn symmetrize(m: &Matrix<f64>) -> Matrix<f64> {
    let n = m.rows;
    let mut out = Matrix::new(n, n);
    for i in 0..n {
        for j in i..n {
            let v = *m.get(i, j);
            out.set(i, j, v);
            out.set(j, i, v);
        }
    }
    out
}

fn check_weights(c: &Matrix<f64>, weights: &[f64]) -> Result<usize> {
    let n = assert_square(c)?;
    if weights.len() != n {
        return Err(HicmcError::InvalidArgument(format!(
            "expected {n} weights, got {}",
            weights.len()
        )));
    }
    Ok(n)
}

/// `B[i, j] = C[i, j] / (w[i] * w[j])`.
pub fn balance(c: &Matrix<f64>, weights: &[f64]) -> Result<Matrix<f64>> {
    let n = check_weights(c, weights)?;
    let w = sanitize_weights(weights);
    let mut out = Matrix::new(n, n);
    for i in 0..n {
        for j in 0..n {
            out.set(i, j, c.get(i, j) / (w[i] * w[j]));
        }
    }
    Ok(symmetrize(&out))
}

/// Inverse of [`balance`]: `C[i, j] = B[i, j] * w[i] * w[j]`.
pub fn unbalance(b: &Matrix<f64>, weights: &[f64]) -> Result<Matrix<f64>> {
    let n = check_weights(b, weights)?;
    let w = sanitize_weights(weights);
    let mut out = Matrix::new(n, n);
    for i in 0..n {
        for j in 0..n {
            out.set(i, j, b.get(i, j) * w[i] * w[j]);
        }
    }
    Ok(symmetrize(&out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_and_unbalance_round_trip() {
        let c = Matrix::from_vec(3, 3, vec![4.0, 6.0, 8.0, 6.0, 9.0, 12.0, 8.0, 12.0, 16.0]);
        let w = vec![2.0, 3.0, 4.0];
        let b = balance(&c, &w).unwrap();
        let restored = unbalance(&b, &w).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert!((restored.get(i, j) - c.get(i, j)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn non_finite_weights_are_sanitised_to_one() {
        let c = Matrix::from_vec(2, 2, vec![1.0, 2.0, 2.0, 4.0]);
        let w = vec![f64::NAN, 2.0];
        let b = balance(&c, &w).unwrap();
        assert_eq!(*b.get(0, 0), 1.0);
        assert_eq!(*b.get(0, 1), 1.0);
    }

    #[test]
    fn rejects_mismatched_weight_length() {
        let c = Matrix::from_vec(2, 2, vec![1.0, 2.0, 2.0, 4.0]);
        assert!(balance(&c, &[1.0, 2.0, 3.0]).is_err());
    }
}
