//! Drop and restore all-zero rows/columns, grounded in
//! `masking.py`'s `mask_axis`/`unmask_axis`. Because contact matrices are
//! symmetric, callers apply row masking then column masking with the same
//! derived predicate.

use crate::matrix::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Col,
}

/// `mask[i] == true` iff row/column `i` (along `axis`) is entirely zero.
/// Returns the matrix with those rows/columns dropped, and the mask.
pub fn mask_axis(mat: &Matrix<f64>, axis: Axis) -> (Matrix<f64>, Vec<bool>) {
    let mask = match axis {
        Axis::Row => (0..mat.rows).map(|r| mat.row(r).iter().all(|&v| v == 0.0)).collect::<Vec<_>>(),
        Axis::Col => (0..mat.cols).map(|c| mat.col(c).iter().all(|&v| v == 0.0)).collect::<Vec<_>>(),
    };

    let out = match axis {
        Axis::Row => {
            let kept_rows: Vec<usize> = (0..mat.rows).filter(|&r| !mask[r]).collect();
            let mut data = Vec::with_capacity(kept_rows.len() * mat.cols);
            for &r in &kept_rows {
                data.extend_from_slice(mat.row(r));
            }
            Matrix::from_vec(kept_rows.len(), mat.cols, data)
        }
        Axis::Col => {
            let kept_cols: Vec<usize> = (0..mat.cols).filter(|&c| !mask[c]).collect();
            let mut data = Vec::with_capacity(mat.rows * kept_cols.len());
            for r in 0..mat.rows {
                for &c in &kept_cols {
                    data.push(*mat.get(r, c));
                }
            }
            Matrix::from_vec(mat.rows, kept_cols.len(), data)
        }
    };
    (out, mask)
}

/// Inverse of [`mask_axis`]: reinsert zero rows/columns at the positions
/// where `mask` is true, so the result has length `mask.len()` along `axis`.
pub fn unmask_axis(mat: &Matrix<f64>, axis: Axis, mask: &[bool]) -> Matrix<f64> {
    match axis {
        Axis::Row => {
            let mut out = Matrix::<f64>::new(mask.len(), mat.cols);
            let mut src_row = 0usize;
            for (idx, &masked) in mask.iter().enumerate() {
                if masked {
                    continue;
                }
                for c in 0..mat.cols {
                    out.set(idx, c, *mat.get(src_row, c));
                }
                src_row += 1;
            }
            out
        }
        Axis::Col => {
            let mut out = Matrix::<f64>::new(mat.rows, mask.len());
            for r in 0..mat.rows {
                let mut src_col = 0usize;
                for (idx, &masked) in mask.iter().enumerate() {
                    if masked {
                        continue;
                    }
                    out.set(r, idx, *mat.get(r, src_col));
                    src_col += 1;
                }
            }
            out
        }
    }
}
