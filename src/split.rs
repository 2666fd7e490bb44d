//! SplitTransform: separates a matrix into a nonzero-location
//! mask and the dense vector of nonzero values in row-major order, and its
//! inverse scatter. Grounded in `transform_split`/`inverse_transform_split`
//! as driven from `encode.py`/`decode.py`.
//!
//! `decode.py` recovers the on-disk integer width of the nonzero values from
//! `len(buffer) // popcount(mask)` alone (`np.frombuffer` dispatches on
//! `uint8`/`uint16`/`uint32`/`uint64` by that quotient) — [`ContactValues`]
//! realizes the same narrow-then-widen contract the reference applies to
//! contact counts, fixed to little-endian so the on-disk layout doesn't
//! depend on the host's byte order.

use crate::error::{HicmcError, Result};
use crate::matrix::Matrix;

/// `mask = X != 0`; `values = X[mask]` in row-major order.
pub fn split(x: &Matrix<f64>) -> (Vec<bool>, Vec<f64>) {
    let mask: Vec<bool> = x.as_slice().iter().map(|&v| v != 0.0).collect();
    let values: Vec<f64> = x.as_slice().iter().copied().filter(|&v| v != 0.0).collect();
    (mask, values)
}

/// Inverse of [`split`]: scatter `values` into a `rows x cols` zero matrix
/// at the positions where `mask` is true.
pub fn unsplit(mask: &[bool], values: &[f64], rows: usize, cols: usize) -> Result<Matrix<f64>> {
    if mask.len() != rows * cols {
        return Err(HicmcError::Integrity(format!(
            "mask length {} does not match {rows}x{cols}",
            mask.len()
        )));
    }
    let mut data = vec![0.0f64; rows * cols];
    let mut cursor = 0usize;
    for (idx, &present) in mask.iter().enumerate() {
        if present {
            let v = values
                .get(cursor)
                .ok_or_else(|| HicmcError::Integrity("fewer values than mask bits set".to_string()))?;
            data[idx] = *v;
            cursor += 1;
        }
    }
    if cursor != values.len() {
        return Err(HicmcError::Integrity("more values supplied than mask bits set".to_string()));
    }
    Ok(Matrix::from_vec(rows, cols, data))
}

/// Non-negative integral contact values, tagged by the narrowest unsigned
/// width that holds them (mirrors `np.min_scalar_type`).
#[derive(Debug, Clone, PartialEq)]
pub enum ContactValues {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
}

impl ContactValues {
    pub fn itemsize(&self) -> usize {
        match self {
            ContactValues::U8(_) => 1,
            ContactValues::U16(_) => 2,
            ContactValues::U32(_) => 4,
            ContactValues::U64(_) => 8,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ContactValues::U8(v) => v.len(),
            ContactValues::U16(v) => v.len(),
            ContactValues::U32(v) => v.len(),
            ContactValues::U64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Narrow `values` (non-negative, integral) to the smallest unsigned
    /// width that represents them exactly.
    pub fn from_f64(values: &[f64]) -> Result<Self> {
        let mut max_value = 0u64;
        for &v in values {
            if v < 0.0 || v.fract() != 0.0 {
                return Err(HicmcError::InvalidArgument(format!(
                    "contact value {v} is not a non-negative integer"
                )));
            }
            max_value = max_value.max(v as u64);
        }
        Ok(if max_value <= u8::MAX as u64 {
            ContactValues::U8(values.iter().map(|&v| v as u8).collect())
        } else if max_value <= u16::MAX as u64 {
            ContactValues::U16(values.iter().map(|&v| v as u16).collect())
        } else if max_value <= u32::MAX as u64 {
            ContactValues::U32(values.iter().map(|&v| v as u32).collect())
        } else {
            ContactValues::U64(values.iter().map(|&v| v as u64).collect())
        })
    }

    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            ContactValues::U8(v) => v.iter().map(|&x| x as f64).collect(),
            ContactValues::U16(v) => v.iter().map(|&x| x as f64).collect(),
            ContactValues::U32(v) => v.iter().map(|&x| x as f64).collect(),
            ContactValues::U64(v) => v.iter().map(|&x| x as f64).collect(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            ContactValues::U8(v) => v.clone(),
            ContactValues::U16(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            ContactValues::U32(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            ContactValues::U64(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        }
    }

    /// Inverse of [`ContactValues::to_bytes`] given the on-disk itemsize,
    /// recovered by the caller as `bytes.len() / popcount(mask)`.
    pub fn from_bytes(bytes: &[u8], itemsize: usize) -> Result<Self> {
        if itemsize == 0 || bytes.len() % itemsize != 0 {
            return Err(HicmcError::Integrity(format!(
                "byte buffer of length {} is not a multiple of itemsize {itemsize}",
                bytes.len()
            )));
        }
        Ok(match itemsize {
            1 => ContactValues::U8(bytes.to_vec()),
            2 => ContactValues::U16(bytes.chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]])).collect()),
            4 => ContactValues::U32(
                bytes
                    .chunks_exact(4)
                    .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            8 => ContactValues::U64(
                bytes
                    .chunks_exact(8)
                    .map(|c| u64::from_le_bytes(c.try_into().unwrap()))
                    .collect(),
            ),
            other => return Err(HicmcError::Integrity(format!("unsupported contact value itemsize: {other}"))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_and_unsplit_round_trip() {
        let m = Matrix::from_vec(2, 3, vec![0.0, 1.0, 0.0, 2.0, 0.0, 3.0]);
        let (mask, values) = split(&m);
        assert_eq!(mask, vec![false, true, false, true, false, true]);
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
        let restored = unsplit(&mask, &values, 2, 3).unwrap();
        assert_eq!(restored, m);
    }

    #[test]
    fn unsplit_rejects_value_count_mismatch() {
        let mask = vec![true, true, false];
        assert!(unsplit(&mask, &[1.0], 1, 3).is_err());
    }

    #[test]
    fn contact_values_picks_narrowest_width_and_round_trips() {
        let small = ContactValues::from_f64(&[0.0, 1.0, 255.0]).unwrap();
        assert_eq!(small.itemsize(), 1);
        let mid = ContactValues::from_f64(&[0.0, 256.0]).unwrap();
        assert_eq!(mid.itemsize(), 2);
        let wide = ContactValues::from_f64(&[(u64::from(u32::MAX) + 1) as f64]).unwrap();
        assert_eq!(wide.itemsize(), 8);

        for values in [small, mid] {
            let bytes = values.to_bytes();
            let restored = ContactValues::from_bytes(&bytes, values.itemsize()).unwrap();
            assert_eq!(restored, values);
        }
    }

    #[test]
    fn rejects_negative_or_fractional_values() {
        assert!(ContactValues::from_f64(&[-1.0]).is_err());
        assert!(ContactValues::from_f64(&[1.5]).is_err());
    }
}
