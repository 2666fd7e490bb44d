//! Lossless 2D binary codec, standing in for the reference's
//! JBIG subprocess adapter: `encode(bool_matrix)` / `decode(bytes)`, shape
//! recoverable from the payload. Runs the row-major bit pattern through
//! [`crate::bin_array`]'s run-length transform, then DEFLATE for the
//! remaining byte-level redundancy.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::bin_array;
use crate::error::{HicmcError, Result};
use crate::matrix::Matrix;

pub fn encode(m: &Matrix<bool>) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    raw.extend_from_slice(&(m.rows as u64).to_le_bytes());
    raw.extend_from_slice(&(m.cols as u64).to_le_bytes());
    raw.extend_from_slice(&bin_array::encode_binary_array(m.as_slice(), true)?);

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw)?;
    Ok(encoder.finish()?)
}

pub fn decode(bytes: &[u8]) -> Result<Matrix<bool>> {
    let mut raw = Vec::new();
    ZlibDecoder::new(bytes).read_to_end(&mut raw)?;

    if raw.len() < 16 {
        return Err(HicmcError::Integrity("binary matrix payload truncated".to_string()));
    }
    let rows = u64::from_le_bytes(raw[0..8].try_into().unwrap()) as usize;
    let cols = u64::from_le_bytes(raw[8..16].try_into().unwrap()) as usize;
    let flat = bin_array::decode_binary_array(&raw[16..])?;
    if flat.len() != rows * cols {
        return Err(HicmcError::Integrity(format!(
            "binary matrix expected {} entries, got {}",
            rows * cols,
            flat.len()
        )));
    }
    Ok(Matrix::from_vec(rows, cols, flat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_various_shapes() {
        for (rows, cols) in [(1, 1), (3, 5), (8, 2), (17, 13)] {
            let mut m = Matrix::<bool>::new(rows, cols);
            for r in 0..rows {
                for c in 0..cols {
                    m.set(r, c, (r * cols + c) % 3 == 0);
                }
            }
            let payload = encode(&m).unwrap();
            assert_eq!(decode(&payload).unwrap(), m);
        }
    }
}
