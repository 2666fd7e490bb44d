//! Lossy float codec: `compress(values, precision_bits)` /
//! `decompress(bytes)`. Precision is simulated by zeroing the low mantissa
//! bits before a DEFLATE pass; callers must re-`decompress` after
//! compressing and use the reloaded values downstream, since the stored
//! values are not bit-identical to the input.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{HicmcError, Result};

const MANTISSA_BITS: u32 = 52;

fn truncate_mantissa(value: f64, precision_bits: u32) -> f64 {
    let precision_bits = precision_bits.min(MANTISSA_BITS);
    if precision_bits == MANTISSA_BITS {
        return value;
    }
    let mask = !0u64 << (MANTISSA_BITS - precision_bits);
    f64::from_bits(value.to_bits() & mask)
}

/// Truncate each value to `precision_bits` mantissa bits and DEFLATE the
/// resulting byte stream, prefixed with the element count.
pub fn compress(values: &[f64], precision_bits: u32) -> Result<Vec<u8>> {
    let mut raw = Vec::with_capacity(8 + values.len() * 8);
    raw.extend_from_slice(&(values.len() as u64).to_le_bytes());
    for &v in values {
        raw.extend_from_slice(&truncate_mantissa(v, precision_bits).to_le_bytes());
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw)?;
    Ok(encoder.finish()?)
}

/// Inverse of [`compress`]. The returned values already reflect the
/// mantissa truncation — there is nothing further to round-trip.
pub fn decompress(bytes: &[u8]) -> Result<Vec<f64>> {
    let mut raw = Vec::new();
    ZlibDecoder::new(bytes).read_to_end(&mut raw)?;

    if raw.len() < 8 {
        return Err(HicmcError::Integrity("float codec payload truncated".to_string()));
    }
    let count = u64::from_le_bytes(raw[0..8].try_into().unwrap()) as usize;
    let body = &raw[8..];
    if body.len() != count * 8 {
        return Err(HicmcError::Integrity(format!(
            "float codec expected {} bytes of values, got {}",
            count * 8,
            body.len()
        )));
    }

    Ok(body.chunks_exact(8).map(|c| f64::from_le_bytes(c.try_into().unwrap())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decompress_is_idempotent_after_compress() {
        let values = vec![1.0_f64 / 3.0, -2.5, 0.0, 12345.6789];
        let payload = compress(&values, 24).unwrap();
        let decoded = decompress(&payload).unwrap();
        let reencoded = compress(&decoded, 24).unwrap();
        let redecoded = decompress(&reencoded).unwrap();
        assert_eq!(decoded, redecoded);
    }

    #[test]
    fn full_precision_round_trips_exactly() {
        let values = vec![1.0_f64 / 3.0, -2.5, 0.0, 12345.6789];
        let payload = compress(&values, 52).unwrap();
        let decoded = decompress(&payload).unwrap();
        assert_eq!(decoded, values);
    }
}
