//! Byte framing for boolean vectors on top of [`crate::bitstream`], optionally
//! going through [`crate::rle`] run-length transform.

use crate::bitstream::{BitReader, BitWriter};
use crate::error::{HicmcError, Result};
use crate::rle;

const PADDING_BITS: u32 = 4;
const COUNTS_SIZE_BITS: u32 = 8;

fn bits_needed(max_value: u64) -> u32 {
    if max_value == 0 {
        0
    } else {
        64 - max_value.leading_zeros()
    }
}

fn align_to_byte(reader: &mut BitReader) -> Result<()> {
    while reader_bit_pos_mod8(reader) != 0 {
        reader.read_bool()?;
    }
    Ok(())
}

// BitReader doesn't expose its bit position directly; derive it from
// remaining_bits(), which is computed against the full byte-aligned buffer.
fn reader_bit_pos_mod8(reader: &BitReader) -> usize {
    reader.remaining_bits() % 8
}

/// Frame `array` as bytes. When `transform` is set, the body is run-length
/// encoded with an adaptively-sized integer width; otherwise it is a packed
/// bit sequence.
pub fn encode_binary_array(array: &[bool], transform: bool) -> Result<Vec<u8>> {
    let mut head = BitWriter::new();
    head.write_bool(transform);

    let mut data = BitWriter::new();
    if transform {
        if array.is_empty() {
            head.write_bool(false);
            head.write_uint(0, COUNTS_SIZE_BITS)?;
        } else {
            let (first_value, runs) = rle::encode(array);
            let counts_size = bits_needed(*runs.iter().max().unwrap_or(&0));

            head.write_bool(first_value);
            head.write_uint(counts_size as u64, COUNTS_SIZE_BITS)?;

            for run in runs {
                data.write_uint(run, counts_size)?;
            }
        }
    } else {
        for &bit in array {
            data.write_bool(bit);
        }
    }

    let padding = (8 - (data.len_bits() % 8)) % 8;
    head.write_uint(padding as u64, PADDING_BITS)?;

    let head_bytes = head.drain_to_bytes();
    let data_bytes = data.drain_to_bytes();

    let mut out = Vec::with_capacity(head_bytes.len() + data_bytes.len());
    out.extend(head_bytes);
    out.extend(data_bytes);
    Ok(out)
}

/// Inverse of [`encode_binary_array`].
pub fn decode_binary_array(payload: &[u8]) -> Result<Vec<bool>> {
    let mut reader = BitReader::new(payload);
    let transform = reader.read_bool()?;

    if transform {
        let first_value = reader.read_bool()?;
        let counts_size = reader.read_uint(COUNTS_SIZE_BITS)? as u32;
        let padding = reader.read_uint(PADDING_BITS)?;
        if padding > 7 {
            return Err(HicmcError::Integrity(format!(
                "padding field out of range: {padding}"
            )));
        }
        align_to_byte(&mut reader)?;

        let data_bits = reader.remaining_bits();
        let valid_bits = data_bits
            .checked_sub(padding as usize)
            .ok_or_else(|| HicmcError::Integrity("padding exceeds payload".to_string()))?;

        if valid_bits > 0 && counts_size == 0 {
            return Err(HicmcError::Integrity(
                "zero-width run-length counts".to_string(),
            ));
        }
        let num_runs = if counts_size == 0 { 0 } else { valid_bits / counts_size as usize };
        let mut runs = Vec::with_capacity(num_runs);
        for _ in 0..num_runs {
            runs.push(reader.read_uint(counts_size)?);
        }

        Ok(rle::decode(first_value, &runs))
    } else {
        let padding = reader.read_uint(PADDING_BITS)?;
        if padding > 7 {
            return Err(HicmcError::Integrity(format!(
                "padding field out of range: {padding}"
            )));
        }
        align_to_byte(&mut reader)?;

        let data_bits = reader.remaining_bits();
        let valid_bits = data_bits
            .checked_sub(padding as usize)
            .ok_or_else(|| HicmcError::Integrity("padding exceeds payload".to_string()))?;

        let mut out = Vec::with_capacity(valid_bits);
        for _ in 0..valid_bits {
            out.push(reader.read_bool()?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(array: &[bool], transform: bool) {
        let payload = encode_binary_array(array, transform).unwrap();
        let decoded = decode_binary_array(&payload).unwrap();
        assert_eq!(decoded, array);
    }

    #[test]
    fn round_trips_both_modes() {
        let patterns: Vec<Vec<bool>> = vec![
            vec![true],
            vec![false],
            vec![true, false, true, false, true, false, true],
            vec![true; 37],
            vec![false; 13],
            (0..100).map(|i| i % 7 == 0).collect(),
        ];
        for arr in patterns {
            round_trip(&arr, true);
            round_trip(&arr, false);
        }
    }

    #[test]
    fn round_trips_empty_array() {
        round_trip(&[], true);
        round_trip(&[], false);
    }

    #[test]
    fn rejects_out_of_range_padding() {
        // Craft a payload with padding=15 (> 7) in the non-transform header.
        let mut head = BitWriter::new();
        head.write_bool(false);
        head.write_uint(15, PADDING_BITS).unwrap();
        let head_bytes = head.drain_to_bytes();
        let err = decode_binary_array(&head_bytes).unwrap_err();
        assert!(matches!(err, HicmcError::Integrity(_)));
    }
}
