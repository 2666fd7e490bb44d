//! General-purpose lossless byte codec, standing in for the
//! reference's PPMd subprocess adapter. `model_order` (conventionally
//! `2 * itemsize` for contact values) doesn't map onto zstd's
//! parameter space the way it does a PPMd context order; it's threaded
//! through as a compression-level hint, clamped to zstd's valid range, to
//! preserve the interface's shape rather than to emulate PPMd faithfully.

use crate::error::Result;

pub fn encode(bytes: &[u8], model_order: usize) -> Result<Vec<u8>> {
    let level = (model_order as i32).clamp(1, 22);
    Ok(zstd::stream::encode_all(bytes, level)?)
}

pub fn decode(bytes: &[u8]) -> Result<Vec<u8>> {
    Ok(zstd::stream::decode_all(bytes)?)
}
