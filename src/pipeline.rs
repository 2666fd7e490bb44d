//! End-to-end per-chromosome encode/decode, composing every transform module
//! in the order fixed by `encode.py`/`decode.py`: mask, distance matrix,
//! weight codec round-trip, balance, domain model (with its own codec
//! round-trip), unbalance, argsort against the unbalanced model, split, and
//! finally the 2D binary and byte codecs. The argsort step runs on the raw
//! (masked, unbalanced) contact matrix against the unbalanced reconstructed
//! model — not the balanced matrix — exactly as the reference wires it.

use std::fs;
use std::path::Path;

use crate::argsort;
use crate::balance;
use crate::bin_array;
use crate::codecs;
use crate::config::EncodeConfig;
use crate::distance;
use crate::domain;
use crate::error::{HicmcError, Result};
use crate::masking::{self, Axis};
use crate::matrix::Matrix;
use crate::relayout;
use crate::split::{self, ContactValues};
use crate::statistics;

const FILE_NAMES: [&str; 8] = [
    "mask.bin",
    "weights.fpzip",
    "boundaries.bin",
    "domain-mask.jbig",
    "domain-values.fpizp",
    "distance-table.fpizp",
    "contact-mask.jbig",
    "contact-data.ppmd",
];

/// A chromosome directory is complete iff all eight expected files exist.
/// Encode skips rebuilding it unless `overwrite` is set.
pub fn chromosome_done(dir: &Path) -> bool {
    FILE_NAMES.iter().all(|name| dir.join(name).is_file())
}

fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> Result<()> {
    fs::write(dir.join(name), bytes)?;
    Ok(())
}

fn read_file(dir: &Path, name: &str) -> Result<Vec<u8>> {
    fs::read(dir.join(name)).map_err(|e| {
        HicmcError::Io(std::io::Error::new(e.kind(), format!("{}: {e}", dir.join(name).display())))
    })
}

/// Convert a per-bin boundary flag vector into interior split points
/// (positions strictly between 0 and `n`), the shape `domain_range` expects.
fn boundary_indices(boundary_bits: &[bool], n: usize) -> Vec<usize> {
    boundary_bits
        .iter()
        .enumerate()
        .filter(|&(i, &is_boundary)| is_boundary && i > 0 && i < n)
        .map(|(i, _)| i)
        .collect()
}

/// Run the full encode pipeline for one chromosome and write its eight
/// output files under `dir`. A no-op if `dir` already holds a complete
/// chromosome and `config.overwrite` is false.
pub fn encode_chromosome(
    dir: &Path,
    contact_mat: &Matrix<f64>,
    weights: &[f64],
    boundary_bits: &[bool],
    config: &EncodeConfig,
) -> Result<()> {
    if chromosome_done(dir) && !config.overwrite {
        return Ok(());
    }
    if config.dry_run {
        return Ok(());
    }
    fs::create_dir_all(dir)?;

    let (row_masked, mask) = masking::mask_axis(contact_mat, Axis::Row);
    let (masked_mat, _) = masking::mask_axis(&row_masked, Axis::Col);

    let masked_weights: Vec<f64> =
        weights.iter().zip(mask.iter()).filter(|&(_, &is_masked)| !is_masked).map(|(&w, _)| w).collect();
    let masked_boundary_bits: Vec<bool> =
        boundary_bits.iter().zip(mask.iter()).filter(|&(_, &is_masked)| !is_masked).map(|(&b, _)| b).collect();

    let n = masked_mat.rows;
    let dist_mat = distance::gen_dist_mat(n);

    let weights_payload = codecs::float_codec::compress(&masked_weights, config.weights_precision)?;
    let weights_reloaded = codecs::float_codec::decompress(&weights_payload)?;

    let balanced = balance::balance(&masked_mat, &weights_reloaded)?;
    let boundaries = boundary_indices(&masked_boundary_bits, n);
    let ndomains = boundaries.len() + 1;

    let stat_f = config.domain_mask_statistic.as_fn();
    let domain_stat = statistics::map_domains(&balanced, &boundaries, stat_f)?;
    let mut domain_mask = Matrix::<bool>::new(ndomains, ndomains);
    for p in 0..ndomains {
        for q in 0..ndomains {
            domain_mask.set(p, q, *domain_stat.get(p, q) > config.domain_mask_threshold);
        }
    }

    let built = domain::build_model(&balanced, &dist_mat, &boundaries, stat_f, &domain_mask)?;

    let domain_values_payload = codecs::float_codec::compress(&built.domain_values_flat, config.domain_values_precision)?;
    let domain_values_reloaded = codecs::float_codec::decompress(&domain_values_payload)?;
    let distance_table_payload =
        codecs::float_codec::compress(&built.distance_table_flat, config.distance_table_precision)?;
    let distance_table_reloaded = codecs::float_codec::decompress(&distance_table_payload)?;

    let reconstructed =
        domain::reconstruct_model(&dist_mat, &boundaries, &domain_mask, &domain_values_reloaded, &distance_table_reloaded)?;
    let unbalanced_model = balance::unbalance(&reconstructed, &weights_reloaded)?;

    let y = argsort::forward(&masked_mat, &unbalanced_model)?;
    let (contact_mask, contact_values_f64) = split::split(&y);
    let contact_values = ContactValues::from_f64(&contact_values_f64)?;

    let mask_payload = bin_array::encode_binary_array(&mask, true)?;
    let boundaries_payload = bin_array::encode_binary_array(&masked_boundary_bits, true)?;

    let domain_mask_relaid = relayout::transform_diagonal(&domain_mask);
    let domain_mask_payload = codecs::binary_matrix_codec::encode(&domain_mask_relaid)?;

    let contact_mask_matrix = Matrix::from_vec(y.rows, y.cols, contact_mask);
    let contact_mask_payload = codecs::binary_matrix_codec::encode(&contact_mask_matrix)?;

    let model_order = 2 * contact_values.itemsize();
    let contact_data_payload = codecs::byte_codec::encode(&contact_values.to_bytes(), model_order)?;

    write_file(dir, "mask.bin", &mask_payload)?;
    write_file(dir, "weights.fpzip", &weights_payload)?;
    write_file(dir, "boundaries.bin", &boundaries_payload)?;
    write_file(dir, "domain-mask.jbig", &domain_mask_payload)?;
    write_file(dir, "domain-values.fpizp", &domain_values_payload)?;
    write_file(dir, "distance-table.fpizp", &distance_table_payload)?;
    write_file(dir, "contact-mask.jbig", &contact_mask_payload)?;
    write_file(dir, "contact-data.ppmd", &contact_data_payload)?;

    if config.check_result {
        let decoded = decode_chromosome(dir)?;
        if decoded != *contact_mat {
            return Err(HicmcError::Integrity(format!(
                "decoded chromosome at {} does not match the original contact matrix",
                dir.display()
            )));
        }
    }

    Ok(())
}

/// Inverse of [`encode_chromosome`]: read the eight files under `dir` and
/// reconstruct the original (unmasked) contact matrix exactly.
pub fn decode_chromosome(dir: &Path) -> Result<Matrix<f64>> {
    let mask = bin_array::decode_binary_array(&read_file(dir, "mask.bin")?)?;
    let weights = codecs::float_codec::decompress(&read_file(dir, "weights.fpzip")?)?;
    let masked_boundary_bits = bin_array::decode_binary_array(&read_file(dir, "boundaries.bin")?)?;

    let n = weights.len();
    let boundaries = boundary_indices(&masked_boundary_bits, n);
    let dist_mat = distance::gen_dist_mat(n);

    let domain_mask_relaid = codecs::binary_matrix_codec::decode(&read_file(dir, "domain-mask.jbig")?)?;
    let domain_mask = relayout::inverse_transform_diagonal(&domain_mask_relaid);

    let domain_values_flat = codecs::float_codec::decompress(&read_file(dir, "domain-values.fpizp")?)?;
    let distance_table_flat = codecs::float_codec::decompress(&read_file(dir, "distance-table.fpizp")?)?;

    let reconstructed =
        domain::reconstruct_model(&dist_mat, &boundaries, &domain_mask, &domain_values_flat, &distance_table_flat)?;
    let unbalanced_model = balance::unbalance(&reconstructed, &weights)?;

    let contact_mask_matrix = codecs::binary_matrix_codec::decode(&read_file(dir, "contact-mask.jbig")?)?;
    let contact_data_raw = codecs::byte_codec::decode(&read_file(dir, "contact-data.ppmd")?)?;

    let set_bits = contact_mask_matrix.as_slice().iter().filter(|&&b| b).count();
    let contact_values = if set_bits == 0 {
        ContactValues::U8(Vec::new())
    } else {
        if contact_data_raw.len() % set_bits != 0 {
            return Err(HicmcError::Integrity(format!(
                "contact-data payload of {} bytes is not a multiple of {set_bits} set mask bits",
                contact_data_raw.len()
            )));
        }
        let itemsize = contact_data_raw.len() / set_bits;
        ContactValues::from_bytes(&contact_data_raw, itemsize)?
    };

    let y = split::unsplit(
        contact_mask_matrix.as_slice(),
        &contact_values.to_f64(),
        contact_mask_matrix.rows,
        contact_mask_matrix.cols,
    )?;
    let masked_mat = argsort::inverse(&y, &unbalanced_model)?;

    let col_restored = masking::unmask_axis(&masked_mat, Axis::Col, &mask);
    let full = masking::unmask_axis(&col_restored, Axis::Row, &mask);
    Ok(full)
}
