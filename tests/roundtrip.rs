//! Crate-level round-trip tests driving the public `hicmc_rs` API the way a
//! caller embedding this crate (rather than the `hicmc` CLI) would use it.

use std::fs;

use tempfile::tempdir;

use hicmc_rs::config::EncodeConfig;
use hicmc_rs::matrix::Matrix;
use hicmc_rs::pipeline::{chromosome_done, decode_chromosome, encode_chromosome};

#[test]
fn encode_then_decode_recovers_the_original_matrix() {
    let contact_mat = Matrix::from_vec(
        4,
        4,
        vec![0.0, 2.0, 0.0, 1.0, 2.0, 0.0, 3.0, 0.0, 0.0, 3.0, 0.0, 4.0, 1.0, 0.0, 4.0, 0.0],
    );
    let weights = vec![1.0, 1.0, 1.0, 1.0];
    let boundary_bits = vec![false, true, false, false];
    let config = EncodeConfig::default();

    let scratch = tempdir().unwrap();
    let dir = scratch.path();
    encode_chromosome(dir, &contact_mat, &weights, &boundary_bits, &config).unwrap();
    assert!(chromosome_done(dir));

    let decoded = decode_chromosome(dir).unwrap();
    assert_eq!(decoded, contact_mat);
}

#[test]
fn check_result_flag_self_verifies_during_encode() {
    let mut contact_mat = Matrix::<f64>::new(6, 6);
    for i in 0..6 {
        for j in 0..6 {
            if i != j {
                contact_mat.set(i, j, ((i as i64 - j as i64).unsigned_abs()) as f64);
            }
        }
    }
    let weights = vec![1.0; 6];
    let boundary_bits = vec![false, false, true, false, false, false];
    let config = EncodeConfig { check_result: true, ..EncodeConfig::default() };

    let scratch = tempdir().unwrap();
    let dir = scratch.path();
    encode_chromosome(dir, &contact_mat, &weights, &boundary_bits, &config).unwrap();
    assert!(chromosome_done(dir));
}

#[test]
fn an_all_zero_matrix_round_trips_through_full_row_masking() {
    let contact_mat = Matrix::<f64>::new(5, 5);
    let weights = vec![1.0; 5];
    let boundary_bits = vec![false; 5];
    let config = EncodeConfig::default();

    let scratch = tempdir().unwrap();
    let dir = scratch.path();
    encode_chromosome(dir, &contact_mat, &weights, &boundary_bits, &config).unwrap();
    let decoded = decode_chromosome(dir).unwrap();
    assert_eq!(decoded, contact_mat);
}

#[test]
fn re_encoding_a_complete_directory_is_a_no_op_without_overwrite() {
    let contact_mat = Matrix::from_vec(2, 2, vec![0.0, 1.0, 1.0, 0.0]);
    let weights = vec![1.0, 1.0];
    let boundary_bits = vec![false, false];
    let config = EncodeConfig::default();

    let scratch = tempdir().unwrap();
    let dir = scratch.path();
    encode_chromosome(dir, &contact_mat, &weights, &boundary_bits, &config).unwrap();
    let first_write = fs::metadata(dir.join("contact-data.ppmd")).unwrap().modified().unwrap();

    std::thread::sleep(std::time::Duration::from_millis(10));
    encode_chromosome(dir, &contact_mat, &weights, &boundary_bits, &config).unwrap();
    let second_write = fs::metadata(dir.join("contact-data.ppmd")).unwrap().modified().unwrap();
    assert_eq!(first_write, second_write);
}
