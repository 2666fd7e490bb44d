//! The per-chromosome domain/distance statistical model: builds a compact
//! representation of the balanced contact matrix from per-domain summary
//! statistics plus, for domains whose internal structure doesn't reduce to a
//! single scalar, a per-distance lookup table. Grounded in `domain.py`'s
//! `build_model`/`reconstruct_model`/`_recon_dist_ids`.
//!
//! Ordering contract: both directions walk domain pairs row-major over the
//! upper triangle (`p` outer, `q` inner, `p <= q`) and, within a domain
//! rectangle, visit distances in ascending order. Any implementation that
//! agrees on this ordering round-trips; deviating from it does not.

use crate::error::Result;
use crate::matrix::Matrix;
use crate::relayout::{inverse_transform_diagonal, transform_diagonal};
use crate::statistics::{assert_square, average, domain_range, map_domains};

/// `domain_mask[p, q] == true` means the (p, q) domain pair is "complex" and
/// modeled via the per-distance table; `false` means "simple" and modeled by
/// a single scalar from `domain_values`.
pub struct BuiltModel {
    pub domain_values_flat: Vec<f64>,
    pub distance_table_flat: Vec<f64>,
}

fn sorted_unique(values: &[u32]) -> Vec<u32> {
    let mut v = values.to_vec();
    v.sort_unstable();
    v.dedup();
    v
}

/// Build the transformed domain-value vector and distance table from a
/// balanced contact matrix, its distance matrix, domain boundaries, the
/// complex/simple domain mask, and the configured statistic (used for the
/// per-distance table entries only — domain values are always the mean).
pub fn build_model(
    balanced: &Matrix<f64>,
    dist_mat: &Matrix<u32>,
    boundaries: &[usize],
    stat_f: impl Fn(&[f64]) -> f64,
    domain_mask: &Matrix<bool>,
) -> Result<BuiltModel> {
    let n = assert_square(balanced)?;
    let d = assert_square(domain_mask)?;

    // DomainValues is always the mean of the balanced submatrix; `stat_f`
    // (the configured domain-mask statistic) only drives the distance-table
    // entries below and the mask that was already computed by the caller.
    let domain_values = map_domains(balanced, boundaries, average)?;

    let max_dist = *dist_mat.as_slice().iter().max().unwrap_or(&0) as usize;
    let triu_count = (0..d).flat_map(|p| (p..d).map(move |q| (p, q))).filter(|&(p, q)| *domain_mask.get(p, q)).count();

    let mut distance_table = Matrix::<f64>::new(max_dist + 1, triu_count);
    let mut dist_indices = vec![0usize; max_dist + 1];

    for p in 0..d {
        for q in p..d {
            if !*domain_mask.get(p, q) {
                continue;
            }
            let (row_start, row_end) = domain_range(p, boundaries, n);
            let (col_start, col_end) = domain_range(q, boundaries, n);
            let sub_c = balanced.submatrix(row_start, row_end, col_start, col_end);
            let sub_g = dist_mat.submatrix(row_start, row_end, col_start, col_end);

            for dist in sorted_unique(sub_g.as_slice()) {
                let values: Vec<f64> = sub_c
                    .as_slice()
                    .iter()
                    .zip(sub_g.as_slice().iter())
                    .filter(|&(_, &g)| g == dist)
                    .map(|(&c, _)| c)
                    .collect();
                let idx = dist_indices[dist as usize];
                distance_table.set(dist as usize, idx, stat_f(&values));
                dist_indices[dist as usize] += 1;
            }
        }
    }

    let relaid_values = transform_diagonal(&domain_values);
    let relaid_mask = transform_diagonal(domain_mask);
    let mut domain_values_flat = Vec::new();
    for i in 0..relaid_values.rows {
        for j in 0..relaid_values.cols {
            if !*relaid_mask.get(i, j) {
                domain_values_flat.push(*relaid_values.get(i, j));
            }
        }
    }

    let mut distance_table_flat = Vec::new();
    for dist in 0..=max_dist {
        for k in 0..dist_indices[dist] {
            distance_table_flat.push(*distance_table.get(dist, k));
        }
    }

    Ok(BuiltModel { domain_values_flat, distance_table_flat })
}

/// Replay the build traversal using only `distances`, `boundaries` and
/// `domain_mask` to recover the per-distance entry counts — a pure function
/// of inputs available at decode time.
fn recon_dist_ids(distances: &Matrix<u32>, boundaries: &[usize], domain_mask: &Matrix<bool>) -> Result<Vec<usize>> {
    let n = assert_square(distances)?;
    let d = assert_square(domain_mask)?;
    let max_dist = *distances.as_slice().iter().max().unwrap_or(&0) as usize;
    let mut dist_index = vec![0usize; max_dist + 1];

    for p in 0..d {
        for q in p..d {
            if !*domain_mask.get(p, q) {
                continue;
            }
            let (row_start, row_end) = domain_range(p, boundaries, n);
            let (col_start, col_end) = domain_range(q, boundaries, n);
            let sub = distances.submatrix(row_start, row_end, col_start, col_end);
            for dist in sorted_unique(sub.as_slice()) {
                dist_index[dist as usize] += 1;
            }
        }
    }
    Ok(dist_index)
}

/// Reconstruct the full symmetric contact-value matrix from the transformed
/// domain-value vector, distance table, and the inputs shared with encode.
pub fn reconstruct_model(
    distances: &Matrix<u32>,
    boundaries: &[usize],
    domain_mask: &Matrix<bool>,
    domain_values_flat: &[f64],
    distance_table_flat: &[f64],
) -> Result<Matrix<f64>> {
    let n = assert_square(distances)?;
    let d = assert_square(domain_mask)?;

    let dist_index = recon_dist_ids(distances, boundaries, domain_mask)?;
    let max_dist = dist_index.len() - 1;
    let width = dist_index.iter().copied().max().unwrap_or(0);

    let mut distance_table = Matrix::<f64>::new(max_dist + 1, width);
    let mut cursor = 0usize;
    for (dist, &entries) in dist_index.iter().enumerate() {
        for k in 0..entries {
            distance_table.set(dist, k, distance_table_flat[cursor]);
            cursor += 1;
        }
    }

    let relaid_mask = transform_diagonal(domain_mask);
    let mut relaid_values = Matrix::<f64>::new(relaid_mask.rows, relaid_mask.cols);
    let mut cursor = 0usize;
    for i in 0..relaid_mask.rows {
        for j in 0..relaid_mask.cols {
            if !*relaid_mask.get(i, j) {
                relaid_values.set(i, j, domain_values_flat[cursor]);
                cursor += 1;
            }
        }
    }
    let domain_values = inverse_transform_diagonal(&relaid_values);

    let mut model = Matrix::<f64>::new(n, n);
    let mut fill_index = vec![0usize; max_dist + 1];

    for p in 0..d {
        for q in p..d {
            let (row_start, row_end) = domain_range(p, boundaries, n);
            let (col_start, col_end) = domain_range(q, boundaries, n);

            if !*domain_mask.get(p, q) {
                let value = *domain_values.get(p, q);
                for i in row_start..row_end {
                    for j in col_start..col_end {
                        model.set(i, j, value);
                    }
                }
                continue;
            }

            let sub_g = distances.submatrix(row_start, row_end, col_start, col_end);
            for dist in sorted_unique(sub_g.as_slice()) {
                let value = *distance_table.get(dist as usize, fill_index[dist as usize]);
                for (local, &g) in sub_g.as_slice().iter().enumerate() {
                    if g == dist {
                        let i = local / sub_g.cols;
                        let j = local % sub_g.cols;
                        model.set(row_start + i, col_start + j, value);
                    }
                }
                fill_index[dist as usize] += 1;
            }
        }
    }

    let mut out = Matrix::<f64>::new(n, n);
    for i in 0..n {
        for j in 0..n {
            if j >= i {
                out.set(i, j, *model.get(i, j));
            } else {
                out.set(i, j, *model.get(j, i));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::gen_dist_mat;
    use crate::statistics::average;

    /// A matrix whose value depends only on `|i - j|`, so that aggregating by
    /// distance (as the complex-domain path does) never loses information.
    fn sample_matrix(n: usize) -> Matrix<f64> {
        let mut m = Matrix::<f64>::new(n, n);
        for i in 0..n {
            for j in 0..n {
                let dist = (i as i64 - j as i64).unsigned_abs() as f64;
                m.set(i, j, 1.0 + dist * 0.37);
            }
        }
        m
    }

    #[test]
    fn round_trips_with_all_simple_domains() {
        let n = 6;
        let balanced = sample_matrix(n);
        let g = gen_dist_mat(n);
        let boundaries = [2usize, 4usize];
        let d = boundaries.len() + 1;
        let mask = Matrix::<bool>::new(d, d);

        let built = build_model(&balanced, &g, &boundaries, average, &mask).unwrap();
        assert!(built.distance_table_flat.is_empty());

        let reconstructed =
            reconstruct_model(&g, &boundaries, &mask, &built.domain_values_flat, &built.distance_table_flat).unwrap();

        // Every cell in a simple domain collapses to that domain's average.
        for p in 0..d {
            for q in 0..d {
                let (rs, re) = domain_range(p, &boundaries, n);
                let (cs, ce) = domain_range(q, &boundaries, n);
                let expected = *crate::statistics::map_domains(&balanced, &boundaries, average).unwrap().get(p, q);
                for i in rs..re {
                    for j in cs..ce {
                        assert!((reconstructed.get(i, j) - expected).abs() < 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn round_trips_with_all_complex_domains() {
        let n = 6;
        let balanced = sample_matrix(n);
        let g = gen_dist_mat(n);
        let boundaries = [3usize];
        let d = boundaries.len() + 1;
        let mut mask = Matrix::<bool>::new(d, d);
        for p in 0..d {
            for q in 0..d {
                mask.set(p, q, true);
            }
        }

        let built = build_model(&balanced, &g, &boundaries, average, &mask).unwrap();
        let reconstructed =
            reconstruct_model(&g, &boundaries, &mask, &built.domain_values_flat, &built.distance_table_flat).unwrap();

        for i in 0..n {
            for j in 0..n {
                assert!((reconstructed.get(i, j) - balanced.get(i, j)).abs() < 1e-9);
            }
        }
    }
}
