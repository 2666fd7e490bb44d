//! Concrete stand-ins for the contact-matrix and insulation-boundary data
//! sources: a production `.cool`/`.mcool` contact-matrix reader and a
//! production insulation-score table reader are genuinely out of scope
//! (HDF5-backed container formats), but the pipeline still needs something
//! to drive it end to end. These adapters read a tab-separated sparse
//! triplet file and an insulation boundary table, with the same
//! byte-oriented fast-path parsing style as the original `parse_u32_fast`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{HicmcError, Result};
use crate::matrix::Matrix;

/// Yields, per chromosome name, a dense contact matrix and its balancing
/// weight vector.
pub trait ContactMatrixSource {
    fn chr_names(&self) -> &[String];
    fn resolution(&self) -> u32;
    fn load(&self, chr_name: &str) -> Result<(Matrix<f64>, Vec<f64>)>;
}

/// Yields, per chromosome, a boolean per-bin boundary vector at a requested
/// insulation window size.
pub trait InsulationSource {
    fn boundaries(&self, chr_name: &str, window: u32) -> Result<Vec<bool>>;
}

#[inline]
fn parse_u32_fast(s: &[u8]) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut result = 0u32;
    for &byte in s {
        if byte.is_ascii_digit() {
            result = result.checked_mul(10)?.checked_add((byte - b'0') as u32)?;
        } else {
            return None;
        }
    }
    Some(result)
}

/// In-memory contact-matrix source, for library embedding and tests.
pub struct DenseContactSource {
    resolution: u32,
    chr_names: Vec<String>,
    matrices: HashMap<String, (Matrix<f64>, Vec<f64>)>,
}

impl DenseContactSource {
    pub fn new(resolution: u32) -> Self {
        Self { resolution, chr_names: Vec::new(), matrices: HashMap::new() }
    }

    pub fn insert(&mut self, chr_name: impl Into<String>, matrix: Matrix<f64>, weights: Vec<f64>) {
        let chr_name = chr_name.into();
        self.chr_names.push(chr_name.clone());
        self.matrices.insert(chr_name, (matrix, weights));
    }
}

impl ContactMatrixSource for DenseContactSource {
    fn chr_names(&self) -> &[String] {
        &self.chr_names
    }

    fn resolution(&self) -> u32 {
        self.resolution
    }

    fn load(&self, chr_name: &str) -> Result<(Matrix<f64>, Vec<f64>)> {
        self.matrices
            .get(chr_name)
            .cloned()
            .ok_or_else(|| HicmcError::InputFormat(format!("unknown chromosome: {chr_name}")))
    }
}

/// Parses a tab-separated sparse triplet file: `chrom\tbin_i\tbin_j\tcount`
/// per line (counts mirrored across the diagonal automatically). Bin
/// indices are zero-based; the matrix size for a chromosome is one past its
/// largest observed bin index. Weights default to all-ones (no external
/// balancer output in this minimal format).
pub struct SparsePairSource {
    resolution: u32,
    chr_names: Vec<String>,
    triples: HashMap<String, Vec<(u32, u32, f64)>>,
    sizes: HashMap<String, usize>,
}

impl SparsePairSource {
    pub fn from_path(path: impl AsRef<Path>, resolution: u32) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut chr_names = Vec::new();
        let mut triples: HashMap<String, Vec<(u32, u32, f64)>> = HashMap::new();
        let mut sizes: HashMap<String, usize> = HashMap::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 4 {
                return Err(HicmcError::InputFormat(format!(
                    "expected 4 tab-separated fields, got {}: {line}",
                    fields.len()
                )));
            }
            let chrom = fields[0].to_string();
            let bin_i = parse_u32_fast(fields[1].as_bytes())
                .ok_or_else(|| HicmcError::InputFormat(format!("invalid bin index: {}", fields[1])))?;
            let bin_j = parse_u32_fast(fields[2].as_bytes())
                .ok_or_else(|| HicmcError::InputFormat(format!("invalid bin index: {}", fields[2])))?;
            let count: f64 = fields[3]
                .parse()
                .map_err(|_| HicmcError::InputFormat(format!("invalid count: {}", fields[3])))?;

            let size = sizes.entry(chrom.clone()).or_insert(0);
            *size = (*size).max(bin_i as usize + 1).max(bin_j as usize + 1);

            if !triples.contains_key(&chrom) {
                chr_names.push(chrom.clone());
            }
            triples.entry(chrom).or_default().push((bin_i, bin_j, count));
        }

        Ok(Self { resolution, chr_names, triples, sizes })
    }
}

impl ContactMatrixSource for SparsePairSource {
    fn chr_names(&self) -> &[String] {
        &self.chr_names
    }

    fn resolution(&self) -> u32 {
        self.resolution
    }

    fn load(&self, chr_name: &str) -> Result<(Matrix<f64>, Vec<f64>)> {
        let n = *self
            .sizes
            .get(chr_name)
            .ok_or_else(|| HicmcError::InputFormat(format!("unknown chromosome: {chr_name}")))?;
        let mut matrix = Matrix::<f64>::new(n, n);
        for &(i, j, count) in &self.triples[chr_name] {
            matrix.set(i as usize, j as usize, count);
            matrix.set(j as usize, i as usize, count);
        }
        Ok((matrix, vec![1.0; n]))
    }
}

/// Parses an insulation table in the original `load_insulation_table`
/// column convention: `chrom`, `start`, `end`, then `is_boundary_<window>`
/// columns, one row per bin, grouped by chromosome in file order.
pub struct TsvInsulationSource {
    rows: HashMap<String, Vec<HashMap<u32, bool>>>,
}

impl TsvInsulationSource {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header = lines
            .next()
            .ok_or_else(|| HicmcError::InputFormat("insulation table is empty".to_string()))??;
        let columns: Vec<&str> = header.split('\t').collect();

        let chrom_idx = column_index(&columns, "chrom")?;
        let mut window_columns = Vec::new();
        for (idx, name) in columns.iter().enumerate() {
            if let Some(window) = name.strip_prefix("is_boundary_") {
                let window: u32 = window
                    .parse()
                    .map_err(|_| HicmcError::InputFormat(format!("invalid boundary window column: {name}")))?;
                window_columns.push((idx, window));
            }
        }
        if window_columns.is_empty() {
            return Err(HicmcError::InputFormat("no is_boundary_<window> columns found".to_string()));
        }

        let mut rows: HashMap<String, Vec<HashMap<u32, bool>>> = HashMap::new();
        for line in lines {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            let chrom = fields[chrom_idx].to_string();
            let mut per_window = HashMap::new();
            for &(idx, window) in &window_columns {
                let value = matches!(fields[idx], "1" | "true" | "True");
                per_window.insert(window, value);
            }
            rows.entry(chrom).or_default().push(per_window);
        }

        Ok(Self { rows })
    }
}

fn column_index(columns: &[&str], name: &str) -> Result<usize> {
    columns
        .iter()
        .position(|&c| c == name)
        .ok_or_else(|| HicmcError::InputFormat(format!("missing required column: {name}")))
}

impl InsulationSource for TsvInsulationSource {
    fn boundaries(&self, chr_name: &str, window: u32) -> Result<Vec<bool>> {
        let rows = self
            .rows
            .get(chr_name)
            .ok_or_else(|| HicmcError::InputFormat(format!("unknown chromosome: {chr_name}")))?;
        rows.iter()
            .map(|row| {
                row.get(&window)
                    .copied()
                    .ok_or_else(|| HicmcError::InputFormat(format!("unrecognized insulation window: {window}")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn tempfile_with_content(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn dense_source_round_trips_inserted_matrices() {
        let mut source = DenseContactSource::new(1000);
        source.insert("chr1", Matrix::from_vec(2, 2, vec![0.0, 1.0, 1.0, 0.0]), vec![1.0, 1.0]);
        assert_eq!(source.chr_names(), &["chr1".to_string()]);
        let (m, w) = source.load("chr1").unwrap();
        assert_eq!(m.as_slice(), &[0.0, 1.0, 1.0, 0.0]);
        assert_eq!(w, vec![1.0, 1.0]);
        assert!(source.load("chr2").is_err());
    }

    #[test]
    fn sparse_pair_source_builds_symmetric_dense_matrix() {
        let mut file = tempfile_with_content("chr1\t0\t1\t5\nchr1\t1\t2\t3\nchr2\t0\t0\t9\n");
        let source = SparsePairSource::from_path(file.path(), 5000).unwrap();
        assert_eq!(source.chr_names(), &["chr1".to_string(), "chr2".to_string()]);

        let (m1, w1) = source.load("chr1").unwrap();
        assert_eq!(m1.rows, 3);
        assert_eq!(*m1.get(0, 1), 5.0);
        assert_eq!(*m1.get(1, 0), 5.0);
        assert_eq!(*m1.get(1, 2), 3.0);
        assert_eq!(w1, vec![1.0, 1.0, 1.0]);

        let (m2, _) = source.load("chr2").unwrap();
        assert_eq!(m2.rows, 1);
        assert_eq!(*m2.get(0, 0), 9.0);
        file.flush().unwrap();
    }

    #[test]
    fn tsv_insulation_source_reads_boundary_columns() {
        let file = tempfile_with_content(
            "chrom\tstart\tend\tis_boundary_5\tis_boundary_10\nchr1\t0\t1000\t1\t0\nchr1\t1000\t2000\t0\t1\n",
        );
        let source = TsvInsulationSource::from_path(file.path()).unwrap();
        assert_eq!(source.boundaries("chr1", 5).unwrap(), vec![true, false]);
        assert_eq!(source.boundaries("chr1", 10).unwrap(), vec![false, true]);
        assert!(source.boundaries("chr1", 99).is_err());
    }
}
