//! Runtime configuration for encode/decode, threaded explicitly through the
//! pipeline rather than carried as process-wide constants.

use std::path::PathBuf;

use crate::statistics::{average, deviation, sparsity};

/// Which per-domain statistic selects simple vs. complex domain pairs, and
/// which reduction `build_model`/`reconstruct_model` use for both the
/// domain-value scalar and the per-distance table entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainStatistic {
    Average,
    Sparsity,
    Deviation,
}

impl DomainStatistic {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "average" => Some(Self::Average),
            "sparsity" => Some(Self::Sparsity),
            "deviation" => Some(Self::Deviation),
            _ => None,
        }
    }

    pub fn as_fn(self) -> fn(&[f64]) -> f64 {
        match self {
            Self::Average => average,
            Self::Sparsity => sparsity,
            Self::Deviation => deviation,
        }
    }
}

/// Balancing method name, accepted for interface fidelity with the original
/// CLI surface; this crate applies the single outer-product rescaling of
/// [`crate::balance`] regardless of the name given (no ICE/KR variants are
/// implemented, since balancer selection is an external-collaborator concern
/// the pipeline receives weights from, not computes itself).
#[derive(Debug, Clone)]
pub struct Balancing(pub String);

#[derive(Debug, Clone)]
pub struct EncodeConfig {
    pub insulation_file: Option<PathBuf>,
    pub insulation_window: u32,
    /// Accepted but ignored, matching the original argparse surface:
    /// `insulation_window_mult` has no defined effect.
    pub insulation_window_mult: Option<u32>,
    pub weights_precision: u32,
    pub domain_mask_statistic: DomainStatistic,
    pub domain_mask_threshold: f64,
    pub domain_values_precision: u32,
    pub distance_table_precision: u32,
    pub balancing: Balancing,
    pub check_result: bool,
    pub overwrite: bool,
    pub dry_run: bool,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            insulation_file: None,
            insulation_window: 100_000,
            insulation_window_mult: None,
            weights_precision: 23,
            domain_mask_statistic: DomainStatistic::Deviation,
            domain_mask_threshold: 0.0,
            domain_values_precision: 23,
            distance_table_precision: 23,
            balancing: Balancing("ice".to_string()),
            check_result: false,
            overwrite: false,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecodeConfig {
    pub overwrite: bool,
    pub dry_run: bool,
}
