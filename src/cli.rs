use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use hicmc_rs::config::{Balancing, DecodeConfig, DomainStatistic, EncodeConfig};
use hicmc_rs::pipeline;
use hicmc_rs::source::{ContactMatrixSource, InsulationSource, SparsePairSource, TsvInsulationSource};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "hicmc")]
#[command(about = "Lossless compressor for Hi-C chromosomal contact matrices")]
pub struct Cli {
    /// Verbosity of console narration (error, warn, info, debug).
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Print what would be done without writing any output.
    #[arg(long, global = true, default_value_t = false)]
    pub dry_run: bool,

    /// Overwrite already-complete chromosome directories.
    #[arg(long, global = true, default_value_t = false)]
    pub overwrite: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress a contact matrix into a per-chromosome directory layout.
    Encode {
        /// Tab-separated sparse triplet file (chrom, bin_i, bin_j, count).
        input_file: PathBuf,
        /// Bin width in base pairs.
        resolution: u32,
        /// Directory the per-chromosome outputs are written under.
        output_directory: PathBuf,

        #[arg(long)]
        insulation_file: Option<PathBuf>,
        #[arg(long, default_value_t = 100_000)]
        insulation_window: u32,
        /// Accepted for interface fidelity; has no effect.
        #[arg(long)]
        insulation_window_mult: Option<u32>,
        #[arg(long, default_value_t = 23)]
        weights_precision: u32,
        #[arg(long, default_value = "deviation")]
        domain_mask_statistic: String,
        #[arg(long, default_value_t = 0.0)]
        domain_mask_threshold: f64,
        #[arg(long, default_value_t = 23)]
        domain_values_precision: u32,
        #[arg(long, default_value_t = 23)]
        distance_table_precision: u32,
        #[arg(long, default_value = "ice")]
        balancing: String,
        /// Re-decode each chromosome after encoding and verify it matches the input exactly.
        #[arg(long, default_value_t = false)]
        check_result: bool,
    },
    /// Reconstruct a contact matrix from a compressed directory layout.
    Decode {
        /// Directory produced by `encode`.
        input: PathBuf,
        /// Directory the reconstructed per-chromosome matrices are written under.
        output: PathBuf,
    },
}

#[derive(Serialize, Deserialize)]
struct ChrNames {
    res: u32,
    chr_names: Vec<String>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    println!("Hi-C Contact Matrix Compressor");
    println!("===============================");

    match &cli.command {
        Commands::Encode {
            input_file,
            resolution,
            output_directory,
            insulation_file,
            insulation_window,
            insulation_window_mult,
            weights_precision,
            domain_mask_statistic,
            domain_mask_threshold,
            domain_values_precision,
            distance_table_precision,
            balancing,
            check_result,
        } => run_encode(
            &cli,
            input_file,
            *resolution,
            output_directory,
            insulation_file.as_deref(),
            *insulation_window,
            *insulation_window_mult,
            *weights_precision,
            domain_mask_statistic,
            *domain_mask_threshold,
            *domain_values_precision,
            *distance_table_precision,
            balancing,
            *check_result,
        ),
        Commands::Decode { input, output } => run_decode(&cli, input, output),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_encode(
    cli: &Cli,
    input_file: &Path,
    resolution: u32,
    output_directory: &Path,
    insulation_file: Option<&Path>,
    insulation_window: u32,
    insulation_window_mult: Option<u32>,
    weights_precision: u32,
    domain_mask_statistic: &str,
    domain_mask_threshold: f64,
    domain_values_precision: u32,
    distance_table_precision: u32,
    balancing: &str,
    check_result: bool,
) -> Result<()> {
    let domain_mask_statistic = DomainStatistic::parse(domain_mask_statistic)
        .with_context(|| format!("unrecognized domain-mask-statistic: {domain_mask_statistic}"))?;

    let config = EncodeConfig {
        insulation_file: insulation_file.map(PathBuf::from),
        insulation_window,
        insulation_window_mult,
        weights_precision,
        domain_mask_statistic,
        domain_mask_threshold,
        domain_values_precision,
        distance_table_precision,
        balancing: Balancing(balancing.to_string()),
        check_result,
        overwrite: cli.overwrite,
        dry_run: cli.dry_run,
    };

    println!("Reading contact matrix from {}", input_file.display());
    let source = SparsePairSource::from_path(input_file, resolution)
        .with_context(|| format!("failed to read contact matrix from {}", input_file.display()))?;

    let insulation = insulation_file
        .map(TsvInsulationSource::from_path)
        .transpose()
        .context("failed to read insulation table")?;

    let chr_names: Vec<String> = source.chr_names().to_vec();
    println!("Found {} chromosomes at {} bp resolution", chr_names.len(), resolution);

    if !cli.dry_run {
        std::fs::create_dir_all(output_directory)
            .with_context(|| format!("failed to create {}", output_directory.display()))?;
        let metadata = ChrNames { res: resolution, chr_names: chr_names.clone() };
        let metadata_path = output_directory.join("chr_names.json");
        std::fs::write(&metadata_path, serde_json::to_vec_pretty(&metadata)?)
            .with_context(|| format!("failed to write {}", metadata_path.display()))?;
    }

    let pb = ProgressBar::new(chr_names.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let results: Vec<Result<()>> = chr_names
        .par_iter()
        .enumerate()
        .map(|(idx, chr_name)| {
            pb.set_message(format!("encoding {chr_name}"));
            let (contact_mat, weights) = source
                .load(chr_name)
                .with_context(|| format!("failed to load chromosome {chr_name}"))?;
            let boundary_bits = match &insulation {
                Some(src) => src
                    .boundaries(chr_name, insulation_window)
                    .with_context(|| format!("failed to load insulation boundaries for {chr_name}"))?,
                None => vec![false; contact_mat.rows],
            };
            let dir = output_directory.join(format!("{idx:02}-{idx:02}"));
            pipeline::encode_chromosome(&dir, &contact_mat, &weights, &boundary_bits, &config)
                .with_context(|| format!("failed to encode chromosome {chr_name}"))?;
            pb.inc(1);
            Ok(())
        })
        .collect();
    pb.finish_and_clear();

    for result in results {
        result?;
    }

    println!("Encoded {} chromosomes to {}", chr_names.len(), output_directory.display());
    Ok(())
}

fn run_decode(cli: &Cli, input: &Path, output: &Path) -> Result<()> {
    let config = DecodeConfig { overwrite: cli.overwrite, dry_run: cli.dry_run };

    let metadata_path = input.join("chr_names.json");
    let metadata: ChrNames = serde_json::from_slice(
        &std::fs::read(&metadata_path).with_context(|| format!("failed to read {}", metadata_path.display()))?,
    )
    .with_context(|| format!("failed to parse {}", metadata_path.display()))?;

    println!("Decoding {} chromosomes at {} bp resolution", metadata.chr_names.len(), metadata.res);

    if !config.dry_run {
        std::fs::create_dir_all(output).with_context(|| format!("failed to create {}", output.display()))?;
    }

    let pb = ProgressBar::new(metadata.chr_names.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let results: Vec<Result<()>> = metadata
        .chr_names
        .par_iter()
        .enumerate()
        .map(|(idx, chr_name)| {
            pb.set_message(format!("decoding {chr_name}"));
            let dir = input.join(format!("{idx:02}-{idx:02}"));
            if !pipeline::chromosome_done(&dir) {
                bail!("chromosome directory {} is incomplete", dir.display());
            }
            if !config.dry_run {
                let matrix = pipeline::decode_chromosome(&dir)
                    .with_context(|| format!("failed to decode chromosome {chr_name}"))?;
                let out_path = output.join(format!("{chr_name}.tsv"));
                write_dense_matrix(&out_path, &matrix)
                    .with_context(|| format!("failed to write {}", out_path.display()))?;
            }
            pb.inc(1);
            Ok(())
        })
        .collect();
    pb.finish_and_clear();

    for result in results {
        result?;
    }

    println!("Decoded {} chromosomes to {}", metadata.chr_names.len(), output.display());
    Ok(())
}

fn write_dense_matrix(path: &Path, matrix: &hicmc_rs::matrix::Matrix<f64>) -> Result<()> {
    let mut out = String::new();
    for i in 0..matrix.rows {
        for j in 0..matrix.cols {
            let v = *matrix.get(i, j);
            if v != 0.0 {
                out.push_str(&format!("{i}\t{j}\t{v}\n"));
            }
        }
    }
    std::fs::write(path, out)?;
    Ok(())
}
