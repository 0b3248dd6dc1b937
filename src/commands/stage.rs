use anyhow::{Context, Result};
use std::path::Path;

use seq_to_tree::config::Config;
use seq_to_tree::pipeline::{self, align, infer, trim, AlignmentMode, TrimmingMode};

pub fn align(
    unaligned_seqs: &Path,
    mode: AlignmentMode,
    prefix: &str,
    config: &Config,
) -> Result<()> {
    pipeline::prepare_work_dir(config)?;
    let outcome = align::run(unaligned_seqs, mode, Some(prefix), &config.work_dir, config)
        .context("Alignment failed")?;
    println!("Alignment written to {}", outcome.output.local_path.display());
    Ok(())
}

pub fn trim(
    alignment: &Path,
    mode: TrimmingMode,
    gap_threshold: f64,
    prefix: &str,
    config: &Config,
) -> Result<()> {
    pipeline::prepare_work_dir(config)?;
    let outcome = trim::run(
        alignment,
        Some(prefix),
        mode,
        Some(gap_threshold),
        &config.work_dir,
        config,
    )
    .context("Trimming failed")?;
    println!(
        "Trimmed alignment written to {}",
        outcome.output.local_path.display()
    );
    Ok(())
}

pub fn infer(
    trimmed_alignment: &Path,
    output_dir: &Path,
    ufboot_reps: u32,
    prefix: &str,
    config: &Config,
) -> Result<()> {
    pipeline::prepare_work_dir(config)?;
    let outcome = infer::run(trimmed_alignment, output_dir, Some(prefix), Some(ufboot_reps), config)
        .context("Tree inference failed")?;
    let published = outcome
        .output
        .publish(&[])
        .with_context(|| format!("Failed to publish results to {}", output_dir.display()))?;
    println!(
        "Tree inference complete: {} files in {}",
        published.len(),
        output_dir.display()
    );
    Ok(())
}
