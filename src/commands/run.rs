use anyhow::{Context, Result};
use std::path::PathBuf;

use seq_to_tree::config::Config;
use seq_to_tree::pipeline::{self, AlignmentMode, PipelineParams, TrimmingMode};

pub struct RunArgs {
    pub unaligned_seqs: PathBuf,
    pub output_dir: PathBuf,
    pub alignment_mode: AlignmentMode,
    pub trimming_mode: TrimmingMode,
    pub gap_threshold: f64,
    pub ufboot_reps: u32,
    pub output_prefix: String,
}

pub fn run(args: RunArgs, config: &Config) -> Result<()> {
    let params = PipelineParams {
        unaligned_seqs: args.unaligned_seqs,
        output_dir: args.output_dir,
        alignment_mode: args.alignment_mode,
        trimming_mode: args.trimming_mode,
        gap_threshold: Some(args.gap_threshold),
        ufboot_reps: Some(args.ufboot_reps),
        output_prefix: Some(args.output_prefix),
    };

    let report = pipeline::run_pipeline(&params, config).with_context(|| {
        format!(
            "seq_to_tree failed for {}",
            params.unaligned_seqs.display()
        )
    })?;

    println!("Pipeline complete:");
    for (label, artifact) in [
        ("Alignment", &report.alignment),
        ("Trimmed alignment", &report.trimmed),
    ] {
        println!(
            "  - {}: {} -> {}",
            label,
            artifact.file_name(),
            artifact.destination.display()
        );
    }
    println!(
        "  - Tree inference outputs: {} files in {}",
        report.published.len(),
        report.tree_dir.destination.display()
    );
    println!("  - Run summary: {}", report.summary_path.display());

    Ok(())
}
