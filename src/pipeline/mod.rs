//! Align -> trim -> infer, each stage handing a single file to the next.

pub mod align;
pub mod infer;
pub mod inspect;
pub mod trim;

use chrono::Local;
use indicatif::ProgressBar;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::artifact::{Artifact, ArtifactDir};
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::report::RunSummary;
use crate::utils::external_tools::ToolInvocation;
use crate::utils::progress_bar_builder::ProgressBarBuilder;

pub use align::AlignmentMode;
pub use trim::TrimmingMode;

pub const DEFAULT_PREFIX: &str = "seq_to_tree";

pub fn resolve_prefix(prefix: Option<&str>) -> &str {
    prefix.unwrap_or(DEFAULT_PREFIX)
}

/// What a stage produced and the command that produced it.
#[derive(Debug, Clone)]
pub struct StageOutcome<T> {
    pub output: T,
    pub invocation: ToolInvocation,
}

/// Workflow inputs as supplied by the caller.
#[derive(Debug, Clone)]
pub struct PipelineParams {
    pub unaligned_seqs: PathBuf,
    pub output_dir: PathBuf,
    pub alignment_mode: AlignmentMode,
    pub trimming_mode: TrimmingMode,
    pub gap_threshold: Option<f64>,
    pub ufboot_reps: Option<u32>,
    pub output_prefix: Option<String>,
}

impl PipelineParams {
    pub fn new(unaligned_seqs: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            unaligned_seqs: unaligned_seqs.into(),
            output_dir: output_dir.into(),
            alignment_mode: AlignmentMode::default(),
            trimming_mode: TrimmingMode::default(),
            gap_threshold: Some(trim::DEFAULT_GAP_THRESHOLD),
            ufboot_reps: Some(infer::DEFAULT_UFBOOT_REPS),
            output_prefix: Some(DEFAULT_PREFIX.to_string()),
        }
    }

    pub fn resolved(&self) -> ResolvedParams {
        ResolvedParams {
            unaligned_seqs: self.unaligned_seqs.clone(),
            output_dir: self.output_dir.clone(),
            alignment_mode: self.alignment_mode,
            trimming_mode: self.trimming_mode,
            gap_threshold: trim::resolve_gap_threshold(self.gap_threshold),
            ufboot_reps: infer::resolve_replicates(self.ufboot_reps),
            output_prefix: resolve_prefix(self.output_prefix.as_deref()).to_string(),
        }
    }
}

/// Parameters after default substitution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedParams {
    pub unaligned_seqs: PathBuf,
    pub output_dir: PathBuf,
    pub alignment_mode: AlignmentMode,
    pub trimming_mode: TrimmingMode,
    pub gap_threshold: f64,
    pub ufboot_reps: u32,
    pub output_prefix: String,
}

#[derive(Debug)]
pub struct RunReport {
    pub alignment: Artifact,
    pub trimmed: Artifact,
    pub tree_dir: ArtifactDir,
    pub published: Vec<PathBuf>,
    pub summary_path: PathBuf,
}

/// Runs the whole workflow, stopping at the first stage that fails.
pub fn run_pipeline(params: &PipelineParams, config: &Config) -> PipelineResult<RunReport> {
    let started_at = Local::now();
    let resolved = params.resolved();
    let prefix = Some(resolved.output_prefix.as_str());

    prepare_work_dir(config)?;

    let alignment = align::run(
        &resolved.unaligned_seqs,
        resolved.alignment_mode,
        prefix,
        &resolved.output_dir,
        config,
    )?;

    let trimmed = trim::run(
        &alignment.output.local_path,
        prefix,
        resolved.trimming_mode,
        Some(resolved.gap_threshold),
        &resolved.output_dir,
        config,
    )?;

    let tree = infer::run(
        &trimmed.output.local_path,
        &resolved.output_dir,
        prefix,
        Some(resolved.ufboot_reps),
        config,
    )?;

    let published = tree
        .output
        .publish(&[&alignment.output, &trimmed.output])?;
    log::info!(
        "Published {} files to {}",
        published.len(),
        resolved.output_dir.display()
    );

    let summary = RunSummary::new(
        started_at,
        resolved.clone(),
        [&alignment.invocation, &trimmed.invocation, &tree.invocation],
        published.clone(),
    );
    let summary_path = summary.write(&resolved.output_dir)?;

    Ok(RunReport {
        alignment: alignment.output,
        trimmed: trimmed.output,
        tree_dir: tree.output,
        published,
        summary_path,
    })
}

pub fn prepare_work_dir(config: &Config) -> PipelineResult<()> {
    fs::create_dir_all(&config.work_dir).map_err(|e| PipelineError::io(&config.work_dir, e))
}

/// Deletes a stage output left over from an earlier run.
pub(crate) fn remove_stale(path: &Path) -> PipelineResult<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            log::debug!("Removed stale {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PipelineError::io(path, e)),
    }
}

/// Executes one stage's command behind a spinner.
pub(crate) fn run_stage(invocation: &ToolInvocation, detail: &str) -> PipelineResult<()> {
    let spinner = ProgressBarBuilder::for_stage(invocation.stage, detail)
        .build()
        .unwrap_or_else(|e| {
            log::debug!("Progress display unavailable: {}", e);
            ProgressBar::hidden()
        });

    match invocation.execute() {
        Ok(()) => {
            spinner.finish_with_message(format!("{} complete", invocation.stage));
            Ok(())
        }
        Err(e) => {
            spinner.abandon_with_message(format!("{} failed", invocation.stage));
            Err(e)
        }
    }
}
