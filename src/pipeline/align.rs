use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{inspect, resolve_prefix, run_stage, StageOutcome};
use crate::artifact::Artifact;
use crate::config::Config;
use crate::error::{PipelineResult, Stage};
use crate::utils::external_tools::ToolInvocation;

const ALIGNMENT_SUFFIX: &str = "_alignment_mafft.fa";

/// MAFFT presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
pub enum AlignmentMode {
    /// Accurate; suited to up to ~200 sequences x ~2,000 sites
    #[value(name = "l-ins-i", alias = "linsi")]
    #[serde(rename = "L-INS-i")]
    Linsi,
    /// Fast progressive method for larger alignments
    #[value(name = "fft-ns-2", alias = "fftns2")]
    #[serde(rename = "FFT-NS-2")]
    Fftns2,
    /// Let MAFFT pick a strategy from the input size
    #[default]
    #[value(name = "auto")]
    #[serde(rename = "auto")]
    Auto,
}

impl AlignmentMode {
    pub fn label(&self) -> &'static str {
        match self {
            AlignmentMode::Linsi => "L-INS-i",
            AlignmentMode::Fftns2 => "FFT-NS-2",
            AlignmentMode::Auto => "auto",
        }
    }
}

pub fn alignment_file_name(prefix: Option<&str>) -> String {
    format!("{}{}", resolve_prefix(prefix), ALIGNMENT_SUFFIX)
}

pub fn build_command(
    unaligned_seqs: &Path,
    mode: AlignmentMode,
    prefix: Option<&str>,
    config: &Config,
) -> ToolInvocation {
    let output = config.work_dir.join(alignment_file_name(prefix));

    let invocation = match mode {
        AlignmentMode::Linsi => ToolInvocation::new(Stage::Align, &config.tools.mafft_linsi),
        AlignmentMode::Fftns2 => ToolInvocation::new(Stage::Align, &config.tools.mafft),
        AlignmentMode::Auto => ToolInvocation::new(Stage::Align, &config.tools.mafft).arg("--auto"),
    };

    invocation.arg(unaligned_seqs).stdout_to(output)
}

/// Aligns `unaligned_seqs` into the work directory.
///
/// The input is checked for at least one FASTA record first, and the captured
/// alignment must contain records too, since MAFFT can exit cleanly with nothing on stdout.
pub fn run(
    unaligned_seqs: &Path,
    mode: AlignmentMode,
    prefix: Option<&str>,
    output_dir: &Path,
    config: &Config,
) -> PipelineResult<StageOutcome<Artifact>> {
    let n_seqs = inspect::check_input(unaligned_seqs)?;
    log::info!(
        "Aligning {} sequences from {} with MAFFT {}",
        n_seqs,
        unaligned_seqs.display(),
        mode.label()
    );

    let invocation = build_command(unaligned_seqs, mode, prefix, config);
    let output = config.work_dir.join(alignment_file_name(prefix));

    run_stage(&invocation, &format!("{} mode", mode.label()))?;
    inspect::check_output(Stage::Align, &output)?;

    Ok(StageOutcome {
        output: Artifact::new(output, output_dir),
        invocation,
    })
}
