use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{inspect, remove_stale, resolve_prefix, run_stage, StageOutcome};
use crate::artifact::Artifact;
use crate::config::Config;
use crate::error::{PipelineResult, Stage};
use crate::utils::external_tools::ToolInvocation;

const TRIMMED_SUFFIX: &str = "_trimmed_clipkit.fa";
pub const DEFAULT_GAP_THRESHOLD: f64 = 0.9;

/// ClipKIT trimming strategies; the CLI names match ClipKIT's `-m` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrimmingMode {
    /// Trim sites above the gap threshold
    Gappy,
    /// Dynamic determination of the gap threshold
    #[default]
    SmartGap,
    /// Keep only parsimony-informative sites
    Kpi,
    KpiGappy,
    KpiSmartGap,
    /// Keep only parsimony-informative and constant sites
    Kpic,
    KpicGappy,
    KpicSmartGap,
}

impl TrimmingMode {
    pub const ALL: [TrimmingMode; 8] = [
        TrimmingMode::Gappy,
        TrimmingMode::SmartGap,
        TrimmingMode::Kpi,
        TrimmingMode::KpiGappy,
        TrimmingMode::KpiSmartGap,
        TrimmingMode::Kpic,
        TrimmingMode::KpicGappy,
        TrimmingMode::KpicSmartGap,
    ];

    pub fn flag(&self) -> &'static str {
        match self {
            TrimmingMode::Gappy => "gappy",
            TrimmingMode::SmartGap => "smart-gap",
            TrimmingMode::Kpi => "kpi",
            TrimmingMode::KpiGappy => "kpi-gappy",
            TrimmingMode::KpiSmartGap => "kpi-smart-gap",
            TrimmingMode::Kpic => "kpic",
            TrimmingMode::KpicGappy => "kpic-gappy",
            TrimmingMode::KpicSmartGap => "kpic-smart-gap",
        }
    }

    /// Whether ClipKIT actually reads `-g` in this mode.
    pub fn uses_gap_threshold(&self) -> bool {
        matches!(
            self,
            TrimmingMode::Gappy | TrimmingMode::KpiGappy | TrimmingMode::KpicGappy
        )
    }
}

pub fn trimmed_file_name(prefix: Option<&str>) -> String {
    format!("{}{}", resolve_prefix(prefix), TRIMMED_SUFFIX)
}

/// Absent or zero thresholds fall back to 0.9. Other values pass through unchanged.
pub fn resolve_gap_threshold(gap_threshold: Option<f64>) -> f64 {
    match gap_threshold {
        Some(t) if t != 0.0 => t,
        _ => DEFAULT_GAP_THRESHOLD,
    }
}

fn warn_if_out_of_range(threshold: f64) {
    if !(0.0..=1.0).contains(&threshold) {
        log::warn!(
            "Gap threshold {} is outside [0, 1]; passing it to ClipKIT as-is",
            threshold
        );
    }
}

pub fn build_command(
    alignment: &Path,
    prefix: Option<&str>,
    mode: TrimmingMode,
    gap_threshold: Option<f64>,
    config: &Config,
) -> ToolInvocation {
    let output = config.work_dir.join(trimmed_file_name(prefix));
    let threshold = resolve_gap_threshold(gap_threshold);

    ToolInvocation::new(Stage::Trim, &config.tools.clipkit)
        .arg(alignment)
        .arg("-o")
        .arg(output)
        .arg("-m")
        .arg(mode.flag())
        .arg("-g")
        .arg(threshold.to_string())
}

pub fn run(
    alignment: &Path,
    prefix: Option<&str>,
    mode: TrimmingMode,
    gap_threshold: Option<f64>,
    output_dir: &Path,
    config: &Config,
) -> PipelineResult<StageOutcome<Artifact>> {
    let threshold = resolve_gap_threshold(gap_threshold);
    if mode.uses_gap_threshold() {
        warn_if_out_of_range(threshold);
    } else {
        log::debug!("Gap threshold is ignored by ClipKIT in {} mode", mode.flag());
    }

    let invocation = build_command(alignment, prefix, mode, Some(threshold), config);
    let output = config.work_dir.join(trimmed_file_name(prefix));
    remove_stale(&output)?;

    run_stage(&invocation, &format!("{} mode", mode.flag()))?;
    inspect::check_output(Stage::Trim, &output)?;

    Ok(StageOutcome {
        output: Artifact::new(output, output_dir),
        invocation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config() -> Config {
        let mut config = Config::default();
        config.work_dir = PathBuf::from("/work");
        config
    }

    #[test]
    fn every_mode_sets_its_flag() {
        for mode in TrimmingMode::ALL {
            let cmd = build_command(
                Path::new("/work/demo_alignment_mafft.fa"),
                Some("demo"),
                mode,
                Some(0.7),
                &config(),
            );
            assert_eq!(cmd.program, PathBuf::from("clipkit"));
            assert_eq!(
                cmd.args,
                vec![
                    "/work/demo_alignment_mafft.fa",
                    "-o",
                    "/work/demo_trimmed_clipkit.fa",
                    "-m",
                    mode.flag(),
                    "-g",
                    "0.7",
                ]
            );
            assert!(cmd.stdout.is_none());
        }
    }

    #[test]
    fn falsy_threshold_becomes_default() {
        assert_eq!(resolve_gap_threshold(None), 0.9);
        assert_eq!(resolve_gap_threshold(Some(0.0)), 0.9);
        assert_eq!(resolve_gap_threshold(Some(0.5)), 0.5);

        let cmd = build_command(Path::new("aln.fa"), None, TrimmingMode::Gappy, None, &config());
        assert_eq!(cmd.args[cmd.args.len() - 2..], ["-g", "0.9"]);
    }

    #[test]
    fn out_of_range_threshold_passes_through() {
        assert_eq!(resolve_gap_threshold(Some(1.5)), 1.5);
    }

    #[test]
    fn output_name_follows_prefix() {
        assert_eq!(trimmed_file_name(Some("demo")), "demo_trimmed_clipkit.fa");
    }

    #[test]
    fn cli_names_match_clipkit_flags() {
        for mode in TrimmingMode::ALL {
            let value = mode.to_possible_value().unwrap();
            assert_eq!(value.get_name(), mode.flag());
        }
        assert_eq!(TrimmingMode::default(), TrimmingMode::SmartGap);
    }
}
