use std::path::{Path, PathBuf};

use super::{resolve_prefix, run_stage, StageOutcome};
use crate::artifact::ArtifactDir;
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult, Stage};
use crate::utils::external_tools::ToolInvocation;

pub const DEFAULT_UFBOOT_REPS: u32 = 1000;
// IQ-TREE refuses -bb values below this
const MIN_UFBOOT_REPS: u32 = 1000;

pub fn resolve_replicates(ufboot_reps: Option<u32>) -> u32 {
    ufboot_reps.unwrap_or(DEFAULT_UFBOOT_REPS)
}

fn warn_if_below_minimum(reps: u32) {
    if reps < MIN_UFBOOT_REPS {
        log::warn!(
            "{} UFBoot replicates requested; IQ-TREE expects at least {}",
            reps,
            MIN_UFBOOT_REPS
        );
    }
}

/// `-pre` value: the work directory joined with the output prefix.
pub fn local_prefix(prefix: Option<&str>, config: &Config) -> PathBuf {
    config.work_dir.join(resolve_prefix(prefix))
}

pub fn build_command(
    trimmed_alignment: &Path,
    prefix: Option<&str>,
    ufboot_reps: Option<u32>,
    config: &Config,
) -> ToolInvocation {
    ToolInvocation::new(Stage::Infer, &config.tools.iqtree)
        .arg("-s")
        .arg(trimmed_alignment)
        .arg("-pre")
        .arg(local_prefix(prefix, config))
        .arg("-nt")
        .arg("AUTO")
        .arg("-m")
        .arg("TEST")
        .arg("-bb")
        .arg(resolve_replicates(ufboot_reps).to_string())
}

/// Runs IQ-TREE and binds the work directory to `output_dir`.
///
/// `<prefix>.*` files from an earlier run are removed first, so IQ-TREE does not
/// resume a finished checkpoint and the treefile check only sees fresh output.
/// Nothing is copied here; see [`ArtifactDir::publish`].
pub fn run(
    trimmed_alignment: &Path,
    output_dir: &Path,
    prefix: Option<&str>,
    ufboot_reps: Option<u32>,
    config: &Config,
) -> PipelineResult<StageOutcome<ArtifactDir>> {
    let reps = resolve_replicates(ufboot_reps);
    warn_if_below_minimum(reps);

    let tree_dir = ArtifactDir::new(&config.work_dir, output_dir, resolve_prefix(prefix));
    let removed = tree_dir.clear_previous()?;
    if removed > 0 {
        log::info!(
            "Removed {} files from a previous {} run in {}",
            removed,
            tree_dir.prefix,
            config.work_dir.display()
        );
    }

    let invocation = build_command(trimmed_alignment, prefix, Some(reps), config);
    run_stage(&invocation, &format!("{} UFBoot replicates", reps))?;

    let mut treefile = local_prefix(prefix, config).into_os_string();
    treefile.push(".treefile");
    let treefile = PathBuf::from(treefile);
    if !treefile.is_file() {
        return Err(PipelineError::MissingOutput {
            stage: Stage::Infer,
            path: treefile,
        });
    }

    Ok(StageOutcome {
        output: tree_dir,
        invocation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        let mut config = Config::default();
        config.work_dir = PathBuf::from("/root/seq_to_tree");
        config
    }

    #[test]
    fn unset_replicates_default_to_1000() {
        assert_eq!(resolve_replicates(None), 1000);
        let cmd = build_command(
            Path::new("/root/seq_to_tree/demo_trimmed_clipkit.fa"),
            Some("demo"),
            None,
            &config(),
        );
        assert_eq!(cmd.program, PathBuf::from("iqtree2"));
        assert_eq!(
            cmd.args,
            vec![
                "-s",
                "/root/seq_to_tree/demo_trimmed_clipkit.fa",
                "-pre",
                "/root/seq_to_tree/demo",
                "-nt",
                "AUTO",
                "-m",
                "TEST",
                "-bb",
                "1000",
            ]
        );
    }

    #[test]
    fn explicit_replicates_pass_through() {
        let cmd = build_command(Path::new("t.fa"), None, Some(5000), &config());
        assert_eq!(cmd.args[cmd.args.len() - 2..], ["-bb", "5000"]);
        assert_eq!(cmd.args[3], "/root/seq_to_tree/seq_to_tree");
    }
}
