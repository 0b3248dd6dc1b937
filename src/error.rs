use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// The three steps of the workflow, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Align,
    Trim,
    Infer,
}

impl Stage {
    pub fn tool(&self) -> &'static str {
        match self {
            Stage::Align => "MAFFT",
            Stage::Trim => "ClipKIT",
            Stage::Infer => "IQ-TREE",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Align => "alignment",
            Stage::Trim => "trimming",
            Stage::Infer => "tree inference",
        };
        f.write_str(name)
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{stage} stage: failed to start '{program}': {source}")]
    Spawn {
        stage: Stage,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} stage: '{program}' exited with {status}{}", stderr_suffix(.stderr))]
    ExitStatus {
        stage: Stage,
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("input file {0} contains no sequences")]
    EmptyInput(PathBuf),

    #[error("{stage} stage: expected output {path} is missing or empty")]
    MissingOutput { stage: Stage, path: PathBuf },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read FASTA {path}: {message}")]
    Fasta { path: PathBuf, message: String },

    #[error("config error: {0}")]
    Config(String),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }

    /// Stage the error belongs to, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Spawn { stage, .. }
            | PipelineError::ExitStatus { stage, .. }
            | PipelineError::MissingOutput { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_display_names_the_step() {
        assert_eq!(Stage::Align.to_string(), "alignment");
        assert_eq!(Stage::Trim.to_string(), "trimming");
        assert_eq!(Stage::Infer.to_string(), "tree inference");
        assert_eq!(Stage::Infer.tool(), "IQ-TREE");
    }

    #[test]
    fn stage_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Stage::Align).unwrap(), "\"align\"");
        assert_eq!(serde_json::to_string(&Stage::Infer).unwrap(), "\"infer\"");
    }

    #[test]
    fn missing_output_carries_stage() {
        let err = PipelineError::MissingOutput {
            stage: Stage::Trim,
            path: PathBuf::from("demo_trimmed_clipkit.fa"),
        };
        assert_eq!(err.stage(), Some(Stage::Trim));
        assert!(err.to_string().starts_with("trimming stage"));
        assert_eq!(PipelineError::Config("x".into()).stage(), None);
    }
}
