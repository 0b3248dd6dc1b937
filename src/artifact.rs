use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, PipelineResult};

/// A file produced by a stage, together with where it is meant to end up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artifact {
    pub local_path: PathBuf,
    pub destination: PathBuf,
}

impl Artifact {
    /// Binds `local_path` to a file of the same name inside `destination_dir`.
    pub fn new(local_path: PathBuf, destination_dir: &Path) -> Self {
        let destination = match local_path.file_name() {
            Some(name) => destination_dir.join(name),
            None => destination_dir.to_path_buf(),
        };
        Self {
            local_path,
            destination,
        }
    }

    pub fn file_name(&self) -> String {
        self.local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// The local work directory bound to the caller's output directory.
///
/// Tree-inference outputs are the work directory entries named `<prefix>.*`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactDir {
    pub local_dir: PathBuf,
    pub destination: PathBuf,
    pub prefix: String,
}

impl ArtifactDir {
    pub fn new(
        local_dir: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            local_dir: local_dir.into(),
            destination: destination.into(),
            prefix: prefix.into(),
        }
    }

    /// Regular files in the work directory named `<prefix>.*`, in name order.
    pub fn prefixed_files(&self) -> PipelineResult<Vec<PathBuf>> {
        let stem = format!("{}.", self.prefix);
        let mut entries: Vec<PathBuf> = fs::read_dir(&self.local_dir)
            .map_err(|e| PipelineError::io(&self.local_dir, e))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().starts_with(&stem))
                    .unwrap_or(false)
            })
            .collect();
        entries.sort();
        Ok(entries)
    }

    /// Removes `<prefix>.*` files left by an earlier run, including IQ-TREE checkpoints.
    pub fn clear_previous(&self) -> PipelineResult<usize> {
        if !self.local_dir.is_dir() {
            return Ok(0);
        }
        let stale = self.prefixed_files()?;
        for path in &stale {
            fs::remove_file(path).map_err(|e| PipelineError::io(path, e))?;
            log::debug!("Removed stale {}", path.display());
        }
        Ok(stale.len())
    }

    /// Copies `artifacts` and this run's `<prefix>.*` files into the destination.
    ///
    /// Returns the destination paths, artifacts first. When both sides are the
    /// same directory nothing is copied.
    pub fn publish(&self, artifacts: &[&Artifact]) -> PipelineResult<Vec<PathBuf>> {
        fs::create_dir_all(&self.destination)
            .map_err(|e| PipelineError::io(&self.destination, e))?;

        let same_dir = match (
            fs::canonicalize(&self.local_dir),
            fs::canonicalize(&self.destination),
        ) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };

        let mut sources: Vec<PathBuf> = artifacts.iter().map(|a| a.local_path.clone()).collect();
        sources.extend(self.prefixed_files()?);

        let mut published = Vec::with_capacity(sources.len());
        for source in sources {
            let Some(name) = source.file_name() else {
                continue;
            };
            let target = self.destination.join(name);
            let in_place = same_dir && source.parent() == Some(self.local_dir.as_path());
            if !in_place && source != target {
                fs::copy(&source, &target).map_err(|e| PipelineError::io(&target, e))?;
                log::debug!("Published {} -> {}", source.display(), target.display());
            }
            published.push(target);
        }

        Ok(published)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_destination_keeps_file_name() {
        let artifact = Artifact::new(
            PathBuf::from("/work/demo_alignment_mafft.fa"),
            Path::new("/results"),
        );
        assert_eq!(
            artifact.destination,
            PathBuf::from("/results/demo_alignment_mafft.fa")
        );
        assert_eq!(artifact.file_name(), "demo_alignment_mafft.fa");
    }

    #[test]
    fn publish_copies_artifacts_and_prefixed_outputs_only() {
        let work = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(work.path().join("demo.treefile"), "(a,b,c);").unwrap();
        fs::write(work.path().join("demo.log"), "log").unwrap();
        fs::write(work.path().join("demo_trimmed_clipkit.fa"), ">a\nAC\n").unwrap();
        fs::write(work.path().join("other.treefile"), "(x,y,z);").unwrap();
        fs::write(work.path().join("other_alignment_mafft.fa"), ">x\nAC\n").unwrap();
        fs::create_dir(work.path().join("demo.scratch")).unwrap();

        let dest = out.path().join("results");
        let trimmed = Artifact::new(work.path().join("demo_trimmed_clipkit.fa"), &dest);
        let published = ArtifactDir::new(work.path(), &dest, "demo")
            .publish(&[&trimmed])
            .unwrap();

        assert_eq!(
            published,
            vec![
                dest.join("demo_trimmed_clipkit.fa"),
                dest.join("demo.log"),
                dest.join("demo.treefile"),
            ]
        );
        assert_eq!(
            fs::read_to_string(dest.join("demo.treefile")).unwrap(),
            "(a,b,c);"
        );
        assert!(!dest.join("other.treefile").exists());
        assert!(!dest.join("other_alignment_mafft.fa").exists());
        assert!(!dest.join("demo.scratch").exists());
    }

    #[test]
    fn clear_previous_removes_only_prefixed_files() {
        let work = tempfile::tempdir().unwrap();
        fs::write(work.path().join("demo.treefile"), "(a,b,c);").unwrap();
        fs::write(work.path().join("demo.ckp.gz"), "ckp").unwrap();
        fs::write(work.path().join("demo_alignment_mafft.fa"), ">a\nAC\n").unwrap();
        fs::write(work.path().join("demo2.treefile"), "(x,y,z);").unwrap();

        let dir = ArtifactDir::new(work.path(), work.path(), "demo");
        assert_eq!(dir.clear_previous().unwrap(), 2);
        assert!(!work.path().join("demo.ckp.gz").exists());
        assert!(work.path().join("demo_alignment_mafft.fa").exists());
        assert!(work.path().join("demo2.treefile").exists());
    }

    #[test]
    fn publish_into_itself_is_a_no_op() {
        let work = tempfile::tempdir().unwrap();
        fs::write(work.path().join("demo.iqtree"), "report").unwrap();
        let published = ArtifactDir::new(work.path(), work.path(), "demo")
            .publish(&[])
            .unwrap();
        assert_eq!(published, vec![work.path().join("demo.iqtree")]);
    }
}
