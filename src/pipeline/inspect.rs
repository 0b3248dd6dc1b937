use bio::io::fasta;
use std::fs::File;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult, Stage};

// Fewest taxa that give an informative unrooted tree
const MIN_TREE_TAXA: usize = 3;

pub fn count_sequences(path: &Path) -> PipelineResult<usize> {
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    let reader = fasta::Reader::new(file);

    let mut count = 0;
    for record in reader.records() {
        let record = record.map_err(|e| PipelineError::Fasta {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if let Err(msg) = record.check() {
            return Err(PipelineError::Fasta {
                path: path.to_path_buf(),
                message: format!("record {}: {}", count + 1, msg),
            });
        }
        count += 1;
    }
    Ok(count)
}

/// Rejects inputs with no records before any tool is launched.
pub fn check_input(path: &Path) -> PipelineResult<usize> {
    let count = count_sequences(path)?;
    if count == 0 {
        return Err(PipelineError::EmptyInput(path.to_path_buf()));
    }
    if count < MIN_TREE_TAXA {
        log::warn!(
            "{} contains only {} sequence(s); tree inference needs at least {}",
            path.display(),
            count,
            MIN_TREE_TAXA
        );
    }
    Ok(count)
}

pub fn check_output(stage: Stage, path: &Path) -> PipelineResult<usize> {
    let missing = || PipelineError::MissingOutput {
        stage,
        path: path.to_path_buf(),
    };
    if !path.is_file() {
        return Err(missing());
    }
    match count_sequences(path)? {
        0 => Err(missing()),
        n => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn counts_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seqs.fa");
        fs::write(&path, ">a\nACGT\n>b\nACGA\n>c desc\nAC\nGT\n").unwrap();
        assert_eq!(count_sequences(&path).unwrap(), 3);
        assert_eq!(check_input(&path).unwrap(), 3);
    }

    #[test]
    fn empty_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.fa");
        fs::write(&path, "").unwrap();
        assert!(matches!(check_input(&path), Err(PipelineError::EmptyInput(_))));
    }

    #[test]
    fn missing_or_empty_output_names_stage() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent.fa");
        match check_output(Stage::Align, &absent) {
            Err(PipelineError::MissingOutput { stage, .. }) => assert_eq!(stage, Stage::Align),
            other => panic!("unexpected {:?}", other),
        }

        let empty = dir.path().join("empty.fa");
        fs::write(&empty, "").unwrap();
        assert!(matches!(
            check_output(Stage::Trim, &empty),
            Err(PipelineError::MissingOutput { stage: Stage::Trim, .. })
        ));
    }

    #[test]
    fn non_fasta_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.fq");
        fs::write(&path, "@r1\nACGT\n+\nIIII\n").unwrap();
        assert!(matches!(count_sequences(&path), Err(PipelineError::Fasta { .. })));
    }
}
