use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, PipelineResult, Stage};
use crate::pipeline::ResolvedParams;
use crate::utils::external_tools::ToolInvocation;

const SUMMARY_SUFFIX: &str = "_run_summary.json";

pub const CITATIONS: [&str; 3] = [
    "Katoh & Standley 2013. MAFFT Multiple Sequence Alignment Software Version 7: Improvements in Performance and Usability. Molecular Biology and Evolution. doi:10.1093/molbev/mst010",
    "Steenwyk et al. 2020. ClipKIT: a multiple sequence alignment trimming software for accurate phylogenomic inference. PLoS Biology. doi:10.1371/journal.pbio.3001007",
    "Minh et al. 2020. IQ-TREE 2: New models and efficient methods for phylogenetic inference in the genomic era. Molecular Biology and Evolution. doi:10.1093/molbev/msaa015",
];

#[derive(Debug, Serialize)]
pub struct CommandRecord {
    pub stage: Stage,
    pub command_line: String,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub parameters: ResolvedParams,
    pub commands: Vec<CommandRecord>,
    pub published: Vec<PathBuf>,
    pub citations: Vec<&'static str>,
}

impl RunSummary {
    pub fn new<'a>(
        started_at: DateTime<Local>,
        parameters: ResolvedParams,
        invocations: impl IntoIterator<Item = &'a ToolInvocation>,
        published: Vec<PathBuf>,
    ) -> Self {
        Self {
            started_at,
            finished_at: Local::now(),
            parameters,
            commands: invocations
                .into_iter()
                .map(|inv| CommandRecord {
                    stage: inv.stage,
                    command_line: inv.to_string(),
                })
                .collect(),
            published,
            citations: CITATIONS.to_vec(),
        }
    }

    pub fn file_name(prefix: &str) -> String {
        format!("{}{}", prefix, SUMMARY_SUFFIX)
    }

    /// Writes `<prefix>_run_summary.json` into `dir` and returns its path.
    pub fn write(&self, dir: &Path) -> PipelineResult<PathBuf> {
        let path = dir.join(Self::file_name(&self.parameters.output_prefix));
        self.write_to(&path)?;
        Ok(path)
    }

    pub fn write_to(&self, path: &Path) -> PipelineResult<()> {
        let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| PipelineError::io(path, e.into()))?;
        writer.flush().map_err(|e| PipelineError::io(path, e))?;
        Ok(())
    }
}
