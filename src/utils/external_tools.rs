use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Serialize;

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult, Stage};

// Lines of stderr kept in ExitStatus errors
const STDERR_TAIL_LINES: usize = 20;

/// A fully assembled external command for one stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolInvocation {
    pub stage: Stage,
    pub program: PathBuf,
    pub args: Vec<String>,
    /// When set, standard output is written to this file instead of being captured.
    pub stdout: Option<PathBuf>,
}

impl ToolInvocation {
    pub fn new(stage: Stage, program: impl Into<PathBuf>) -> Self {
        Self {
            stage,
            program: program.into(),
            args: Vec::new(),
            stdout: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<Path>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn stdout_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdout = Some(path.into());
        self
    }

    /// Runs the command to completion; any non-zero exit is an error tagged with the stage.
    ///
    /// Redirected stdout goes to `<path>.tmp` and replaces `path` only on success,
    /// so a failed or unstartable tool leaves any earlier output untouched.
    pub fn execute(&self) -> PipelineResult<()> {
        let program = self.program.display().to_string();
        let mut command = Command::new(&self.program);
        command.args(&self.args).stderr(Stdio::piped());

        let staged = match &self.stdout {
            Some(path) => {
                let tmp = staging_path(path);
                let file = File::create(&tmp).map_err(|e| PipelineError::io(&tmp, e))?;
                command.stdout(Stdio::from(file));
                Some((tmp, path))
            }
            None => {
                command.stdout(Stdio::null());
                None
            }
        };

        log::info!("[{}] {}", self.stage, self);

        let result = command
            .output()
            .map_err(|source| PipelineError::Spawn {
                stage: self.stage,
                program: program.clone(),
                source,
            })
            .and_then(|output| {
                if output.status.success() {
                    Ok(())
                } else {
                    Err(PipelineError::ExitStatus {
                        stage: self.stage,
                        program: program.clone(),
                        status: output.status,
                        stderr: stderr_tail(&output.stderr),
                    })
                }
            });
        // Release the staged stdout handle before renaming it into place
        drop(command);

        if let Some((tmp, path)) = staged {
            match &result {
                Ok(()) => fs::rename(&tmp, path).map_err(|e| PipelineError::io(path, e))?,
                Err(_) => {
                    if let Err(e) = fs::remove_file(&tmp) {
                        log::debug!("Could not remove {}: {}", tmp.display(), e);
                    }
                }
            }
        }

        result?;
        log::debug!("[{}] {} finished", self.stage, program);
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        if let Some(path) = &self.stdout {
            write!(f, " > {}", path.display())?;
        }
        Ok(())
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

/// Availability of one configured executable.
#[derive(Debug)]
pub struct ToolStatus {
    pub name: &'static str,
    pub program: PathBuf,
    pub available: bool,
}

/// Returns true if `program` can be started. ClipKIT has no --version flag, so -h is used.
pub fn check_tool(program: &Path, probe_flag: &str) -> bool {
    Command::new(program)
        .arg(probe_flag)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

pub fn check_tools(config: &Config) -> Vec<ToolStatus> {
    let tools = [
        ("mafft", &config.tools.mafft, "--version"),
        ("mafft-linsi", &config.tools.mafft_linsi, "--version"),
        ("clipkit", &config.tools.clipkit, "-h"),
        ("iqtree2", &config.tools.iqtree, "--version"),
    ];

    tools
        .into_iter()
        .map(|(name, program, flag)| ToolStatus {
            name,
            program: program.clone(),
            available: check_tool(program, flag),
        })
        .collect()
}
