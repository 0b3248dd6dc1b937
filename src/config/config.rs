use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, PipelineResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Local directory all intermediate and tree-inference files are written to
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    #[serde(default)]
    pub tools: ToolPaths,
}

/// Executables invoked by each stage. Bare names are resolved through PATH.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolPaths {
    #[serde(default = "default_mafft")]
    pub mafft: PathBuf,
    #[serde(default = "default_mafft_linsi")]
    pub mafft_linsi: PathBuf,
    #[serde(default = "default_clipkit")]
    pub clipkit: PathBuf,
    #[serde(default = "default_iqtree")]
    pub iqtree: PathBuf,
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("seq_to_tree")
}

fn default_mafft() -> PathBuf {
    PathBuf::from("mafft")
}

fn default_mafft_linsi() -> PathBuf {
    PathBuf::from("mafft-linsi")
}

fn default_clipkit() -> PathBuf {
    PathBuf::from("clipkit")
}

fn default_iqtree() -> PathBuf {
    PathBuf::from("iqtree2")
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            mafft: default_mafft(),
            mafft_linsi: default_mafft_linsi(),
            clipkit: default_clipkit(),
            iqtree: default_iqtree(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            tools: ToolPaths::default(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "seqtotree", "seq-to-tree")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
    }

    /// Loads the user config, falling back to defaults when it is absent or unreadable.
    pub fn load() -> Self {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                match Self::load_from(&config_path) {
                    Ok(config) => return config,
                    Err(e) => log::warn!("Ignoring config {}: {}", config_path.display(), e),
                }
            }
        }
        Config::default()
    }

    pub fn load_from(path: &Path) -> PipelineResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        toml::from_str(&content).map_err(|e| PipelineError::Config(e.to_string()))
    }

    pub fn save(&self) -> PipelineResult<PathBuf> {
        let config_path = Self::default_path()
            .ok_or_else(|| PipelineError::Config("Failed to determine project directories".into()))?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> PipelineResult<()> {
        if let Some(config_dir) = path.parent() {
            fs::create_dir_all(config_dir).map_err(|e| PipelineError::io(config_dir, e))?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| PipelineError::Config(e.to_string()))?;
        fs::write(path, content).map_err(|e| PipelineError::io(path, e))
    }
}
