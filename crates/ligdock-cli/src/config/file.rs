use crate::error::{CliError, Result};
use ligdock::engine::config::{FailurePolicy, ResumeMarker};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileWorkspaceConfig {
    /// Relative roots are taken relative to the directory holding the config file.
    pub root: Option<PathBuf>,
    pub receptor: Option<PathBuf>,
    pub site: Option<PathBuf>,
    pub ligands: Option<PathBuf>,
    pub results: Option<PathBuf>,
    pub extension: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileToolsConfig {
    pub docking: Option<String>,
    pub extraction: Option<String>,
    #[serde(rename = "docking-output")]
    pub docking_output: Option<String>,
    #[serde(rename = "docking-log")]
    pub docking_log: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileRunConfig {
    #[serde(rename = "num-models")]
    pub num_models: Option<usize>,
    #[serde(rename = "on-tool-failure")]
    pub on_tool_failure: Option<FailurePolicy>,
    #[serde(rename = "resume-marker")]
    pub resume_marker: Option<ResumeMarker>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub workspace: Option<FileWorkspaceConfig>,
    pub tools: Option<FileToolsConfig>,
    pub run: Option<FileRunConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
