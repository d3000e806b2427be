use super::config::ConfigError;
use super::preflight::PreflightIssue;
use super::tools::ToolKind;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Pre-flight validation failed:{}", format_issues(.0))]
    Preflight(Vec<PreflightIssue>),

    #[error("The {tool} tool failed for ligand '{ligand}' ({status})")]
    ToolFailed {
        tool: ToolKind,
        ligand: String,
        status: String,
    },

    #[error("Could not launch the {tool} tool '{program}' for ligand '{ligand}': {source}", program = program.display())]
    ToolSpawn {
        tool: ToolKind,
        program: PathBuf,
        ligand: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl EngineError {
    pub fn is_preflight(&self) -> bool {
        matches!(self, Self::Preflight(_))
    }

    /// Failures of an external tool, as opposed to failures of the driver itself.
    pub fn is_tool_failure(&self) -> bool {
        matches!(self, Self::ToolFailed { .. } | Self::ToolSpawn { .. })
    }
}

fn format_issues(issues: &[PreflightIssue]) -> String {
    issues.iter().map(|issue| format!("\n  - {issue}")).collect()
}

/// Attaches the offending path to a bare [`io::Error`].
pub(crate) trait IoContext<T> {
    fn at_path(self, path: &Path) -> Result<T, EngineError>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn at_path(self, path: &Path) -> Result<T, EngineError> {
        self.map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
