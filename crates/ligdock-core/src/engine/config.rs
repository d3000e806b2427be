use crate::core::workspace::Workspace;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_DOCKING_PROGRAM: &str = "hdock";
pub const DEFAULT_EXTRACTION_PROGRAM: &str = "createpl";
pub const DEFAULT_DOCKING_OUTPUT_NAME: &str = "Hdock.out";
pub const DEFAULT_DOCKING_LOG_NAME: &str = "hdock.log";
pub const DEFAULT_LIGAND_EXTENSION: &str = "pdb";
pub const DEFAULT_NUM_MODELS: usize = 10;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// What happens when an external tool exits with a non-zero status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop the whole batch at the first failing invocation.
    #[default]
    Abort,
    /// Record the ligand as failed and move on to the next one.
    Continue,
}

/// Which file marks a ligand as already processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResumeMarker {
    /// The relocated docking output, `<base>_hdock.out`.
    #[default]
    DockingOutput,
    /// A `<base>.done` file written only after every step for the ligand succeeded.
    Sentinel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolsConfig {
    pub docking_program: String,
    pub extraction_program: String,
    /// Fixed name of the result file the docking tool writes into its working directory.
    pub docking_output_name: String,
    /// Fixed name of the log file the docking tool writes into its working directory.
    pub docking_log_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub workspace: Workspace,
    pub tools: ToolsConfig,
    pub ligand_extension: String,
    pub num_models: usize,
    pub failure_policy: FailurePolicy,
    pub resume_marker: ResumeMarker,
}

#[derive(Default)]
pub struct BatchConfigBuilder {
    root: Option<PathBuf>,
    receptor: Option<PathBuf>,
    site: Option<PathBuf>,
    ligand_dir: Option<PathBuf>,
    results_dir: Option<PathBuf>,
    docking_program: Option<String>,
    extraction_program: Option<String>,
    docking_output_name: Option<String>,
    docking_log_name: Option<String>,
    ligand_extension: Option<String>,
    num_models: Option<usize>,
    failure_policy: Option<FailurePolicy>,
    resume_marker: Option<ResumeMarker>,
}

impl BatchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(mut self, path: PathBuf) -> Self {
        self.root = Some(path);
        self
    }
    pub fn receptor(mut self, path: PathBuf) -> Self {
        self.receptor = Some(path);
        self
    }
    pub fn site(mut self, path: PathBuf) -> Self {
        self.site = Some(path);
        self
    }
    pub fn ligand_dir(mut self, path: PathBuf) -> Self {
        self.ligand_dir = Some(path);
        self
    }
    pub fn results_dir(mut self, path: PathBuf) -> Self {
        self.results_dir = Some(path);
        self
    }
    pub fn docking_program(mut self, program: impl Into<String>) -> Self {
        self.docking_program = Some(program.into());
        self
    }
    pub fn extraction_program(mut self, program: impl Into<String>) -> Self {
        self.extraction_program = Some(program.into());
        self
    }
    pub fn docking_output_name(mut self, name: impl Into<String>) -> Self {
        self.docking_output_name = Some(name.into());
        self
    }
    pub fn docking_log_name(mut self, name: impl Into<String>) -> Self {
        self.docking_log_name = Some(name.into());
        self
    }
    pub fn ligand_extension(mut self, extension: impl Into<String>) -> Self {
        self.ligand_extension = Some(extension.into());
        self
    }
    pub fn num_models(mut self, n: usize) -> Self {
        self.num_models = Some(n);
        self
    }
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }
    pub fn resume_marker(mut self, marker: ResumeMarker) -> Self {
        self.resume_marker = Some(marker);
        self
    }

    pub fn build(self) -> Result<BatchConfig, ConfigError> {
        let root = self.root.ok_or(ConfigError::MissingParameter("root"))?;
        // Extraction runs inside the ligand directory; no path handed to a tool may be relative.
        let root = std::path::absolute(&root).map_err(|e| ConfigError::InvalidValue {
            parameter: "root",
            reason: format!("cannot resolve '{}': {}", root.display(), e),
        })?;
        let workspace = Workspace::new(
            root,
            self.receptor
                .ok_or(ConfigError::MissingParameter("receptor"))?,
            self.site.ok_or(ConfigError::MissingParameter("site"))?,
            self.ligand_dir
                .ok_or(ConfigError::MissingParameter("ligand_dir"))?,
            self.results_dir
                .ok_or(ConfigError::MissingParameter("results_dir"))?,
        );

        let tools = ToolsConfig {
            docking_program: non_empty(
                "docking_program",
                self.docking_program
                    .unwrap_or_else(|| DEFAULT_DOCKING_PROGRAM.to_string()),
            )?,
            extraction_program: non_empty(
                "extraction_program",
                self.extraction_program
                    .unwrap_or_else(|| DEFAULT_EXTRACTION_PROGRAM.to_string()),
            )?,
            docking_output_name: bare_file_name(
                "docking_output_name",
                self.docking_output_name
                    .unwrap_or_else(|| DEFAULT_DOCKING_OUTPUT_NAME.to_string()),
            )?,
            docking_log_name: bare_file_name(
                "docking_log_name",
                self.docking_log_name
                    .unwrap_or_else(|| DEFAULT_DOCKING_LOG_NAME.to_string()),
            )?,
        };

        let ligand_extension = self
            .ligand_extension
            .unwrap_or_else(|| DEFAULT_LIGAND_EXTENSION.to_string())
            .trim_start_matches('.')
            .to_string();
        let ligand_extension = non_empty("ligand_extension", ligand_extension)?;

        let num_models = self.num_models.unwrap_or(DEFAULT_NUM_MODELS);
        if num_models == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "num_models",
                reason: "at least one model must be extracted".to_string(),
            });
        }

        Ok(BatchConfig {
            workspace,
            tools,
            ligand_extension,
            num_models,
            failure_policy: self.failure_policy.unwrap_or_default(),
            resume_marker: self.resume_marker.unwrap_or_default(),
        })
    }
}

fn non_empty(parameter: &'static str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            parameter,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(value)
}

fn bare_file_name(parameter: &'static str, value: String) -> Result<String, ConfigError> {
    let value = non_empty(parameter, value)?;
    if value.contains(['/', '\\']) {
        return Err(ConfigError::InvalidValue {
            parameter,
            reason: format!("'{value}' must be a file name, not a path"),
        });
    }
    Ok(value)
}
