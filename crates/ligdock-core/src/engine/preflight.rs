use super::config::BatchConfig;
use super::error::EngineError;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreflightIssue {
    #[error("Required executable '{name}' was not found or is not executable")]
    MissingExecutable { name: String },

    #[error("Receptor file not found: {}", .0.display())]
    MissingReceptor(PathBuf),

    #[error("Binding-site file not found: {}", .0.display())]
    MissingSiteFile(PathBuf),

    #[error("Ligand directory not found: {}", .0.display())]
    MissingLigandDir(PathBuf),
}

/// Absolute locations of the two executables that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTools {
    pub docking: PathBuf,
    pub extraction: PathBuf,
}

/// Checks that both executables resolve and that every required input exists.
///
/// All problems are collected before failing so the operator can fix them in one go. Only
/// read-only existence checks are performed.
///
/// # Errors
///
/// Returns [`EngineError::Preflight`] listing every issue found.
pub fn validate(config: &BatchConfig) -> Result<ResolvedTools, EngineError> {
    info!("Running pre-flight checks.");
    let mut issues = Vec::new();

    let docking = resolve_executable(&config.tools.docking_program);
    if docking.is_none() {
        issues.push(PreflightIssue::MissingExecutable {
            name: config.tools.docking_program.clone(),
        });
    }
    let extraction = resolve_executable(&config.tools.extraction_program);
    if extraction.is_none() {
        issues.push(PreflightIssue::MissingExecutable {
            name: config.tools.extraction_program.clone(),
        });
    }

    let workspace = &config.workspace;
    if !workspace.receptor().is_file() {
        issues.push(PreflightIssue::MissingReceptor(
            workspace.receptor().to_path_buf(),
        ));
    }
    if !workspace.site().is_file() {
        issues.push(PreflightIssue::MissingSiteFile(workspace.site().to_path_buf()));
    }
    if !workspace.ligand_dir().is_dir() {
        issues.push(PreflightIssue::MissingLigandDir(
            workspace.ligand_dir().to_path_buf(),
        ));
    }

    match (docking, extraction) {
        (Some(docking), Some(extraction)) if issues.is_empty() => {
            debug!(
                "Resolved executables: docking={:?}, extraction={:?}",
                docking, extraction
            );
            Ok(ResolvedTools {
                docking,
                extraction,
            })
        }
        _ => Err(EngineError::Preflight(issues)),
    }
}

/// Bare names are looked up on PATH; anything with a path separator is taken as a file path.
/// Either way the result must be an executable file.
fn resolve_executable(name: &str) -> Option<PathBuf> {
    let path = which::which(name).ok()?;
    Some(fs::canonicalize(&path).unwrap_or(path))
}
