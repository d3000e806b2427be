use super::config::ToolsConfig;
use super::error::{EngineError, IoContext};
use crate::core::fsutil::{FileSnapshot, move_file};
use crate::core::process::{ToolInvocation, ToolRunner};
use crate::core::workspace::{LigandEntry, LigandLayout, Workspace};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Docking,
    Extraction,
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolKind::Docking => write!(f, "docking"),
            ToolKind::Extraction => write!(f, "model extraction"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockingOutcome {
    /// The fixed-name output was produced and moved into the ligand directory.
    Relocated,
    /// The tool exited cleanly but left no fresh output behind.
    NoOutput,
}

/// Adapter for the docking executable.
///
/// Invocation contract: `<program> <receptor> <ligand> -rsite <site>`, run from the workspace
/// root, which receives a fixed-name result file and a fixed-name log file.
pub struct DockingTool<'a> {
    program: &'a Path,
    workspace: &'a Workspace,
    tools: &'a ToolsConfig,
}

impl<'a> DockingTool<'a> {
    pub fn new(program: &'a Path, workspace: &'a Workspace, tools: &'a ToolsConfig) -> Self {
        Self {
            program,
            workspace,
            tools,
        }
    }

    pub fn invocation(&self, ligand: &LigandEntry) -> ToolInvocation {
        ToolInvocation::new(self.program, self.workspace.root())
            .arg(self.workspace.receptor())
            .arg(&ligand.path)
            .arg("-rsite")
            .arg(self.workspace.site())
    }

    /// Runs the docking tool and moves its fixed-name output to `layout.docking_output`.
    ///
    /// A missing or stale output file is reported as [`DockingOutcome::NoOutput`] rather
    /// than as an error.
    pub fn dock(
        &self,
        runner: &dyn ToolRunner,
        ligand: &LigandEntry,
        layout: &LigandLayout,
    ) -> Result<DockingOutcome, EngineError> {
        let output = self.workspace.root_artifact(&self.tools.docking_output_name);
        let snapshot = FileSnapshot::capture(&output).at_path(&output)?;

        invoke(
            runner,
            ToolKind::Docking,
            &self.invocation(ligand),
            &ligand.base_name,
        )?;

        if !snapshot.is_fresh().at_path(&output)? {
            warn!(
                "Docking of '{}' finished without writing {:?}.",
                ligand.base_name, output
            );
            return Ok(DockingOutcome::NoOutput);
        }

        move_file(&output, &layout.docking_output).at_path(&layout.docking_output)?;
        debug!("Moved {:?} to {:?}", output, layout.docking_output);
        Ok(DockingOutcome::Relocated)
    }

    /// Captures the fixed-name docking log before a run, so a log left behind by an earlier
    /// ligand is never filed under the next one.
    pub fn snapshot_log(&self) -> Result<FileSnapshot, EngineError> {
        let log = self.workspace.root_artifact(&self.tools.docking_log_name);
        FileSnapshot::capture(&log).at_path(&log)
    }

    /// Moves the docking log written since `before` into the ligand directory. Returns
    /// `false` if the run left no new log.
    pub fn relocate_log(
        &self,
        before: &FileSnapshot,
        layout: &LigandLayout,
    ) -> Result<bool, EngineError> {
        let log = before.path();
        if !before.is_fresh().at_path(log)? {
            debug!("No new docking log at {:?}; nothing to move.", log);
            return Ok(false);
        }
        move_file(log, &layout.docking_log).at_path(&layout.docking_log)?;
        Ok(true)
    }
}

/// Adapter for the model extraction executable.
///
/// Invocation contract: `<program> <docking-result> <top-file> -nmax <N> -complex -models
/// -rsite <site>`, run from the ligand directory so the combined file and the individual
/// `model_<i>.pdb` files land there.
pub struct ExtractionTool<'a> {
    program: &'a Path,
    site: &'a Path,
    num_models: usize,
}

impl<'a> ExtractionTool<'a> {
    pub fn new(program: &'a Path, site: &'a Path, num_models: usize) -> Self {
        Self {
            program,
            site,
            num_models,
        }
    }

    pub fn invocation(&self, layout: &LigandLayout) -> ToolInvocation {
        ToolInvocation::new(self.program, &layout.dir)
            .arg(&layout.docking_output)
            .arg(layout.top_models_file_name())
            .arg("-nmax")
            .arg(self.num_models.to_string())
            .arg("-complex")
            .arg("-models")
            .arg("-rsite")
            .arg(self.site)
    }

    pub fn extract(
        &self,
        runner: &dyn ToolRunner,
        ligand: &LigandEntry,
        layout: &LigandLayout,
    ) -> Result<(), EngineError> {
        invoke(
            runner,
            ToolKind::Extraction,
            &self.invocation(layout),
            &ligand.base_name,
        )
    }
}

fn invoke(
    runner: &dyn ToolRunner,
    tool: ToolKind,
    invocation: &ToolInvocation,
    ligand: &str,
) -> Result<(), EngineError> {
    info!("Running {} for '{}': {}", tool, ligand, invocation.command_line());

    let status = runner
        .run(invocation)
        .map_err(|source| EngineError::ToolSpawn {
            tool,
            program: invocation.program().to_path_buf(),
            ligand: ligand.to_string(),
            source,
        })?;

    if !status.success() {
        return Err(EngineError::ToolFailed {
            tool,
            ligand: ligand.to_string(),
            status: status.to_string(),
        });
    }
    Ok(())
}
