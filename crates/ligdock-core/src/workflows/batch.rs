use crate::core::discovery::discover_ligands;
use crate::core::fsutil::remove_dir_if_empty;
use crate::core::process::{ToolInvocation, ToolRunner};
use crate::core::workspace::{LigandEntry, LigandLayout};
use crate::engine::config::{BatchConfig, FailurePolicy, ResumeMarker};
use crate::engine::error::{EngineError, IoContext};
use crate::engine::preflight::{self, ResolvedTools};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tools::{DockingOutcome, DockingTool, ExtractionTool, ToolKind};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LigandOutcome {
    Completed,
    Skipped,
    /// The docking tool exited cleanly but produced no output.
    NoDockingOutput,
    /// A tool failed and the failure policy allowed the batch to continue.
    Failed { reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub outcomes: Vec<(String, LigandOutcome)>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn completed(&self) -> usize {
        self.count(|o| matches!(o, LigandOutcome::Completed))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, LigandOutcome::Skipped))
    }

    pub fn no_output(&self) -> usize {
        self.count(|o| matches!(o, LigandOutcome::NoDockingOutput))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, LigandOutcome::Failed { .. }))
    }

    pub fn outcome_of(&self, ligand: &str) -> Option<&LigandOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == ligand)
            .map(|(_, outcome)| outcome)
    }

    fn count(&self, pred: impl Fn(&LigandOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// One ligand as the batch would treat it, without running anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLigand {
    pub ligand: LigandEntry,
    pub layout: LigandLayout,
    pub already_done: bool,
    pub docking: ToolInvocation,
    pub extraction: ToolInvocation,
}

/// Runs the whole batch: pre-flight, discovery, then every ligand in turn.
///
/// # Errors
///
/// Returns [`EngineError::Preflight`] before touching the filesystem if validation fails.
/// Under [`FailurePolicy::Abort`] the first failing tool invocation ends the batch; I/O
/// errors of the driver itself always do.
#[instrument(skip_all, name = "batch_workflow")]
pub fn run(
    config: &BatchConfig,
    runner: &dyn ToolRunner,
    reporter: &ProgressReporter,
) -> Result<BatchSummary, EngineError> {
    let tools = preflight::validate(config)?;

    let results_dir = config.workspace.results_dir();
    fs::create_dir_all(results_dir).at_path(results_dir)?;

    let ligands = discover_ligands(config.workspace.ligand_dir(), &config.ligand_extension)
        .at_path(config.workspace.ligand_dir())?;
    info!("Found {} ligand(s) to process.", ligands.len());
    reporter.report(Progress::BatchStart {
        total: ligands.len(),
    });

    let driver = LigandDriver {
        config,
        runner,
        reporter,
        docking: DockingTool::new(&tools.docking, &config.workspace, &config.tools),
        extraction: ExtractionTool::new(
            &tools.extraction,
            config.workspace.site(),
            config.num_models,
        ),
    };

    let mut summary = BatchSummary::default();
    let total = ligands.len();
    for (index, ligand) in ligands.iter().enumerate() {
        let outcome = driver.process(ligand, index, total)?;
        summary.outcomes.push((ligand.base_name.clone(), outcome));
    }

    reporter.report(Progress::BatchFinish);
    info!(
        "Batch complete: {} completed, {} skipped, {} without output, {} failed.",
        summary.completed(),
        summary.skipped(),
        summary.no_output(),
        summary.failed()
    );
    Ok(summary)
}

/// Validates the workspace and describes what [`run`] would do, without side effects.
pub fn plan(config: &BatchConfig) -> Result<Vec<PlannedLigand>, EngineError> {
    let ResolvedTools {
        docking,
        extraction,
    } = preflight::validate(config)?;
    let docking_tool = DockingTool::new(&docking, &config.workspace, &config.tools);
    let extraction_tool =
        ExtractionTool::new(&extraction, config.workspace.site(), config.num_models);

    let ligands = discover_ligands(config.workspace.ligand_dir(), &config.ligand_extension)
        .at_path(config.workspace.ligand_dir())?;

    Ok(ligands
        .into_iter()
        .map(|ligand| {
            let layout = config.workspace.layout_for(&ligand, config.num_models);
            PlannedLigand {
                already_done: is_done(config.resume_marker, &layout),
                docking: docking_tool.invocation(&ligand),
                extraction: extraction_tool.invocation(&layout),
                ligand,
                layout,
            }
        })
        .collect())
}

fn is_done(marker: ResumeMarker, layout: &LigandLayout) -> bool {
    match marker {
        ResumeMarker::DockingOutput => layout.docking_output.exists(),
        ResumeMarker::Sentinel => layout.sentinel.exists(),
    }
}

struct LigandDriver<'a> {
    config: &'a BatchConfig,
    runner: &'a dyn ToolRunner,
    reporter: &'a ProgressReporter<'a>,
    docking: DockingTool<'a>,
    extraction: ExtractionTool<'a>,
}

impl LigandDriver<'_> {
    fn process(
        &self,
        ligand: &LigandEntry,
        index: usize,
        total: usize,
    ) -> Result<LigandOutcome, EngineError> {
        let name = ligand.base_name.clone();
        let layout = self
            .config
            .workspace
            .layout_for(ligand, self.config.num_models);
        self.reporter.report(Progress::LigandStart {
            index,
            total,
            name: name.clone(),
        });

        if is_done(self.config.resume_marker, &layout) {
            let marker = match self.config.resume_marker {
                ResumeMarker::DockingOutput => layout.docking_output.clone(),
                ResumeMarker::Sentinel => layout.sentinel.clone(),
            };
            debug!("Skipping '{}': {:?} exists.", name, marker);
            self.reporter.report(Progress::Skipped { name, marker });
            return Ok(LigandOutcome::Skipped);
        }

        let created_dir = !layout.dir.exists();
        fs::create_dir_all(&layout.dir).at_path(&layout.dir)?;

        self.reporter.report(Progress::Running {
            name: name.clone(),
            tool: ToolKind::Docking,
        });
        let log = self.docking.snapshot_log()?;
        let docked = match self.docking.dock(self.runner, ligand, &layout) {
            Ok(outcome) => outcome,
            Err(err) => {
                return self.tool_failure(err, &name, Some((layout.dir.as_path(), created_dir)));
            }
        };
        if docked == DockingOutcome::NoOutput {
            self.reporter.report(Progress::Failed {
                name: name.clone(),
                reason: format!(
                    "docking produced no '{}' file",
                    self.config.tools.docking_output_name
                ),
            });
            discard_dir(&layout.dir, created_dir)?;
            return Ok(LigandOutcome::NoDockingOutput);
        }

        self.reporter.report(Progress::Running {
            name: name.clone(),
            tool: ToolKind::Extraction,
        });
        if let Err(err) = self.extraction.extract(self.runner, ligand, &layout) {
            self.docking.relocate_log(&log, &layout)?;
            return self.tool_failure(err, &name, None);
        }

        if self.docking.relocate_log(&log, &layout)? {
            debug!("Moved docking log for '{}'.", name);
        }

        if self.config.resume_marker == ResumeMarker::Sentinel {
            fs::write(&layout.sentinel, b"").at_path(&layout.sentinel)?;
        }

        self.reporter.report(Progress::Succeeded { name });
        Ok(LigandOutcome::Completed)
    }

    /// Reports a failed tool invocation and applies the failure policy. When `cleanup` is
    /// given, the ligand directory is discarded first so it is not mistaken for a result.
    fn tool_failure(
        &self,
        err: EngineError,
        name: &str,
        cleanup: Option<(&Path, bool)>,
    ) -> Result<LigandOutcome, EngineError> {
        self.reporter.report(Progress::Failed {
            name: name.to_string(),
            reason: err.to_string(),
        });
        if let Some((dir, created)) = cleanup {
            discard_dir(dir, created)?;
        }

        if !err.is_tool_failure() || self.config.failure_policy == FailurePolicy::Abort {
            return Err(err);
        }
        warn!("Continuing after failure of '{}': {}", name, err);
        Ok(LigandOutcome::Failed {
            reason: err.to_string(),
        })
    }
}

/// Removes a ligand directory left without a result. A directory that predates this run is
/// only removed when empty.
fn discard_dir(dir: &Path, created: bool) -> Result<(), EngineError> {
    if created {
        fs::remove_dir_all(dir).at_path(dir)?;
        debug!("Removed {:?}", dir);
    } else if !remove_dir_if_empty(dir).at_path(dir)? {
        warn!("Leaving non-empty directory {:?} in place.", dir);
    }
    Ok(())
}
