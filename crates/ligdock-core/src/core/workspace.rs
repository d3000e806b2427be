use std::path::{Path, PathBuf};

/// Suffix appended to a ligand's base name for the relocated docking result.
pub const DOCKING_OUTPUT_SUFFIX: &str = "_hdock.out";
/// Suffix appended to a ligand's base name for the relocated docking log.
pub const DOCKING_LOG_SUFFIX: &str = "_hdock.log";
/// Extension of the completion sentinel used by sentinel-based resumption.
pub const SENTINEL_EXTENSION: &str = "done";

/// The set of input and output locations a batch operates on.
///
/// Every path is stored in resolved form: relative inputs are joined onto the workspace
/// root at construction time, absolute inputs are kept as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
    receptor: PathBuf,
    site: PathBuf,
    ligand_dir: PathBuf,
    results_dir: PathBuf,
}

impl Workspace {
    pub fn new(
        root: impl Into<PathBuf>,
        receptor: impl AsRef<Path>,
        site: impl AsRef<Path>,
        ligand_dir: impl AsRef<Path>,
        results_dir: impl AsRef<Path>,
    ) -> Self {
        let root = root.into();
        Self {
            receptor: root.join(receptor),
            site: root.join(site),
            ligand_dir: root.join(ligand_dir),
            results_dir: root.join(results_dir),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn receptor(&self) -> &Path {
        &self.receptor
    }

    pub fn site(&self) -> &Path {
        &self.site
    }

    pub fn ligand_dir(&self) -> &Path {
        &self.ligand_dir
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Location of a fixed-name artifact dropped into the workspace root by a tool.
    pub fn root_artifact(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    pub fn layout_for(&self, ligand: &LigandEntry, num_models: usize) -> LigandLayout {
        LigandLayout::new(&self.results_dir, &ligand.base_name, num_models)
    }
}

/// A single ligand structure file, identified by its base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LigandEntry {
    pub path: PathBuf,
    pub base_name: String,
}

impl LigandEntry {
    pub fn new(path: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            base_name: base_name.into(),
        }
    }
}

/// Every output path owned by one ligand inside the results tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LigandLayout {
    pub dir: PathBuf,
    pub docking_output: PathBuf,
    pub docking_log: PathBuf,
    pub top_models: PathBuf,
    pub sentinel: PathBuf,
}

impl LigandLayout {
    pub fn new(results_dir: &Path, base_name: &str, num_models: usize) -> Self {
        let dir = results_dir.join(base_name);
        Self {
            docking_output: dir.join(format!("{base_name}{DOCKING_OUTPUT_SUFFIX}")),
            docking_log: dir.join(format!("{base_name}{DOCKING_LOG_SUFFIX}")),
            top_models: dir.join(format!("{base_name}_top{num_models}.pdb")),
            sentinel: dir.join(format!("{base_name}.{SENTINEL_EXTENSION}")),
            dir,
        }
    }

    /// Bare file name of the combined top-N model file, as handed to the extraction tool.
    pub fn top_models_file_name(&self) -> &std::ffi::OsStr {
        self.top_models
            .file_name()
            .unwrap_or_else(|| self.top_models.as_os_str())
    }
}
