//! Shared fixtures for unit tests: a scratch workspace and a scripted stand-in for the
//! external tools.

use crate::core::process::{ToolInvocation, ToolRunner, ToolStatus};
use crate::core::workspace::LigandEntry;
use crate::engine::config::{BatchConfig, BatchConfigBuilder};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub(crate) struct WorkspaceFixture {
    dir: TempDir,
    pub docking_exe: PathBuf,
    pub extraction_exe: PathBuf,
}

impl WorkspaceFixture {
    pub fn new(ligands: &[&str]) -> Self {
        Self::new_in(&std::env::temp_dir(), ligands)
    }

    /// Creates the scratch workspace as a child of `parent`.
    pub fn new_in(parent: &Path, ligands: &[&str]) -> Self {
        let dir = tempfile::tempdir_in(parent).expect("Failed to create temp dir");
        let root = dir.path();
        fs::write(root.join("R.pdb"), "ATOM receptor\n").unwrap();
        fs::write(root.join("S.txt"), "A:100\n").unwrap();
        fs::create_dir(root.join("Ligands")).unwrap();
        fs::create_dir(root.join("bin")).unwrap();

        let docking_exe = root.join("bin").join("hdock");
        let extraction_exe = root.join("bin").join("createpl");
        for exe in [&docking_exe, &extraction_exe] {
            write_script(exe, "#!/bin/sh\n");
        }

        let fixture = Self {
            dir,
            docking_exe,
            extraction_exe,
        };
        for name in ligands {
            fixture.add_ligand(name);
        }
        fixture
    }

    /// Replaces both tool stubs with real scripts for tests that spawn processes.
    pub fn install_scripts(&self, docking: &str, extraction: &str) {
        write_script(&self.docking_exe, docking);
        write_script(&self.extraction_exe, extraction);
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn add_ligand(&self, name: &str) {
        fs::write(
            self.root().join("Ligands").join(format!("{name}.pdb")),
            format!("HETATM {name}\n"),
        )
        .unwrap();
    }

    pub fn ligand(&self, name: &str) -> LigandEntry {
        LigandEntry::new(self.root().join("Ligands").join(format!("{name}.pdb")), name)
    }

    pub fn builder(&self) -> BatchConfigBuilder {
        BatchConfigBuilder::new()
            .root(self.root().to_path_buf())
            .receptor(PathBuf::from("R.pdb"))
            .site(PathBuf::from("S.txt"))
            .ligand_dir(PathBuf::from("Ligands"))
            .results_dir(PathBuf::from("Results"))
            .docking_program(self.docking_exe.to_string_lossy())
            .extraction_program(self.extraction_exe.to_string_lossy())
    }

    pub fn config(&self) -> BatchConfig {
        self.builder().build().expect("fixture config is valid")
    }

    /// Every file under the results tree, relative to it, sorted.
    pub fn result_files(&self) -> Vec<PathBuf> {
        fn walk(dir: &Path, base: &Path, out: &mut Vec<PathBuf>) {
            let Ok(entries) = fs::read_dir(dir) else {
                return;
            };
            for entry in entries {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    walk(&path, base, out);
                } else {
                    out.push(path.strip_prefix(base).unwrap().to_path_buf());
                }
            }
        }
        let results = self.root().join("Results");
        let mut files = Vec::new();
        walk(&results, &results, &mut files);
        files.sort();
        files
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub invocation: ToolInvocation,
    pub process_cwd: PathBuf,
}

/// Imitates the docking and extraction tools by writing their fixed-name files into the
/// invocation's working directory.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    pub calls: RefCell<Vec<RecordedCall>>,
    failing_docking: HashSet<String>,
    failing_extraction: HashSet<String>,
    without_output: HashSet<String>,
    without_log: HashSet<String>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_docking(mut self, ligand: &str) -> Self {
        self.failing_docking.insert(ligand.to_string());
        self
    }

    pub fn failing_extraction(mut self, ligand: &str) -> Self {
        self.failing_extraction.insert(ligand.to_string());
        self
    }

    pub fn without_output(mut self, ligand: &str) -> Self {
        self.without_output.insert(ligand.to_string());
        self
    }

    pub fn without_log(mut self, ligand: &str) -> Self {
        self.without_log.insert(ligand.to_string());
        self
    }

    pub fn docked_ligands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| is_tool(&c.invocation, "hdock"))
            .map(|c| stem(Path::new(&c.invocation.args()[1])))
            .collect()
    }

    fn dock(&self, invocation: &ToolInvocation) -> io::Result<ToolStatus> {
        let ligand = stem(Path::new(&invocation.args()[1]));
        if self.failing_docking.contains(&ligand) {
            return Ok(ToolStatus::from_code(Some(1)));
        }
        let dir = invocation.working_dir();
        if !self.without_log.contains(&ligand) {
            fs::write(dir.join("hdock.log"), format!("docking log for {ligand}\n"))?;
        }
        if !self.without_output.contains(&ligand) {
            fs::write(dir.join("Hdock.out"), format!("poses for {ligand}\n"))?;
        }
        Ok(ToolStatus::from_code(Some(0)))
    }

    fn extract(&self, invocation: &ToolInvocation) -> io::Result<ToolStatus> {
        let dir = invocation.working_dir();
        let ligand = stem(dir);
        if self.failing_extraction.contains(&ligand) {
            return Ok(ToolStatus::from_code(Some(2)));
        }
        let args = invocation.args();
        let nmax: usize = args
            .iter()
            .position(|a| a == "-nmax")
            .and_then(|i| args.get(i + 1))
            .and_then(|v| v.to_str())
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);
        fs::write(dir.join(&args[1]), format!("top {nmax} for {ligand}\n"))?;
        for i in 1..=nmax {
            fs::write(dir.join(format!("model_{i}.pdb")), format!("model {i}\n"))?;
        }
        Ok(ToolStatus::from_code(Some(0)))
    }
}

impl ToolRunner for ScriptedRunner {
    fn run(&self, invocation: &ToolInvocation) -> io::Result<ToolStatus> {
        self.calls.borrow_mut().push(RecordedCall {
            invocation: invocation.clone(),
            process_cwd: std::env::current_dir()?,
        });
        if is_tool(invocation, "hdock") {
            self.dock(invocation)
        } else {
            self.extract(invocation)
        }
    }
}

fn is_tool(invocation: &ToolInvocation, name: &str) -> bool {
    invocation.program().file_name().is_some_and(|n| n == name)
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn write_script(path: &Path, body: &str) {
    fs::write(path, body).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
