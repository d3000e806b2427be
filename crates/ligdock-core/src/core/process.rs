use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// A fully described external program call.
///
/// The working directory is part of the description: tools that drop fixed-name files into
/// their current directory are always pointed at an explicit location, and the driver's own
/// current directory is never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    program: PathBuf,
    args: Vec<OsString>,
    working_dir: PathBuf,
}

impl ToolInvocation {
    pub fn new(program: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.into(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Shell-like rendering used for logs and dry-run plans.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|part| part.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How an external program terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStatus {
    code: Option<i32>,
}

impl ToolStatus {
    pub fn from_code(code: Option<i32>) -> Self {
        Self { code }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// `None` when the process was terminated by a signal.
    pub fn code(&self) -> Option<i32> {
        self.code
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// Executes [`ToolInvocation`]s and blocks until they finish.
pub trait ToolRunner {
    fn run(&self, invocation: &ToolInvocation) -> io::Result<ToolStatus>;
}

/// Runs invocations as child processes, inheriting stdout and stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(&self, invocation: &ToolInvocation) -> io::Result<ToolStatus> {
        debug!(
            "Spawning `{}` in {:?}",
            invocation.command_line(),
            invocation.working_dir()
        );
        let status = Command::new(invocation.program())
            .args(invocation.args())
            .current_dir(invocation.working_dir())
            .status()?;
        Ok(ToolStatus::from_code(status.code()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_joins_program_and_arguments() {
        let invocation = ToolInvocation::new("/opt/bin/hdock", "/w")
            .arg("R.pdb")
            .arg("L.pdb")
            .arg("-rsite")
            .arg("S.txt");

        assert_eq!(invocation.command_line(), "/opt/bin/hdock R.pdb L.pdb -rsite S.txt");
        assert_eq!(invocation.working_dir(), Path::new("/w"));
        assert_eq!(invocation.args().len(), 4);
    }

    #[test]
    fn status_reports_success_only_for_zero() {
        assert!(ToolStatus::from_code(Some(0)).success());
        assert!(!ToolStatus::from_code(Some(2)).success());
        assert!(!ToolStatus::from_code(None).success());
    }

    #[test]
    fn status_display_distinguishes_signals() {
        assert_eq!(ToolStatus::from_code(Some(3)).to_string(), "exit code 3");
        assert_eq!(ToolStatus::from_code(None).to_string(), "terminated by signal");
    }

    #[cfg(unix)]
    #[test]
    fn process_runner_uses_the_invocation_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let before = std::env::current_dir().unwrap();

        let invocation = ToolInvocation::new("sh", dir.path())
            .arg("-c")
            .arg("touch marker.txt");
        let status = ProcessRunner.run(&invocation).unwrap();

        assert!(status.success());
        assert!(dir.path().join("marker.txt").is_file());
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[cfg(unix)]
    #[test]
    fn process_runner_surfaces_non_zero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let invocation = ToolInvocation::new("sh", dir.path()).arg("-c").arg("exit 7");

        let status = ProcessRunner.run(&invocation).unwrap();

        assert_eq!(status.code(), Some(7));
    }

    #[test]
    fn process_runner_reports_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let invocation = ToolInvocation::new(dir.path().join("no-such-tool"), dir.path());

        assert!(ProcessRunner.run(&invocation).is_err());
    }
}
