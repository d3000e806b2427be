use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

/// The state of a fixed-name output file captured before a tool runs.
///
/// Comparing against the snapshot afterwards tells a freshly written file apart from a stale
/// one left behind by an earlier, interrupted run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnapshot {
    path: PathBuf,
    prior: Option<(Option<SystemTime>, u64)>,
}

impl FileSnapshot {
    pub fn capture(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let prior = match fs::metadata(&path) {
            Ok(meta) => Some((meta.modified().ok(), meta.len())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };
        if prior.is_some() {
            warn!(
                "{:?} already exists before invocation; it will only be accepted if rewritten.",
                path
            );
        }
        Ok(Self { path, prior })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file exists now and differs from what was captured.
    pub fn is_fresh(&self) -> io::Result<bool> {
        let meta = match fs::metadata(&self.path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };
        if !meta.is_file() {
            return Ok(false);
        }
        Ok(match self.prior {
            None => true,
            Some((modified, len)) => meta.modified().ok() != modified || meta.len() != len,
        })
    }
}

/// Moves `from` to `to`, falling back to copy-and-delete when a rename is not possible
/// (for example when the results tree lives on another filesystem).
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) if from.is_file() => {
            debug!(
                "Rename {:?} -> {:?} failed ({}), copying instead.",
                from, to, rename_err
            );
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}

/// Removes `dir` only if it has no entries. Returns whether it was removed.
pub fn remove_dir_if_empty(dir: &Path) -> io::Result<bool> {
    if fs::read_dir(dir)?.next().is_some() {
        return Ok(false);
    }
    fs::remove_dir(dir)?;
    Ok(true)
}
