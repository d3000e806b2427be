use crate::core::workspace::LigandEntry;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, trace, warn};

/// Lists the ligand structure files directly inside `dir`.
///
/// Only regular files (symlinks are followed) whose name ends in `.{extension}` are
/// returned; subdirectories are never descended into. The base name is the file name with
/// that suffix removed, so `x.y.pdb` becomes `x.y`. The result is sorted by file name, which
/// keeps progress output stable between runs but carries no other meaning.
///
/// # Errors
///
/// Returns the underlying I/O error if `dir` cannot be read.
pub fn discover_ligands(dir: &Path, extension: &str) -> io::Result<Vec<LigandEntry>> {
    let suffix = format!(".{}", extension.trim_start_matches('.'));
    let mut ligands = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            trace!("Ignoring non-file entry {:?}", path);
            continue;
        }

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!("Skipping ligand file with a non UTF-8 name: {:?}", path);
            continue;
        };

        match file_name.strip_suffix(suffix.as_str()) {
            Some(base) if !base.is_empty() => {
                let base_name = base.to_string();
                ligands.push(LigandEntry { path, base_name });
            }
            _ => trace!("Ignoring {:?}: not a '{}' file", path, suffix),
        }
    }

    ligands.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    debug!("Discovered {} ligand(s) in {:?}", ligands.len(), dir);
    Ok(ligands)
}
