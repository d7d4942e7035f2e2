//! Directory enumeration helpers

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// List the names of the immediate subdirectories of `path`, sorted.
///
/// A missing directory yields an empty list.
pub fn list_dirs(path: &Path) -> Result<Vec<String>> {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::io(path, e)),
    };

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(path, e))?;
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        if file_type.is_dir() {
            dirs.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    dirs.sort();
    Ok(dirs)
}

/// List the regular files directly inside `path`, sorted by name.
///
/// A missing directory yields an empty list.
pub fn list_dir_files(path: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::io(path, e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(path, e))?;
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        if file_type.is_file() {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

/// Recursively list every file under each of `dirs`.
///
/// Paths are relative to the directory they were found in and use `/` as the
/// separator. The result is sorted.
pub fn list_files<P: AsRef<Path>>(dirs: &[P]) -> Result<Vec<String>> {
    let mut files = Vec::new();

    for dir in dirs {
        let dir = dir.as_ref();
        collect_files(dir, dir, &mut files)?;
    }

    files.sort();
    Ok(files)
}

fn collect_files(root: &Path, current: &Path, out: &mut Vec<String>) -> Result<()> {
    let entries = match fs::read_dir(current) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::io(current, e)),
    };

    for entry in entries {
        let entry = entry.map_err(|e| Error::io(current, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;

        if file_type.is_dir() {
            collect_files(root, &path, out)?;
        } else if let Ok(relative) = path.strip_prefix(root) {
            let parts: Vec<_> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            out.push(parts.join("/"));
        }
    }

    Ok(())
}
