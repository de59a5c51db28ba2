use crate::error::{PrepError, Result};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Directory that marks the root of an Obsidian vault
pub const VAULT_MARKER: &str = ".obsidian";

pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|s| s.eq_ignore_ascii_case("md") || s.eq_ignore_ascii_case("markdown"))
        .unwrap_or(false)
}

/// Expand files and directories into the markdown files they contain
pub fn resolve_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if entry.file_type().is_file() && is_markdown(entry.path()) {
                    files.push(entry.path().to_owned());
                }
            }
        }
    }
    files
}

/// Fold `.` and `..` components without touching the filesystem
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Make a path absolute against the process working directory and normalize it
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(normalize_path(path));
    }
    let cwd = std::env::current_dir()?;
    Ok(normalize_path(&cwd.join(path)))
}

/// Walk upwards from a document looking for the vault marker directory.
/// Falls back to the document's own directory.
pub fn find_vault_root(document: &Path) -> PathBuf {
    let start = document.parent().unwrap_or_else(|| Path::new("."));
    start
        .ancestors()
        .find(|dir| dir.join(VAULT_MARKER).is_dir())
        .unwrap_or(start)
        .to_path_buf()
}

/// Replace the extension of a file name, keeping its directory
pub fn replace_extension(path: &Path, extension: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}.{}", stem, extension))
}

/// Write a file atomically through a temporary file in the same directory
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent_dir)?;

    let mut temp_file = NamedTempFile::new_in(parent_dir)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.flush()?;
    temp_file.persist(path).map_err(|e| {
        PrepError::Io(std::io::Error::other(format!(
            "failed to persist {}: {}",
            path.display(),
            e
        )))
    })?;
    Ok(())
}

/// Write content to a fresh temporary markdown file that outlives the process
pub fn write_temporary(content: &str) -> Result<PathBuf> {
    let mut temp_file = tempfile::Builder::new()
        .prefix("pandoc-prep-")
        .suffix(".md")
        .tempfile()?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.flush()?;
    let (_, path) = temp_file.keep().map_err(|e| PrepError::Io(e.error))?;
    Ok(path)
}
