//! Search policy for file-valued arguments
//!
//! A template or bibliography named in front matter is usually written
//! relative to something: the note, the vault, or one of a handful of
//! conventional folders. [`PathSearch`] tries those locations in a fixed order
//! and settles on the first one where the file exists.

use crate::io::fs::normalize_path;
use crate::io::store::DocumentStore;
use log::debug;
use std::path::{Path, PathBuf};

/// Vault subdirectories searched after every other location
pub const DEFAULT_SEARCH_DIRS: &[&str] =
    &["templates", "Templates", "_templates", "pandoc", "assets"];

/// Multi-directory search for file-valued arguments
#[derive(Debug, Clone)]
pub struct PathSearch {
    /// Auxiliary folder; relative values are taken from the root search directory
    template_folder: Option<PathBuf>,
    /// Conventional subdirectories of the root search directory
    search_dirs: Vec<String>,
}

impl Default for PathSearch {
    fn default() -> Self {
        Self {
            template_folder: None,
            search_dirs: DEFAULT_SEARCH_DIRS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl PathSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template_folder(mut self, folder: Option<PathBuf>) -> Self {
        self.template_folder = folder;
        self
    }

    pub fn with_search_dirs(mut self, dirs: Vec<String>) -> Self {
        self.search_dirs = dirs;
        self
    }

    pub fn template_folder(&self) -> Option<&Path> {
        self.template_folder.as_deref()
    }

    pub fn search_dirs(&self) -> &[String] {
        &self.search_dirs
    }

    /// Every location tried for a relative value, in order
    pub fn candidates(&self, value: &str, current_dir: &Path, root_dir: &Path) -> Vec<PathBuf> {
        let mut candidates = vec![current_dir.join(value), root_dir.join(value)];

        if let Some(folder) = &self.template_folder {
            let base = if folder.is_absolute() {
                folder.clone()
            } else {
                root_dir.join(folder)
            };
            candidates.push(base.join(value));
        }

        candidates.extend(
            self.search_dirs
                .iter()
                .map(|dir| root_dir.join(dir).join(value)),
        );

        candidates.iter().map(|c| normalize_path(c)).collect()
    }

    /// Resolve a file-valued argument.
    ///
    /// Absolute values are returned untouched. When no candidate exists the
    /// original value is returned so the converter reports the missing file.
    pub async fn resolve(
        &self,
        store: &dyn DocumentStore,
        value: &str,
        current_dir: &Path,
        root_dir: &Path,
    ) -> String {
        if Path::new(value).is_absolute() {
            return value.to_string();
        }

        for candidate in self.candidates(value, current_dir, root_dir) {
            if store.exists(&candidate).await {
                debug!("Resolved {} to {}", value, candidate.display());
                return candidate.to_string_lossy().into_owned();
            }
        }

        debug!("No file found for {}, passing it through unchanged", value);
        value.to_string()
    }
}
