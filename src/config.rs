//! Export configuration
//!
//! Loaded from a YAML file passed with `--config`. Every field has a default,
//! so an empty file (or no file at all) is a valid configuration.

use crate::core::compiler::SchemaPolicy;
use crate::error::{PrepError, Result};
use crate::io::link::VaultConfig;
use crate::io::search::{PathSearch, DEFAULT_SEARCH_DIRS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings shared by every export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExportConfig {
    /// Vault root; discovered from the document when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_root: Option<PathBuf>,

    /// Auxiliary folder searched for templates and other support files.
    /// Relative paths are taken from the vault root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_folder: Option<PathBuf>,

    /// Conventional vault subdirectories searched last
    pub search_dirs: Vec<String>,

    /// Handling of arguments the option schema rejects
    pub schema_policy: SchemaPolicy,

    /// Extra converter arguments, one per line
    pub extra_arguments: String,

    /// Folder receiving exported files instead of the document's own folder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_folder: Option<PathBuf>,

    /// Converter binary
    pub pandoc: PathBuf,

    /// LaTeX engine for formats that need one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdflatex: Option<PathBuf>,

    /// Follow symbolic links while indexing the vault
    pub follow_links: bool,

    /// Index hidden files and directories
    pub include_hidden: bool,

    /// Maximum directory depth indexed below the vault root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            vault_root: None,
            template_folder: None,
            search_dirs: DEFAULT_SEARCH_DIRS.iter().map(|d| d.to_string()).collect(),
            schema_policy: SchemaPolicy::default(),
            extra_arguments: String::new(),
            output_folder: None,
            pandoc: PathBuf::from("pandoc"),
            pdflatex: None,
            follow_links: false,
            include_hidden: false,
            max_depth: None,
        }
    }
}

impl ExportConfig {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| PrepError::invalid_config(path, e.to_string()))?;
        Self::from_yaml(&content).map_err(|e| match e {
            PrepError::Yaml(e) => PrepError::invalid_config(path, e.to_string()),
            other => other,
        })
    }

    /// Parse a configuration document. Blank input yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Extra arguments split on newlines, trimmed, blanks dropped
    pub fn extra_argument_list(&self) -> Vec<String> {
        self.extra_arguments
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn path_search(&self) -> PathSearch {
        PathSearch::new()
            .with_template_folder(self.template_folder.clone())
            .with_search_dirs(self.search_dirs.clone())
    }

    pub fn vault_config(&self) -> VaultConfig {
        VaultConfig {
            follow_links: self.follow_links,
            include_hidden: self.include_hidden,
            max_depth: self.max_depth,
        }
    }
}
