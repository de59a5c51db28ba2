//! Wiki-link resolution
//!
//! Turns the target of `![[target]]` into the path of a document in the
//! vault, the way Obsidian does: relative to the linking note first, then
//! relative to the vault root, then by matching the link as a path suffix
//! anywhere in the vault.

use crate::error::{PrepError, Result};
use crate::io::fs::normalize_path;
use log::debug;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Resolves a link name to a document path
pub trait LinkResolver: Send + Sync {
    /// Resolve `name` as written in a note living in `scope_dir`.
    ///
    /// Must be deterministic for a fixed vault state.
    fn resolve_link(&self, name: &str, scope_dir: &Path) -> Option<PathBuf>;
}

/// Configuration for scanning a vault
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Follow symbolic links
    pub follow_links: bool,
    /// Include hidden files and directories (starting with .)
    pub include_hidden: bool,
    /// Maximum recursion depth for directory traversal
    pub max_depth: Option<usize>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            follow_links: false,
            include_hidden: false,
            max_depth: None,
        }
    }
}

/// Link resolver backed by a snapshot of the files in a vault
#[derive(Debug, Clone)]
pub struct VaultLinkResolver {
    root: PathBuf,
    files: BTreeSet<PathBuf>,
}

impl VaultLinkResolver {
    /// Scan a vault directory with the default configuration
    pub fn scan(root: impl AsRef<Path>) -> Result<Self> {
        Self::scan_with_config(root, &VaultConfig::default())
    }

    /// Scan a vault directory
    pub fn scan_with_config(root: impl AsRef<Path>, config: &VaultConfig) -> Result<Self> {
        let root = normalize_path(root.as_ref());
        if !root.is_dir() {
            return Err(PrepError::path_resolution(format!(
                "vault root is not a directory: {}",
                root.display()
            )));
        }

        let walker = WalkDir::new(&root)
            .follow_links(config.follow_links)
            .max_depth(config.max_depth.unwrap_or(usize::MAX))
            .into_iter()
            .filter_entry(|entry| {
                config.include_hidden || entry.depth() == 0 || !is_hidden(entry.path())
            });

        let mut files = BTreeSet::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                PrepError::path_resolution(format!("error traversing vault: {}", e))
            })?;
            if entry.file_type().is_file() {
                files.insert(normalize_path(entry.path()));
            }
        }

        debug!("Indexed {} files under {}", files.len(), root.display());
        Ok(Self { root, files })
    }

    /// Build a resolver over an explicit set of files
    pub fn from_files<I, P>(root: impl AsRef<Path>, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            root: normalize_path(root.as_ref()),
            files: files
                .into_iter()
                .map(|p| normalize_path(p.as_ref()))
                .collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files whose vault-relative path ends with `link`, shortest path first
    fn suffix_matches(&self, link: &Path) -> Option<PathBuf> {
        let mut matches: Vec<&PathBuf> = self
            .files
            .iter()
            .filter(|file| {
                file.strip_prefix(&self.root)
                    .map(|relative| relative.ends_with(link))
                    .unwrap_or(false)
            })
            .collect();
        matches.sort_by_key(|file| (file.components().count(), (*file).clone()));
        matches.first().map(|file| (*file).clone())
    }
}

impl LinkResolver for VaultLinkResolver {
    fn resolve_link(&self, name: &str, scope_dir: &Path) -> Option<PathBuf> {
        let link = link_path(name)?;

        for candidate in candidates(&link) {
            for base in [scope_dir, self.root.as_path()] {
                let path = normalize_path(&base.join(&candidate));
                if self.files.contains(&path) {
                    return Some(path);
                }
            }
            if let Some(path) = self.suffix_matches(&candidate) {
                return Some(path);
            }
        }
        None
    }
}

/// Strip heading (`#...`) and block (`#^...`) references from a link target
fn link_path(name: &str) -> Option<PathBuf> {
    let target = name.split('#').next().unwrap_or_default().trim();
    if target.is_empty() {
        None
    } else {
        Some(PathBuf::from(target))
    }
}

/// The literal link plus its `.md` form when it has no markdown extension
fn candidates(link: &Path) -> Vec<PathBuf> {
    let with_md = {
        let mut name = link.as_os_str().to_owned();
        name.push(".md");
        PathBuf::from(name)
    };
    if link.extension().is_some() {
        vec![link.to_path_buf(), with_md]
    } else {
        vec![with_md, link.to_path_buf()]
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn resolver() -> VaultLinkResolver {
        VaultLinkResolver::from_files(
            "/vault",
            [
                "/vault/index.md",
                "/vault/chapters/intro.md",
                "/vault/chapters/part 2/intro.md",
                "/vault/archive/intro.md",
                "/vault/shared/snippet.md",
                "/vault/assets/diagram.png",
                "/vault/Chapter 1.2.md",
            ],
        )
    }

    #[test]
    fn test_resolves_relative_to_scope() {
        let r = resolver();
        assert_eq!(
            r.resolve_link("intro", Path::new("/vault/chapters/part 2")),
            Some(PathBuf::from("/vault/chapters/part 2/intro.md"))
        );
    }

    #[test]
    fn test_falls_back_to_vault_root() {
        let r = resolver();
        assert_eq!(
            r.resolve_link("index", Path::new("/vault/chapters")),
            Some(PathBuf::from("/vault/index.md"))
        );
        assert_eq!(
            r.resolve_link("shared/snippet", Path::new("/vault/chapters")),
            Some(PathBuf::from("/vault/shared/snippet.md"))
        );
    }

    #[test]
    fn test_suffix_match_prefers_shortest_then_lexical() {
        let r = resolver();
        // Not next to the note and not at the root: archive/intro.md and
        // chapters/intro.md tie on depth, archive sorts first
        assert_eq!(
            r.resolve_link("intro", Path::new("/vault/shared")),
            Some(PathBuf::from("/vault/archive/intro.md"))
        );
        assert_eq!(
            r.resolve_link("snippet", Path::new("/vault/chapters")),
            Some(PathBuf::from("/vault/shared/snippet.md"))
        );
    }

    #[test]
    fn test_explicit_extension_and_dotted_names() {
        let r = resolver();
        assert_eq!(
            r.resolve_link("diagram.png", Path::new("/vault")),
            Some(PathBuf::from("/vault/assets/diagram.png"))
        );
        assert_eq!(
            r.resolve_link("Chapter 1.2", Path::new("/vault")),
            Some(PathBuf::from("/vault/Chapter 1.2.md"))
        );
    }

    #[test]
    fn test_heading_and_block_references_are_dropped() {
        let r = resolver();
        assert_eq!(
            r.resolve_link("index#Summary", Path::new("/vault")),
            Some(PathBuf::from("/vault/index.md"))
        );
        assert_eq!(
            r.resolve_link("index#^block-1", Path::new("/vault")),
            Some(PathBuf::from("/vault/index.md"))
        );
        assert_eq!(r.resolve_link("#Summary", Path::new("/vault")), None);
    }

    #[test]
    fn test_unknown_link() {
        assert_eq!(resolver().resolve_link("nowhere", Path::new("/vault")), None);
    }

    #[test]
    fn test_scan_skips_hidden_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".obsidian")).unwrap();
        fs::create_dir_all(dir.path().join("notes")).unwrap();
        fs::write(dir.path().join(".obsidian/workspace.md"), "x").unwrap();
        fs::write(dir.path().join("notes/a.md"), "a").unwrap();

        let r = VaultLinkResolver::scan(dir.path()).unwrap();
        assert_eq!(r.len(), 1);
        assert_eq!(
            r.resolve_link("a", dir.path()),
            Some(normalize_path(&dir.path().join("notes/a.md")))
        );
        assert_eq!(r.resolve_link("workspace", dir.path()), None);
    }

    #[test]
    fn test_scan_rejects_missing_root() {
        assert!(VaultLinkResolver::scan("/definitely/not/a/vault").is_err());
    }
}
