//! Source tree walker
//!
//! Enumerates candidate source files under a root, honoring `.gitignore`,
//! the configured excluded directory names and the size limit.

use crate::error::{Result, ScanError};
use ignore::WalkBuilder;
use mcpwrap_config::ScanSettings;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Files found by a walk
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// Candidate files, sorted by path
    pub files: Vec<PathBuf>,
    /// Matching files that were left out, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

pub struct SourceWalker<'a> {
    root: &'a Path,
    settings: &'a ScanSettings,
}

impl<'a> SourceWalker<'a> {
    pub fn new(root: &'a Path, settings: &'a ScanSettings) -> Self {
        Self { root, settings }
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.settings
                    .extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    /// Walk the tree; a root that is a single file yields just that file
    pub fn discover(&self) -> Result<Discovery> {
        if !self.root.exists() {
            return Err(ScanError::PathNotFound(self.root.to_path_buf()));
        }

        let excluded: HashSet<String> = self.settings.exclude_dirs.iter().cloned().collect();
        let respect_gitignore = self.settings.respect_gitignore;

        let walker = WalkBuilder::new(self.root)
            .git_ignore(respect_gitignore)
            .git_global(respect_gitignore)
            .git_exclude(respect_gitignore)
            .require_git(false)
            .hidden(false) // Don't skip hidden files - let gitignore and exclusions handle it
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                !(is_dir
                    && entry.depth() > 0
                    && excluded.contains(entry.file_name().to_string_lossy().as_ref()))
            })
            .build();

        let mut discovery = Discovery::default();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Walk error under {}: {}", self.root.display(), e);
                    continue;
                }
            };
            let path = entry.path();

            if !path.is_file() || !self.has_source_extension(path) {
                continue;
            }

            let metadata = match std::fs::metadata(path) {
                Ok(m) => m,
                Err(e) => {
                    discovery.skipped.push((path.to_path_buf(), e.to_string()));
                    continue;
                }
            };

            if metadata.len() > self.settings.max_file_size {
                discovery.skipped.push((
                    path.to_path_buf(),
                    format!(
                        "file too large ({} bytes, max {} bytes)",
                        metadata.len(),
                        self.settings.max_file_size
                    ),
                ));
                continue;
            }

            trace!("Discovered {}", path.display());
            discovery.files.push(path.to_path_buf());
        }

        discovery.files.sort();
        discovery.skipped.sort();
        debug!(
            "Discovered {} source files ({} skipped) under {}",
            discovery.files.len(),
            discovery.skipped.len(),
            self.root.display()
        );
        Ok(discovery)
    }
}
