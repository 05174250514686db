//! Scan orchestration
//!
//! walk → parse (parallel) → registry pass (parallel, full barrier) →
//! route pass (parallel) → endpoints in file order.

use crate::endpoint::Endpoint;
use crate::error::{Result, ScanError};
use crate::extractor::{Extraction, RouteExtractor};
use crate::parser::SourceParser;
use crate::registry::ModelRegistry;
use crate::syntax::Module;
use crate::walker::SourceWalker;
use mcpwrap_common::{Diagnostic, ErrorSeverity};
use mcpwrap_config::ScanSettings;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Summary of one scan run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub root: PathBuf,
    pub files_discovered: usize,
    pub files_parsed: usize,
    pub files_skipped: usize,
    pub models_registered: usize,
    pub endpoints_found: usize,
    /// Recovered failures in the order they were found
    pub diagnostics: Vec<Diagnostic>,
    pub total_time_ms: u64,
}

impl ScanReport {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == ErrorSeverity::Warning)
    }
}

/// Result of a successful scan
#[derive(Debug)]
pub struct ScanOutput {
    pub endpoints: Vec<Endpoint>,
    pub registry: ModelRegistry,
    pub report: ScanReport,
}

/// Scans a source tree for route-annotated functions
///
/// Every call starts from an empty registry; nothing is cached between runs.
pub struct Scanner {
    root: PathBuf,
    settings: ScanSettings,
}

impl Scanner {
    pub fn new(root: impl AsRef<Path>, settings: ScanSettings) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            settings,
        }
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    /// Run both passes over the tree
    ///
    /// Fails only when the root is missing or holds no parseable source.
    pub fn scan(&self) -> Result<ScanOutput> {
        let start = Instant::now();
        let mut report = ScanReport {
            root: self.root.clone(),
            ..Default::default()
        };

        let discovery = SourceWalker::new(&self.root, &self.settings).discover()?;
        report.files_discovered = discovery.files.len() + discovery.skipped.len();
        for (path, reason) in &discovery.skipped {
            warn!("Skipping {}: {}", path.display(), reason);
            report
                .diagnostics
                .push(Diagnostic::warning(path.display().to_string(), reason.clone()));
        }
        report.files_skipped = discovery.skipped.len();

        if discovery.files.is_empty() {
            return Err(ScanError::NoSourceFiles(self.root.clone()));
        }
        info!(
            "Discovered {} files to parse in {}",
            discovery.files.len(),
            self.root.display()
        );

        let parsed: Vec<(PathBuf, Result<Module>)> = discovery
            .files
            .par_iter()
            .map(|path| {
                let module = SourceParser::new().and_then(|mut parser| parser.parse_file(path));
                (path.clone(), module)
            })
            .collect();

        let mut modules = Vec::with_capacity(parsed.len());
        for (path, result) in parsed {
            match result {
                Ok(module) => modules.push(module),
                Err(err) => {
                    warn!("Skipping {}: {}", path.display(), err);
                    report
                        .diagnostics
                        .push(Diagnostic::from_error(path.display().to_string(), &err));
                    report.files_skipped += 1;
                }
            }
        }
        report.files_parsed = modules.len();

        if modules.is_empty() {
            return Err(ScanError::NoSourceFiles(self.root.clone()));
        }

        // Pass 1 completes for every module before pass 2 reads the registry
        let (registry, registry_diagnostics) = ModelRegistry::build(&modules, &self.settings);
        report.diagnostics.extend(registry_diagnostics);
        report.models_registered = registry.len();
        info!("Registered {} models", registry.len());

        let extractor = RouteExtractor::new(&registry);
        let extractions: Vec<Extraction> = modules
            .par_iter()
            .map(|module| extractor.extract(module))
            .collect();

        let mut endpoints = Vec::new();
        for extraction in extractions {
            endpoints.extend(extraction.endpoints);
            report.diagnostics.extend(extraction.diagnostics);
        }
        report.endpoints_found = endpoints.len();
        report.total_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "Found {} endpoints in {} files ({} skipped, {} diagnostics) in {}ms",
            report.endpoints_found,
            report.files_parsed,
            report.files_skipped,
            report.diagnostics.len(),
            report.total_time_ms
        );

        Ok(ScanOutput {
            endpoints,
            registry,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpwrap_common::Severity;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_root_is_fatal() {
        let temp = TempDir::new().unwrap();
        let err = Scanner::new(temp.path().join("missing"), ScanSettings::default())
            .scan()
            .unwrap_err();
        assert!(matches!(err, ScanError::PathNotFound(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_empty_root_is_fatal() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("notes.txt"), "nothing here").unwrap();
        let err = Scanner::new(temp.path(), ScanSettings::default())
            .scan()
            .unwrap_err();
        assert!(matches!(err, ScanError::NoSourceFiles(_)));
    }

    #[test]
    fn test_only_unparseable_files_is_fatal() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("bad.py"), "def (:\n").unwrap();
        let err = Scanner::new(temp.path(), ScanSettings::default())
            .scan()
            .unwrap_err();
        assert!(matches!(err, ScanError::NoSourceFiles(_)));
    }

    #[test]
    fn test_report_counts() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("main.py"),
            "@app.get(\"/health\")\ndef health():\n    return {\"ok\": True}\n",
        )
        .unwrap();
        fs::write(temp.path().join("broken.py"), "class (:\n").unwrap();

        let output = Scanner::new(temp.path(), ScanSettings::default())
            .scan()
            .unwrap();
        let report = &output.report;
        assert_eq!(report.files_discovered, 2);
        assert_eq!(report.files_parsed, 1);
        assert_eq!(report.files_skipped, 1);
        assert_eq!(report.endpoints_found, 1);
        assert_eq!(report.warnings().count(), 1);
        assert!(report.diagnostics[0].location.ends_with("broken.py"));
    }
}
