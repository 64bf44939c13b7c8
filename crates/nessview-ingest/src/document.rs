//! One parsed input file and batch loading

use crate::report::Report;
use crate::schema::SchemaVersion;
use crate::xml::Element;
use chrono::{DateTime, Utc};
use nessview_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Parse statistics for one document
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LoadStats {
    /// Report items seen
    pub items_processed: u32,
    /// Items that became findings
    pub items_imported: u32,
    /// Items skipped because a required field was missing or invalid
    pub items_skipped: u32,
}

/// One input file: its reports and load-time metadata
///
/// Created once per file at load time and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    source_path: PathBuf,
    display_name: String,
    version: SchemaVersion,
    reports: Vec<Report>,
    loaded_at: DateTime<Utc>,
    stats: LoadStats,
}

impl Document {
    /// Build a document from an already-parsed tree
    ///
    /// The root tag picks the schema version; an unknown root tag is an
    /// `UnrecognizedFormat` error. Any report-level required-field
    /// failure fails the whole document.
    pub fn from_tree(root: &Element, source_path: impl AsRef<Path>) -> Result<Self> {
        let source_path = source_path.as_ref().to_path_buf();
        let display_name = source_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| source_path.display().to_string());

        let version = SchemaVersion::from_root_tag(root.name()).ok_or_else(|| {
            Error::UnrecognizedFormat {
                path: source_path.display().to_string(),
                root: root.name().to_string(),
            }
        })?;

        let mut stats = LoadStats::default();
        let mut reports = Vec::new();
        for report_element in root.children("Report") {
            reports.push(Report::from_element(report_element, version, &mut stats)?);
        }

        info!(
            path = %source_path.display(),
            version = %version,
            reports = reports.len(),
            imported = stats.items_imported,
            skipped = stats.items_skipped,
            "loaded report document"
        );

        Ok(Self {
            source_path,
            display_name,
            version,
            reports,
            loaded_at: Utc::now(),
            stats,
        })
    }

    /// Read and parse a file eagerly, then build the document
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let root = Element::parse(&content)?;
        Self::from_tree(&root, path)
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Basename of the source path
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }
}

/// A failed document load within a batch
#[derive(Debug)]
pub struct LoadError {
    pub path: PathBuf,
    pub error: Error,
}

/// Outcome of loading a batch of files: every document that parsed plus
/// an error per file that did not
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub documents: Vec<Document>,
    pub errors: Vec<LoadError>,
}

/// Load a batch of report files; one bad file never blocks the rest
pub fn load_documents<P: AsRef<Path>>(paths: &[P]) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();

    for path in paths {
        let path = path.as_ref();
        match Document::from_path(path) {
            Ok(document) => outcome.documents.push(document),
            Err(error) => {
                warn!(path = %path.display(), code = error.code(), "failed to load document: {error}");
                outcome.errors.push(LoadError {
                    path: path.to_path_buf(),
                    error,
                });
            }
        }
    }

    outcome
}
