use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::discovery::{discover_files, DiscoveredFile};
use crate::model::{ClassInfo, FileName};
use crate::parser::{ExtractionOutcome, ExtractorRegistry, SyntaxError};

/// What happened to one file during a scan.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Extracted {
        classes: Vec<ClassInfo>,
        /// Syntax errors tolerated in recovery mode.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        recovered: Vec<SyntaxError>,
    },
    SyntaxFailed {
        errors: Vec<SyntaxError>,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    #[serde(flatten)]
    pub status: FileStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub files: usize,
    pub extracted: usize,
    pub syntax_failed: usize,
    pub errors: usize,
    pub classes: usize,
    pub methods: usize,
    pub fields: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub files: Vec<FileReport>,
    pub summary: ScanSummary,
    pub duration_ms: u128,
}

/// Extract every discovered file under `root`. Files are independent, so a
/// failure in one is recorded in its report and never stops the scan.
pub fn run_scan(root: &Path, config: &Config) -> Result<ScanResult> {
    let start = Instant::now();

    let discovered = discover_files(root, &config.discovery, &config.extensions)
        .with_context(|| format!("failed to discover files under {}", root.display()))?;
    info!(files = discovered.len(), "scanning");

    let registry = ExtractorRegistry::with_defaults(&config.extract);
    let base = scan_base(root);

    let files: Vec<FileReport> = discovered
        .par_iter()
        .map(|df| scan_file(&registry, &base, df))
        .collect();

    let summary = summarize(&files);
    let duration = start.elapsed();
    debug!(?summary, "scan finished");

    Ok(ScanResult {
        files,
        summary,
        duration_ms: duration.as_millis(),
    })
}

fn scan_file(registry: &ExtractorRegistry, base: &Path, df: &DiscoveredFile) -> FileReport {
    let path = relative_name(base, &df.path);
    let status = match extract_file(registry, &path, df) {
        Ok(ExtractionOutcome::Parsed { classes, recovered }) => {
            FileStatus::Extracted { classes, recovered }
        }
        Ok(ExtractionOutcome::Failed { errors }) => FileStatus::SyntaxFailed { errors },
        Err(e) => {
            warn!(file = %path, "extraction failed: {:#}", e);
            FileStatus::Error {
                message: format!("{:#}", e),
            }
        }
    };
    FileReport { path, status }
}

fn extract_file(
    registry: &ExtractorRegistry,
    name: &str,
    df: &DiscoveredFile,
) -> Result<ExtractionOutcome> {
    let source = std::fs::read_to_string(&df.path)
        .with_context(|| format!("failed to read {}", df.path.display()))?;
    registry.extract(&source, &FileName::new(name), df.language)
}

/// Directory that report paths are relative to. A single-file scan reports
/// the bare file name.
fn scan_base(root: &Path) -> PathBuf {
    if root.is_file() {
        root.parent().map(Path::to_path_buf).unwrap_or_default()
    } else {
        root.to_path_buf()
    }
}

/// `path` relative to `base`, with `/` separators on every platform.
fn relative_name(base: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn summarize(files: &[FileReport]) -> ScanSummary {
    let mut summary = ScanSummary {
        files: files.len(),
        ..Default::default()
    };
    for report in files {
        match &report.status {
            FileStatus::Extracted { classes, .. } => {
                summary.extracted += 1;
                for class in classes.iter().flat_map(|c| c.walk()) {
                    summary.classes += 1;
                    summary.methods += class.methods.len();
                    summary.fields += class.fields.len();
                }
            }
            FileStatus::SyntaxFailed { .. } => summary.syntax_failed += 1,
            FileStatus::Error { .. } => summary.errors += 1,
        }
    }
    summary
}
