use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::{ExtensionTable, FileClass};
use crate::model::Language;

/// A discovered source file with the language that will extract it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub language: Language,
}

/// Configuration for file discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Glob patterns to include (empty means include all).
    pub include: Vec<String>,
    /// Glob patterns to exclude.
    pub exclude: Vec<String>,
}

/// Build output and IDE directories of JVM projects.
const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["target/", "build/", ".gradle/", ".idea/", ".git/"];

/// Find every file under `root` that an extractor can handle, respecting
/// .gitignore. A `root` naming a single file is classified directly.
pub fn discover_files(
    root: &Path,
    config: &DiscoveryConfig,
    table: &ExtensionTable,
) -> Result<Vec<DiscoveredFile>> {
    let metadata =
        std::fs::metadata(root).with_context(|| format!("cannot read {}", root.display()))?;
    if metadata.is_file() {
        return Ok(classify(root, table).into_iter().collect());
    }

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .parents(true);

    let mut overrides = ignore::overrides::OverrideBuilder::new(root);
    for pattern in DEFAULT_EXCLUDE_PATTERNS {
        overrides
            .add(&format!("!{}", pattern))
            .context("invalid default exclude pattern")?;
    }
    for pattern in &config.exclude {
        overrides
            .add(&format!("!{}", pattern))
            .with_context(|| format!("invalid exclude pattern `{}`", pattern))?;
    }
    for pattern in &config.include {
        overrides
            .add(pattern)
            .with_context(|| format!("invalid include pattern `{}`", pattern))?;
    }
    builder.overrides(overrides.build().context("failed to build overrides")?);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry.context("error reading directory entry")?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        if let Some(file) = classify(entry.path(), table) {
            files.push(file);
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(root = %root.display(), files = files.len(), "discovered source files");
    Ok(files)
}

fn classify(path: &Path, table: &ExtensionTable) -> Option<DiscoveredFile> {
    let ext = path.extension().and_then(|e| e.to_str())?;
    match table.classify(ext) {
        FileClass::Implemented(language) => Some(DiscoveredFile {
            path: path.to_path_buf(),
            language,
        }),
        FileClass::Planned => {
            debug!(path = %path.display(), "no extractor for this language yet");
            None
        }
        FileClass::NotSource | FileClass::Unknown => {
            trace!(path = %path.display(), "not a source file");
            None
        }
    }
}
