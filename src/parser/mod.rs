use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ClassInfo, FileName, Language};

pub mod java;
pub mod syntax;

pub use syntax::{CollectingListener, LogListener, SyntaxError, SyntaxErrorKind, SyntaxErrorListener};

/// Failures that stop extraction of a single file.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to load {language} grammar: {source}")]
    Grammar {
        language: Language,
        #[source]
        source: tree_sitter::LanguageError,
    },

    #[error("tree-sitter produced no tree for {file}")]
    NoTree { file: FileName },

    #[error("{kind} at line {line} has no `{field}`")]
    MissingField {
        kind: String,
        field: &'static str,
        line: usize,
    },
}

/// Knobs for the extraction core. Everything defaults to off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Extract from trees containing syntax errors instead of failing the file.
    pub recover_partial_trees: bool,
    /// Resolve written modifiers on members and nested types. When off,
    /// members are `public` and nested types `private`.
    pub resolve_member_modifiers: bool,
}

/// What extracting one file produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// The tree was usable. `classes` may legitimately be empty.
    Parsed {
        classes: Vec<ClassInfo>,
        /// Syntax errors tolerated under `recover_partial_trees`.
        recovered: Vec<SyntaxError>,
    },
    /// The file did not parse; nothing was extracted.
    Failed { errors: Vec<SyntaxError> },
}

impl ExtractionOutcome {
    pub fn classes(&self) -> &[ClassInfo] {
        match self {
            ExtractionOutcome::Parsed { classes, .. } => classes,
            ExtractionOutcome::Failed { .. } => &[],
        }
    }

    pub fn into_classes(self) -> Vec<ClassInfo> {
        match self {
            ExtractionOutcome::Parsed { classes, .. } => classes,
            ExtractionOutcome::Failed { .. } => Vec::new(),
        }
    }

    pub fn syntax_errors(&self) -> &[SyntaxError] {
        match self {
            ExtractionOutcome::Parsed { recovered, .. } => recovered,
            ExtractionOutcome::Failed { errors } => errors,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ExtractionOutcome::Failed { .. })
    }
}

/// One extraction pipeline per implemented language.
///
/// Implementations hold no per-file state, so a single instance can serve
/// many files in parallel.
pub trait LanguageExtractor: Send + Sync {
    fn extract(&self, source: &str, file: &FileName) -> Result<ExtractionOutcome, ExtractError>;

    fn language(&self) -> Language;
}

/// Routes a language to its extractor.
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn LanguageExtractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Create a registry with every built-in pipeline.
    pub fn with_defaults(options: &ExtractOptions) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(java::JavaExtractor::new(options.clone())));
        registry
    }

    pub fn register(&mut self, extractor: Box<dyn LanguageExtractor>) {
        self.extractors.push(extractor);
    }

    pub fn extractor_for(&self, language: Language) -> Option<&dyn LanguageExtractor> {
        self.extractors
            .iter()
            .find(|e| e.language() == language)
            .map(|e| e.as_ref())
    }

    /// Extract a file with the extractor registered for `language`.
    pub fn extract(
        &self,
        source: &str,
        file: &FileName,
        language: Language,
    ) -> anyhow::Result<ExtractionOutcome> {
        let extractor = self
            .extractor_for(language)
            .ok_or_else(|| anyhow::anyhow!("no extractor for language: {}", language))?;
        Ok(extractor.extract(source, file)?)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults(&ExtractOptions::default())
    }
}
