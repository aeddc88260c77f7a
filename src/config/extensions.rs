use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::Language;

/// Extensions recognized as source code that no pipeline handles yet.
const PLANNED_EXTENSIONS: &[&str] = &[
    "cs", "h", "hxx", "hpp", "cpp", "c", "cc", "m", "py", "py3", "js", "jsx", "kt", "sol", "ts",
    "sc", "rs", "go", "clj", "cxx", "el", "lua", "m4", "php", "pl", "po", "rb", "sh", "swift",
    "vb",
];

/// Documentation, data and binary formats.
const NON_SOURCE_EXTENSIONS: &[&str] = &[
    "txt", "md", "html", "json", "xml", "sql", "yaml", "hbs", "vcxproj", "xcodeproj", "csproj",
    "diff", "patch", "log", "rtf", "tex", "odt", "org", "pdf", "rst", "wpd", "wps", "class", "jar",
    "war", "ear", "dll", "exe", "so", "lib", "a",
];

/// How a file extension is handled by a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    /// A pipeline exists for this language.
    Implemented(Language),
    /// Source code, but not supported yet.
    Planned,
    NotSource,
    Unknown,
}

/// Dispatch table from file extension to extraction pipeline.
///
/// Extensions are stored without the leading dot and in lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionTable {
    pub implemented: BTreeMap<String, Language>,
    pub planned: BTreeSet<String>,
    pub non_source: BTreeSet<String>,
}

impl Default for ExtensionTable {
    fn default() -> Self {
        Self {
            implemented: BTreeMap::from([("java".to_string(), Language::Java)]),
            planned: PLANNED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            non_source: NON_SOURCE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// `.Java` and `java` are the same extension.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}

impl ExtensionTable {
    pub fn classify(&self, ext: &str) -> FileClass {
        let ext = normalize_extension(ext);
        if let Some(language) = self.implemented.get(&ext) {
            FileClass::Implemented(*language)
        } else if self.planned.contains(&ext) {
            FileClass::Planned
        } else if self.non_source.contains(&ext) {
            FileClass::NotSource
        } else {
            FileClass::Unknown
        }
    }

    /// Rewrite every entry into normalized form. An extension listed as
    /// implemented is dropped from the other two sets.
    pub fn normalized(self) -> Self {
        let implemented: BTreeMap<String, Language> = self
            .implemented
            .into_iter()
            .map(|(ext, language)| (normalize_extension(&ext), language))
            .collect();
        let keep = |set: BTreeSet<String>| -> BTreeSet<String> {
            set.iter()
                .map(|ext| normalize_extension(ext))
                .filter(|ext| !implemented.contains_key(ext))
                .collect()
        };
        let planned = keep(self.planned);
        let non_source = keep(self.non_source);
        Self {
            implemented,
            planned,
            non_source,
        }
    }
}
