use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::discovery::DiscoveryConfig;
use crate::parser::ExtractOptions;

pub mod extensions;

pub use extensions::{normalize_extension, ExtensionTable, FileClass};

/// Everything a scan reads from `declscan.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extensions: ExtensionTable,
    pub extract: ExtractOptions,
    pub discovery: DiscoveryConfig,
}

/// Default config file names, searched in order.
const CONFIG_FILENAMES: &[&str] = &[".declscan.toml", "declscan.toml"];

/// Find the config file for a project.
///
/// If `config_override` is provided, use that path directly.
/// Otherwise, search for config files in the project root.
pub fn find_config_path(project_root: &Path, config_override: Option<&Path>) -> Option<PathBuf> {
    if let Some(override_path) = config_override {
        return override_path
            .exists()
            .then(|| override_path.to_path_buf());
    }

    CONFIG_FILENAMES
        .iter()
        .map(|filename| project_root.join(filename))
        .find(|path| path.is_file())
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse a config from a TOML string. Missing sections take their defaults.
pub fn parse_config(toml_str: &str) -> Result<Config> {
    let mut config: Config = toml::from_str(toml_str)?;
    config.extensions = config.extensions.normalized();
    Ok(config)
}

/// Load the project's config, or the defaults when it has none. An explicit
/// `config_override` that does not exist is an error.
pub fn load_or_default(project_root: &Path, config_override: Option<&Path>) -> Result<Config> {
    match find_config_path(project_root, config_override) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            load_config(&path)
        }
        None => {
            if let Some(missing) = config_override {
                bail!("config file not found: {}", missing.display());
            }
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Language;

    #[test]
    fn test_parse_empty_config_is_default() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.extract.recover_partial_trees);
        assert!(!config.extract.resolve_member_modifiers);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[extensions]
implemented = { java = "java", JAV = "java" }
planned = ["py", "scala"]
non_source = ["bin"]

[extract]
recover_partial_trees = true
resolve_member_modifiers = true

[discovery]
include = ["src/**"]
exclude = ["**/generated/**"]
"#;
        let config = parse_config(toml).unwrap();
        assert_eq!(
            config.extensions.classify("jav"),
            FileClass::Implemented(Language::Java)
        );
        assert_eq!(config.extensions.classify("scala"), FileClass::Planned);
        assert_eq!(config.extensions.classify("bin"), FileClass::NotSource);
        // a replaced list does not keep the defaults
        assert_eq!(config.extensions.classify("go"), FileClass::Unknown);

        assert!(config.extract.recover_partial_trees);
        assert!(config.extract.resolve_member_modifiers);
        assert_eq!(config.discovery.include, vec!["src/**"]);
        assert_eq!(config.discovery.exclude, vec!["**/generated/**"]);
    }

    #[test]
    fn test_parse_partial_section_keeps_other_defaults() {
        let config = parse_config("[extract]\nrecover_partial_trees = true\n").unwrap();
        assert!(config.extract.recover_partial_trees);
        assert!(!config.extract.resolve_member_modifiers);
        assert_eq!(config.extensions, ExtensionTable::default());
    }

    #[test]
    fn test_parse_unknown_language_fails() {
        let toml = "[extensions]\nimplemented = { cob = \"cobol\" }\n";
        assert!(parse_config(toml).is_err());
    }

    #[test]
    fn test_find_config_with_override() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("custom.toml");
        std::fs::write(&config_path, "").unwrap();

        let found = find_config_path(dir.path(), Some(&config_path));
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_override_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nonexistent.toml");
        assert!(find_config_path(dir.path(), Some(&missing)).is_none());
        assert!(load_or_default(dir.path(), Some(&missing)).is_err());
    }

    #[test]
    fn test_find_config_prefers_dotfile() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(".declscan.toml"), "").unwrap();
        std::fs::write(dir.path().join("declscan.toml"), "").unwrap();

        let found = find_config_path(dir.path(), None);
        assert_eq!(found, Some(dir.path().join(".declscan.toml")));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = load_or_default(dir.path(), None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_default_reads_root_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("declscan.toml"),
            "[discovery]\nexclude = [\"legacy/**\"]\n",
        )
        .unwrap();
        let config = load_or_default(dir.path(), None).unwrap();
        assert_eq!(config.discovery.exclude, vec!["legacy/**"]);
    }
}
