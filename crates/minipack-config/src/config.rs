//! High-level configuration structure for minipack.
//!
//! For file discovery and layered loading, see the `discovery` module.

use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result as ConfigResult};
use crate::settings::GlobalSettings;

/// Name of the always-present main package.
pub const DEFAULT_MAIN_PACKAGE: &str = "app";

/// Folder inside a sub-package root that receives copies of out-of-package files.
pub const DEFAULT_REFERENCE_DIR: &str = "_reference";

/// Folder holding the custom tab bar component.
pub const DEFAULT_CUSTOM_TAB_BAR_DIR: &str = "custom-tab-bar";

pub(crate) fn default_source_root() -> PathBuf {
    PathBuf::from("src")
}

pub(crate) fn default_reference_dir() -> String {
    DEFAULT_REFERENCE_DIR.to_string()
}

pub(crate) fn default_main_package() -> String {
    DEFAULT_MAIN_PACKAGE.to_string()
}

pub(crate) fn default_custom_tab_bar_dir() -> String {
    DEFAULT_CUSTOM_TAB_BAR_DIR.to_string()
}

pub(crate) fn default_ignore() -> Vec<String> {
    vec!["^plugin://".to_string(), "^plugin-private://".to_string()]
}

pub(crate) fn default_entry_extensions() -> Vec<String> {
    ["js", "ts", "json"].map(String::from).to_vec()
}

pub(crate) fn default_companion_extensions() -> Vec<String> {
    ["wxml", "wxss", "less", "scss", "sass", "styl", "js", "ts", "wxs"]
        .map(String::from)
        .to_vec()
}

pub(crate) fn default_module_dirs() -> Vec<String> {
    vec!["miniprogram_npm".to_string(), "node_modules".to_string()]
}

/// Graph engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinipackConfig {
    /// App root, relative to the project directory or absolute.
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,

    /// Private folder inside a sub-package that receives duplicated files.
    #[serde(default = "default_reference_dir")]
    pub reference_dir: String,

    /// Name of the main package (also the main chunk group).
    #[serde(default = "default_main_package")]
    pub main_package: String,

    /// Folder expanded when the manifest declares `tabBar.custom`.
    #[serde(default = "default_custom_tab_bar_dir")]
    pub custom_tab_bar_dir: String,

    /// Regular expressions for references that never enter the graph.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,

    /// Alias prefix -> directory relative to the app root.
    #[serde(default)]
    pub path_aliases: IndexMap<String, String>,

    /// Extensions tried, in order, for extension-less references.
    #[serde(default = "default_entry_extensions")]
    pub entry_extensions: Vec<String>,

    /// Same-basename siblings added as companion assets of an entry.
    #[serde(default = "default_companion_extensions")]
    pub companion_extensions: Vec<String>,

    /// Package directories searched for bare references.
    #[serde(default = "default_module_dirs")]
    pub module_dirs: Vec<String>,

    #[serde(default)]
    pub settings: GlobalSettings,
}

impl Default for MinipackConfig {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            reference_dir: default_reference_dir(),
            main_package: default_main_package(),
            custom_tab_bar_dir: default_custom_tab_bar_dir(),
            ignore: default_ignore(),
            path_aliases: IndexMap::new(),
            entry_extensions: default_entry_extensions(),
            companion_extensions: default_companion_extensions(),
            module_dirs: default_module_dirs(),
            settings: GlobalSettings::default(),
        }
    }
}

impl MinipackConfig {
    /// Create from serde_json::Value (for programmatic config from an embedding tool)
    ///
    /// # Example
    ///
    /// ```
    /// use minipack_config::MinipackConfig;
    /// use serde_json::json;
    ///
    /// let config = MinipackConfig::from_value(json!({
    ///     "source_root": "miniprogram",
    ///     "reference_dir": "_shared"
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(config.reference_dir, "_shared");
    /// assert_eq!(config.main_package, "app");
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Absolute app root for a project directory.
    pub fn app_root(&self, project_dir: &Path) -> PathBuf {
        if self.source_root.is_absolute() {
            self.source_root.clone()
        } else {
            project_dir.join(&self.source_root)
        }
    }

    /// Compile the ignore list.
    pub fn ignore_patterns(&self) -> ConfigResult<Vec<Regex>> {
        self.ignore
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    /// Check values that serde cannot check on its own.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.main_package.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "main_package".to_string(),
                hint: Some("must not be empty".to_string()),
            });
        }

        let reference = Path::new(&self.reference_dir);
        let escapes = reference
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if self.reference_dir.trim().is_empty() || escapes {
            return Err(ConfigError::InvalidValue {
                field: "reference_dir".to_string(),
                hint: Some("must be a plain relative folder name".to_string()),
            });
        }

        if self.entry_extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "entry_extensions".to_string(),
                hint: Some("at least one extension is required".to_string()),
            });
        }

        self.ignore_patterns()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_are_filled_in() {
        let config = MinipackConfig::from_value(json!({})).unwrap();
        assert_eq!(config, MinipackConfig::default());
        assert_eq!(config.source_root, PathBuf::from("src"));
        assert_eq!(config.custom_tab_bar_dir, "custom-tab-bar");
    }

    #[test]
    fn to_value_round_trips_aliases() {
        let mut config = MinipackConfig::default();
        config
            .path_aliases
            .insert("@components".to_string(), "components".to_string());

        let value = config.to_value().unwrap();
        assert_eq!(value["path_aliases"]["@components"], json!("components"));
    }

    #[test]
    fn validate_rejects_escaping_reference_dir() {
        let mut config = MinipackConfig::default();
        config.reference_dir = "../outside".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "reference_dir"
        ));
    }

    #[test]
    fn validate_rejects_bad_pattern() {
        let mut config = MinipackConfig::default();
        config.ignore.push("(unclosed".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn app_root_joins_relative_source_root() {
        let config = MinipackConfig::default();
        assert_eq!(
            config.app_root(Path::new("/project")),
            PathBuf::from("/project/src")
        );
    }
}
