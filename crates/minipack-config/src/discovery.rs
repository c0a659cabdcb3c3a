//! File-based config discovery and layered loading.
//!
//! Priority: overrides > environment variables > config file > defaults

use std::fs;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use serde_json::Value;

use crate::config::MinipackConfig;
use crate::error::{ConfigError, Result};

/// Environment variable prefix, e.g. `MINIPACK_REFERENCE_DIR=_shared`.
pub const ENV_PREFIX: &str = "MINIPACK_";

/// Field holding the configuration inside `package.json`.
const PACKAGE_JSON_FIELD: &str = "minipack";

/// File-based configuration discovery
///
/// Searches for a minipack configuration in a project directory and merges it
/// over the defaults.
///
/// # Example
///
/// ```no_run
/// use minipack_config::ConfigDiscovery;
///
/// let config = ConfigDiscovery::new(".").load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
    use_env: bool,
    overrides: Option<Value>,
}

impl ConfigDiscovery {
    /// Create a new config discovery with a project directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            use_env: true,
            overrides: None,
        }
    }

    /// Skip the `MINIPACK_*` environment layer.
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Values from the embedding tool, merged over every other layer.
    pub fn with_overrides(mut self, overrides: Value) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// Find a config file in the project directory
    ///
    /// Searches in this order:
    /// 1. minipack.toml
    /// 2. minipack.json
    /// 3. package.json (minipack field)
    pub fn find(&self) -> Option<PathBuf> {
        for name in ["minipack.toml", "minipack.json"] {
            let path = self.root.join(name);
            if path.exists() {
                return Some(path);
            }
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.exists() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed
                        .get(PACKAGE_JSON_FIELD)
                        .is_some_and(|field| !field.is_null())
                    {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Load the layered configuration.
    ///
    /// A missing config file is not an error: defaults and the environment
    /// still apply.
    pub fn load(&self) -> Result<MinipackConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(MinipackConfig::default()));

        if let Some(path) = self.find() {
            tracing::debug!("Loading minipack config from: {}", path.display());
            figment = self.merge_file(figment, &path)?;
        }

        if self.use_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        if let Some(overrides) = &self.overrides {
            figment = figment.merge(Serialized::defaults(overrides.clone()));
        }

        let config: MinipackConfig = figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: "configuration".to_string(),
            hint: Some(e.to_string()),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load, failing with `ConfigError::NotFound` when no file exists.
    pub fn load_required(&self) -> Result<MinipackConfig> {
        self.find().ok_or(ConfigError::NotFound)?;
        self.load()
    }

    fn merge_file(&self, figment: Figment, path: &Path) -> Result<Figment> {
        match path.file_name().and_then(|name| name.to_str()) {
            Some("package.json") => {
                let content = fs::read_to_string(path)?;
                let parsed: Value =
                    serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
                        field: "package.json".to_string(),
                        hint: Some(format!("Invalid JSON: {}", e)),
                    })?;
                match parsed.get(PACKAGE_JSON_FIELD) {
                    Some(section @ Value::Object(_)) => {
                        Ok(figment.merge(Serialized::defaults(section.clone())))
                    }
                    _ => Err(ConfigError::InvalidValue {
                        field: PACKAGE_JSON_FIELD.to_string(),
                        hint: Some("The 'minipack' field must be an object".to_string()),
                    }),
                }
            }
            Some(name) if name.ends_with(".json") => Ok(figment.merge(Json::file(path))),
            _ => {
                let content = fs::read_to_string(path)?;
                let toml_val: toml::Value =
                    toml::from_str(&content).map_err(|e| ConfigError::InvalidValue {
                        field: "toml".to_string(),
                        hint: Some(format!("Invalid TOML syntax: {}", e)),
                    })?;
                Ok(figment.merge(Serialized::defaults(toml_val)))
            }
        }
    }
}

/// Discover and load config from the current directory (convenience function)
pub fn discover() -> Result<MinipackConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}
