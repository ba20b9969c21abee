//! Host configuration for the adoc toolkit shim
//!
//! Values are read from a TOML file (`~/.config/adoc/adoc.toml` by default,
//! `ADOC_CONFIG` overrides the location). Every key is optional; the getters
//! apply the defaults the toolkit expects.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub mod venv_paths;

pub const DEFAULT_BACKEND: &str = "html5";
pub const DEFAULT_LANG: &str = "en";
pub const DEFAULT_TOOLKIT_MODULE: &str = "asciidocapi";
pub const DEFAULT_TOOLKIT_CLASS: &str = "AsciiDocAPI";
pub const DEFAULT_LOCK_TIMEOUT_SECS: u64 = 120;

/// Keys accepted by `get`/`set`, in display order
pub const KEYS: &[&str] = &[
    "package-path",
    "install-dir",
    "extract-root",
    "backend",
    "lang",
    "toolkit-module",
    "toolkit-class",
    "venv-path",
    "lock-timeout-secs",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown config key '{0}'")]
    UnknownKey(String),

    #[error("Invalid value '{value}' for '{key}'")]
    InvalidValue { key: String, value: String },

    #[error("Could not determine {0}")]
    MissingDirectory(&'static str),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toolkit_module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toolkit_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venv_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_timeout_secs: Option<u64>,
}

impl Config {
    pub fn path() -> Result<PathBuf, ConfigError> {
        // Honor explicit override via ADOC_CONFIG for tests / isolated runs.
        if let Ok(env_path) = std::env::var("ADOC_CONFIG") {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        #[cfg(not(target_os = "windows"))]
        let base = dirs::home_dir()
            .ok_or(ConfigError::MissingDirectory("home directory"))?
            .join(".config");

        #[cfg(target_os = "windows")]
        let base = dirs::config_dir().ok_or(ConfigError::MissingDirectory("config directory"))?;

        Ok(base.join("adoc").join("adoc.toml"))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "package-path" => self.package_path.clone(),
            "install-dir" => self.install_dir.clone(),
            "extract-root" => self.extract_root.clone(),
            "backend" => self.backend.clone(),
            "lang" => self.lang.clone(),
            "toolkit-module" => self.toolkit_module.clone(),
            "toolkit-class" => self.toolkit_class.clone(),
            "venv-path" => self.venv_path.clone(),
            "lock-timeout-secs" => self.lock_timeout_secs.map(|s| s.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        match key {
            "package-path" => self.package_path = Some(value),
            "install-dir" => self.install_dir = Some(value),
            "extract-root" => self.extract_root = Some(value),
            "backend" => self.backend = Some(value),
            "lang" => self.lang = Some(value),
            "toolkit-module" => self.toolkit_module = Some(value),
            "toolkit-class" => self.toolkit_class = Some(value),
            "venv-path" => self.venv_path = Some(value),
            "lock-timeout-secs" => {
                let secs = value.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.clone(),
                })?;
                self.lock_timeout_secs = Some(secs);
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self == &Config::default()
    }

    pub fn values_iter(&self) -> Vec<(&'static str, String)> {
        KEYS.iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }

    /// Location of the package container holding the bundled toolkit archive.
    ///
    /// Defaults to the running executable, which may carry the archive appended
    /// to it.
    pub fn get_package_path(&self) -> Result<PathBuf, ConfigError> {
        match self.package_path {
            Some(ref p) => Ok(PathBuf::from(p)),
            None => Ok(std::env::current_exe()?),
        }
    }

    pub fn get_install_dir(&self) -> Option<PathBuf> {
        self.install_dir.as_ref().map(PathBuf::from)
    }

    pub fn get_extract_root(&self) -> Option<PathBuf> {
        self.extract_root.as_ref().map(PathBuf::from)
    }

    pub fn get_backend(&self) -> &str {
        self.backend.as_deref().unwrap_or(DEFAULT_BACKEND)
    }

    pub fn get_lang(&self) -> &str {
        self.lang.as_deref().unwrap_or(DEFAULT_LANG)
    }

    pub fn get_toolkit_module(&self) -> &str {
        self.toolkit_module
            .as_deref()
            .unwrap_or(DEFAULT_TOOLKIT_MODULE)
    }

    pub fn get_toolkit_class(&self) -> &str {
        self.toolkit_class.as_deref().unwrap_or(DEFAULT_TOOLKIT_CLASS)
    }

    pub fn get_venv_path(&self) -> Option<PathBuf> {
        self.venv_path.as_ref().map(PathBuf::from)
    }

    pub fn get_lock_timeout(&self) -> Duration {
        Duration::from_secs(self.lock_timeout_secs.unwrap_or(DEFAULT_LOCK_TIMEOUT_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.is_empty());
        assert_eq!(config.get_backend(), "html5");
        assert_eq!(config.get_lang(), "en");
        assert_eq!(config.get_toolkit_module(), "asciidocapi");
        assert_eq!(config.get_toolkit_class(), "AsciiDocAPI");
        assert_eq!(config.get_lock_timeout(), Duration::from_secs(120));
        assert!(config.get_install_dir().is_none());
    }

    #[test]
    fn test_set_and_get() -> Result<(), ConfigError> {
        let mut config = Config::default();
        config.set("backend", "docbook".to_string())?;
        config.set("lock-timeout-secs", "5".to_string())?;

        assert_eq!(config.get("backend").as_deref(), Some("docbook"));
        assert_eq!(config.get_backend(), "docbook");
        assert_eq!(config.get_lock_timeout(), Duration::from_secs(5));
        assert_eq!(
            config.values_iter(),
            vec![
                ("backend", "docbook".to_string()),
                ("lock-timeout-secs", "5".to_string())
            ]
        );
        Ok(())
    }

    #[test]
    fn test_set_rejects_unknown_key_and_bad_number() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("colour", "blue".to_string()),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            config.set("lock-timeout-secs", "soon".to_string()),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(config.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() -> Result<(), ConfigError> {
        let temp = TempDir::new()?;
        let path = temp.path().join("nested").join("adoc.toml");

        let mut config = Config::default();
        config.set("install-dir", "/opt/asciidoc-8.6.8".to_string())?;
        config.set("lang", "fr".to_string())?;
        config.save_to(&path)?;

        let loaded = Config::load_from(&path)?;
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.get_install_dir(),
            Some(PathBuf::from("/opt/asciidoc-8.6.8"))
        );
        Ok(())
    }

    #[test]
    fn test_load_missing_file_gives_default() -> Result<(), ConfigError> {
        let temp = TempDir::new()?;
        let loaded = Config::load_from(&temp.path().join("absent.toml"))?;
        assert!(loaded.is_empty());
        Ok(())
    }

    #[test]
    fn test_package_path_override() -> Result<(), ConfigError> {
        let mut config = Config::default();
        config.set("package-path", "/tmp/adoc.zip".to_string())?;
        assert_eq!(config.get_package_path()?, PathBuf::from("/tmp/adoc.zip"));
        Ok(())
    }
}
