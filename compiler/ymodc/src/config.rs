//! The `ymod.toml` configuration surface (`SPEC_FULL.md` §3.11): defaults
//! the CLI falls back to when a flag isn't given, following the precedence
//! order `defaults < config file < CLI flags`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// On-disk defaults for the CLI. Every field is optional — an absent
/// `ymod.toml`, or an absent field within one, just means "use the built-in
/// default".
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct YmodConfig {
    pub base_path: Option<PathBuf>,
    pub ignore_tags: Option<bool>,
    pub ignore_private: Option<String>,
    pub watch_debounce_ms: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl YmodConfig {
    /// Loads `ymod.toml` from `dir`, if present. A missing file is not an
    /// error — it just means every field falls back to its built-in default.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join("ymod.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = YmodConfig::load(dir.path()).expect("load");
        assert!(config.base_path.is_none());
    }

    #[test]
    fn parses_partial_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("ymod.toml"), "ignore-tags = true\n").expect("write");
        let config = YmodConfig::load(dir.path()).expect("load");
        assert_eq!(config.ignore_tags, Some(true));
        assert!(config.base_path.is_none());
    }
}
