use serde::Deserialize;
use std::collections::HashMap;
use std::env;

use crate::error::ConfigError;
use crate::models::BackendOptions;

/// Prefix of environment variables that set a single backend option.
pub const OPTION_VAR_PREFIX: &str = "STORAGE_OPTION_";

/// Storage backend selection plus its options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Backend name: "file", "s3cli", "kloudless" or "debug" (default: "debug")
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Backend-specific options, mostly `{name}` templates
    #[serde(default)]
    pub options: BackendOptions,
}

fn default_backend() -> String {
    "debug".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            options: BackendOptions::default(),
        }
    }
}

impl StorageConfig {
    pub fn new(backend: impl Into<String>, options: BackendOptions) -> Self {
        Self {
            backend: backend.into(),
            options,
        }
    }

    /// Load configuration from environment variables
    ///
    /// - `STORAGE_BACKEND`: backend name
    /// - `STORAGE_OPTIONS`: JSON object of string options
    /// - `STORAGE_OPTION_<KEY>`: sets option `<key>` (lowercased), overriding the JSON
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env::vars())
    }

    /// Same as [`StorageConfig::from_env`], over an explicit variable list.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let default = Self::default();
        let mut backend = None;
        let mut json = None;
        let mut overrides = Vec::new();

        for (key, value) in vars {
            match key.as_str() {
                "STORAGE_BACKEND" => backend = Some(value),
                "STORAGE_OPTIONS" => json = Some(value),
                _ => {
                    if let Some(option) = key.strip_prefix(OPTION_VAR_PREFIX) {
                        if !option.is_empty() {
                            overrides.push((option.to_lowercase(), value));
                        }
                    }
                }
            }
        }

        let mut options = match json {
            Some(raw) if !raw.trim().is_empty() => {
                let parsed: HashMap<String, String> = serde_json::from_str(&raw)?;
                parsed.into_iter().collect()
            }
            _ => BackendOptions::new(),
        };
        for (key, value) in overrides {
            options.insert(key, value);
        }

        Ok(Self {
            backend: backend
                .map(|b| b.trim().to_string())
                .unwrap_or(default.backend),
            options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = StorageConfig::from_vars(vars(&[("PATH", "/usr/bin")])).unwrap();
        assert_eq!(config.backend, "debug");
        assert!(config.options.is_empty());
    }

    #[test]
    fn test_file_backend_from_json() {
        let config = StorageConfig::from_vars(vars(&[
            ("STORAGE_BACKEND", "file"),
            (
                "STORAGE_OPTIONS",
                r#"{"file_path": "/srv/files/{name}", "info_path": "/srv/info/{name}.html"}"#,
            ),
        ]))
        .unwrap();
        assert_eq!(config.backend, "file");
        assert_eq!(config.options.get("file_path"), Some("/srv/files/{name}"));
        assert_eq!(config.options.get("info_path"), Some("/srv/info/{name}.html"));
    }

    #[test]
    fn test_option_vars_override_json() {
        let config = StorageConfig::from_vars(vars(&[
            ("STORAGE_OPTIONS", r#"{"account_id": "1"}"#),
            ("STORAGE_OPTION_ACCOUNT_ID", "2"),
            ("STORAGE_OPTION_ACCOUNT_KEY", "secret"),
            ("STORAGE_OPTION_", "ignored"),
        ]))
        .unwrap();
        assert_eq!(config.options.get("account_id"), Some("2"));
        assert_eq!(config.options.get("account_key"), Some("secret"));
        assert_eq!(config.options.len(), 2);
    }

    #[test]
    fn test_invalid_options_json() {
        let err = StorageConfig::from_vars(vars(&[("STORAGE_OPTIONS", "[1, 2]")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOptionsJson(_)));
    }

    #[test]
    fn test_deserialize_section() {
        let config: StorageConfig =
            serde_json::from_str(r#"{"backend": "s3cli", "options": {"tmp_path": "/tmp/{name}"}}"#)
                .unwrap();
        assert_eq!(config.backend, "s3cli");
        assert_eq!(config.options.get("tmp_path"), Some("/tmp/{name}"));

        let config: StorageConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, StorageConfig::default());
    }
}
