use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::StorageConfig;
use crate::error::ConfigError;
use crate::models::BackendOptions;
use crate::services::backends::{
    DebugBackend, FileBackend, KloudlessBackend, S3CommandLineBackend,
};
use crate::services::storage::Backend;
use crate::utils::template;

/// The fixed set of storage backends a deployment can choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    File,
    S3Cli,
    Kloudless,
    Debug,
}

impl BackendKind {
    pub const ALL: [BackendKind; 4] = [
        BackendKind::File,
        BackendKind::S3Cli,
        BackendKind::Kloudless,
        BackendKind::Debug,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::File => "file",
            BackendKind::S3Cli => "s3cli",
            BackendKind::Kloudless => "kloudless",
            BackendKind::Debug => "debug",
        }
    }

    pub fn required_options(self) -> &'static [&'static str] {
        match self {
            BackendKind::File => FileBackend::REQUIRED_OPTIONS,
            BackendKind::S3Cli => S3CommandLineBackend::REQUIRED_OPTIONS,
            BackendKind::Kloudless => KloudlessBackend::REQUIRED_OPTIONS,
            BackendKind::Debug => &[],
        }
    }

    /// Options holding `{name}` templates.
    fn template_options(self) -> &'static [&'static str] {
        match self {
            BackendKind::File => &["file_path", "info_path"],
            BackendKind::S3Cli => &[
                "tmp_path",
                "file_name",
                "info_name",
                "file_s3path",
                "info_s3path",
            ],
            BackendKind::Kloudless => &["file_name", "info_name"],
            BackendKind::Debug => &[],
        }
    }

    /// Template options that must substitute the upload name; the temp
    /// file of every upload is staged at a path derived from them.
    fn name_bound_options(self) -> &'static [&'static str] {
        match self {
            BackendKind::S3Cli => &["tmp_path", "file_name", "info_name"],
            _ => &[],
        }
    }

    /// Options that must parse as a positive integer when present.
    fn numeric_options(self) -> &'static [&'static str] {
        match self {
            BackendKind::Kloudless => &["timeout_secs"],
            _ => &[],
        }
    }

    /// Checks everything a backend of this kind will read from `options`.
    pub fn validate(self, options: &BackendOptions) -> Result<(), ConfigError> {
        for key in self.required_options() {
            if !options.contains(key) {
                return Err(ConfigError::MissingOption {
                    backend: self.as_str(),
                    key: key.to_string(),
                });
            }
        }

        for key in self.template_options() {
            if let Some(raw) = options.get(key) {
                template::validate(raw).map_err(|source| ConfigError::MalformedTemplate {
                    key: key.to_string(),
                    source,
                })?;
            }
        }

        for key in self.name_bound_options() {
            if options.get(key).map(template::mentions_name) == Some(Ok(false)) {
                return Err(ConfigError::NameNotInTemplate {
                    backend: self.as_str(),
                    key: key.to_string(),
                });
            }
        }

        for key in self.numeric_options() {
            if let Some(raw) = options.get(key) {
                match raw.parse::<u64>() {
                    Ok(n) if n > 0 => {}
                    _ => {
                        return Err(ConfigError::InvalidOption {
                            key: key.to_string(),
                            value: raw.to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Constructs the backend. Performs no I/O and cannot fail.
    pub fn build(self, options: BackendOptions) -> Arc<dyn Backend> {
        match self {
            BackendKind::File => Arc::new(FileBackend::new(options)),
            BackendKind::S3Cli => Arc::new(S3CommandLineBackend::new(options)),
            BackendKind::Kloudless => Arc::new(KloudlessBackend::new(options)),
            BackendKind::Debug => Arc::new(DebugBackend),
        }
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BackendKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownBackend(s.to_string()))
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the backend named by `config`, validated and ready to share.
///
/// Unknown names and bad options are startup errors; there is no fallback backend.
pub fn get_backend(config: &StorageConfig) -> Result<Arc<dyn Backend>, ConfigError> {
    let kind: BackendKind = config.backend.parse()?;
    kind.validate(&config.options)?;
    Ok(kind.build(config.options.clone()))
}
