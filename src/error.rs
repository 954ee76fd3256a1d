use thiserror::Error;

use crate::utils::template::TemplateError;

/// Message shown to end users when a backend fails to persist an upload.
pub const DEFAULT_DISPLAY_MESSAGE: &str = "Sorry, we weren't able to save your file.";

/// Failure raised by a storage backend while storing an upload.
///
/// `internal` is a diagnostic for logs and must never reach end users.
/// `display` is short, user-safe text. `Display` renders the internal side.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("I/O error: {internal}")]
    Io { internal: String, display: String },

    #[error("Transfer command failed: {internal}")]
    Command { internal: String, display: String },

    #[error("Storage API error: {internal}")]
    Api { internal: String, display: String },
}

impl BackendError {
    pub fn io(internal: impl Into<String>) -> Self {
        BackendError::Io {
            internal: internal.into(),
            display: DEFAULT_DISPLAY_MESSAGE.to_string(),
        }
    }

    pub fn command(internal: impl Into<String>) -> Self {
        BackendError::Command {
            internal: internal.into(),
            display: DEFAULT_DISPLAY_MESSAGE.to_string(),
        }
    }

    pub fn api(internal: impl Into<String>) -> Self {
        BackendError::Api {
            internal: internal.into(),
            display: DEFAULT_DISPLAY_MESSAGE.to_string(),
        }
    }

    pub fn internal_message(&self) -> &str {
        match self {
            BackendError::Io { internal, .. }
            | BackendError::Command { internal, .. }
            | BackendError::Api { internal, .. } => internal,
        }
    }

    pub fn display_message(&self) -> &str {
        match self {
            BackendError::Io { display, .. }
            | BackendError::Command { display, .. }
            | BackendError::Api { display, .. } => display,
        }
    }
}

/// Startup-time configuration fault. Never returned from `store`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown storage backend '{0}' (expected one of: file, s3cli, kloudless, debug)")]
    UnknownBackend(String),

    #[error("Backend '{backend}' requires option '{key}'")]
    MissingOption { backend: &'static str, key: String },

    #[error("Option '{key}' is not a valid template: {source}")]
    MalformedTemplate {
        key: String,
        #[source]
        source: TemplateError,
    },

    #[error("Backend '{backend}' option '{key}' must contain '{{name}}' so uploads get distinct paths")]
    NameNotInTemplate { backend: &'static str, key: String },

    #[error("Option '{key}' has invalid value '{value}'")]
    InvalidOption { key: String, value: String },

    #[error("STORAGE_OPTIONS is not a JSON object of strings: {0}")]
    InvalidOptionsJson(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_shows_internal_message_only() {
        let err = BackendError::io("Received I/O error: disk full");
        let rendered = err.to_string();
        assert!(rendered.contains("disk full"));
        assert!(!rendered.contains(DEFAULT_DISPLAY_MESSAGE));
    }

    #[test]
    fn test_messages_are_kept_apart() {
        let err = BackendError::command("Received exit status: 1 for command aws s3 cp a b");
        assert_eq!(err.display_message(), DEFAULT_DISPLAY_MESSAGE);
        assert!(err.internal_message().starts_with("Received exit status"));
        assert!(matches!(err, BackendError::Command { .. }));
    }

    #[test]
    fn test_api_error_carries_generic_display() {
        let err = BackendError::api("Received 500 status code");
        assert_eq!(err.display_message(), DEFAULT_DISPLAY_MESSAGE);
        assert_eq!(err.internal_message(), "Received 500 status code");
    }
}
