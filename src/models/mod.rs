use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tokio::io::AsyncRead;

use crate::error::BackendError;
use crate::utils::template;

/// An upload on its way to a backend: the raw content plus its rendered info page.
///
/// Backends take it by value and only read from it.
pub struct StoredFile {
    pub(crate) name: String,
    pub(crate) content: Box<dyn AsyncRead + Unpin + Send + Sync>,
    pub(crate) size: u64,
    pub(crate) info_html: String,
}

impl StoredFile {
    pub fn new(
        name: impl Into<String>,
        content: Box<dyn AsyncRead + Unpin + Send + Sync>,
        size: u64,
        info_html: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content,
            size,
            info_html: info_html.into(),
        }
    }

    /// Builds an upload whose content is already in memory.
    pub fn from_bytes(
        name: impl Into<String>,
        data: impl Into<Vec<u8>>,
        info_html: impl Into<String>,
    ) -> Self {
        let data = data.into();
        let size = data.len() as u64;
        Self::new(name, Box::new(std::io::Cursor::new(data)), size, info_html)
    }

    /// Opens a local file as upload content; the size comes from its metadata.
    pub async fn open(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        info_html: impl Into<String>,
    ) -> std::io::Result<Self> {
        let file = tokio::fs::File::open(path.as_ref()).await?;
        let size = file.metadata().await?.len();
        Ok(Self::new(name, Box::new(file), size, info_html))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn info_html(&self) -> &str {
        &self.info_html
    }
}

impl fmt::Debug for StoredFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredFile")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("info_html_len", &self.info_html.len())
            .finish_non_exhaustive()
    }
}

/// Backend-specific option map, read-only once a backend holds it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendOptions(HashMap<String, String>);

impl BackendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up an option a backend cannot work without.
    pub(crate) fn require(&self, key: &str) -> Result<&str, BackendError> {
        self.get(key).ok_or_else(|| {
            BackendError::io(format!("Storage misconfigured: missing option '{}'", key))
        })
    }

    /// Renders the template stored under `key` with the upload name.
    pub(crate) fn render(&self, key: &str, name: &str) -> Result<String, BackendError> {
        let raw = self.require(key)?;
        template::render(raw, name)
            .map_err(|e| {
                BackendError::io(format!(
                    "Storage misconfigured: option '{}' is not a valid template: {}",
                    key, e
                ))
            })
    }
}

impl FromIterator<(String, String)> for BackendOptions {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
