use async_trait::async_trait;

use crate::error::BackendError;
use crate::models::StoredFile;
use crate::services::storage::Backend;
use crate::utils::size::human_size;

/// Stores nothing; logs what it would have stored. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct DebugBackend;

#[async_trait]
impl Backend for DebugBackend {
    fn name(&self) -> &'static str {
        "debug"
    }

    async fn store(&self, file: StoredFile) -> Result<(), BackendError> {
        tracing::info!("Storing file:");
        tracing::info!("\tName: {}", file.name());
        tracing::info!("\tSize: {}", human_size(file.size()));
        tracing::debug!("\tInfo page: {} byte(s)", file.info_html().len());
        Ok(())
    }
}
