use crate::config::StorageConfig;
use crate::error::ConfigError;
use crate::services::registry::get_backend;
use crate::services::storage::Backend;
use std::sync::Arc;
use tracing::info;

/// Builds the process-wide storage backend from the environment.
pub fn setup_storage() -> Result<Arc<dyn Backend>, ConfigError> {
    let config = StorageConfig::from_env()?;
    setup_storage_with(&config)
}

pub fn setup_storage_with(config: &StorageConfig) -> Result<Arc<dyn Backend>, ConfigError> {
    let backend = get_backend(config)?;
    info!(
        "☁️  Storage backend: {} ({} option(s))",
        backend.name(),
        config.options.len()
    );
    Ok(backend)
}
