pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

pub use config::StorageConfig;
pub use error::{BackendError, ConfigError};
pub use models::{BackendOptions, StoredFile};
pub use services::registry::{BackendKind, get_backend};
pub use services::storage::Backend;
