use async_trait::async_trait;

use crate::error::BackendError;
use crate::models::StoredFile;

/// A storage target for uploads and their info pages.
///
/// Constructing a backend only captures its options: no I/O, no failure.
/// All side effects happen in [`Backend::store`], which persists the raw file
/// first and the info page second, and stops at the first failure. Nothing
/// written before a failure is rolled back.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Registry key of this backend, e.g. `"file"`.
    fn name(&self) -> &'static str;

    /// Persists the upload and its info page.
    async fn store(&self, file: StoredFile) -> Result<(), BackendError>;
}
