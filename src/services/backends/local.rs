use async_trait::async_trait;
use std::path::Path;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncRead, AsyncWriteExt};

use crate::error::BackendError;
use crate::models::{BackendOptions, StoredFile};
use crate::services::storage::Backend;

/// Stores uploads and info pages on the local disk.
///
/// Options: `file_path` and `info_path`, both templates over `{name}`.
pub struct FileBackend {
    options: BackendOptions,
}

impl FileBackend {
    pub const REQUIRED_OPTIONS: &'static [&'static str] = &["file_path", "info_path"];

    pub fn new(options: BackendOptions) -> Self {
        Self { options }
    }
}

async fn create(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await
}

/// Streams `reader` into a freshly truncated file at `path`.
pub(crate) async fn write_stream<R>(path: &Path, reader: &mut R) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut dest = create(path).await?;
    let written = tokio::io::copy(reader, &mut dest).await?;
    dest.flush().await?;
    dest.sync_all().await?;
    Ok(written)
}

pub(crate) async fn write_bytes(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut dest = create(path).await?;
    dest.write_all(data).await?;
    dest.flush().await?;
    dest.sync_all().await
}

fn io_failure(path: &Path, e: std::io::Error) -> BackendError {
    tracing::error!("Failed writing {}: {}", path.display(), e);
    BackendError::io(format!("Received I/O error for {}: {}", path.display(), e))
}

#[async_trait]
impl Backend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn store(&self, file: StoredFile) -> Result<(), BackendError> {
        let path = self.options.render("file_path", &file.name)?;
        let info_path = self.options.render("info_path", &file.name)?;
        let StoredFile {
            mut content,
            info_html,
            ..
        } = file;

        tracing::info!("Writing to {}...", path);
        let path = Path::new(&path);
        let written = write_stream(path, &mut content)
            .await
            .map_err(|e| io_failure(path, e))?;
        tracing::debug!("Wrote {} byte(s) to {}", written, path.display());

        tracing::info!("Writing info page to {}...", info_path);
        let info_path = Path::new(&info_path);
        write_bytes(info_path, info_html.as_bytes())
            .await
            .map_err(|e| io_failure(info_path, e))?;

        Ok(())
    }
}
