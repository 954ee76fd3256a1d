use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use std::time::Duration;
use tokio_util::io::ReaderStream;

use super::Artifact;
use crate::error::BackendError;
use crate::models::{BackendOptions, StoredFile};
use crate::services::storage::Backend;

pub const DEFAULT_API_ENDPOINT: &str = "https://api.kloudless.com/v0";

const INFO_FILENAME: &str = "info.html";
const INFO_MIME: &str = "text/html; charset=utf-8";

#[derive(Debug, Serialize)]
struct UploadMetadata<'a> {
    name: &'a str,
    parent_id: &'a str,
}

/// Uploads through the Kloudless file API, which fronts S3, Dropbox and
/// several other services.
///
/// Options: `account_id`, `account_key`, `file_name`/`info_name` (templates),
/// `file_parent_id`/`info_parent_id`; optionally `api_endpoint` and
/// `timeout_secs`.
pub struct KloudlessBackend {
    options: BackendOptions,
    client: reqwest::Client,
}

impl KloudlessBackend {
    pub const REQUIRED_OPTIONS: &'static [&'static str] = &[
        "account_id",
        "account_key",
        "file_name",
        "info_name",
        "file_parent_id",
        "info_parent_id",
    ];

    pub fn new(options: BackendOptions) -> Self {
        Self {
            options,
            client: reqwest::Client::new(),
        }
    }

    fn files_url(&self) -> Result<String, BackendError> {
        let endpoint = self
            .options
            .get("api_endpoint")
            .unwrap_or(DEFAULT_API_ENDPOINT)
            .trim_end_matches('/');
        let account = self.options.require("account_id")?;
        Ok(format!("{}/accounts/{}/files", endpoint, account))
    }

    fn timeout(&self) -> Option<Duration> {
        self.options
            .get("timeout_secs")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
    }

    async fn upload(&self, name: &str, parent_id: &str, part: Part) -> Result<(), BackendError> {
        let metadata = serde_json::to_string(&UploadMetadata { name, parent_id })
            .map_err(|e| BackendError::api(format!("Could not encode upload metadata: {}", e)))?;
        let form = Form::new().text("metadata", metadata).part("file", part);

        let mut request = self
            .client
            .post(self.files_url()?)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("AccountKey {}", self.options.require("account_key")?),
            )
            .multipart(form);
        if let Some(timeout) = self.timeout() {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Request to Kloudless failed: {}", e);
            BackendError::api(format!("Request to Kloudless failed: {}", e))
        })?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Got unexpected status code from Kloudless: {}", status.as_u16());
            tracing::error!("Response: {}", body);
            return Err(BackendError::api(format!(
                "Received {} status code",
                status.as_u16()
            )));
        }

        tracing::debug!("Uploaded '{}' to parent {}", name, parent_id);
        Ok(())
    }
}

#[async_trait]
impl Backend for KloudlessBackend {
    fn name(&self) -> &'static str {
        "kloudless"
    }

    async fn store(&self, file: StoredFile) -> Result<(), BackendError> {
        let StoredFile {
            name,
            content,
            size,
            info_html,
        } = file;
        let mut content = Some(content);

        for artifact in Artifact::ORDER {
            let artifact_name = self.options.render(&artifact.option("name"), &name)?;
            let parent_id = self.options.require(&artifact.option("parent_id"))?;

            let part = match artifact {
                Artifact::File => {
                    let reader = content.take().ok_or_else(|| {
                        BackendError::api("Upload content was already consumed".to_string())
                    })?;
                    let body = reqwest::Body::wrap_stream(ReaderStream::new(reader));
                    Part::stream_with_length(body, size).file_name(artifact_name.clone())
                }
                Artifact::Info => Part::bytes(info_html.clone().into_bytes())
                    .file_name(INFO_FILENAME)
                    .mime_str(INFO_MIME)
                    .map_err(|e| BackendError::api(format!("Invalid info page MIME type: {}", e)))?,
            };

            tracing::info!("Uploading {} '{}' to Kloudless", artifact.as_str(), artifact_name);
            self.upload(&artifact_name, parent_id, part).await?;
        }

        tracing::info!("Done!");
        Ok(())
    }
}
