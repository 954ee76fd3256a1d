use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

use super::Artifact;
use super::local::{write_bytes, write_stream};
use crate::error::BackendError;
use crate::models::{BackendOptions, StoredFile};
use crate::services::storage::Backend;

pub const DEFAULT_COMMAND: &str = "aws";
pub const DEFAULT_COMMAND_ARGS: &str = "s3 cp";

/// Uploads to S3 by shelling out to the AWS command-line tools.
///
/// Each artifact is written to a local temp file (`tmp_path` rendered with
/// the artifact name from `file_name`/`info_name`), then copied to the remote
/// path from `file_s3path`/`info_s3path`. The tool must be installed and
/// configured (`aws configure`; `aws s3 ls` should list your buckets).
///
/// The program and its leading arguments can be replaced with the `command`
/// and `command_args` options. Arguments are passed as a vector, never
/// through a shell. `command_args` is split on whitespace with no quoting,
/// so a single argument cannot contain a space (`--profile "my profile"`
/// becomes three arguments); wrap such invocations in a script and point
/// `command` at it.
///
/// `tmp_path`, `file_name` and `info_name` must each contain `{name}` so
/// concurrent uploads stage to distinct temp files; the registry rejects
/// configurations that do not.
pub struct S3CommandLineBackend {
    options: BackendOptions,
}

impl S3CommandLineBackend {
    pub const REQUIRED_OPTIONS: &'static [&'static str] = &[
        "tmp_path",
        "file_name",
        "info_name",
        "file_s3path",
        "info_s3path",
    ];

    pub fn new(options: BackendOptions) -> Self {
        Self { options }
    }

    fn program(&self) -> &str {
        self.options.get("command").unwrap_or(DEFAULT_COMMAND)
    }

    fn leading_args(&self) -> Vec<&str> {
        self.options
            .get("command_args")
            .unwrap_or(DEFAULT_COMMAND_ARGS)
            .split_whitespace()
            .collect()
    }

    async fn transfer(&self, local: &str, remote: &str) -> Result<(), BackendError> {
        let program = self.program();
        let mut args = self.leading_args();
        args.push(local);
        args.push(remote);
        let cmd = command_line(program, &args);

        tracing::info!("Uploading to S3 with command: {}", cmd);
        let output = Command::new(program)
            .args(&args)
            .output()
            .await
            .map_err(|e| {
                tracing::error!("Could not run {}: {}", cmd, e);
                BackendError::command(format!("Failed to run command {}: {}", cmd, e))
            })?;

        if !output.status.success() {
            tracing::error!(
                "Transfer command exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Err(BackendError::command(format!(
                "Received {} for command {}",
                output.status, cmd
            )));
        }
        Ok(())
    }
}

/// Renders a command for logs, quoting arguments that would otherwise be ambiguous.
fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .map(|part| {
            if part.is_empty() || part.contains(char::is_whitespace) || part.contains('"') {
                format!("{:?}", part)
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl Backend for S3CommandLineBackend {
    fn name(&self) -> &'static str {
        "s3cli"
    }

    async fn store(&self, file: StoredFile) -> Result<(), BackendError> {
        let StoredFile {
            name,
            mut content,
            info_html,
            ..
        } = file;

        for artifact in Artifact::ORDER {
            let artifact_name = self.options.render(&artifact.option("name"), &name)?;
            let tmp_path = self.options.render("tmp_path", &artifact_name)?;
            let path = Path::new(&tmp_path);

            tracing::info!("Writing temp file '{}' to '{}'", artifact_name, tmp_path);
            let written = match artifact {
                Artifact::File => write_stream(path, &mut content).await.map(|_| ()),
                Artifact::Info => write_bytes(path, info_html.as_bytes()).await,
            };
            written.map_err(|e| {
                tracing::error!("Failed writing temp file {}: {}", tmp_path, e);
                BackendError::io(format!("Received I/O error for {}: {}", tmp_path, e))
            })?;

            let remote = self.options.render(&artifact.option("s3path"), &name)?;
            // On failure the temp file stays behind for inspection.
            self.transfer(&tmp_path, &remote).await?;

            if let Err(e) = tokio::fs::remove_file(path).await {
                tracing::warn!("Uploaded but could not remove temp file {}: {}", tmp_path, e);
            }
        }

        Ok(())
    }
}
