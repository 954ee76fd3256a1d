pub mod debug;
pub mod kloudless;
pub mod local;
pub mod s3_cli;

pub use debug::DebugBackend;
pub use kloudless::KloudlessBackend;
pub use local::FileBackend;
pub use s3_cli::S3CommandLineBackend;

/// The two payloads persisted for every upload, in the order they are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Artifact {
    File,
    Info,
}

impl Artifact {
    pub(crate) const ORDER: [Artifact; 2] = [Artifact::File, Artifact::Info];

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Artifact::File => "file",
            Artifact::Info => "info",
        }
    }

    /// Per-artifact option key, e.g. `file_name` or `info_s3path`.
    pub(crate) fn option(self, suffix: &str) -> String {
        format!("{}_{}", self.as_str(), suffix)
    }
}
