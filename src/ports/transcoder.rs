use crate::domain::profile::Profile;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Segment length handed to the segmenter, in seconds.
pub const SEGMENT_SECONDS: u32 = 4;

/// One (job, profile) unit of work for the transcoding engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeRequest {
    pub source_path: PathBuf,
    pub output_dir: PathBuf,
    pub profile: Profile,
}

impl EncodeRequest {
    pub fn new(source_path: &Path, output_dir: &Path, profile: &Profile) -> Self {
        Self {
            source_path: source_path.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            profile: profile.clone(),
        }
    }

    pub fn playlist_path(&self) -> PathBuf {
        self.output_dir.join(self.profile.playlist_name())
    }

    pub fn segment_pattern(&self) -> PathBuf {
        self.output_dir.join(self.profile.segment_pattern())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine ran but did not exit cleanly. `output` is stdout followed by stderr.
    #[error("transcoder exited with {status}")]
    Failed { status: String, output: String },
}

impl TranscodeError {
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            TranscodeError::Failed { output, .. } => Some(output),
            TranscodeError::Spawn { .. } => None,
        }
    }
}

/// Produces one profile's sub-playlist and segments in `request.output_dir`.
/// Blocks (asynchronously) until the engine has finished.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn encode(&self, request: &EncodeRequest) -> Result<(), TranscodeError>;
}
