//! Error types shared by the encode and publish passes.

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::domain::profile::BitrateError;
use crate::ports::transcoder::TranscodeError;

/// Errors that abort a whole batch before any work is attempted.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("input path not found: {}", .0.display())]
    InputRootMissing(PathBuf),

    #[error("source directory not found: {}", .0.display())]
    SourceRootMissing(PathBuf),

    #[error("{tool} not found: {message}")]
    ToolNotFound { tool: String, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Errors scoped to a single job. The batch records them and moves on.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("profile {profile} failed: {source}")]
    Transcode {
        profile: String,
        #[source]
        source: TranscodeError,
    },

    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("profile {profile}: {source}")]
    Bitrate {
        profile: String,
        #[source]
        source: BitrateError,
    },
}

impl JobError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Diagnostic output captured from the transcoder, if this failure came from it.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            JobError::Transcode { source, .. } => source.diagnostics(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_root_missing_display() {
        let err = PipelineError::InputRootMissing(PathBuf::from("/nope"));
        assert_eq!(err.to_string(), "input path not found: /nope");
    }

    #[test]
    fn test_job_error_exposes_transcoder_diagnostics() {
        let err = JobError::Transcode {
            profile: "720p".to_string(),
            source: TranscodeError::Failed {
                status: "exit status: 1".to_string(),
                output: "Invalid data found when processing input".to_string(),
            },
        };
        assert_eq!(
            err.diagnostics(),
            Some("Invalid data found when processing input")
        );
        assert!(err.to_string().starts_with("profile 720p failed"));

        let io = JobError::io(
            "create",
            "/out/x",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(io.diagnostics().is_none());
        assert_eq!(io.to_string(), "failed to create /out/x: denied");
    }
}
