use crate::error::JobError;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// File name of the master playlist. Its existence marks a job as complete.
pub const MASTER_PLAYLIST: &str = "master.m3u8";

/// One source video mapped to the directory that receives its renditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub source_path: PathBuf,
    /// Source path relative to the input root.
    pub relative_path: PathBuf,
    pub output_dir: PathBuf,
}

impl Job {
    /// `<output_root>/<relative parent dirs>/<source stem>`
    pub fn new(input_root: &Path, output_root: &Path, source_path: PathBuf) -> Option<Self> {
        let relative_path = source_path.strip_prefix(input_root).ok()?.to_path_buf();
        let stem = source_path.file_stem()?;

        let mut output_dir = output_root.to_path_buf();
        if let Some(parent) = relative_path.parent() {
            output_dir.push(parent);
        }
        output_dir.push(stem);

        Some(Self {
            source_path,
            relative_path,
            output_dir,
        })
    }

    pub fn master_playlist(&self) -> PathBuf {
        self.output_dir.join(MASTER_PLAYLIST)
    }

    pub async fn is_complete(&self) -> bool {
        tokio::fs::metadata(self.master_playlist())
            .await
            .is_ok_and(|meta| meta.is_file())
    }
}

#[derive(Debug)]
pub enum JobOutcome {
    Encoded(Job),
    Skipped(Job),
    Failed(Job, JobError),
}

/// Result of one orchestrator pass, in discovery order.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub encoded: Vec<Job>,
    pub skipped: Vec<Job>,
    pub failed: Vec<(Job, JobError)>,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: JobOutcome) {
        match outcome {
            JobOutcome::Encoded(job) => self.encoded.push(job),
            JobOutcome::Skipped(job) => self.skipped.push(job),
            JobOutcome::Failed(job, err) => self.failed.push((job, err)),
        }
    }

    pub fn total(&self) -> usize {
        self.encoded.len() + self.skipped.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn report(&self) -> BatchReport {
        BatchReport {
            encoded: self.encoded.iter().map(|j| j.source_path.clone()).collect(),
            skipped: self.skipped.iter().map(|j| j.source_path.clone()).collect(),
            failed: self
                .failed
                .iter()
                .map(|(job, err)| FailedJob {
                    source_path: job.source_path.clone(),
                    error: err.to_string(),
                    diagnostics: err.diagnostics().map(str::to_string),
                })
                .collect(),
        }
    }
}

/// Serializable view of a [`BatchSummary`], written by `encode_hls --report`.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub encoded: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<FailedJob>,
}

#[derive(Debug, Serialize)]
pub struct FailedJob {
    pub source_path: PathBuf,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}
