use crate::domain::discovery::{discover_jobs, ensure_input_root, DEFAULT_SOURCE_EXTENSION};
use crate::domain::hls::MasterPlaylist;
use crate::domain::jobs::{BatchSummary, Job, JobOutcome};
use crate::domain::profile::Profile;
use crate::error::{JobError, PipelineError};
use crate::ports::transcoder::{EncodeRequest, Transcoder};
use futures::stream::{self, StreamExt};
use std::path::Path;
use tracing::{info, warn};

/// Number of jobs encoded at once unless overridden.
pub const DEFAULT_ENCODE_WORKERS: usize = 2;

pub struct EncodeOrchestrator<T> {
    transcoder: T,
    profiles: Vec<Profile>,
    workers: usize,
    extension: String,
}

impl<T> EncodeOrchestrator<T>
where
    T: Transcoder,
{
    pub fn new(transcoder: T, profiles: Vec<Profile>) -> Self {
        Self {
            transcoder,
            profiles,
            workers: DEFAULT_ENCODE_WORKERS,
            extension: DEFAULT_SOURCE_EXTENSION.to_string(),
        }
    }

    /// Maximum number of jobs in flight. Profiles within a job always run one after another.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Encode every source under `input_root` into `output_root`.
    ///
    /// Only a missing input root aborts the batch. Everything that goes wrong
    /// inside a job is recorded in the returned summary.
    pub async fn run(
        &self,
        input_root: &Path,
        output_root: &Path,
        force: bool,
        max_files: usize,
    ) -> Result<BatchSummary, PipelineError> {
        ensure_input_root(input_root)?;

        let jobs = discover_jobs(input_root, output_root, &self.extension, max_files)?;
        let total = jobs.len();
        info!(
            "found {} {} files under {}",
            total,
            self.extension,
            input_root.display()
        );

        // Each job is moved into exactly one future, so no two workers ever
        // touch the same output directory.
        let outcomes: Vec<JobOutcome> = stream::iter(jobs.into_iter().enumerate())
            .map(|(idx, job)| self.process_job(job, idx + 1, total, force))
            .buffered(self.workers)
            .collect()
            .await;

        let mut summary = BatchSummary::default();
        for outcome in outcomes {
            summary.record(outcome);
        }

        info!(
            "batch finished: {} encoded, {} skipped, {} failed",
            summary.encoded.len(),
            summary.skipped.len(),
            summary.failed.len()
        );
        Ok(summary)
    }

    async fn process_job(&self, job: Job, idx: usize, total: usize, force: bool) -> JobOutcome {
        info!("[{}/{}] {}", idx, total, job.relative_path.display());

        if !force && job.is_complete().await {
            info!(
                "[skip] {} (master exists)",
                job.source_path.display()
            );
            return JobOutcome::Skipped(job);
        }

        match self.encode_variants(&job, force).await {
            Ok(()) => {
                info!("[ok] master playlist written: {}", job.master_playlist().display());
                JobOutcome::Encoded(job)
            }
            Err(err) => {
                warn!("[error] failed: {}: {}", job.source_path.display(), err);
                if let Some(diagnostics) = err.diagnostics() {
                    warn!("{}", diagnostics.trim_end());
                }
                JobOutcome::Failed(job, err)
            }
        }
    }

    async fn encode_variants(&self, job: &Job, force: bool) -> Result<(), JobError> {
        // Fail on a bad profile table before spending any encode time.
        let master = MasterPlaylist::from_profiles(&self.profiles)
            .map_err(|(profile, source)| JobError::Bitrate { profile, source })?;

        tokio::fs::create_dir_all(&job.output_dir)
            .await
            .map_err(|e| JobError::io("create", &job.output_dir, e))?;

        let marker = job.master_playlist();
        if force {
            // The old marker must not survive a forced re-encode that fails halfway.
            match tokio::fs::remove_file(&marker).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(JobError::io("remove", &marker, e)),
            }
        }

        for profile in &self.profiles {
            let request = EncodeRequest::new(&job.source_path, &job.output_dir, profile);
            info!(
                "[ffmpeg] {} -> {}",
                job.relative_path.display(),
                profile.playlist_name()
            );
            self.transcoder
                .encode(&request)
                .await
                .map_err(|source| JobError::Transcode {
                    profile: profile.name.clone(),
                    source,
                })?;
        }

        master
            .write_to(&marker)
            .await
            .map_err(|e| JobError::io("write", &marker, e))
    }
}
