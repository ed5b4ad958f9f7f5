use crate::domain::discovery::walk_files;
use crate::domain::keys::{content_type_for, remote_key};
use crate::error::PipelineError;
use crate::ports::storage::StoragePort;
use crate::ports::PortError;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Number of uploads in flight unless overridden.
pub const DEFAULT_UPLOAD_WORKERS: usize = 8;

#[derive(Debug, Default)]
pub struct PublishSummary {
    /// Keys written, in enumeration order.
    pub uploaded: Vec<String>,
    pub failed: Vec<(PathBuf, PortError)>,
}

impl PublishSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Mirrors a local tree into storage. Every run re-uploads every file.
pub struct Publisher<S> {
    storage: S,
    workers: usize,
}

impl<S> Publisher<S>
where
    S: StoragePort,
{
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            workers: DEFAULT_UPLOAD_WORKERS,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Upload every regular file under `source_root` to `prefix/<relative path>`.
    ///
    /// A failed upload is recorded and the remaining files are still attempted.
    pub async fn run(
        &self,
        source_root: &Path,
        prefix: &str,
    ) -> Result<PublishSummary, PipelineError> {
        if !source_root.is_dir() {
            return Err(PipelineError::SourceRootMissing(source_root.to_path_buf()));
        }

        let files = walk_files(source_root)?;
        let total = files.len();
        info!(
            "uploading {} files from {} -> {}",
            total,
            source_root.display(),
            prefix
        );

        let results: Vec<(PathBuf, Result<String, PortError>)> =
            stream::iter(files.into_iter().enumerate())
                .map(|(idx, path)| async move {
                    let result = self.upload_one(source_root, &path, prefix, idx + 1, total).await;
                    (path, result)
                })
                .buffered(self.workers)
                .collect()
                .await;

        let mut summary = PublishSummary::default();
        for (path, result) in results {
            match result {
                Ok(key) => summary.uploaded.push(key),
                Err(err) => {
                    warn!("[error] upload failed: {}: {}", path.display(), err);
                    summary.failed.push((path, err));
                }
            }
        }

        info!(
            "upload finished: {} uploaded, {} failed",
            summary.uploaded.len(),
            summary.failed.len()
        );
        Ok(summary)
    }

    async fn upload_one(
        &self,
        source_root: &Path,
        path: &Path,
        prefix: &str,
        idx: usize,
        total: usize,
    ) -> Result<String, PortError> {
        let key = remote_key(source_root, path, prefix)
            .ok_or_else(|| format!("{} is not under {}", path.display(), source_root.display()))?;
        let content_type = content_type_for(path);

        info!("[{}/{}] {}", idx, total, key);
        self.storage.put(path, &key, content_type).await?;
        Ok(key)
    }
}
