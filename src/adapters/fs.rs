use crate::ports::storage::StoragePort;
use crate::ports::PortError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Storage backed by a local directory: object `key` lands at `root/key`.
///
/// Used by `upload_hls --local-dir` to stage a mirror without credentials.
#[derive(Debug, Clone)]
pub struct FsAdapter {
    root: PathBuf,
}

impl FsAdapter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PortError> {
        let mut path = self.root.clone();
        for part in key.split('/') {
            if part.is_empty() || part == "." || part == ".." {
                return Err(format!("invalid key {key:?}").into());
            }
            path.push(part);
        }
        Ok(path)
    }
}

#[async_trait]
impl StoragePort for FsAdapter {
    async fn put(
        &self,
        local_path: &Path,
        key: &str,
        _content_type: Option<&'static str>,
    ) -> Result<(), PortError> {
        let key_path = self.path_for(key)?;
        if key_path != local_path {
            if let Some(parent) = key_path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::copy(local_path, &key_path).await?;
        }
        Ok(())
    }
}
