use super::PortError;
use async_trait::async_trait;
use std::path::Path;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Upload a file from a local path to storage, overwriting any object at `key`.
    async fn put(
        &self,
        local_path: &Path,
        key: &str,
        content_type: Option<&'static str>,
    ) -> Result<(), PortError>;
}
