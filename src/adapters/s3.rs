use crate::config::R2Config;
use crate::ports::storage::StoragePort;
use crate::ports::PortError;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::Path;

/// S3Adapter implements StoragePort for any S3-compatible bucket (R2, MinIO, S3).
#[derive(Clone)]
pub struct S3Adapter {
    client: Client,
    bucket: String,
}

impl S3Adapter {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// Client pointed at the configured R2 (or override) endpoint with static credentials.
    pub async fn from_config(config: &R2Config) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "static",
        );
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new("auto"))
            .credentials_provider(credentials)
            .endpoint_url(config.endpoint())
            .load()
            .await;

        // R2 and MinIO both accept path-style addressing; virtual-hosted style needs DNS per bucket.
        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(true)
            .build();

        Self::new(Client::from_conf(s3_config), config.bucket.clone())
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl StoragePort for S3Adapter {
    async fn put(
        &self,
        local_path: &Path,
        key: &str,
        content_type: Option<&'static str>,
    ) -> Result<(), PortError> {
        let body = ByteStream::from_path(local_path).await?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .set_content_type(content_type.map(str::to_string))
            .body(body)
            .send()
            .await?;
        Ok(())
    }
}
