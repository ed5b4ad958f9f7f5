//! Configuration loaded from the environment (and `.env`, via dotenv).

use std::env;
use std::path::PathBuf;

pub const DEFAULT_BUCKET: &str = "sonshi";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),
}

/// Settings for the encode pass that do not come from the command line.
#[derive(Clone, Debug, Default)]
pub struct EncodeConfig {
    /// Explicit ffmpeg binary; looked up on PATH when unset.
    pub ffmpeg_path: Option<PathBuf>,
}

impl EncodeConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            ffmpeg_path: lookup("FFMPEG_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }
}

/// Credentials and location of the Cloudflare R2 (or other S3-compatible) bucket.
#[derive(Clone)]
pub struct R2Config {
    pub account_id: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    /// Overrides the endpoint derived from `account_id`.
    pub endpoint: Option<String>,
}

impl R2Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let endpoint = get("CLOUDFLARE_R2_ENDPOINT");
        let account_id = match endpoint {
            Some(_) => get("CLOUDFLARE_R2_ACCOUNT_ID").unwrap_or_default(),
            None => require("CLOUDFLARE_R2_ACCOUNT_ID")?,
        };

        Ok(Self {
            account_id,
            access_key_id: require("CLOUDFLARE_R2_ACCESS_KEY_ID")?,
            secret_access_key: require("CLOUDFLARE_R2_SECRET_ACCESS_KEY")?,
            bucket: get("CLOUDFLARE_R2_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://{}.r2.cloudflarestorage.com", self.account_id),
        }
    }
}

impl std::fmt::Debug for R2Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("R2Config")
            .field("account_id", &self.account_id)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_r2_config_defaults() {
        let config = R2Config::from_lookup(lookup(&[
            ("CLOUDFLARE_R2_ACCOUNT_ID", "abc123"),
            ("CLOUDFLARE_R2_ACCESS_KEY_ID", "key"),
            ("CLOUDFLARE_R2_SECRET_ACCESS_KEY", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.bucket, "sonshi");
        assert_eq!(config.endpoint(), "https://abc123.r2.cloudflarestorage.com");
        assert!(!format!("{config:?}").contains("secret\""));
    }

    #[test]
    fn test_r2_config_missing_secret() {
        let err = R2Config::from_lookup(lookup(&[
            ("CLOUDFLARE_R2_ACCOUNT_ID", "abc123"),
            ("CLOUDFLARE_R2_ACCESS_KEY_ID", "key"),
        ]))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing environment variable: CLOUDFLARE_R2_SECRET_ACCESS_KEY"
        );
    }

    #[test]
    fn test_r2_config_empty_value_counts_as_missing() {
        let err = R2Config::from_lookup(lookup(&[
            ("CLOUDFLARE_R2_ACCOUNT_ID", ""),
            ("CLOUDFLARE_R2_ACCESS_KEY_ID", "key"),
            ("CLOUDFLARE_R2_SECRET_ACCESS_KEY", "secret"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("CLOUDFLARE_R2_ACCOUNT_ID")));
    }

    #[test]
    fn test_r2_config_endpoint_override() {
        let config = R2Config::from_lookup(lookup(&[
            ("CLOUDFLARE_R2_ENDPOINT", "http://127.0.0.1:9000"),
            ("CLOUDFLARE_R2_ACCESS_KEY_ID", "minioadmin"),
            ("CLOUDFLARE_R2_SECRET_ACCESS_KEY", "minioadmin"),
            ("CLOUDFLARE_R2_BUCKET", "media"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint(), "http://127.0.0.1:9000");
        assert_eq!(config.bucket, "media");
    }

    #[test]
    fn test_encode_config() {
        let config = EncodeConfig::from_lookup(lookup(&[("FFMPEG_PATH", "/opt/ffmpeg/bin/ffmpeg")]));
        assert_eq!(config.ffmpeg_path, Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg")));
        assert!(EncodeConfig::from_lookup(lookup(&[])).ffmpeg_path.is_none());
    }
}
