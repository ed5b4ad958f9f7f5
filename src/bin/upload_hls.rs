//! Upload Binary
//!
//! Mirrors an HLS output tree into an S3-compatible bucket (Cloudflare R2 by
//! default). `./hls_output/characters/kenta/master.m3u8` is uploaded as
//! `<prefix>/characters/kenta/master.m3u8`.
//!
//! Environment Variables:
//! - CLOUDFLARE_R2_ACCOUNT_ID: account identifier (used to derive the endpoint)
//! - CLOUDFLARE_R2_ACCESS_KEY_ID / CLOUDFLARE_R2_SECRET_ACCESS_KEY: credentials
//! - CLOUDFLARE_R2_BUCKET: target bucket (default: sonshi)
//! - CLOUDFLARE_R2_ENDPOINT: explicit endpoint, e.g. a local MinIO

use anyhow::bail;
use clap::Parser;
use hls_ladder::adapters::{FsAdapter, S3Adapter};
use hls_ladder::application::publisher::DEFAULT_UPLOAD_WORKERS;
use hls_ladder::config::R2Config;
use hls_ladder::ports::storage::StoragePort;
use hls_ladder::Publisher;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "upload_hls")]
#[command(version, about = "Upload HLS assets to Cloudflare R2")]
struct Args {
    /// Local HLS root directory
    #[arg(long, default_value = "./hls_output")]
    source: PathBuf,

    /// Remote key prefix in the bucket
    #[arg(long, default_value = "videos/hls")]
    prefix: String,

    /// Bucket name (overrides CLOUDFLARE_R2_BUCKET)
    #[arg(long)]
    bucket: Option<String>,

    /// Number of concurrent uploads
    #[arg(long, default_value_t = DEFAULT_UPLOAD_WORKERS)]
    concurrency: usize,

    /// Mirror into this local directory instead of the bucket
    #[arg(long, conflicts_with = "bucket")]
    local_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let source = std::path::absolute(&args.source)?;
    if !source.is_dir() {
        bail!("Source directory not found: {}", source.display());
    }

    if let Some(dir) = &args.local_dir {
        tracing::info!("mirroring into local directory {}", dir.display());
        return publish(FsAdapter::new(dir), &source, &args).await;
    }

    let mut config = R2Config::from_env()?;
    if let Some(bucket) = &args.bucket {
        config.bucket = bucket.clone();
    }

    let storage = S3Adapter::from_config(&config).await;
    tracing::info!("target s3://{}/{} via {}", storage.bucket(), args.prefix, config.endpoint());
    publish(storage, &source, &args).await
}

async fn publish<S: StoragePort>(storage: S, source: &Path, args: &Args) -> anyhow::Result<ExitCode> {
    let summary = Publisher::new(storage)
        .with_workers(args.concurrency)
        .run(source, &args.prefix)
        .await?;

    if summary.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
