//! Encode Binary
//!
//! Converts every source video under an input directory into a 360p / 720p /
//! 1080p HLS ladder with a master playlist.
//!
//! Environment Variables:
//! - FFMPEG_PATH: ffmpeg binary to use (default: looked up on PATH)
//! - RUST_LOG: log filter (default: info)

use anyhow::Context;
use clap::Parser;
use hls_ladder::adapters::FfmpegTranscoder;
use hls_ladder::application::orchestrator::DEFAULT_ENCODE_WORKERS;
use hls_ladder::config::EncodeConfig;
use hls_ladder::domain::discovery::{ensure_input_root, DEFAULT_SOURCE_EXTENSION};
use hls_ladder::{EncodeOrchestrator, Profile};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "encode_hls")]
#[command(version, about = "Encode video files to HLS (360p/720p/1080p)")]
struct Args {
    /// Input directory containing source videos
    #[arg(long, default_value = "public/videos")]
    input: PathBuf,

    /// Output directory for HLS assets
    #[arg(long, default_value = "./hls_output")]
    output: PathBuf,

    /// Overwrite existing outputs
    #[arg(long)]
    force: bool,

    /// Process at most N files (0 = all)
    #[arg(long, default_value_t = 0)]
    max_files: usize,

    /// Number of files encoded concurrently
    #[arg(long, default_value_t = DEFAULT_ENCODE_WORKERS)]
    jobs: usize,

    /// Source file extension to look for
    #[arg(long, default_value = DEFAULT_SOURCE_EXTENSION)]
    extension: String,

    /// Write a JSON summary of the batch to this file
    #[arg(long)]
    report: Option<PathBuf>,

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

    let config = EncodeConfig::from_env();

    let input = std::path::absolute(&args.input)
        .with_context(|| format!("invalid input path {}", args.input.display()))?;
    let output = std::path::absolute(&args.output)
        .with_context(|| format!("invalid output path {}", args.output.display()))?;

    // Report a missing input before a missing ffmpeg.
    ensure_input_root(&input)?;

    let transcoder = FfmpegTranscoder::locate(config.ffmpeg_path.as_deref())?;
    tracing::info!("using ffmpeg at {}", transcoder.program().display());

    let orchestrator = EncodeOrchestrator::new(transcoder, Profile::ladder())
        .with_workers(args.jobs)
        .with_extension(args.extension);

    let summary = orchestrator
        .run(&input, &output, args.force, args.max_files)
        .await?;

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&summary.report())?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }

    if summary.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
