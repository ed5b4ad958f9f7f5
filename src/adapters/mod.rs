//! Adapters - Concrete implementations of ports.

pub mod ffmpeg;
pub mod fs;
pub mod s3;

pub use ffmpeg::FfmpegTranscoder;
pub use fs::FsAdapter;
pub use s3::S3Adapter;
