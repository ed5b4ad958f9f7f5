//! hls-ladder - batch HLS packaging and publishing
//!
//! Hexagonal Architecture:
//! - domain/: Pure business logic (profiles, jobs, playlists, key mapping)
//! - ports/: Trait definitions (transcoder, storage)
//! - adapters/: Concrete implementations (ffmpeg, S3/R2, local directory)
//! - application/: Encode orchestrator and publisher services
//! - config: Environment configuration
//!
//! The two binaries, `encode_hls` and `upload_hls`, wire these together.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

// Re-exports for convenience
pub use application::orchestrator::EncodeOrchestrator;
pub use application::publisher::Publisher;
pub use domain::jobs::{BatchSummary, Job, JobOutcome};
pub use domain::profile::Profile;
pub use error::{JobError, PipelineError};
