//! Domain layer - Pure business logic.

pub mod discovery;
pub mod hls;
pub mod jobs;
pub mod keys;
pub mod profile;
