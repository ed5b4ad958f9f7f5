//! Port traits. The application layer only talks to the outside world
//! through these.

pub mod storage;
pub mod transcoder;

pub type PortError = Box<dyn std::error::Error + Send + Sync>;
