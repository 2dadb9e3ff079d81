//! Provider acquisition intelligence: deterministic scoring and tier
//! classification over read-only healthcare provider snapshots.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
