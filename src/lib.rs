//! Cairn - Versioned Artifact Fetcher
//!
//! Fetches application and platform artifacts by URL into a local disk
//! cache, following publisher redirect manifests and pulling prerequisite
//! components along with platform artifacts.

pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;

pub use error::{CairnError, CairnResult};
