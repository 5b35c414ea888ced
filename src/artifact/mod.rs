//! Artifact fetching and caching
//!
//! Artifacts are versioned zip bundles addressed by URL. Fetching one maps
//! the URL path onto a directory under the cache root, downloads and
//! unpacks on a miss, follows manifest redirects to the terminal artifact
//! and optionally pulls the sibling platform artifact along with its
//! prerequisite components.

pub mod cache;
pub mod download;
pub mod fetcher;
pub mod locator;
pub mod manifest;
pub mod sas;
pub mod unpack;

pub use cache::{ArtifactCache, CacheEntry};
pub use fetcher::{FetchOptions, FetchOutcome, Fetcher};
pub use manifest::ArtifactManifest;
