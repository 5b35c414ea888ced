//! Configuration schema for cairn
//!
//! Configuration is stored at `~/.config/cairn/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cache settings
    pub cache: CacheConfig,

    /// Download settings
    pub download: DownloadConfig,

    /// CDN mirror fallback settings
    pub mirror: MirrorConfig,
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Root directory for cached artifact entries
    pub base_path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
        }
    }
}

/// Default cache root under the platform cache directory
pub fn default_base_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cairn")
}

/// Download settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Per-file download timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self { timeout_secs: 300 }
    }
}

/// CDN mirror fallback settings
///
/// A failed download from a host ending in `cdn_suffix` is retried once
/// against the same host with the suffix swapped for `origin_suffix`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Host suffix identifying the CDN edge
    pub cdn_suffix: String,

    /// Host suffix of the origin storage account
    pub origin_suffix: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            cdn_suffix: ".azureedge.net".to_string(),
            origin_suffix: ".blob.core.windows.net".to_string(),
        }
    }
}
