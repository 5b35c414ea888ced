//! Error types for cairn
//!
//! All modules use `CairnResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cairn operations
pub type CairnResult<T> = Result<T, CairnError>;

/// All errors that can occur in cairn
#[derive(Error, Debug)]
pub enum CairnError {
    // URL and token errors
    #[error("Invalid artifact URL '{url}': {reason}")]
    UrlInvalid { url: String, reason: String },

    #[error("Access token in URL is invalid: {reason}")]
    TokenInvalid { reason: String },

    #[error("Access token in URL expired at {expired_at}")]
    TokenExpired { expired_at: String },

    // Download errors
    #[error("Download failed for {url}")]
    Download {
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("Failed to write downloaded payload for {url}: {source}")]
    DownloadWrite {
        url: String,
        #[source]
        source: std::io::Error,
    },

    // Archive errors
    #[error("Failed to unpack archive into {dest}: {source}")]
    Unpack {
        dest: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    // Manifest errors
    #[error("Failed to read manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {path}: {reason}")]
    ManifestParse { path: PathBuf, reason: String },

    #[error("Prerequisite component path '{key}' is not a safe relative path")]
    PrereqPathInvalid { key: String },

    // Redirect errors
    #[error("Redirect manifests form a loop through {url}")]
    RedirectLoop { url: String },

    #[error("Redirect chain exceeded {limit} hops at {url}")]
    TooManyRedirects { limit: usize, url: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Unknown configuration key: {0}")]
    ConfigKeyUnknown(String),

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl CairnError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a download error
    pub fn download(url: impl Into<String>, source: ureq::Error) -> Self {
        Self::Download {
            url: url.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::TokenExpired { .. } | Self::TokenInvalid { .. } => {
                Some("Request a fresh artifact URL from the distribution endpoint")
            }
            Self::ManifestParse { .. } | Self::ManifestRead { .. } => {
                Some("Re-run with --force to discard the cached entry")
            }
            Self::RedirectLoop { .. } | Self::TooManyRedirects { .. } => {
                Some("The remote manifest chain is broken; report it to the artifact publisher")
            }
            Self::ConfigKeyUnknown(_) => Some(
                "Valid keys: cache.base_path, download.timeout_secs, \
                 mirror.cdn_suffix, mirror.origin_suffix",
            ),
            _ => None,
        }
    }
}
