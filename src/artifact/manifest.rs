//! Artifact manifest parsing
//!
//! Every unpacked artifact carries a `manifest.json`. An application
//! manifest may redirect to the real artifact via `applicationUrl`, and may
//! name its platform artifact via `platformUrl`; both fields are optional
//! and absence simply means the feature is not used. Platform artifacts may
//! additionally ship a `Prerequisite Components.json` mapping relative file
//! paths to download URLs.

use crate::error::{CairnError, CairnResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Manifest file name inside every unpacked artifact
pub const MANIFEST_FILE: &str = "manifest.json";

/// Prerequisite component list shipped inside platform artifacts
pub const PREREQ_MANIFEST_FILE: &str = "Prerequisite Components.json";

/// Parsed artifact manifest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactManifest {
    /// Redirect target: the artifact actually lives at this URL
    #[serde(default)]
    pub application_url: Option<String>,

    /// Explicit platform artifact location
    #[serde(default)]
    pub platform_url: Option<String>,

    /// Artifact version, when the publisher stamps one
    #[serde(default)]
    pub version: Option<String>,
}

impl ArtifactManifest {
    /// Load the manifest from an unpacked entry directory
    pub fn load(entry_dir: &Path) -> CairnResult<Self> {
        let path = entry_dir.join(MANIFEST_FILE);
        let content = fs::read_to_string(&path).map_err(|e| CairnError::ManifestRead {
            path: path.clone(),
            source: e,
        })?;
        Self::parse(&content).map_err(|e| CairnError::ManifestParse {
            path,
            reason: e.to_string(),
        })
    }

    /// Parse a manifest from a JSON string
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Redirect target, when the manifest declares a non-empty one.
    ///
    /// An empty or whitespace-only `applicationUrl` counts as absent, the
    /// same as a missing field.
    pub fn redirect_target(&self) -> Option<&str> {
        self.application_url
            .as_deref()
            .map(str::trim)
            .filter(|target| !target.is_empty())
    }

    /// Whether this manifest is a pointer to another artifact
    pub fn is_redirect(&self) -> bool {
        self.redirect_target().is_some()
    }

    /// Explicit platform location, normalized the same way as
    /// [`redirect_target`](Self::redirect_target)
    pub fn platform_target(&self) -> Option<&str> {
        self.platform_url
            .as_deref()
            .map(str::trim)
            .filter(|target| !target.is_empty())
    }
}

/// Prerequisite component list: relative file path to download URL
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct PrerequisiteComponents {
    /// BTreeMap keeps the download order stable across runs
    pub components: BTreeMap<String, String>,
}

impl PrerequisiteComponents {
    /// Load the prerequisite list from a platform entry, if it ships one
    pub fn load_if_present(entry_dir: &Path) -> CairnResult<Option<Self>> {
        let path = entry_dir.join(PREREQ_MANIFEST_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| CairnError::ManifestRead {
            path: path.clone(),
            source: e,
        })?;
        let parsed = serde_json::from_str(&content).map_err(|e| CairnError::ManifestParse {
            path,
            reason: e.to_string(),
        })?;
        Ok(Some(parsed))
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
