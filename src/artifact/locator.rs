//! URL to cache-path mapping and artifact URL resolution
//!
//! The cache location of an artifact is its URL path replayed under the
//! cache root, so `https://host/sandbox/24.0/us` lands in
//! `<root>/sandbox/24.0/us`. Redirect targets and platform locations may be
//! given relative to the artifact host and inherit its query string (which
//! carries the access token).

use crate::error::{CairnError, CairnResult};
use std::path::PathBuf;
use url::Url;

/// Map an artifact URL to its path relative to the cache root.
///
/// Path segments are used verbatim; empty segments are skipped. The URL
/// parser collapses `.`/`..` segments before the path is split, so a
/// hostile URL cannot escape the cache root.
pub fn entry_rel_path(url: &Url) -> CairnResult<PathBuf> {
    let segments = url.path_segments().ok_or_else(|| CairnError::UrlInvalid {
        url: url.to_string(),
        reason: "URL has no path".to_string(),
    })?;

    let mut rel = PathBuf::new();
    for segment in segments {
        if segment.is_empty() {
            continue;
        }
        rel.push(segment);
    }

    if rel.as_os_str().is_empty() {
        return Err(CairnError::UrlInvalid {
            url: url.to_string(),
            reason: "URL path is empty".to_string(),
        });
    }

    Ok(rel)
}

/// Resolve a redirect target from a manifest.
///
/// Targets carrying a scheme are taken as-is. Anything else is treated as a
/// path on the original URL's host, keeping its scheme, port and query
/// string.
pub fn resolve_redirect(base: &Url, target: &str) -> CairnResult<Url> {
    if target.contains("://") {
        return Url::parse(target).map_err(|e| CairnError::UrlInvalid {
            url: target.to_string(),
            reason: e.to_string(),
        });
    }

    let mut resolved = base.clone();
    resolved.set_path(&format!("/{}", target.trim_start_matches('/')));
    Ok(resolved)
}

/// Determine the platform artifact URL for an application artifact.
///
/// The manifest may name it explicitly; otherwise it sits next to the
/// application artifact by convention, at `<parent>/platform`.
pub fn platform_url(explicit: Option<&str>, app_url: &Url) -> CairnResult<Url> {
    if let Some(target) = explicit {
        return resolve_redirect(app_url, target);
    }

    let path = app_url.path();
    let parent = match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    };

    let mut url = app_url.clone();
    url.set_path(&format!("{}/platform", parent));
    Ok(url)
}

/// Normalize a prerequisite-manifest key into a relative path.
///
/// Keys use either `/` or `\` separators. Dot segments are rejected.
pub fn prereq_rel_path(key: &str) -> CairnResult<PathBuf> {
    let mut rel = PathBuf::new();
    for part in key.split(['/', '\\']) {
        if part.is_empty() {
            continue;
        }
        if part == "." || part == ".." {
            return Err(CairnError::PrereqPathInvalid {
                key: key.to_string(),
            });
        }
        rel.push(part);
    }

    if rel.as_os_str().is_empty() {
        return Err(CairnError::PrereqPathInvalid {
            key: key.to_string(),
        });
    }

    Ok(rel)
}
