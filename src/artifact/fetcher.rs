//! The fetch workflow: resolve, download, unpack, follow redirects
//!
//! A fetch maps the artifact URL to its cache entry, materializes the entry
//! if it is absent (download to a temporary archive, unpack into staging,
//! promote with one rename), then reads the entry's manifest. Manifests
//! carrying an `applicationUrl` are pointers; the fetch follows them until
//! it lands on a terminal artifact, with a visited set and a hop cap
//! guarding against broken chains. Platform artifacts reuse the same
//! materialization but never redirect, and finish with a prerequisite
//! pass that fills in any components the platform archive lists.

use crate::artifact::cache::ArtifactCache;
use crate::artifact::download::Downloader;
use crate::artifact::locator;
use crate::artifact::manifest::{ArtifactManifest, PrerequisiteComponents};
use crate::artifact::unpack;
use crate::config::Config;
use crate::error::{CairnError, CairnResult};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, info};
use url::Url;

/// Hard cap on manifest redirect hops
pub const MAX_REDIRECTS: usize = 16;

/// Subfolder of a platform entry holding the hosting runtime
const HOSTING_BUNDLE_DIR: &str = "Prerequisite Components/DotNetCore";

const HOSTING_BUNDLE_FILE: &str = "DotNetCore.1.0.4_1.1.1-WindowsHosting.exe";

const HOSTING_BUNDLE_URL: &str = "https://download.microsoft.com/download/B/1/D/B1D7D5BF-3920-47AA-94BD-7A6E48822F18/DotNetCore.1.0.4_1.1.1-WindowsHosting.exe";

/// Caller-selected fetch behavior
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    /// Also fetch the associated platform artifact
    pub include_platform: bool,
    /// Discard any cached entries and download again
    pub force: bool,
    /// Discard cached redirect entries only, so pointer updates are seen
    pub force_redirection: bool,
}

/// Local paths produced by a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Entry of the final, non-redirecting application artifact
    pub application: PathBuf,
    /// Platform entry, when platform inclusion was requested
    pub platform: Option<PathBuf>,
}

/// Artifact fetcher bound to one cache root and download policy
pub struct Fetcher {
    cache: ArtifactCache,
    downloader: Downloader,
    hosting_bundle_url: String,
}

impl Fetcher {
    pub fn new(config: &Config) -> Self {
        Self {
            cache: ArtifactCache::new(config.cache.base_path.clone()),
            downloader: Downloader::new(
                Duration::from_secs(config.download.timeout_secs),
                config.mirror.clone(),
            ),
            hosting_bundle_url: HOSTING_BUNDLE_URL.to_string(),
        }
    }

    #[cfg(test)]
    fn with_hosting_bundle_url(mut self, url: &str) -> Self {
        self.hosting_bundle_url = url.to_string();
        self
    }

    /// Fetch the application artifact behind `url`, and its platform
    /// artifact when requested
    pub fn fetch(&self, url: &Url, options: &FetchOptions) -> CairnResult<FetchOutcome> {
        let mut current = url.clone();
        let mut visited: HashSet<String> = HashSet::new();
        let mut hops = 0usize;

        let (application, manifest) = loop {
            let (entry, manifest) = self.ensure_entry(&current, options)?;

            let Some(target) = manifest.redirect_target() else {
                break (entry, manifest);
            };

            visited.insert(current.to_string());
            let next = locator::resolve_redirect(&current, target)?;
            if visited.contains(next.as_str()) {
                return Err(CairnError::RedirectLoop {
                    url: next.to_string(),
                });
            }
            hops += 1;
            if hops > MAX_REDIRECTS {
                return Err(CairnError::TooManyRedirects {
                    limit: MAX_REDIRECTS,
                    url: next.to_string(),
                });
            }

            debug!("Manifest redirects {} -> {}", current, next);
            current = next;
        };

        info!("Application artifact at {}", application.display());

        let platform = if options.include_platform {
            Some(self.fetch_platform(&manifest, &current, options.force)?)
        } else {
            None
        };

        Ok(FetchOutcome {
            application,
            platform,
        })
    }

    /// Ensure one application entry is cached, honoring the force flags,
    /// and hand back its manifest
    fn ensure_entry(
        &self,
        url: &Url,
        options: &FetchOptions,
    ) -> CairnResult<(PathBuf, ArtifactManifest)> {
        let entry = self.cache.entry_path(url)?;

        // Redirect entries may point at a moved artifact, so this flag
        // discards them even when the entry itself looks fresh
        if entry.exists() && !options.force && options.force_redirection {
            let manifest = ArtifactManifest::load(&entry)?;
            if manifest.is_redirect() {
                debug!("Discarding cached redirect entry {}", entry.display());
                self.cache.evict(&entry)?;
            }
        }

        let entry = self.ensure_unpacked(url, options.force)?;
        let manifest = ArtifactManifest::load(&entry)?;
        Ok((entry, manifest))
    }

    /// Existence check, optional forced eviction, materialization and the
    /// access-marker update shared by application and platform entries
    fn ensure_unpacked(&self, url: &Url, force: bool) -> CairnResult<PathBuf> {
        let entry = self.cache.entry_path(url)?;

        if entry.exists() && force {
            self.cache.evict(&entry)?;
        }

        if entry.exists() {
            debug!("Cache hit for {}", url);
        } else {
            self.materialize(url, &entry)?;
        }

        self.cache.touch_last_used(&entry)?;
        Ok(entry)
    }

    /// Download, unpack into staging and promote one entry
    fn materialize(&self, url: &Url, entry: &Path) -> CairnResult<()> {
        info!("Downloading {}", url);

        let root = self.cache.root();
        fs::create_dir_all(root)
            .map_err(|e| CairnError::io(format!("creating {}", root.display()), e))?;

        // Dropped on every exit path, so the archive never outlives the call
        let archive = NamedTempFile::new_in(root)
            .map_err(|e| CairnError::io("creating temporary archive", e))?;
        self.downloader.download_with_fallback(url, archive.path())?;

        let staging = self.cache.prepare_staging(entry)?;
        unpack::unpack_zip(archive.path(), &staging)?;
        self.cache.promote(entry)?;
        Ok(())
    }

    /// Fetch the platform artifact associated with a terminal application
    /// manifest, then run the prerequisite pass over it
    fn fetch_platform(
        &self,
        manifest: &ArtifactManifest,
        app_url: &Url,
        force: bool,
    ) -> CairnResult<PathBuf> {
        let url = locator::platform_url(manifest.platform_target(), app_url)?;
        let entry = self.ensure_unpacked(&url, force)?;

        self.ensure_prerequisites(&entry)?;

        info!("Platform artifact at {}", entry.display());
        Ok(entry)
    }

    /// Fill in listed prerequisite components and the hosting runtime.
    ///
    /// Runs on every platform fetch; each component is skipped when its
    /// file is already on disk, so the pass is idempotent.
    fn ensure_prerequisites(&self, platform_entry: &Path) -> CairnResult<()> {
        if let Some(prereqs) = PrerequisiteComponents::load_if_present(platform_entry)? {
            for (key, source) in &prereqs.components {
                let rel = locator::prereq_rel_path(key)?;
                let dest = platform_entry.join(&rel);
                if dest.exists() {
                    continue;
                }

                let source_url = Url::parse(source).map_err(|e| CairnError::UrlInvalid {
                    url: source.clone(),
                    reason: e.to_string(),
                })?;
                info!("Fetching prerequisite {}", rel.display());
                self.download_file(&source_url, platform_entry, &dest)?;
            }
        }

        self.ensure_hosting_bundle(platform_entry)
    }

    /// Download the hosting runtime installer unless its subfolder is
    /// already present
    fn ensure_hosting_bundle(&self, platform_entry: &Path) -> CairnResult<()> {
        let dir = platform_entry.join(HOSTING_BUNDLE_DIR);
        if dir.exists() {
            return Ok(());
        }

        let url = Url::parse(&self.hosting_bundle_url).map_err(|e| CairnError::UrlInvalid {
            url: self.hosting_bundle_url.clone(),
            reason: e.to_string(),
        })?;
        info!("Fetching hosting runtime installer");

        // The subfolder is the completion marker, so it appears only once
        // the installer has fully arrived
        self.download_file(&url, platform_entry, &dir.join(HOSTING_BUNDLE_FILE))
    }

    /// Download one file through a temporary sibling, moving it into place
    /// only when the transfer completed.
    ///
    /// Presence checks treat an existing path as final, so a partially
    /// written download must never land at its real location.
    fn download_file(&self, url: &Url, staging_dir: &Path, dest: &Path) -> CairnResult<()> {
        let staged = NamedTempFile::new_in(staging_dir)
            .map_err(|e| CairnError::io("creating temporary download file", e))?;
        self.downloader.download_with_fallback(url, staged.path())?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| CairnError::io(format!("creating {}", parent.display()), e))?;
        }
        staged
            .persist(dest)
            .map_err(|e| CairnError::io(format!("placing {}", dest.display()), e.error))?;
        Ok(())
    }
}
