//! Release resolution and asset publishing
//!
//! Resolves the release object for the current version (reusing an existing
//! one or creating a draft pre-release), then fans out asset uploads across
//! a bounded set of worker threads. An existing same-named asset is deleted
//! before its replacement is uploaded, so republishing a version never
//! accumulates duplicates.

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use crate::artifacts;
use crate::config::ReleaseConfig;
use crate::github::{self, Release, ReleaseAsset};
use crate::logging::{log_info, log_upload};

// ============================================================================
// Outcome Types
// ============================================================================

/// Successful publish summary
#[derive(Debug, Clone)]
pub struct PublishReport {
    /// Asset names uploaded this run
    pub uploaded: Vec<String>,
    /// Candidate paths that were absent on disk
    pub skipped: Vec<String>,
}

/// Publish failure carrying the names that had already uploaded, so callers
/// can judge whether the partial remote state is acceptable. Completed
/// uploads are not rolled back.
#[derive(Debug)]
pub struct PublishError {
    pub completed: Vec<String>,
    pub message: String,
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.completed.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(
                f,
                "{} (already uploaded: {})",
                self.message,
                self.completed.join(", ")
            )
        }
    }
}

impl Error for PublishError {}

enum Disposition {
    Uploaded(String),
    Skipped(String),
}

// ============================================================================
// Release Resolver
// ============================================================================

/// Return the release tagged with the configured version, creating a draft
/// pre-release when none exists. Existing releases are never mutated.
pub fn resolve_release(cfg: &ReleaseConfig) -> Result<Release, Box<dyn Error>> {
    if let Some(release) = github::find_release_for_version(cfg, &cfg.version)? {
        log_info(&format!("Reusing existing release {}", release.tag_name));
        return Ok(release);
    }

    log_info(&format!("Creating release {}", cfg.tag_name));
    github::create_release(cfg)
}

// ============================================================================
// Asset Publisher
// ============================================================================

/// Ensure every existing candidate file is attached to the release as a
/// same-named asset with fresh content.
///
/// The release's asset list is fetched once up front and shared read-only by
/// every worker; each worker owns a distinct asset name, so no locking is
/// needed. Workers run in batches of `max_concurrent_uploads`; after a batch
/// containing a failure finishes, no further batches are launched.
pub fn publish(
    cfg: &ReleaseConfig,
    release: &Release,
    candidates: &[PathBuf],
) -> Result<PublishReport, PublishError> {
    let assets = github::list_assets(cfg, release.id).map_err(|e| PublishError {
        completed: Vec::new(),
        message: format!("Failed to list release assets: {}", e),
    })?;
    let assets: &[ReleaseAsset] = &assets;
    let upload_url: &str = &release.upload_url;

    let width = cfg.max_concurrent_uploads.max(1);
    let mut uploaded = Vec::new();
    let mut skipped = Vec::new();
    let mut failure: Option<String> = None;

    for batch in candidates.chunks(width) {
        let results: Vec<Result<Disposition, String>> = thread::scope(|scope| {
            let handles: Vec<_> = batch
                .iter()
                .map(|path| scope.spawn(move || publish_one(cfg, upload_url, assets, path)))
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err("Upload worker panicked".to_string()))
                })
                .collect()
        });

        for result in results {
            match result {
                Ok(Disposition::Uploaded(name)) => uploaded.push(name),
                Ok(Disposition::Skipped(path)) => skipped.push(path),
                Err(message) => {
                    // First failure wins; siblings in the batch still ran to
                    // completion or failure on their own.
                    if failure.is_none() {
                        failure = Some(message);
                    }
                }
            }
        }

        if failure.is_some() {
            break;
        }
    }

    match failure {
        Some(message) => Err(PublishError {
            completed: uploaded,
            message,
        }),
        None => Ok(PublishReport { uploaded, skipped }),
    }
}

/// Publish a single candidate file. Errors are stringified so they can cross
/// the thread boundary.
fn publish_one(
    cfg: &ReleaseConfig,
    upload_url: &str,
    assets: &[ReleaseAsset],
    path: &Path,
) -> Result<Disposition, String> {
    // Missing artifacts are an expected skip, not an error
    if !path.exists() {
        return Ok(Disposition::Skipped(path.display().to_string()));
    }

    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| format!("Invalid artifact file name: {}", path.display()))?
        .to_string();

    if let Some(asset_id) = existing_asset_id(assets, &name) {
        github::delete_asset(cfg, asset_id)
            .map_err(|e| format!("Failed to delete existing asset {}: {}", name, e))?;
    }

    log_upload(&format!("Uploading file: {}", name));

    let content =
        fs::read(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let content_type = artifacts::content_type_for(path);

    github::upload_asset(cfg, upload_url, &name, content_type, &content)
        .map_err(|e| format!("Failed to upload {}: {}", name, e))?;

    Ok(Disposition::Uploaded(name))
}

/// Find the identifier of an already-attached asset with this name
pub fn existing_asset_id(assets: &[ReleaseAsset], name: &str) -> Option<u64> {
    assets.iter().find(|asset| asset.name == name).map(|asset| asset.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_asset_id() {
        let assets = vec![
            ReleaseAsset {
                id: 11,
                name: "quark-1.2.0.AppImage".to_string(),
            },
            ReleaseAsset {
                id: 12,
                name: "quark-1.2.0.deb".to_string(),
            },
        ];
        assert_eq!(existing_asset_id(&assets, "quark-1.2.0.deb"), Some(12));
        assert_eq!(existing_asset_id(&assets, "quark-1.2.0.dmg"), None);
        assert_eq!(existing_asset_id(&[], "quark-1.2.0.deb"), None);
    }

    #[test]
    fn test_publish_error_display_includes_completed() {
        let err = PublishError {
            completed: vec!["a.deb".to_string(), "b.AppImage".to_string()],
            message: "Failed to upload c.dmg".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("Failed to upload c.dmg"));
        assert!(rendered.contains("a.deb"));
        assert!(rendered.contains("b.AppImage"));

        let bare = PublishError {
            completed: Vec::new(),
            message: "Failed to list release assets".to_string(),
        };
        assert_eq!(bare.to_string(), "Failed to list release assets");
    }
}
