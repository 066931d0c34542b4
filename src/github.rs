//! GitHub release API client
//!
//! Thin wrappers over the REST endpoints used by the publisher. Transport and
//! authorization failures propagate unrecovered; callers abort the run.

use serde::{Deserialize, Serialize};
use std::error::Error;

use crate::config::ReleaseConfig;

const API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = "quark-release-tools";

// ============================================================================
// Wire Types
// ============================================================================

/// GitHub release metadata
#[derive(Deserialize, Debug, Clone)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    pub name: Option<String>,
    pub upload_url: String,
    pub draft: bool,
    pub prerelease: bool,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// GitHub release asset
#[derive(Deserialize, Debug, Clone)]
pub struct ReleaseAsset {
    pub id: u64,
    pub name: String,
}

/// Mutable release fields for an update call; `None` fields are omitted
#[derive(Serialize, Debug, Clone, Default)]
pub struct UpdateReleaseParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<bool>,
}

// ============================================================================
// Release Endpoints
// ============================================================================

/// List all releases for the repository
pub fn list_releases(cfg: &ReleaseConfig) -> Result<Vec<Release>, Box<dyn Error>> {
    let url = format!("{}/repos/{}/{}/releases", API_BASE, cfg.owner, cfg.repo);
    let releases: Vec<Release> = authed(ureq::get(&url), cfg).call()?.into_json()?;
    Ok(releases)
}

/// Find the release tagged `v<version>`, if one exists
pub fn find_release_for_version(
    cfg: &ReleaseConfig,
    version: &str,
) -> Result<Option<Release>, Box<dyn Error>> {
    let releases = list_releases(cfg)?;
    let tag = format!("v{}", version);
    Ok(find_by_tag(&releases, &tag).cloned())
}

/// Match a release by exact tag equality
pub fn find_by_tag<'a>(releases: &'a [Release], tag: &str) -> Option<&'a Release> {
    releases.iter().find(|rel| rel.tag_name == tag)
}

/// Create a new draft pre-release tagged with the configured version
pub fn create_release(cfg: &ReleaseConfig) -> Result<Release, Box<dyn Error>> {
    let url = format!("{}/repos/{}/{}/releases", API_BASE, cfg.owner, cfg.repo);
    let release: Release = authed(ureq::post(&url), cfg)
        .send_json(serde_json::json!({
            "tag_name": cfg.tag_name,
            "target_commitish": cfg.target_branch,
            "name": cfg.release_name,
            "draft": true,
            "prerelease": true,
        }))?
        .into_json()?;
    Ok(release)
}

/// Update mutable fields of an existing release by identifier
pub fn update_release(
    cfg: &ReleaseConfig,
    release_id: u64,
    params: &UpdateReleaseParams,
) -> Result<Release, Box<dyn Error>> {
    let url = format!(
        "{}/repos/{}/{}/releases/{}",
        API_BASE, cfg.owner, cfg.repo, release_id
    );
    let release: Release = authed(ureq::request("PATCH", &url), cfg)
        .send_json(params)?
        .into_json()?;
    Ok(release)
}

// ============================================================================
// Asset Endpoints
// ============================================================================

/// List all assets attached to a release
pub fn list_assets(cfg: &ReleaseConfig, release_id: u64) -> Result<Vec<ReleaseAsset>, Box<dyn Error>> {
    let url = format!(
        "{}/repos/{}/{}/releases/{}/assets",
        API_BASE, cfg.owner, cfg.repo, release_id
    );
    let assets: Vec<ReleaseAsset> = authed(ureq::get(&url), cfg).call()?.into_json()?;
    Ok(assets)
}

/// Delete a release asset by identifier
pub fn delete_asset(cfg: &ReleaseConfig, asset_id: u64) -> Result<(), Box<dyn Error>> {
    let url = format!(
        "{}/repos/{}/{}/releases/assets/{}",
        API_BASE, cfg.owner, cfg.repo, asset_id
    );
    authed(ureq::delete(&url), cfg).call()?;
    Ok(())
}

/// Upload asset content to a release's templated upload URL
pub fn upload_asset(
    cfg: &ReleaseConfig,
    upload_url: &str,
    name: &str,
    content_type: &str,
    content: &[u8],
) -> Result<(), Box<dyn Error>> {
    let url = format!(
        "{}?name={}",
        strip_url_template(upload_url),
        encode_query_value(name)
    );
    authed(ureq::post(&url), cfg)
        .set("Content-Type", content_type)
        .set("Content-Length", &content.len().to_string())
        .send_bytes(content)?;
    Ok(())
}

// ============================================================================
// Request Helpers
// ============================================================================

fn authed(request: ureq::Request, cfg: &ReleaseConfig) -> ureq::Request {
    request
        .set("User-Agent", USER_AGENT)
        .set("Authorization", &format!("token {}", cfg.token))
        .set("Accept", "application/vnd.github+json")
}

/// Strip the `{?name,label}` template suffix from an upload URL
pub fn strip_url_template(url: &str) -> &str {
    match url.find('{') {
        Some(idx) => &url[..idx],
        None => url,
    }
}

/// Percent-encode a query parameter value (asset names are base filenames,
/// but spaces and such still need escaping)
pub fn encode_query_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => {
                encoded.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(id: u64, tag: &str) -> Release {
        Release {
            id,
            tag_name: tag.to_string(),
            name: Some(format!("Quark-{}", tag)),
            upload_url: "https://uploads.github.com/repos/o/r/releases/1/assets{?name,label}"
                .to_string(),
            draft: true,
            prerelease: true,
            assets: Vec::new(),
        }
    }

    #[test]
    fn test_find_by_tag_exact_match() {
        let releases = vec![release(1, "v1.2.0"), release(2, "v1.10.0")];
        assert_eq!(find_by_tag(&releases, "v1.2.0").map(|r| r.id), Some(1));
        assert_eq!(find_by_tag(&releases, "v1.10.0").map(|r| r.id), Some(2));
        assert!(find_by_tag(&releases, "v1.2").is_none());
        assert!(find_by_tag(&releases, "1.2.0").is_none());
        assert!(find_by_tag(&[], "v1.2.0").is_none());
    }

    #[test]
    fn test_strip_url_template() {
        assert_eq!(
            strip_url_template(
                "https://uploads.github.com/repos/o/r/releases/1/assets{?name,label}"
            ),
            "https://uploads.github.com/repos/o/r/releases/1/assets"
        );
        assert_eq!(strip_url_template("https://example.com/assets"), "https://example.com/assets");
    }

    #[test]
    fn test_encode_query_value() {
        assert_eq!(encode_query_value("quark-1.2.0.AppImage"), "quark-1.2.0.AppImage");
        assert_eq!(encode_query_value("Quark Setup 1.2.0.exe"), "Quark%20Setup%201.2.0.exe");
        assert_eq!(encode_query_value("a+b&c"), "a%2Bb%26c");
    }

    #[test]
    fn test_update_params_omit_unset_fields() {
        let params = UpdateReleaseParams {
            draft: Some(false),
            ..Default::default()
        };
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"draft":false}"#);
    }
}
