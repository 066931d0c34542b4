//! Release configuration
//!
//! One `ReleaseConfig` is built at process start and passed by reference into
//! every component. Inputs: the credentials env file and `package.json`.

use serde::Deserialize;
use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Env file providing the release token (KEY=VALUE lines)
pub const ENV_FILE: &str = "./dev-assets/prod.env";
/// Project metadata file providing the version string
pub const PACKAGE_FILE: &str = "./package.json";
/// Env var holding the GitHub token (overrides the env file)
pub const TOKEN_VAR: &str = "GITHUB_RELEASE";

const OWNER: &str = "Nishkalkashyap";
const REPO: &str = "Quark-electron";
const TARGET_BRANCH: &str = "master";
const DEFAULT_UPLOAD_WORKERS: usize = 4;

// ============================================================================
// Package Metadata
// ============================================================================

#[derive(Deserialize)]
struct PackageMeta {
    version: String,
}

// ============================================================================
// Release Config
// ============================================================================

#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub version: String,
    pub tag_name: String,
    pub release_name: String,
    pub target_branch: String,
    /// Upper bound on concurrent asset uploads
    pub max_concurrent_uploads: usize,
}

impl ReleaseConfig {
    /// Load config from the standard file locations
    pub fn load() -> Result<Self, Box<dyn Error>> {
        Self::load_from(Path::new(ENV_FILE), Path::new(PACKAGE_FILE))
    }

    pub fn load_from(env_path: &Path, package_path: &Path) -> Result<Self, Box<dyn Error>> {
        let token = match std::env::var(TOKEN_VAR) {
            Ok(value) if !value.trim().is_empty() => value,
            _ => {
                let content = fs::read_to_string(env_path).map_err(|e| {
                    format!("Failed to read env file {}: {}", env_path.display(), e)
                })?;
                parse_env_file(&content)
                    .remove(TOKEN_VAR)
                    .ok_or_else(|| format!("{} not set in {}", TOKEN_VAR, env_path.display()))?
            }
        };

        let content = fs::read_to_string(package_path).map_err(|e| {
            format!("Failed to read {}: {}", package_path.display(), e)
        })?;
        let meta: PackageMeta = serde_json::from_str(&content)?;

        Ok(Self::for_version(token, &meta.version))
    }

    /// Build a config for an explicit version (token already resolved)
    pub fn for_version(token: String, version: &str) -> Self {
        let tag_name = format!("v{}", version);
        Self {
            token,
            owner: OWNER.to_string(),
            repo: REPO.to_string(),
            version: version.to_string(),
            release_name: format!("Quark-{}", tag_name),
            tag_name,
            target_branch: TARGET_BRANCH.to_string(),
            max_concurrent_uploads: DEFAULT_UPLOAD_WORKERS,
        }
    }
}

// ============================================================================
// Env File Parsing
// ============================================================================

/// Parse KEY=VALUE lines; `#` comments and blank lines are skipped, and
/// surrounding quotes on values are stripped.
pub fn parse_env_file(content: &str) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            let value = value.trim().trim_matches('"').trim_matches('\'');
            vars.insert(key.to_string(), value.to_string());
        }
    }
    vars
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_file() {
        let content = r#"
# release credentials
GITHUB_RELEASE=abc123
QUOTED="with spaces"
SINGLE='single'

=no_key
EMPTY=
"#;
        let vars = parse_env_file(content);
        assert_eq!(vars.get("GITHUB_RELEASE").map(String::as_str), Some("abc123"));
        assert_eq!(vars.get("QUOTED").map(String::as_str), Some("with spaces"));
        assert_eq!(vars.get("SINGLE").map(String::as_str), Some("single"));
        assert_eq!(vars.get("EMPTY").map(String::as_str), Some(""));
        assert!(!vars.contains_key(""));
        assert!(!vars.contains_key("# release credentials"));
    }

    #[test]
    fn test_for_version_derives_tag_and_name() {
        let cfg = ReleaseConfig::for_version("tok".to_string(), "1.2.0");
        assert_eq!(cfg.tag_name, "v1.2.0");
        assert_eq!(cfg.release_name, "Quark-v1.2.0");
        assert_eq!(cfg.target_branch, "master");
        assert!(cfg.max_concurrent_uploads >= 1);
    }

    #[test]
    fn test_load_from_files() {
        let dir = std::env::temp_dir().join(format!("quark-cfg-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let env_path = dir.join("prod.env");
        let pkg_path = dir.join("package.json");
        fs::write(&env_path, "GITHUB_RELEASE=filetoken\n").unwrap();
        fs::write(&pkg_path, r#"{"name": "quark", "version": "3.1.4"}"#).unwrap();

        // The process env var would win over the file; tests leave it unset.
        let cfg = ReleaseConfig::load_from(&env_path, &pkg_path).unwrap();
        assert_eq!(cfg.version, "3.1.4");
        assert_eq!(cfg.tag_name, "v3.1.4");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_from_missing_token_fails() {
        // A token in the process environment would legitimately satisfy load
        if std::env::var(TOKEN_VAR).is_ok() {
            return;
        }
        let dir = std::env::temp_dir().join(format!("quark-cfg-notoken-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let env_path = dir.join("prod.env");
        let pkg_path = dir.join("package.json");
        fs::write(&env_path, "OTHER=thing\n").unwrap();
        fs::write(&pkg_path, r#"{"version": "1.0.0"}"#).unwrap();

        assert!(ReleaseConfig::load_from(&env_path, &pkg_path).is_err());

        let _ = fs::remove_dir_all(&dir);
    }
}
