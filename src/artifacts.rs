//! Artifact file set and MIME inference
//!
//! Maps a version and platform to the electron-builder outputs under
//! `./build/` that are eligible for publishing. Entries may be absent on
//! disk; the publisher skips missing files.

use std::path::{Path, PathBuf};

const BUILD_DIR: &str = "./build";

/// Ordered platform-specific candidate artifact paths
pub fn files_to_upload(version: &str, platform: &str) -> Vec<PathBuf> {
    let build = Path::new(BUILD_DIR);
    let names: Vec<String> = match platform {
        "linux" => vec![
            format!("quark-{}.AppImage", version),
            format!("quark-{}.deb", version),
        ],
        "windows" => vec![
            format!("quark-{}.exe", version),
            format!("quark-{}.exe.blockmap", version),
        ],
        "macos" => vec![
            format!("quark-{}.dmg", version),
            format!("quark-{}-mac.zip", version),
        ],
        _ => Vec::new(),
    };
    names.into_iter().map(|name| build.join(name)).collect()
}

/// Infer a MIME type from the file extension, falling back to
/// `application/octet-stream` when the extension is unknown
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "exe" => "application/x-msdownload",
        "deb" => "application/x-debian-package",
        "dmg" => "application/x-apple-diskimage",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "json" => "application/json",
        "yml" | "yaml" => "text/yaml",
        "txt" => "text/plain",
        // AppImage, blockmap and anything else unknown
        _ => "application/octet-stream",
    }
}
