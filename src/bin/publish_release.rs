//! Publish build artifacts to the GitHub release for the current version
//!
//! Zero-argument pipeline step: reads the version from package.json, ensures
//! a release tagged `v<version>` exists (creating a draft pre-release when
//! needed), then uploads the platform's artifact files as assets.

use std::error::Error;

use quark_release_tools::artifacts::files_to_upload;
use quark_release_tools::config::ReleaseConfig;
use quark_release_tools::logging::{init_logger, log_error, log_info};
use quark_release_tools::publisher::{publish, resolve_release, PublishReport};

fn main() -> Result<(), Box<dyn Error>> {
    init_logger();

    let cfg = ReleaseConfig::load().map_err(|e| {
        log_error(&format!("Failed to load release config: {}", e));
        e
    })?;

    match run(&cfg) {
        Ok(report) => {
            for path in &report.skipped {
                log_info(&format!("Skipped missing artifact: {}", path));
            }
            log_info(&format!(
                "Uploaded all files to github ({} assets)",
                report.uploaded.len()
            ));
            Ok(())
        }
        Err(err) => {
            log_error(&err.to_string());
            Err("Error uploading file".into())
        }
    }
}

fn run(cfg: &ReleaseConfig) -> Result<PublishReport, Box<dyn Error>> {
    let release = resolve_release(cfg)?;
    let candidates = files_to_upload(&cfg.version, std::env::consts::OS);
    let report = publish(cfg, &release, &candidates)?;
    Ok(report)
}
