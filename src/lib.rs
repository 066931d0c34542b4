//! Release tooling for Quark
//!
//! Library crate shared by the `publish-release` and `smoke-test` binaries.
//! Each binary is a zero-argument build-pipeline step; behavior is driven by
//! the release config files, not by command-line flags.

pub mod artifacts;
pub mod config;
pub mod github;
pub mod logging;
pub mod publisher;
pub mod smoke;
