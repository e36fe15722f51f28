/*!
 * mpkg - media package manifest tool
 *
 * Reads media package manifests (JSON), merges them under a conflict
 * policy, filters their elements and checks them before publishing.
 * The data model lives in the `mpkg-core-manifest` crate, re-exported
 * here as [`manifest`].
 */

pub mod cli_style;
pub mod config;
pub mod error;
pub mod logging;
pub mod ops;

pub use mpkg_core_manifest as manifest;

// Re-export commonly used types
pub use config::{LogLevel, MpkgConfig};
pub use error::{MpkgError, Result};
pub use manifest::{ElementFilter, MediaPackage, MediaPackageElement, MergeMode, MergeReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
