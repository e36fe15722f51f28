/*!
 * Error types for the mpkg tool
 */

use mpkg_core_manifest::Error as ManifestError;
use std::fmt;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, MpkgError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_PARTIAL: i32 = 1;
pub const EXIT_FATAL: i32 = 2;
pub const EXIT_CONFLICT: i32 = 3;

#[derive(Debug)]
pub enum MpkgError {
    /// Input manifest file not found
    NotFound(PathBuf),

    /// I/O error
    Io(io::Error),

    /// Configuration error
    Config(String),

    /// Manifest engine error
    Manifest(ManifestError),

    /// Package failed the sanity check
    SanityCheck { package: String, violations: Vec<String> },

    /// Generic error with message
    Other(String),
}

impl MpkgError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            MpkgError::Manifest(ManifestError::Conflict { .. }) => EXIT_CONFLICT,
            MpkgError::Manifest(ManifestError::Validation { .. }) | MpkgError::SanityCheck { .. } => {
                EXIT_PARTIAL
            }
            MpkgError::NotFound(_)
            | MpkgError::Io(_)
            | MpkgError::Config(_)
            | MpkgError::Manifest(_)
            | MpkgError::Other(_) => EXIT_FATAL,
        }
    }

    /// Check if retrying with a different merge mode could succeed
    pub fn is_conflict(&self) -> bool {
        matches!(self, MpkgError::Manifest(e) if e.is_conflict())
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            MpkgError::NotFound(_) | MpkgError::Io(_) => ErrorCategory::Io,
            MpkgError::Config(_) | MpkgError::Manifest(ManifestError::InvalidMergeMode(_)) => {
                ErrorCategory::Configuration
            }
            MpkgError::Manifest(ManifestError::Conflict { .. }) => ErrorCategory::Conflict,
            MpkgError::Manifest(ManifestError::Validation { .. }) | MpkgError::SanityCheck { .. } => {
                ErrorCategory::Validation
            }
            MpkgError::Manifest(ManifestError::UnsupportedElement(_)) => {
                ErrorCategory::Unsupported
            }
            MpkgError::Manifest(
                ManifestError::Codec(_) | ManifestError::Schema(_) | ManifestError::InvalidFlavor(_),
            ) => ErrorCategory::Codec,
            MpkgError::Manifest(_) | MpkgError::Other(_) => ErrorCategory::Unknown,
        }
    }
}

/// Error category for classification and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Conflict,
    Validation,
    Unsupported,
    Codec,
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Io => write!(f, "io"),
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::Conflict => write!(f, "conflict"),
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Unsupported => write!(f, "unsupported"),
            ErrorCategory::Codec => write!(f, "codec"),
            ErrorCategory::Unknown => write!(f, "unknown"),
        }
    }
}

impl fmt::Display for MpkgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MpkgError::NotFound(path) => {
                write!(f, "Media package not found: {}", path.display())
            }
            MpkgError::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
            MpkgError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            MpkgError::Manifest(err) => {
                write!(f, "{}", err)
            }
            MpkgError::SanityCheck {
                package,
                violations,
            } => {
                write!(
                    f,
                    "Media package {} failed sanity check: {}",
                    package,
                    violations.join(", ")
                )
            }
            MpkgError::Other(msg) => {
                write!(f, "{}", msg)
            }
        }
    }
}

impl std::error::Error for MpkgError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MpkgError::Io(err) => Some(err),
            MpkgError::Manifest(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for MpkgError {
    fn from(err: io::Error) -> Self {
        MpkgError::Io(err)
    }
}

impl From<ManifestError> for MpkgError {
    fn from(err: ManifestError) -> Self {
        MpkgError::Manifest(err)
    }
}

impl From<toml::de::Error> for MpkgError {
    fn from(err: toml::de::Error) -> Self {
        MpkgError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<toml::ser::Error> for MpkgError {
    fn from(err: toml::ser::Error) -> Self {
        MpkgError::Config(format!("TOML write error: {}", err))
    }
}
