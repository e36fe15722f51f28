//! Error types for manifest operations

use thiserror::Error;

/// Result type for manifest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during manifest operations
#[derive(Error, Debug)]
pub enum Error {
    /// Sanity check failed; carries every violated rule
    #[error("Validation error: {}", violations.join(", "))]
    Validation { violations: Vec<String> },

    /// Fail-mode merge met an identifier already present in the target
    #[error("Target media package {package} already contains element with id {element}")]
    Conflict { package: String, element: String },

    /// Element variant or shape not recognized
    #[error("Unsupported element: {0}")]
    UnsupportedElement(String),

    /// An element with this identifier is already part of the media package
    #[error("Duplicate element identifier: {0}")]
    DuplicateElement(String),

    /// Flavor string could not be parsed
    #[error("Invalid flavor: {0}")]
    InvalidFlavor(String),

    /// Merge mode name is not one of merge, replace, skip, fail
    #[error("Invalid merge mode: {0}")]
    InvalidMergeMode(String),

    /// Filter expression could not be parsed
    #[error("Invalid filter expression: {0}")]
    InvalidFilter(String),

    /// Encoded document is malformed
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Encoded document does not satisfy the manifest schema
    #[error("Schema error: {0}")]
    Schema(String),
}

impl Error {
    /// Create a validation error from a list of violation messages
    pub fn validation<I, S>(violations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Error::Validation {
            violations: violations.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a merge conflict error
    pub fn conflict<P: Into<String>, E: Into<String>>(package: P, element: E) -> Self {
        Error::Conflict {
            package: package.into(),
            element: element.into(),
        }
    }

    /// Create an unsupported element error
    pub fn unsupported<S: Into<String>>(what: S) -> Self {
        Error::UnsupportedElement(what.into())
    }

    /// Check if this error is a merge conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }
}
