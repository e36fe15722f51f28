//! Validation of media packages and encoded documents
//!
//! [`sanity_check`] covers the manifest-level invariants a package must
//! satisfy before it is handed on. [`validate_document`] checks an encoded
//! JSON document against the package schema before it is decoded.

use crate::error::{Error, Result};
use crate::package::MediaPackage;
use jsonschema::{ValidationError, Validator};
use serde_json::{json, Value};
use std::fmt;

/// A violated manifest rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The package has no identifier
    NoId,
    /// The identifier is empty or whitespace
    BlankId,
}

impl Violation {
    pub fn message(&self) -> &'static str {
        match self {
            Violation::NoId => "no ID",
            Violation::BlankId => "blank ID",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Basic sanity checking for media packages
///
/// Every rule is evaluated; the result is empty iff the package is healthy.
pub fn sanity_check(mp: &MediaPackage) -> Vec<Violation> {
    let mut violations = Vec::new();

    if mp.identifier().is_none() {
        violations.push(Violation::NoId);
    }
    if mp.identifier().is_some_and(|id| id.trim().is_empty()) {
        violations.push(Violation::BlankId);
    }

    violations
}

/// [`sanity_check`] as a `Result`, failing with [`Error::Validation`]
pub fn ensure_sane(mp: &MediaPackage) -> Result<()> {
    let violations = sanity_check(mp);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(violations.iter().map(Violation::message)))
    }
}

/// A package can be published once it has a title and at least one track
pub fn is_publishable(mp: &MediaPackage) -> bool {
    mp.title().is_some_and(|t| !t.trim().is_empty()) && mp.has_tracks()
}

/// Validate an encoded media package document against its JSON Schema
pub fn validate_document(document: &Value) -> Result<()> {
    let schema = get_media_package_schema();
    let compiled = Validator::new(&schema)
        .map_err(|e| Error::Schema(format!("Failed to compile schema: {}", e)))?;

    if let Err(errors) = compiled.validate(document) {
        let error_messages: Vec<String> = errors
            .map(|e| format_validation_error(&e))
            .collect();

        return Err(Error::Schema(format!(
            "Media package validation failed:\n  - {}",
            error_messages.join("\n  - ")
        )));
    }

    Ok(())
}

/// Format a validation error into a readable string
fn format_validation_error(error: &ValidationError) -> String {
    format!("{}: {}", error.instance_path, error)
}

/// Get the media package JSON Schema
///
/// The element `type` is only required to be a string here; unknown
/// variants are reported by the codec as unsupported elements.
fn get_media_package_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "required": ["elements"],
        "properties": {
            "id": {
                "type": ["string", "null"]
            },
            "title": {
                "type": ["string", "null"]
            },
            "elements": {
                "type": "array",
                "items": {
                    "$ref": "#/$defs/element"
                }
            }
        },
        "$defs": {
            "element": {
                "type": "object",
                "required": ["type"],
                "properties": {
                    "type": {
                        "type": "string",
                        "minLength": 1
                    },
                    "id": {
                        "type": "string",
                        "minLength": 1
                    },
                    "flavor": {
                        "type": "string",
                        "pattern": "^[^/]+/[^/]+$"
                    },
                    "tags": {
                        "type": "array",
                        "items": { "type": "string" },
                        "uniqueItems": true
                    },
                    "checksum": {
                        "type": "object",
                        "required": ["type", "value"],
                        "properties": {
                            "type": { "type": "string" },
                            "value": { "type": "string" }
                        }
                    },
                    "ref": {
                        "type": "object",
                        "required": ["type", "id"],
                        "properties": {
                            "type": { "type": "string", "minLength": 1 },
                            "id": { "type": "string", "minLength": 1 }
                        }
                    },
                    "uri": {
                        "type": "string"
                    },
                    "channel": {
                        "type": "string"
                    }
                }
            }
        }
    })
}
