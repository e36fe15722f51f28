//! Merging two media packages
//!
//! Elements of the source package are visited in insertion order and added
//! to the target. When the target already holds an element with the same
//! identifier, the [`MergeMode`] decides what happens.
//!
//! In `Fail` mode all conflicts are detected before anything is added, so a
//! failed merge leaves the target exactly as it was.

use crate::element::MediaPackageElement;
use crate::error::{Error, Result};
use crate::modify::try_modify;
use crate::package::MediaPackage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Conflict resolution when both packages hold an element with the same id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// Add the source element under a freshly generated identifier
    #[default]
    Merge,
    /// Replace the target element with the source element
    Replace,
    /// Keep the target element and drop the source element
    Skip,
    /// Abort the merge
    Fail,
}

impl MergeMode {
    pub const ALL: [MergeMode; 4] = [
        MergeMode::Merge,
        MergeMode::Replace,
        MergeMode::Skip,
        MergeMode::Fail,
    ];

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeMode::Merge => "merge",
            MergeMode::Replace => "replace",
            MergeMode::Skip => "skip",
            MergeMode::Fail => "fail",
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "merge" => Ok(MergeMode::Merge),
            "replace" => Ok(MergeMode::Replace),
            "skip" => Ok(MergeMode::Skip),
            "fail" => Ok(MergeMode::Fail),
            _ => Err(Error::InvalidMergeMode(s.to_string())),
        }
    }
}

/// What happened to one source element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum MergeOutcome {
    /// No conflict, added as is
    Added { id: String },
    /// Took the place of the target element with the same id
    Replaced { id: String },
    /// Dropped in favour of the target element
    Skipped { id: String },
    /// Added under a new identifier
    Renamed { from: String, to: String },
}

/// Per-element record of a merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub mode: MergeMode,
    pub outcomes: Vec<MergeOutcome>,
}

impl MergeReport {
    fn new(mode: MergeMode) -> Self {
        Self {
            mode,
            outcomes: Vec::new(),
        }
    }

    pub fn added(&self) -> usize {
        self.count(|o| matches!(o, MergeOutcome::Added { .. }))
    }

    pub fn replaced(&self) -> usize {
        self.count(|o| matches!(o, MergeOutcome::Replaced { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, MergeOutcome::Skipped { .. }))
    }

    pub fn renamed(&self) -> usize {
        self.count(|o| matches!(o, MergeOutcome::Renamed { .. }))
    }

    /// Number of source elements that met an existing identifier
    pub fn conflicts(&self) -> usize {
        self.replaced() + self.skipped() + self.renamed()
    }

    fn count<F: Fn(&MergeOutcome) -> bool>(&self, f: F) -> usize {
        self.outcomes.iter().filter(|o| f(o)).count()
    }
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} merge: {} added, {} replaced, {} skipped, {} renamed",
            self.mode,
            self.added(),
            self.replaced(),
            self.skipped(),
            self.renamed()
        )
    }
}

/// Merge the elements of `src` into `dest`
///
/// `src` is left untouched; its elements are copied. Conflicts are looked up
/// in the target's identifier index, which already reflects the elements
/// added earlier in the same call.
///
/// # Errors
///
/// - [`Error::Conflict`] in `Fail` mode when any identifier of `src` already
///   exists in `dest`. Nothing is added in that case.
/// - [`Error::DuplicateElement`] if a freshly generated identifier collides
///   with one already in `dest`. Elements merged before that point remain.
pub fn merge(dest: &mut MediaPackage, src: &MediaPackage, mode: MergeMode) -> Result<MergeReport> {
    if mode == MergeMode::Fail {
        if let Some(id) = src.element_ids().find(|id| dest.contains(id)) {
            return Err(Error::conflict(dest.to_string(), id));
        }
    }

    // Renamed elements must not take an id still to come from `src`
    if mode == MergeMode::Merge {
        for id in src.element_ids() {
            dest.id_generator().reserve(id);
        }
    }

    let mut report = MergeReport::new(mode);

    for element in src.elements() {
        let id = match element.identifier() {
            Some(id) if dest.contains(id) => id,
            _ => {
                let id = dest.add(element.clone())?;
                report.outcomes.push(MergeOutcome::Added { id });
                continue;
            }
        };

        let outcome = match mode {
            MergeMode::Replace => {
                debug!("Replacing element {} while merging {} with {}", id, dest, src);
                dest.remove_element_by_id(id);
                dest.add(element.clone())?;
                MergeOutcome::Replaced { id: id.to_string() }
            }
            MergeMode::Skip => {
                debug!("Skipping element {} while merging {} with {}", id, dest, src);
                MergeOutcome::Skipped { id: id.to_string() }
            }
            MergeMode::Merge => {
                debug!("Renaming element {} while merging {} with {}", id, dest, src);
                let mut renamed: MediaPackageElement = element.clone();
                renamed.set_identifier(None);
                let to = dest.add(renamed)?;
                MergeOutcome::Renamed {
                    from: id.to_string(),
                    to,
                }
            }
            // Conflicts were ruled out up front
            MergeMode::Fail => return Err(Error::conflict(dest.to_string(), id)),
        };
        report.outcomes.push(outcome);
    }

    info!(
        package = %dest,
        source = %src,
        mode = %mode,
        added = report.added(),
        conflicts = report.conflicts(),
        "Merged media packages"
    );

    Ok(report)
}

/// Merge into a copy of `dest`, leaving both inputs untouched
pub fn merged(
    dest: &MediaPackage,
    src: &MediaPackage,
    mode: MergeMode,
) -> Result<(MediaPackage, MergeReport)> {
    let mut report = None;
    let result = try_modify(dest, |mp| {
        report = Some(merge(mp, src, mode)?);
        Ok::<(), Error>(())
    })?;
    Ok((result, report.unwrap_or_else(|| MergeReport::new(mode))))
}
