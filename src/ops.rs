/*!
 * Package file operations behind the mpkg subcommands
 *
 * Each operation reads packages through the JSON codec, runs the
 * corresponding manifest routine and returns a value the CLI can print.
 */

use crate::config::MpkgConfig;
use crate::error::{MpkgError, Result};
use mpkg_core_manifest::{
    is_publishable, merge, sanity_check, Codec, ElementFilter, ElementKind,
    JsonCodec, MediaPackage, MediaPackageElement, MergeMode, MergeReport,
};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Codec configured from the tool settings
pub fn codec(config: &MpkgConfig) -> JsonCodec {
    JsonCodec::new()
        .pretty(config.pretty)
        .with_id_generator(config.id_generator())
}

/// Read a package file
pub fn load_package(path: &Path, config: &MpkgConfig) -> Result<MediaPackage> {
    if !path.exists() {
        return Err(MpkgError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    let mp = codec(config).decode(&bytes)?;
    debug!(path = %path.display(), package = %mp, elements = mp.len(), "Loaded media package");
    Ok(mp)
}

/// Write a package file, replacing any existing content
pub fn save_package(mp: &MediaPackage, path: &Path, config: &MpkgConfig) -> Result<()> {
    let bytes = codec(config).encode(mp)?;
    fs::write(path, bytes)?;
    debug!(path = %path.display(), package = %mp, "Saved media package");
    Ok(())
}

/// Render a package as JSON text
pub fn render_package(mp: &MediaPackage, config: &MpkgConfig) -> Result<String> {
    Ok(codec(config).encode_to_string(mp)?)
}

/// Merge the package at `src_path` into the one at `dest_path`
///
/// The merged package is written to `output` when given, otherwise back
/// over `dest_path`. Nothing is written when the merge fails.
pub fn run_merge(
    dest_path: &Path,
    src_path: &Path,
    output: Option<&Path>,
    mode: MergeMode,
    config: &MpkgConfig,
) -> Result<MergeReport> {
    let mut dest = load_package(dest_path, config)?;
    let src = load_package(src_path, config)?;

    info!(
        target_package = %dest,
        source_package = %src,
        mode = %mode,
        "Merging media packages"
    );

    let report = merge(&mut dest, &src, mode)?;
    save_package(&dest, output.unwrap_or(dest_path), config)?;
    Ok(report)
}

/// Outcome of checking a package file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub package: String,
    pub elements: usize,
    pub publishable: bool,
}

/// Sanity check the package at `path`
///
/// Violations become a [`MpkgError::SanityCheck`] so the tool exits non-zero.
pub fn run_check(path: &Path, config: &MpkgConfig) -> Result<CheckReport> {
    let mp = load_package(path, config)?;
    let violations = sanity_check(&mp);
    if !violations.is_empty() {
        for violation in &violations {
            warn!(package = %mp, "{}", violation);
        }
        return Err(MpkgError::SanityCheck {
            package: mp.to_string(),
            violations: violations.iter().map(ToString::to_string).collect(),
        });
    }

    Ok(CheckReport {
        package: mp.to_string(),
        elements: mp.len(),
        publishable: is_publishable(&mp),
    })
}

/// Combine filter expressions; all of them must match
pub fn parse_filters<S: AsRef<str>>(expressions: &[S]) -> Result<ElementFilter> {
    let filters = expressions
        .iter()
        .map(|expr| expr.as_ref().parse::<ElementFilter>())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ElementFilter::all(filters))
}

/// Select the elements of the package at `path` matching every expression
pub fn run_filter<S: AsRef<str>>(
    path: &Path,
    expressions: &[S],
    config: &MpkgConfig,
) -> Result<Vec<MediaPackageElement>> {
    let filter = parse_filters(expressions)?;
    let mp = load_package(path, config)?;
    let selected: Vec<_> = mp.select(&filter).cloned().collect();
    debug!(filter = %filter, matched = selected.len(), "Filtered elements");
    Ok(selected)
}

/// Per-kind element counts of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSummary {
    pub package: String,
    pub title: Option<String>,
    pub counts: Vec<(ElementKind, usize)>,
    pub elements: Vec<String>,
}

impl PackageSummary {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }
}

/// Summarize a package
pub fn describe(mp: &MediaPackage) -> PackageSummary {
    PackageSummary {
        package: mp.to_string(),
        title: mp.title().map(str::to_string),
        counts: ElementKind::ALL
            .iter()
            .map(|&kind| (kind, mp.elements_of(kind).count()))
            .collect(),
        elements: mp.elements().map(ToString::to_string).collect(),
    }
}
