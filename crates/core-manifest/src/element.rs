//! Media package elements
//!
//! Every element shares the same capability surface (identifier, flavor,
//! tags, checksum, reference) and carries a variant body with the
//! type-specific attributes of tracks, catalogs, attachments and
//! publications.

use crate::error::{Error, Result};
use crate::flavor::Flavor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Reference kind pointing at the owning media package itself
pub const PACKAGE_REFERENCE: &str = "mediapackage";

/// Element variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Audio and/or video media
    Track,
    /// Metadata document
    Catalog,
    /// Any other file (slides, captions, images)
    Attachment,
    /// Distribution of the package to a channel
    Publication,
}

impl ElementKind {
    /// All variants in declaration order
    pub const ALL: [ElementKind; 4] = [
        ElementKind::Track,
        ElementKind::Catalog,
        ElementKind::Attachment,
        ElementKind::Publication,
    ];

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Track => "track",
            ElementKind::Catalog => "catalog",
            ElementKind::Attachment => "attachment",
            ElementKind::Publication => "publication",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "track" => Ok(ElementKind::Track),
            "catalog" => Ok(ElementKind::Catalog),
            "attachment" => Ok(ElementKind::Attachment),
            "publication" => Ok(ElementKind::Publication),
            _ => Err(Error::unsupported(format!("unknown element type '{}'", s))),
        }
    }
}

/// Variant-specific element attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementBody {
    Track {
        #[serde(default)]
        has_video: bool,
        #[serde(default)]
        has_audio: bool,
        /// Duration in milliseconds, when known
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
    Catalog,
    Attachment,
    Publication {
        /// Publication channel identifier (e.g. "engage-player")
        channel: String,
    },
}

impl ElementBody {
    /// The variant of this body
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementBody::Track { .. } => ElementKind::Track,
            ElementBody::Catalog => ElementKind::Catalog,
            ElementBody::Attachment => ElementKind::Attachment,
            ElementBody::Publication { .. } => ElementKind::Publication,
        }
    }
}

/// Checksum algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumType {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

impl ChecksumType {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ChecksumType::Md5 => "md5",
            ChecksumType::Sha1 => "sha1",
            ChecksumType::Sha256 => "sha256",
            ChecksumType::Sha512 => "sha512",
        }
    }
}

impl FromStr for ChecksumType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(ChecksumType::Md5),
            "sha1" | "sha-1" => Ok(ChecksumType::Sha1),
            "sha256" | "sha-256" => Ok(ChecksumType::Sha256),
            "sha512" | "sha-512" => Ok(ChecksumType::Sha512),
            _ => Err(Error::unsupported(format!("unknown checksum type '{}'", s))),
        }
    }
}

/// Content checksum of an element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum {
    #[serde(rename = "type")]
    pub kind: ChecksumType,

    /// Hex-encoded digest
    pub value: String,
}

impl Checksum {
    pub fn new<S: Into<String>>(kind: ChecksumType, value: S) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn md5<S: Into<String>>(value: S) -> Self {
        Self::new(ChecksumType::Md5, value)
    }

    pub fn sha256<S: Into<String>>(value: S) -> Self {
        Self::new(ChecksumType::Sha256, value)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.value)
    }
}

impl FromStr for Checksum {
    type Err = Error;

    /// Parse the `type:value` form
    fn from_str(s: &str) -> Result<Self> {
        let (kind, value) = s
            .split_once(':')
            .ok_or_else(|| Error::unsupported(format!("checksum '{}' is not type:value", s)))?;
        Ok(Checksum::new(kind.parse()?, value))
    }
}

/// Non-owning link from an element to another element or to the package
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// What is referenced, e.g. "track" or "mediapackage"
    #[serde(rename = "type")]
    pub kind: String,

    /// Identifier of the referenced element or package
    #[serde(rename = "id")]
    pub identifier: String,
}

impl Reference {
    /// Reference to the media package with the given identifier
    pub fn to_package<S: Into<String>>(identifier: S) -> Self {
        Self {
            kind: PACKAGE_REFERENCE.to_string(),
            identifier: identifier.into(),
        }
    }

    /// Reference to an element of the given kind
    pub fn to_element<S: Into<String>>(kind: ElementKind, identifier: S) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            identifier: identifier.into(),
        }
    }

    /// Check whether this points at a media package rather than an element
    pub fn is_package(&self) -> bool {
        self.kind == PACKAGE_REFERENCE
    }
}

/// A classified part of a media package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPackageElement {
    /// Unique within the owning package, unset until added
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    identifier: Option<String>,

    #[serde(flatten)]
    body: ElementBody,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    flavor: Option<Flavor>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    tags: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    checksum: Option<Checksum>,

    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    reference: Option<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
}

impl MediaPackageElement {
    /// Create an element with the given body and no other attributes
    pub fn new(body: ElementBody) -> Self {
        Self {
            identifier: None,
            body,
            flavor: None,
            tags: BTreeSet::new(),
            checksum: None,
            reference: None,
            uri: None,
            mime_type: None,
        }
    }

    /// Create a track
    pub fn track(has_video: bool, has_audio: bool) -> Self {
        Self::new(ElementBody::Track {
            has_video,
            has_audio,
            duration_ms: None,
        })
    }

    /// Create a catalog
    pub fn catalog() -> Self {
        Self::new(ElementBody::Catalog)
    }

    /// Create an attachment
    pub fn attachment() -> Self {
        Self::new(ElementBody::Attachment)
    }

    /// Create a publication to `channel`
    pub fn publication<S: Into<String>>(channel: S) -> Self {
        Self::new(ElementBody::Publication {
            channel: channel.into(),
        })
    }

    pub fn with_id<S: Into<String>>(mut self, identifier: S) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = Some(flavor);
        self
    }

    pub fn with_tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_checksum(mut self, checksum: Checksum) -> Self {
        self.checksum = Some(checksum);
        self
    }

    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn with_uri<S: Into<String>>(mut self, uri: S) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_mime_type<S: Into<String>>(mut self, mime_type: S) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Set or clear the identifier. Clearing makes the owning package
    /// assign a fresh one when the element is added.
    pub fn set_identifier(&mut self, identifier: Option<String>) {
        self.identifier = identifier;
    }

    pub fn kind(&self) -> ElementKind {
        self.body.kind()
    }

    pub fn body(&self) -> &ElementBody {
        &self.body
    }

    pub fn flavor(&self) -> Option<&Flavor> {
        self.flavor.as_ref()
    }

    /// Assign the flavor of an element that has none yet
    ///
    /// A flavor is fixed once assigned; reassigning fails with
    /// [`Error::InvalidFlavor`] and keeps the current one.
    pub fn set_flavor(&mut self, flavor: Flavor) -> Result<()> {
        if let Some(current) = &self.flavor {
            return Err(Error::InvalidFlavor(format!(
                "{} already has flavor {}",
                self, current
            )));
        }
        self.flavor = Some(flavor);
        Ok(())
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn add_tag<S: Into<String>>(&mut self, tag: S) {
        self.tags.insert(tag.into());
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.tags.remove(tag)
    }

    pub fn clear_tags(&mut self) {
        self.tags.clear();
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Check whether the element carries at least one of `tags`
    ///
    /// An empty tag list places no restriction and always matches.
    pub fn contains_any_tag<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.is_empty() || tags.iter().any(|t| self.tags.contains(t.as_ref()))
    }

    pub fn checksum(&self) -> Option<&Checksum> {
        self.checksum.as_ref()
    }

    pub fn set_checksum(&mut self, checksum: Option<Checksum>) {
        self.checksum = checksum;
    }

    pub fn reference(&self) -> Option<&Reference> {
        self.reference.as_ref()
    }

    pub fn set_reference(&mut self, reference: Option<Reference>) {
        self.reference = reference;
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn set_uri(&mut self, uri: Option<String>) {
        self.uri = uri;
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Video presence; always false for anything but tracks
    pub fn has_video(&self) -> bool {
        matches!(self.body, ElementBody::Track { has_video: true, .. })
    }

    /// Audio presence; always false for anything but tracks
    pub fn has_audio(&self) -> bool {
        matches!(self.body, ElementBody::Track { has_audio: true, .. })
    }

    /// Publication channel; none for anything but publications
    pub fn channel(&self) -> Option<&str> {
        match &self.body {
            ElementBody::Publication { channel } => Some(channel),
            _ => None,
        }
    }
}

impl fmt::Display for MediaPackageElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.identifier().unwrap_or("<unset>"))?;
        if let Some(flavor) = &self.flavor {
            write!(f, " ({})", flavor)?;
        }
        Ok(())
    }
}

/// Identifier of an element, if set
pub fn element_id(element: &MediaPackageElement) -> Option<&str> {
    element.identifier()
}

/// Identifier the element refers to, if it has a reference
pub fn reference_id(element: &MediaPackageElement) -> Option<&str> {
    element.reference().map(|r| r.identifier.as_str())
}

/// Checksum value of an element, if it has one
pub fn checksum_value(element: &MediaPackageElement) -> Option<&str> {
    element.checksum().map(|c| c.value.as_str())
}

/// File name taken from the last segment of the element URI
///
/// None when the element has no URI or the last segment is blank.
pub fn file_name(element: &MediaPackageElement) -> Option<&str> {
    element
        .uri()
        .and_then(|uri| uri.rsplit(['/', '\\']).next())
        .filter(|name| !name.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip_names() {
        for kind in ElementKind::ALL {
            assert_eq!(kind.as_str().parse::<ElementKind>().unwrap(), kind);
        }
        let err = "hologram".parse::<ElementKind>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedElement(_)));
    }

    #[test]
    fn test_builders() {
        let track = MediaPackageElement::track(true, false)
            .with_id("t1")
            .with_flavor("presenter/source".parse().unwrap())
            .with_tag("archive")
            .with_checksum(Checksum::md5("abc"));

        assert_eq!(track.identifier(), Some("t1"));
        assert_eq!(track.kind(), ElementKind::Track);
        assert_eq!(track.flavor().unwrap().to_string(), "presenter/source");
        assert!(track.contains_tag("archive"));
        assert_eq!(checksum_value(&track), Some("abc"));
    }

    #[test]
    fn test_av_flags_only_on_tracks() {
        let track = MediaPackageElement::track(true, true);
        assert!(track.has_video());
        assert!(track.has_audio());

        let silent = MediaPackageElement::track(true, false);
        assert!(!silent.has_audio());

        let catalog = MediaPackageElement::catalog();
        assert!(!catalog.has_video());
        assert!(!catalog.has_audio());
    }

    #[test]
    fn test_channel() {
        let publication = MediaPackageElement::publication("engage-player");
        assert_eq!(publication.channel(), Some("engage-player"));
        assert_eq!(MediaPackageElement::attachment().channel(), None);
    }

    #[test]
    fn test_contains_any_tag() {
        let e = MediaPackageElement::attachment().with_tag("a").with_tag("b");
        assert!(e.contains_any_tag(&["x", "b"]));
        assert!(!e.contains_any_tag(&["x", "y"]));
        assert!(e.contains_any_tag::<&str>(&[]));
    }

    #[test]
    fn test_tag_mutation() {
        let mut e = MediaPackageElement::catalog();
        e.add_tag("engage");
        assert!(e.contains_tag("engage"));
        assert!(e.remove_tag("engage"));
        assert!(!e.remove_tag("engage"));
        assert_eq!(e.tags().count(), 0);
    }

    #[test]
    fn test_checksum_parse_and_display() {
        let checksum: Checksum = "sha256:deadbeef".parse().unwrap();
        assert_eq!(checksum.kind, ChecksumType::Sha256);
        assert_eq!(checksum.to_string(), "sha256:deadbeef");
        assert!("crc32:1234".parse::<Checksum>().is_err());
        assert!("nocolon".parse::<Checksum>().is_err());
    }

    #[test]
    fn test_references() {
        let to_mp = Reference::to_package("mp-1");
        assert!(to_mp.is_package());

        let e = MediaPackageElement::catalog()
            .with_reference(Reference::to_element(ElementKind::Track, "t1"));
        assert_eq!(reference_id(&e), Some("t1"));
        assert!(!e.reference().unwrap().is_package());
        assert_eq!(reference_id(&MediaPackageElement::catalog()), None);
    }

    #[test]
    fn test_file_name() {
        let e = MediaPackageElement::track(true, true).with_uri("http://host/path/video.mp4");
        assert_eq!(file_name(&e), Some("video.mp4"));

        let dir = MediaPackageElement::track(true, true).with_uri("http://host/path/");
        assert_eq!(file_name(&dir), None);

        assert_eq!(file_name(&MediaPackageElement::catalog()), None);
    }

    #[test]
    fn test_serde_shape() {
        let e = MediaPackageElement::publication("engage")
            .with_id("p1")
            .with_flavor("engage/download".parse().unwrap());
        let value = serde_json::to_value(&e).unwrap();
        assert_eq!(value["type"], "publication");
        assert_eq!(value["id"], "p1");
        assert_eq!(value["channel"], "engage");
        assert_eq!(value["flavor"], "engage/download");

        let back: MediaPackageElement = serde_json::from_value(value).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn test_flavor_is_fixed_once_assigned() {
        let mut element = MediaPackageElement::catalog().with_id("c1");
        element.set_flavor(crate::flavor::EPISODE).unwrap();

        let err = element.set_flavor(crate::flavor::SERIES).unwrap_err();
        assert!(matches!(err, Error::InvalidFlavor(_)));
        assert_eq!(element.flavor(), Some(&crate::flavor::EPISODE));
    }

    #[test]
    fn test_display() {
        let e = MediaPackageElement::catalog()
            .with_id("c1")
            .with_flavor(crate::flavor::EPISODE);
        assert_eq!(e.to_string(), "catalog c1 (dublincore/episode)");
        assert_eq!(MediaPackageElement::attachment().to_string(), "attachment <unset>");
    }
}
