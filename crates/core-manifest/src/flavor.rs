//! Flavors: two-part type classifiers for media package elements
//!
//! A flavor is written `type/subtype`, e.g. `presenter/source` or
//! `dublincore/episode`. Either part may be the wildcard `*`, which matches
//! anything in that position.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Wildcard token matching any flavor component
pub const WILDCARD: &str = "*";

/// Separator between the major and minor component
pub const SEPARATOR: char = '/';

/// Episode metadata catalog
pub const EPISODE: Flavor = Flavor::from_static("dublincore", "episode");

/// Series metadata catalog
pub const SERIES: Flavor = Flavor::from_static("dublincore", "series");

/// Episode access control policy
pub const XACML_POLICY_EPISODE: Flavor = Flavor::from_static("security", "xacml+episode");

/// SMIL editing catalog
pub const SMIL: Flavor = Flavor::from_static("smil", "smil");

/// Two-part element classifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Flavor {
    major: Cow<'static, str>,
    minor: Cow<'static, str>,
}

impl Flavor {
    /// Create a flavor from its two components
    ///
    /// Components are trimmed. Empty components or components containing
    /// the separator are rejected.
    pub fn new<A: AsRef<str>, B: AsRef<str>>(major: A, minor: B) -> Result<Self> {
        let major = check_part(major.as_ref())?;
        let minor = check_part(minor.as_ref())?;
        Ok(Self {
            major: Cow::Owned(major),
            minor: Cow::Owned(minor),
        })
    }

    const fn from_static(major: &'static str, minor: &'static str) -> Self {
        Self {
            major: Cow::Borrowed(major),
            minor: Cow::Borrowed(minor),
        }
    }

    /// The flavor matching every other flavor, `*/*`
    pub const fn any() -> Self {
        Self::from_static(WILDCARD, WILDCARD)
    }

    /// Parse a flavor from its `type/subtype` form
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once(SEPARATOR) {
            Some((major, minor)) => Self::new(major, minor),
            None => Err(Error::InvalidFlavor(format!(
                "'{}' is not of the form type/subtype",
                s
            ))),
        }
    }

    /// Major component (e.g. `presenter`)
    pub fn major(&self) -> &str {
        &self.major
    }

    /// Minor component (e.g. `source`)
    pub fn minor(&self) -> &str {
        &self.minor
    }

    /// Check whether either component is a wildcard
    pub fn is_wildcard(&self) -> bool {
        self.major == WILDCARD || self.minor == WILDCARD
    }

    /// Componentwise wildcard match. Symmetric.
    pub fn matches(&self, other: &Flavor) -> bool {
        part_matches(&self.major, &other.major) && part_matches(&self.minor, &other.minor)
    }

    /// Like [`Flavor::matches`], with an absent flavor never matching
    pub fn matches_opt(&self, other: Option<&Flavor>) -> bool {
        other.is_some_and(|f| self.matches(f))
    }

    /// Fill the wildcard components of `self` from `target`
    ///
    /// `*/preview` applied to `presenter/source` yields `presenter/preview`.
    pub fn apply_to(&self, target: &Flavor) -> Flavor {
        let major = if self.major == WILDCARD {
            target.major.clone()
        } else {
            self.major.clone()
        };
        let minor = if self.minor == WILDCARD {
            target.minor.clone()
        } else {
            self.minor.clone()
        };
        Flavor { major, minor }
    }
}

/// Free-function form of [`Flavor::matches`]
pub fn matches(a: &Flavor, b: &Flavor) -> bool {
    a.matches(b)
}

fn part_matches(a: &str, b: &str) -> bool {
    a == WILDCARD || b == WILDCARD || a == b
}

fn check_part(part: &str) -> Result<String> {
    let part = part.trim();
    if part.is_empty() {
        return Err(Error::InvalidFlavor("flavor component is empty".to_string()));
    }
    if part.contains(SEPARATOR) {
        return Err(Error::InvalidFlavor(format!(
            "flavor component '{}' contains '{}'",
            part, SEPARATOR
        )));
    }
    Ok(part.to_string())
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.major, SEPARATOR, self.minor)
    }
}

impl FromStr for Flavor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Flavor::parse(s)
    }
}

impl TryFrom<String> for Flavor {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Flavor::parse(&s)
    }
}

impl From<Flavor> for String {
    fn from(flavor: Flavor) -> Self {
        flavor.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(s: &str) -> Flavor {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let flavor = f("presenter/source");
        assert_eq!(flavor.major(), "presenter");
        assert_eq!(flavor.minor(), "source");
        assert_eq!(flavor.to_string(), "presenter/source");
    }

    #[test]
    fn test_parse_trims_components() {
        assert_eq!(f(" video / mp4 "), f("video/mp4"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Flavor::parse("video").is_err());
        assert!(Flavor::parse("/mp4").is_err());
        assert!(Flavor::parse("video/").is_err());
        assert!(Flavor::parse("a/b/c").is_err());
        assert!(matches!(
            Flavor::parse("nope"),
            Err(Error::InvalidFlavor(_))
        ));
    }

    #[test]
    fn test_matches_reflexive() {
        for s in ["video/mp4", "*/*", "video/*", "*/mp4"] {
            assert!(f(s).matches(&f(s)), "{} should match itself", s);
        }
    }

    #[test]
    fn test_any_matches_everything() {
        for s in ["video/mp4", "audio/mp3", "dublincore/episode", "*/x"] {
            assert!(Flavor::any().matches(&f(s)));
        }
    }

    #[test]
    fn test_wildcard_matching() {
        assert!(f("video/*").matches(&f("video/mp4")));
        assert!(!f("video/*").matches(&f("audio/mp4")));
        assert!(f("*/mp4").matches(&f("audio/mp4")));
        assert!(!f("video/mp4").matches(&f("video/quicktime")));
    }

    #[test]
    fn test_matching_is_symmetric() {
        let flavors = ["video/mp4", "video/*", "*/mp4", "*/*", "audio/mp3", "audio/*"];
        for a in flavors {
            for b in flavors {
                assert_eq!(matches(&f(a), &f(b)), matches(&f(b), &f(a)), "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_matches_opt() {
        assert!(!Flavor::any().matches_opt(None));
        assert!(Flavor::any().matches_opt(Some(&EPISODE)));
    }

    #[test]
    fn test_apply_to() {
        let target = f("presenter/source");
        assert_eq!(f("*/preview").apply_to(&target), f("presenter/preview"));
        assert_eq!(f("composite/*").apply_to(&target), f("composite/source"));
        assert_eq!(f("a/b").apply_to(&target), f("a/b"));
    }

    #[test]
    fn test_well_known_flavors() {
        assert_eq!(EPISODE, f("dublincore/episode"));
        assert_eq!(SERIES.to_string(), "dublincore/series");
        assert_eq!(XACML_POLICY_EPISODE.to_string(), "security/xacml+episode");
        assert!(f("dublincore/*").matches(&EPISODE));
        assert!(!EPISODE.matches(&SERIES));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&f("video/mp4")).unwrap();
        assert_eq!(json, "\"video/mp4\"");
        let back: Flavor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f("video/mp4"));
        assert!(serde_json::from_str::<Flavor>("\"broken\"").is_err());
    }
}
