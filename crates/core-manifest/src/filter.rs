//! Filters and predicates over media package elements
//!
//! [`ElementFilter`] is a predicate value: it can be built in code, parsed
//! from a short text expression, combined with `and`/`or`/`!`, and applied
//! lazily to any element collection. The closure combinators at the bottom
//! of this module cover ad-hoc predicates that have no filter variant.

use crate::element::{ElementKind, MediaPackageElement};
use crate::error::{Error, Result};
use crate::flavor::{self, Flavor};
use crate::package::MediaPackage;
use std::fmt;
use std::ops::Not;
use std::str::FromStr;

/// Composable element predicate
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ElementFilter {
    /// Matches every element
    #[default]
    Any,
    /// Element variant equals the given kind
    Type(ElementKind),
    /// Element flavor matches (wildcards allowed on either side)
    Flavor(Flavor),
    /// Element carries the tag
    Tag(String),
    /// Element carries at least one of the tags; an empty list matches all
    TagsAny(Vec<String>),
    HasChecksum,
    HasNoChecksum,
    /// Track with video; false for other variants
    HasVideo,
    /// Track with audio; false for other variants
    HasAudio,
    /// Publication to the given channel; false for other variants
    Channel(String),
    And(Vec<ElementFilter>),
    Or(Vec<ElementFilter>),
    Not(Box<ElementFilter>),
}

impl ElementFilter {
    pub fn by_type(kind: ElementKind) -> Self {
        ElementFilter::Type(kind)
    }

    pub fn by_flavor(flavor: Flavor) -> Self {
        ElementFilter::Flavor(flavor)
    }

    pub fn by_tag<S: Into<String>>(tag: S) -> Self {
        ElementFilter::Tag(tag.into())
    }

    pub fn by_tags_any<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ElementFilter::TagsAny(tags.into_iter().map(Into::into).collect())
    }

    pub fn of_channel<S: Into<String>>(channel: S) -> Self {
        ElementFilter::Channel(channel.into())
    }

    /// Both filters must match; nested conjunctions are flattened
    pub fn and(self, other: ElementFilter) -> Self {
        match (self, other) {
            (ElementFilter::Any, f) | (f, ElementFilter::Any) => f,
            (ElementFilter::And(mut a), ElementFilter::And(b)) => {
                a.extend(b);
                ElementFilter::And(a)
            }
            (ElementFilter::And(mut a), f) => {
                a.push(f);
                ElementFilter::And(a)
            }
            (f, ElementFilter::And(mut b)) => {
                b.insert(0, f);
                ElementFilter::And(b)
            }
            (a, b) => ElementFilter::And(vec![a, b]),
        }
    }

    /// Either filter must match; nested disjunctions are flattened
    pub fn or(self, other: ElementFilter) -> Self {
        match (self, other) {
            (ElementFilter::Or(mut a), ElementFilter::Or(b)) => {
                a.extend(b);
                ElementFilter::Or(a)
            }
            (ElementFilter::Or(mut a), f) => {
                a.push(f);
                ElementFilter::Or(a)
            }
            (f, ElementFilter::Or(mut b)) => {
                b.insert(0, f);
                ElementFilter::Or(b)
            }
            (a, b) => ElementFilter::Or(vec![a, b]),
        }
    }

    /// Conjunction of all filters; `Any` when empty
    pub fn all<I: IntoIterator<Item = ElementFilter>>(filters: I) -> Self {
        filters.into_iter().fold(ElementFilter::Any, ElementFilter::and)
    }

    /// Evaluate against one element
    ///
    /// Conjunctions and disjunctions stop at the first operand that decides
    /// the result.
    pub fn matches(&self, element: &MediaPackageElement) -> bool {
        match self {
            ElementFilter::Any => true,
            ElementFilter::Type(kind) => element.kind() == *kind,
            ElementFilter::Flavor(f) => f.matches_opt(element.flavor()),
            ElementFilter::Tag(tag) => element.contains_tag(tag),
            ElementFilter::TagsAny(tags) => element.contains_any_tag(tags.as_slice()),
            ElementFilter::HasChecksum => element.checksum().is_some(),
            ElementFilter::HasNoChecksum => element.checksum().is_none(),
            ElementFilter::HasVideo => element.has_video(),
            ElementFilter::HasAudio => element.has_audio(),
            ElementFilter::Channel(id) => element.channel() == Some(id.as_str()),
            ElementFilter::And(fs) => fs.iter().all(|f| f.matches(element)),
            ElementFilter::Or(fs) => fs.iter().any(|f| f.matches(element)),
            ElementFilter::Not(f) => !f.matches(element),
        }
    }

    /// Lazily select matching elements
    ///
    /// The returned iterator is `Clone`, so a selection can be walked again
    /// without re-evaluating anything up front.
    pub fn select<'a, I>(
        &'a self,
        elements: I,
    ) -> impl Iterator<Item = &'a MediaPackageElement> + Clone + 'a
    where
        I: IntoIterator<Item = &'a MediaPackageElement>,
        I::IntoIter: Clone + 'a,
    {
        elements.into_iter().filter(move |e| self.matches(e))
    }

    /// This filter as a plain predicate closure
    pub fn as_predicate(&self) -> impl Fn(&MediaPackageElement) -> bool + '_ {
        move |e| self.matches(e)
    }
}

impl Not for ElementFilter {
    type Output = ElementFilter;

    fn not(self) -> Self::Output {
        match self {
            ElementFilter::Not(inner) => *inner,
            ElementFilter::HasChecksum => ElementFilter::HasNoChecksum,
            ElementFilter::HasNoChecksum => ElementFilter::HasChecksum,
            f => ElementFilter::Not(Box::new(f)),
        }
    }
}

impl fmt::Display for ElementFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementFilter::Any => write!(f, "any"),
            ElementFilter::Type(kind) => write!(f, "type:{}", kind),
            ElementFilter::Flavor(flavor) => write!(f, "flavor:{}", flavor),
            ElementFilter::Tag(tag) => write!(f, "tag:{}", tag),
            ElementFilter::TagsAny(tags) => write!(f, "tags:{}", tags.join(",")),
            ElementFilter::HasChecksum => write!(f, "checksum"),
            ElementFilter::HasNoChecksum => write!(f, "no-checksum"),
            ElementFilter::HasVideo => write!(f, "video"),
            ElementFilter::HasAudio => write!(f, "audio"),
            ElementFilter::Channel(id) => write!(f, "channel:{}", id),
            ElementFilter::And(fs) => write_joined(f, fs, " & "),
            ElementFilter::Or(fs) => write_joined(f, fs, " | "),
            ElementFilter::Not(inner) => write!(f, "!{}", inner),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, filters: &[ElementFilter], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, filter) in filters.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", filter)?;
    }
    write!(f, ")")
}

impl FromStr for ElementFilter {
    type Err = Error;

    /// Parse a single filter expression such as `flavor:video/*` or
    /// `!tag:archive`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix('!') {
            return Ok(!rest.parse::<ElementFilter>()?);
        }

        let (key, value) = match s.split_once(':') {
            Some((k, v)) => (k.trim(), Some(v.trim())),
            None => (s, None),
        };

        let filter = match (key, value) {
            ("any", None) => ElementFilter::Any,
            ("checksum", None) => ElementFilter::HasChecksum,
            ("no-checksum", None) => ElementFilter::HasNoChecksum,
            ("video", None) => ElementFilter::HasVideo,
            ("audio", None) => ElementFilter::HasAudio,
            ("type", Some(v)) => ElementFilter::Type(v.parse()?),
            ("flavor", Some(v)) => ElementFilter::Flavor(v.parse()?),
            ("tag", Some(v)) if !v.is_empty() => ElementFilter::by_tag(v),
            ("tags", Some(v)) => ElementFilter::by_tags_any(
                v.split(',').map(str::trim).filter(|t| !t.is_empty()),
            ),
            ("channel", Some(v)) if !v.is_empty() => ElementFilter::of_channel(v),
            _ => return Err(Error::InvalidFilter(s.to_string())),
        };
        Ok(filter)
    }
}

impl MediaPackage {
    /// Lazily select the elements of this package matching `filter`
    pub fn select<'a>(
        &'a self,
        filter: &'a ElementFilter,
    ) -> impl Iterator<Item = &'a MediaPackageElement> + Clone + 'a {
        filter.select(self.elements())
    }
}

/// Publications only
pub fn is_publication(element: &MediaPackageElement) -> bool {
    element.kind() == ElementKind::Publication
}

/// Everything but publications
pub fn is_not_publication(element: &MediaPackageElement) -> bool {
    !is_publication(element)
}

/// Episode metadata catalogs
pub fn is_episode_dublin_core(element: &MediaPackageElement) -> bool {
    flavor::EPISODE.matches_opt(element.flavor())
}

/// Series metadata catalogs
pub fn is_series_dublin_core(element: &MediaPackageElement) -> bool {
    flavor::SERIES.matches_opt(element.flavor())
}

/// Episode access control lists
pub fn is_episode_acl(element: &MediaPackageElement) -> bool {
    flavor::XACML_POLICY_EPISODE.matches_opt(element.flavor())
}

/// SMIL catalogs
pub fn is_smil_catalog(element: &MediaPackageElement) -> bool {
    flavor::SMIL.matches_opt(element.flavor())
}

/// Short-circuiting conjunction of two predicates
pub fn and<A, B>(a: A, b: B) -> impl Fn(&MediaPackageElement) -> bool
where
    A: Fn(&MediaPackageElement) -> bool,
    B: Fn(&MediaPackageElement) -> bool,
{
    move |e| a(e) && b(e)
}

/// Short-circuiting disjunction of two predicates
pub fn or<A, B>(a: A, b: B) -> impl Fn(&MediaPackageElement) -> bool
where
    A: Fn(&MediaPackageElement) -> bool,
    B: Fn(&MediaPackageElement) -> bool,
{
    move |e| a(e) || b(e)
}

/// Negation of a predicate
pub fn not<A>(a: A) -> impl Fn(&MediaPackageElement) -> bool
where
    A: Fn(&MediaPackageElement) -> bool,
{
    move |e| !a(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Checksum;
    use std::cell::Cell;

    fn flavor(s: &str) -> Flavor {
        s.parse().unwrap()
    }

    fn sample() -> MediaPackage {
        let mut mp = MediaPackage::new("mp-1");
        mp.add(
            MediaPackageElement::track(true, true)
                .with_id("t1")
                .with_flavor(flavor("presenter/source"))
                .with_tag("archive")
                .with_checksum(Checksum::md5("aa")),
        )
        .unwrap();
        mp.add(
            MediaPackageElement::track(false, true)
                .with_id("t2")
                .with_flavor(flavor("presenter/audio")),
        )
        .unwrap();
        mp.add(
            MediaPackageElement::catalog()
                .with_id("c1")
                .with_flavor(flavor::EPISODE)
                .with_tag("engage"),
        )
        .unwrap();
        mp.add(MediaPackageElement::attachment().with_id("a1")).unwrap();
        mp.add(
            MediaPackageElement::publication("engage-player")
                .with_id("p1")
                .with_flavor(flavor("engage/download")),
        )
        .unwrap();
        mp
    }

    fn ids<'a>(it: impl Iterator<Item = &'a MediaPackageElement>) -> Vec<&'a str> {
        it.filter_map(MediaPackageElement::identifier).collect()
    }

    #[test]
    fn test_by_type() {
        let mp = sample();
        let f = ElementFilter::by_type(ElementKind::Track);
        assert_eq!(ids(mp.select(&f)), vec!["t1", "t2"]);
    }

    #[test]
    fn test_by_flavor_with_wildcards() {
        let mp = sample();
        assert_eq!(
            ids(mp.select(&ElementFilter::by_flavor(flavor("presenter/*")))),
            vec!["t1", "t2"]
        );
        // Elements without flavor never match, not even */*
        assert_eq!(
            ids(mp.select(&ElementFilter::by_flavor(Flavor::any()))),
            vec!["t1", "t2", "c1", "p1"]
        );
    }

    #[test]
    fn test_by_tags() {
        let mp = sample();
        assert_eq!(ids(mp.select(&ElementFilter::by_tag("archive"))), vec!["t1"]);
        assert_eq!(
            ids(mp.select(&ElementFilter::by_tags_any(["engage", "archive"]))),
            vec!["t1", "c1"]
        );
    }

    #[test]
    fn test_checksum_and_av_filters() {
        let mp = sample();
        assert_eq!(ids(mp.select(&ElementFilter::HasChecksum)), vec!["t1"]);
        assert_eq!(
            ids(mp.select(&ElementFilter::HasNoChecksum)),
            vec!["t2", "c1", "a1", "p1"]
        );
        assert_eq!(ids(mp.select(&ElementFilter::HasVideo)), vec!["t1"]);
        assert_eq!(ids(mp.select(&ElementFilter::HasAudio)), vec!["t1", "t2"]);
        assert_eq!(
            ids(mp.select(&!ElementFilter::HasVideo)),
            vec!["t2", "c1", "a1", "p1"]
        );
    }

    #[test]
    fn test_of_channel() {
        let mp = sample();
        assert_eq!(
            ids(mp.select(&ElementFilter::of_channel("engage-player"))),
            vec!["p1"]
        );
        assert!(mp
            .select(&ElementFilter::of_channel("oaipmh"))
            .next()
            .is_none());
    }

    #[test]
    fn test_combinators() {
        let mp = sample();
        let f = ElementFilter::by_type(ElementKind::Track).and(!ElementFilter::HasVideo);
        assert_eq!(ids(mp.select(&f)), vec!["t2"]);

        let f = ElementFilter::by_tag("engage").or(ElementFilter::of_channel("engage-player"));
        assert_eq!(ids(mp.select(&f)), vec!["c1", "p1"]);
    }

    #[test]
    fn test_and_flattens() {
        let f = ElementFilter::HasVideo
            .and(ElementFilter::HasAudio)
            .and(ElementFilter::HasChecksum);
        assert!(matches!(f, ElementFilter::And(ref fs) if fs.len() == 3));
        assert_eq!(ElementFilter::all(Vec::new()), ElementFilter::Any);
        assert_eq!(!!ElementFilter::HasVideo, ElementFilter::HasVideo);
    }

    #[test]
    fn test_selection_is_restartable() {
        let mp = sample();
        let f = ElementFilter::by_type(ElementKind::Track);
        let selection = mp.select(&f);
        let first: Vec<_> = ids(selection.clone());
        let second: Vec<_> = ids(selection);
        assert_eq!(first, second);
    }

    #[test]
    fn test_closure_combinators_short_circuit() {
        let mp = sample();
        let calls = Cell::new(0);
        let counting = |_: &MediaPackageElement| {
            calls.set(calls.get() + 1);
            true
        };

        let p = and(is_publication, &counting);
        assert_eq!(mp.elements().filter(|e| p(*e)).count(), 1);
        assert_eq!(calls.get(), 1);

        calls.set(0);
        let p = or(is_not_publication, &counting);
        assert_eq!(mp.elements().filter(|e| p(*e)).count(), 5);
        assert_eq!(calls.get(), 1);

        let p = not(is_publication);
        assert_eq!(mp.elements().filter(|e| p(*e)).count(), 4);
    }

    #[test]
    fn test_well_known_predicates() {
        let mp = sample();
        assert_eq!(ids(mp.elements().filter(|e| is_episode_dublin_core(e))), vec!["c1"]);
        assert!(!mp.elements().any(is_series_dublin_core));
        assert!(!mp.elements().any(is_episode_acl));
        assert!(!mp.elements().any(is_smil_catalog));
    }

    #[test]
    fn test_parse_expressions() {
        assert_eq!(
            "type:track".parse::<ElementFilter>().unwrap(),
            ElementFilter::Type(ElementKind::Track)
        );
        assert_eq!(
            "flavor:video/*".parse::<ElementFilter>().unwrap(),
            ElementFilter::Flavor(flavor("video/*"))
        );
        assert_eq!(
            "tags: a, b".parse::<ElementFilter>().unwrap(),
            ElementFilter::by_tags_any(["a", "b"])
        );
        assert_eq!(
            "!checksum".parse::<ElementFilter>().unwrap(),
            ElementFilter::HasNoChecksum
        );
        assert_eq!(
            "!tag:archive".parse::<ElementFilter>().unwrap(),
            ElementFilter::Not(Box::new(ElementFilter::by_tag("archive")))
        );
        assert!(matches!(
            "colour:red".parse::<ElementFilter>(),
            Err(Error::InvalidFilter(_))
        ));
        assert!(matches!(
            "type:hologram".parse::<ElementFilter>(),
            Err(Error::UnsupportedElement(_))
        ));
        assert!("tag:".parse::<ElementFilter>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for expr in ["type:catalog", "flavor:dublincore/episode", "tag:x", "video", "channel:c"] {
            let f: ElementFilter = expr.parse().unwrap();
            assert_eq!(f.to_string(), expr);
        }
    }

    #[test]
    fn test_default_filter_matches_everything() {
        let mp = sample();
        assert_eq!(ElementFilter::default(), ElementFilter::Any);
        assert_eq!(mp.select(&ElementFilter::default()).count(), mp.len());
    }
}
