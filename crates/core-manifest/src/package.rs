//! The media package manifest
//!
//! A [`MediaPackage`] owns its elements in insertion order and keeps an
//! identifier index next to them. Elements hold no pointer back to the
//! package; membership is answered by looking the identifier up.
//!
//! Removal leaves an empty slot behind instead of shifting the elements
//! after it. Slots are compacted once they outnumber the live elements, so
//! add, remove and lookup are all O(1) amortized.

use crate::element::{ElementKind, MediaPackageElement};
use crate::error::{Error, Result};
use crate::id::{IdentifierGenerator, UuidGenerator};
use std::collections::HashMap;
use std::fmt;
use std::iter::Flatten;
use std::slice;
use std::sync::Arc;

/// Iterator over the elements of a package, in insertion order
pub type Elements<'a> = Flatten<slice::Iter<'a, Option<MediaPackageElement>>>;

/// Ordered, identifier-keyed collection of classified elements
#[derive(Clone)]
pub struct MediaPackage {
    identifier: Option<String>,
    title: Option<String>,
    /// Insertion-ordered slots; `None` marks a removed element
    slots: Vec<Option<MediaPackageElement>>,
    /// identifier -> position in `slots`
    index: HashMap<String, usize>,
    ids: Arc<dyn IdentifierGenerator>,
}

impl MediaPackage {
    /// Create an empty media package with the given identifier
    pub fn new<S: Into<String>>(identifier: S) -> Self {
        Self {
            identifier: Some(identifier.into()),
            ..Self::default()
        }
    }

    /// Use `ids` for elements added without an identifier
    ///
    /// Identifiers already in the package are reserved with the new
    /// generator.
    pub fn with_id_generator(mut self, ids: Arc<dyn IdentifierGenerator>) -> Self {
        for id in self.index.keys() {
            ids.reserve(id);
        }
        self.ids = ids;
        self
    }

    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn id_generator(&self) -> &Arc<dyn IdentifierGenerator> {
        &self.ids
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn set_identifier(&mut self, identifier: Option<String>) {
        self.identifier = identifier;
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    /// Add an element, returning the identifier it is stored under
    ///
    /// Elements without identifier get a fresh one from the package's
    /// generator. Adding an identifier that is already present fails with
    /// [`Error::DuplicateElement`] and leaves the package unchanged.
    pub fn add(&mut self, mut element: MediaPackageElement) -> Result<String> {
        let id = match element.identifier() {
            Some(id) => id.to_string(),
            None => {
                let id = self.ids.next_id();
                element.set_identifier(Some(id.clone()));
                id
            }
        };

        if self.index.contains_key(&id) {
            return Err(Error::DuplicateElement(id));
        }

        self.ids.reserve(&id);
        self.index.insert(id.clone(), self.slots.len());
        self.slots.push(Some(element));
        Ok(id)
    }

    /// Remove the element sharing `element`'s identifier
    pub fn remove(&mut self, element: &MediaPackageElement) -> Option<MediaPackageElement> {
        element
            .identifier()
            .and_then(|id| self.remove_element_by_id(id))
    }

    /// Remove the element with the given identifier
    pub fn remove_element_by_id(&mut self, identifier: &str) -> Option<MediaPackageElement> {
        let pos = self.index.remove(identifier)?;
        let removed = self.slots[pos].take();
        if self.slots.len() > 2 * self.index.len() {
            self.compact();
        }
        removed
    }

    /// Drop empty slots and renumber the index
    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        for (pos, element) in self.slots.iter().flatten().enumerate() {
            if let Some(id) = element.identifier() {
                if let Some(slot) = self.index.get_mut(id) {
                    *slot = pos;
                }
            }
        }
    }

    /// Remove every element, returning them in order
    pub fn clear(&mut self) -> Vec<MediaPackageElement> {
        self.index.clear();
        std::mem::take(&mut self.slots).into_iter().flatten().collect()
    }

    pub fn get_element_by_id(&self, identifier: &str) -> Option<&MediaPackageElement> {
        self.index
            .get(identifier)
            .and_then(|&pos| self.slots[pos].as_ref())
    }

    /// Edit an element in place
    ///
    /// Returns `Ok(false)` when no element has `identifier`. If the edit
    /// changes the identifier to one already taken, the old identifier is
    /// restored and [`Error::DuplicateElement`] is returned; the rest of the
    /// edit is kept. Clearing the identifier assigns a fresh one.
    pub fn edit_element<F>(&mut self, identifier: &str, edit: F) -> Result<bool>
    where
        F: FnOnce(&mut MediaPackageElement),
    {
        let Some(&pos) = self.index.get(identifier) else {
            return Ok(false);
        };
        let Some(element) = self.slots[pos].as_mut() else {
            return Ok(false);
        };

        edit(element);

        let new_id = match element.identifier() {
            Some(id) if id == identifier => return Ok(true),
            Some(id) => id.to_string(),
            None => self.ids.next_id(),
        };

        if self.index.contains_key(&new_id) {
            element.set_identifier(Some(identifier.to_string()));
            return Err(Error::DuplicateElement(new_id));
        }

        element.set_identifier(Some(new_id.clone()));
        self.ids.reserve(&new_id);
        self.index.remove(identifier);
        self.index.insert(new_id, pos);
        Ok(true)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    /// Elements in insertion order
    pub fn elements(&self) -> Elements<'_> {
        self.slots.iter().flatten()
    }

    /// Element identifiers in insertion order
    pub fn element_ids(&self) -> impl Iterator<Item = &str> + Clone {
        self.elements().filter_map(MediaPackageElement::identifier)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Elements of one variant, in insertion order
    pub fn elements_of(
        &self,
        kind: ElementKind,
    ) -> impl Iterator<Item = &MediaPackageElement> + Clone {
        self.elements().filter(move |e| e.kind() == kind)
    }

    pub fn tracks(&self) -> impl Iterator<Item = &MediaPackageElement> + Clone {
        self.elements_of(ElementKind::Track)
    }

    pub fn catalogs(&self) -> impl Iterator<Item = &MediaPackageElement> + Clone {
        self.elements_of(ElementKind::Catalog)
    }

    pub fn attachments(&self) -> impl Iterator<Item = &MediaPackageElement> + Clone {
        self.elements_of(ElementKind::Attachment)
    }

    pub fn publications(&self) -> impl Iterator<Item = &MediaPackageElement> + Clone {
        self.elements_of(ElementKind::Publication)
    }

    pub fn has_tracks(&self) -> bool {
        self.tracks().next().is_some()
    }
}

impl Default for MediaPackage {
    /// An empty package without identifier, generating UUIDs for elements
    fn default() -> Self {
        Self {
            identifier: None,
            title: None,
            slots: Vec::new(),
            index: HashMap::new(),
            ids: Arc::new(UuidGenerator),
        }
    }
}

impl PartialEq for MediaPackage {
    /// Packages are equal when identifier, title and elements (in order) are
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
            && self.title == other.title
            && self.elements().eq(other.elements())
    }
}

impl Eq for MediaPackage {}

impl fmt::Debug for MediaPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaPackage")
            .field("identifier", &self.identifier)
            .field("title", &self.title)
            .field("elements", &self.elements().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Display for MediaPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier().unwrap_or("<no id>"))
    }
}

impl<'a> IntoIterator for &'a MediaPackage {
    type Item = &'a MediaPackageElement;
    type IntoIter = Elements<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements()
    }
}
