//! Copy-on-write modification and in-place update helpers
//!
//! [`modify`] and [`try_modify`] never touch their input: they clone it,
//! run the mutation on the clone and hand the clone back. A cloned element
//! belongs to no package. A cloned package owns deep copies of all its
//! elements and shares only the identifier generator with the original.
//!
//! [`update_element`], [`replace_elements`] and [`remove_elements`] mutate
//! the package they are given. None of these helpers synchronize; callers
//! sharing a package across threads must lock around them.

use crate::element::MediaPackageElement;
use crate::error::Result;
use crate::package::MediaPackage;

/// Clone `entity`, apply `mutation` to the clone and return it
pub fn modify<T, F>(entity: &T, mutation: F) -> T
where
    T: Clone,
    F: FnOnce(&mut T),
{
    let mut clone = entity.clone();
    mutation(&mut clone);
    clone
}

/// Like [`modify`] for mutations that can fail; the error is passed through
pub fn try_modify<T, E, F>(entity: &T, mutation: F) -> std::result::Result<T, E>
where
    T: Clone,
    F: FnOnce(&mut T) -> std::result::Result<(), E>,
{
    let mut clone = entity.clone();
    mutation(&mut clone)?;
    Ok(clone)
}

/// Deep copy of a package or element
pub fn copy<T: Clone>(entity: &T) -> T {
    entity.clone()
}

/// Replace the element sharing `element`'s identifier, or add it if there is
/// none. Returns the identifier the element is stored under.
pub fn update_element(mp: &mut MediaPackage, element: MediaPackageElement) -> Result<String> {
    if let Some(id) = element.identifier() {
        mp.remove_element_by_id(id);
    }
    mp.add(element)
}

/// Replace all elements of `mp` with `elements`, keeping their order
///
/// Stops at the first element that cannot be added; elements before it stay
/// in the package.
pub fn replace_elements<I>(mp: &mut MediaPackage, elements: I) -> Result<()>
where
    I: IntoIterator<Item = MediaPackageElement>,
{
    mp.clear();
    for element in elements {
        mp.add(element)?;
    }
    Ok(())
}

/// Remove every listed element, returning the ones that were present
pub fn remove_elements<I, S>(mp: &mut MediaPackage, identifiers: I) -> Vec<MediaPackageElement>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    identifiers
        .into_iter()
        .filter_map(|id| mp.remove_element_by_id(id.as_ref()))
        .collect()
}
