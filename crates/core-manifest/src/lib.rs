//! Core media package data structures for mpkg
//!
//! This crate models a media package: an ordered, identifier-keyed set of
//! classified elements (tracks, catalogs, attachments, publications) that
//! together describe one recording or asset. It matches elements against
//! flavors, filters them, merges packages under conflict policies and
//! validates them. It performs no I/O; encoding goes through a [`Codec`].
//!
//! # Key Concepts
//!
//! - **Flavor**: `type/subtype` classifier with `*` wildcards
//! - **Merge mode**: what to do when two packages share an element id
//! - **Sanity check**: package-level invariants checked before publishing
//!
//! # Example
//!
//! ```
//! use mpkg_core_manifest::{merge, MediaPackage, MediaPackageElement, MergeMode};
//!
//! let mut dest = MediaPackage::new("mp-1");
//! dest.add(MediaPackageElement::track(true, true)
//!     .with_id("e1")
//!     .with_flavor("video/mp4".parse().unwrap())).unwrap();
//!
//! let mut src = MediaPackage::new("mp-2");
//! src.add(MediaPackageElement::track(true, true)
//!     .with_id("e1")
//!     .with_flavor("video/quicktime".parse().unwrap())).unwrap();
//!
//! let report = merge(&mut dest, &src, MergeMode::Skip).unwrap();
//! assert_eq!(report.skipped(), 1);
//! assert_eq!(dest.len(), 1);
//! ```

pub mod codec;
pub mod element;
pub mod error;
pub mod filter;
pub mod flavor;
pub mod id;
pub mod merge;
pub mod modify;
pub mod package;
pub mod validate;

// Re-export main types for convenience
pub use codec::{Codec, JsonCodec};
pub use element::{
    Checksum, ChecksumType, ElementBody, ElementKind, MediaPackageElement, Reference,
};
pub use error::{Error, Result};
pub use filter::ElementFilter;
pub use flavor::Flavor;
pub use id::{IdentifierGenerator, SequentialGenerator, UuidGenerator};
pub use merge::{merge, merged, MergeMode, MergeOutcome, MergeReport};
pub use modify::{copy, modify, replace_elements, try_modify, update_element};
pub use package::MediaPackage;
pub use validate::{ensure_sane, is_publishable, sanity_check, Violation};
