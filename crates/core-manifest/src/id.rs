//! Identifier generation for elements that need a fresh identifier

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of identifiers unique within the enclosing system
pub trait IdentifierGenerator: Send + Sync + fmt::Debug {
    /// Produce the next identifier
    fn next_id(&self) -> String;

    /// Note that `id` is already in use and must not be produced later
    fn reserve(&self, _id: &str) {}
}

/// Random UUID v4 identifiers
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdentifierGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// `prefix-N` identifiers from a monotonic counter
///
/// Reserved identifiers of the form `prefix-N` move the counter past `N`,
/// so identifiers read back from a stored package are never handed out
/// again.
#[derive(Debug)]
pub struct SequentialGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialGenerator {
    pub fn new<S: Into<String>>(prefix: S) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Generator continuing after the highest `prefix-N` among `ids`
    pub fn starting_after<S, I>(prefix: S, ids: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let generator = Self::new(prefix);
        for id in ids {
            generator.reserve(id.as_ref());
        }
        generator
    }

    /// Highest counter value handed out or reserved so far
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    fn sequence_number(&self, id: &str) -> Option<u64> {
        id.strip_prefix(self.prefix.as_str())?
            .strip_prefix('-')?
            .parse()
            .ok()
    }
}

impl IdentifierGenerator for SequentialGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, n)
    }

    fn reserve(&self, id: &str) {
        if let Some(n) = self.sequence_number(id) {
            self.counter.fetch_max(n, Ordering::Relaxed);
        }
    }
}
