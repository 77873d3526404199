//! Composite item identity.
//!
//! A [`UniqueId`] names "this particular item" independently of where it
//! currently sits. It pairs the hash of the owning section's identifier with
//! the hash of the item's own identifier, so it survives reordering,
//! insertion and removal as long as the identifying field is unchanged.
//!
//! Identities are computed by value whenever they are needed and are never
//! persisted; the hashes are only meaningful within one process.

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

/// Hash a value with a fixed-key hasher.
///
/// `DefaultHasher::new()` always starts from the same keys, so equal values
/// hash equally for the lifetime of the process.
pub(crate) fn stable_hash<H: Hash + ?Sized>(value: &H) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Hash of a section identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionKey(u64);

impl SectionKey {
    /// Derive the key for a section identifier.
    pub fn new<S: Hash + ?Sized>(section_id: &S) -> Self {
        Self(stable_hash(section_id))
    }

    /// Wrap an already computed hash.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw hash value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Hash of an item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(u64);

impl ItemKey {
    /// Derive the key for an item identifier.
    pub fn new<I: Hash + ?Sized>(item_id: &I) -> Self {
        Self(stable_hash(item_id))
    }

    /// Wrap an already computed hash.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw hash value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// The identity of one item in one section.
///
/// Two items are the same item if and only if both keys match.
///
/// # Example
///
/// ```
/// use strata::section::{SectionKey, UniqueId};
///
/// let a = UniqueId::from_ids("inbox", &42u32);
/// let b = UniqueId::from_ids("inbox", &42u32);
/// let c = UniqueId::from_ids("archive", &42u32);
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// assert_eq!(a.section(), SectionKey::new("inbox"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniqueId {
    section: SectionKey,
    item: ItemKey,
}

impl UniqueId {
    /// Combine a section key and an item key.
    pub const fn new(section: SectionKey, item: ItemKey) -> Self {
        Self { section, item }
    }

    /// Build an identity straight from the two identifiers.
    pub fn from_ids<S, I>(section_id: &S, item_id: &I) -> Self
    where
        S: Hash + ?Sized,
        I: Hash + ?Sized,
    {
        Self::new(SectionKey::new(section_id), ItemKey::new(item_id))
    }

    /// The owning section's key.
    #[inline]
    pub fn section(&self) -> SectionKey {
        self.section
    }

    /// The item's key within its section.
    #[inline]
    pub fn item(&self) -> ItemKey {
        self.item
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}/{:016x}", self.section.0, self.item.0)
    }
}
