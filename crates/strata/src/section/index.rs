//! Positional addressing for sectioned content.
//!
//! An [`IndexPath`] locates an item by section number and item number at
//! one moment in time. Positions are not identities: after any data
//! mutation a path may point at a different item, or at nothing. Use
//! [`UniqueId`](super::UniqueId) for anything that must survive an update.

use std::fmt;

/// A (section, item) position.
///
/// Ordering is section-major, matching the order items are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct IndexPath {
    section: usize,
    item: usize,
}

impl IndexPath {
    /// Creates a new index path.
    #[inline]
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }

    /// The section number.
    #[inline]
    pub const fn section(&self) -> usize {
        self.section
    }

    /// The item number within the section.
    #[inline]
    pub const fn item(&self) -> usize {
        self.item
    }

    /// The path of the item at `item` in the same section.
    #[inline]
    pub const fn sibling(&self, item: usize) -> Self {
        Self::new(self.section, item)
    }
}

impl From<(usize, usize)> for IndexPath {
    fn from((section, item): (usize, usize)) -> Self {
        Self::new(section, item)
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.item)
    }
}
