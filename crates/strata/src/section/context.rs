//! Per-request cell metadata.

/// Position-relative facts about a cell, handed to the content rule.
///
/// Derived from the current data snapshot and selection every time content
/// is requested; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellContext {
    /// Whether the item's position is in the section's selection.
    pub is_selected: bool,
    /// The item's position in the section.
    pub index: usize,
    /// The item is the first in its section.
    pub is_first_in_section: bool,
    /// The item is the last in its section.
    pub is_last_in_section: bool,
}

impl CellContext {
    /// Compute the context for `index` in a section of `len` items.
    pub fn new(index: usize, len: usize, is_selected: bool) -> Self {
        Self {
            is_selected,
            index,
            is_first_in_section: index == 0,
            is_last_in_section: len > 0 && index == len - 1,
        }
    }
}
