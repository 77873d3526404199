//! Ordered, heterogeneous section lists.

use std::fmt;
use std::sync::Arc;

use super::index::IndexPath;
use super::traits::SectionDataSource;
use super::unique_id::UniqueId;

/// The sections a container displays, in order.
///
/// Sections of unrelated element types sit side by side behind
/// [`SectionDataSource`]. The list is rebuilt together with its sections on
/// every update pass.
#[derive(Clone, Default)]
pub struct SectionList {
    sections: Vec<Arc<dyn SectionDataSource>>,
}

impl SectionList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a section.
    pub fn push<S: SectionDataSource + 'static>(&mut self, section: S) {
        self.sections.push(Arc::new(section));
    }

    /// Appends an already shared section.
    pub fn push_shared(&mut self, section: Arc<dyn SectionDataSource>) {
        self.sections.push(section);
    }

    /// Builder form of [`push`](Self::push).
    pub fn with<S: SectionDataSource + 'static>(mut self, section: S) -> Self {
        self.push(section);
        self
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns `true` if there are no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// The section at `section_index`.
    pub fn get(&self, section_index: usize) -> Option<&dyn SectionDataSource> {
        self.sections.get(section_index).map(|s| s.as_ref())
    }

    /// Iterates over sections in order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn SectionDataSource> {
        self.sections.iter().map(|s| s.as_ref())
    }

    /// The section that owns `id`, with its index.
    pub fn section_for(&self, id: &UniqueId) -> Option<(usize, &dyn SectionDataSource)> {
        self.iter()
            .enumerate()
            .find(|(_, section)| section.section_key() == id.section())
    }

    /// Where the item with identity `id` currently is.
    pub fn index_path_of(&self, id: &UniqueId) -> Option<IndexPath> {
        let (section_index, section) = self.section_for(id)?;
        section
            .position_of(id)
            .map(|item| IndexPath::new(section_index, item))
    }

    /// Every identity across all sections, with the owning section's index.
    pub fn unique_ids(&self) -> Vec<(usize, UniqueId)> {
        self.iter()
            .enumerate()
            .flat_map(|(index, section)| {
                section
                    .unique_ids()
                    .into_iter()
                    .map(move |id| (index, id))
            })
            .collect()
    }

    /// Total number of items across all sections.
    pub fn total_count(&self) -> usize {
        self.iter().map(|s| s.count()).sum()
    }
}

impl fmt::Debug for SectionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|s| (s.section_key(), s.count())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::Section;

    fn list() -> SectionList {
        SectionList::new()
            .with(Section::new("numbers", vec![1u32, 2, 3], |n: &u32| *n, |n: &u32, _| *n))
            .with(Section::new(
                "words",
                vec!["a".to_string(), "b".to_string()],
                |w: &String| w.clone(),
                |w: &String, _| w.len(),
            ))
    }

    #[test]
    fn test_counts() {
        let list = list();
        assert_eq!(list.len(), 2);
        assert!(!list.is_empty());
        assert_eq!(list.total_count(), 5);
        assert_eq!(list.unique_ids().len(), 5);
        assert!(list.get(2).is_none());
    }

    #[test]
    fn test_index_path_lookup() {
        let list = list();
        let id = UniqueId::from_ids("words", "b");
        assert_eq!(list.index_path_of(&id), Some(IndexPath::new(1, 1)));
        assert_eq!(list.section_for(&id).map(|(i, _)| i), Some(1));

        assert_eq!(list.index_path_of(&UniqueId::from_ids("words", "z")), None);
        assert_eq!(list.index_path_of(&UniqueId::from_ids("gone", "a")), None);
    }

    #[test]
    fn test_unique_ids_carry_section_index() {
        let list = list();
        let ids = list.unique_ids();
        assert_eq!(ids[0].0, 0);
        assert_eq!(ids[4], (1, UniqueId::from_ids("words", "b")));
    }
}
