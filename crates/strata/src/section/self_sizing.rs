//! Self-sizing preferences for cells and supplementary views.

use std::sync::Arc;

use super::index::IndexPath;

/// What kind of cell a sizing question is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// An item cell.
    Content,
    /// A supplementary view of the given slot kind.
    Supplementary(String),
}

/// The cell a container is about to size.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelfSizingContext {
    /// Item cell or supplementary view.
    pub cell_kind: CellKind,
    /// Where the cell sits.
    pub index_path: IndexPath,
}

impl SelfSizingContext {
    /// Context for an item cell.
    pub fn content(index_path: IndexPath) -> Self {
        Self {
            cell_kind: CellKind::Content,
            index_path,
        }
    }

    /// Context for a supplementary view.
    pub fn supplementary(kind: impl Into<String>, index_path: IndexPath) -> Self {
        Self {
            cell_kind: CellKind::Supplementary(kind.into()),
            index_path,
        }
    }
}

/// How a cell may size itself.
///
/// `None` for an axis leaves the decision to the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfSizingConfig {
    /// Size to fit content horizontally.
    pub self_size_horizontally: Option<bool>,
    /// Size to fit content vertically.
    pub self_size_vertically: Option<bool>,
    /// Allow the fitted width to exceed the collection's width.
    pub can_exceed_collection_width: bool,
    /// Allow the fitted height to exceed the collection's height.
    pub can_exceed_collection_height: bool,
}

impl Default for SelfSizingConfig {
    fn default() -> Self {
        Self {
            self_size_horizontally: None,
            self_size_vertically: None,
            can_exceed_collection_width: true,
            can_exceed_collection_height: true,
        }
    }
}

impl SelfSizingConfig {
    /// Fit content on both axes.
    pub fn fit_content() -> Self {
        Self {
            self_size_horizontally: Some(true),
            self_size_vertically: Some(true),
            ..Self::default()
        }
    }

    /// Sets horizontal self-sizing.
    pub fn with_horizontal(mut self, enabled: bool) -> Self {
        self.self_size_horizontally = Some(enabled);
        self
    }

    /// Sets vertical self-sizing.
    pub fn with_vertical(mut self, enabled: bool) -> Self {
        self.self_size_vertically = Some(enabled);
        self
    }

    /// Sets whether fitted sizes may exceed the collection bounds.
    pub fn with_exceed_bounds(mut self, width: bool, height: bool) -> Self {
        self.can_exceed_collection_width = width;
        self.can_exceed_collection_height = height;
        self
    }
}

/// Answers sizing questions for a section.
pub type SelfSizingProvider =
    Arc<dyn Fn(&SelfSizingContext) -> Option<SelfSizingConfig> + Send + Sync>;
