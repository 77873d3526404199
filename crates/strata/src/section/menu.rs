//! Context menu descriptions.
//!
//! A section does not build menus itself; it forwards the request to a
//! provider closure and hands the result to the container, which turns it
//! into a platform menu.
//!
//! ```
//! use strata::section::{ContextMenu, MenuAction};
//!
//! let menu = ContextMenu::new()
//!     .with_title("Task")
//!     .with_action(MenuAction::new("rename", "Rename"))
//!     .with_action(MenuAction::new("delete", "Delete").with_destructive(true));
//!
//! assert_eq!(menu.actions().len(), 2);
//! assert!(menu.action("delete").is_some_and(|a| a.is_destructive()));
//! ```

use std::sync::Arc;

/// One entry in a context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuAction {
    identifier: String,
    title: String,
    destructive: bool,
    enabled: bool,
}

impl MenuAction {
    /// Creates an enabled, non-destructive action.
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            destructive: false,
            enabled: true,
        }
    }

    /// Marks the action as destructive.
    pub fn with_destructive(mut self, destructive: bool) -> Self {
        self.destructive = destructive;
        self
    }

    /// Sets whether the action can be triggered.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Stable identifier reported back when the action is chosen.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// User-visible title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the action is destructive.
    pub fn is_destructive(&self) -> bool {
        self.destructive
    }

    /// Whether the action can be triggered.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// A context menu for one item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextMenu {
    title: Option<String>,
    actions: Vec<MenuAction>,
}

impl ContextMenu {
    /// Creates an empty, untitled menu.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the menu title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Appends an action.
    pub fn with_action(mut self, action: MenuAction) -> Self {
        self.actions.push(action);
        self
    }

    /// The menu title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The actions, in display order.
    pub fn actions(&self) -> &[MenuAction] {
        &self.actions
    }

    /// Finds an action by identifier.
    pub fn action(&self, identifier: &str) -> Option<&MenuAction> {
        self.actions.iter().find(|a| a.identifier == identifier)
    }

    /// Returns true if the menu has no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Builds the context menu for the item at a position.
pub type ContextMenuProvider<Item> = Arc<dyn Fn(usize, &Item) -> Option<ContextMenu> + Send + Sync>;
