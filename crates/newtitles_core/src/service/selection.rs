//! Selected-book state shared by the list and the map.
//!
//! # Invariants
//! - At most one book is selected, referenced by `BookId`.
//! - The open callout, if any, belongs to the selected book.

use crate::model::book::{Book, BookId};
use serde::{Deserialize, Serialize};

/// What happens to the selection when the listing is replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Drop the selection and close its callout.
    #[default]
    ClearOnMonthChange,
    /// Retain the (possibly stale) selection.
    Keep,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionController {
    selected: Option<BookId>,
    policy: SelectionPolicy,
}

impl SelectionController {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            selected: None,
            policy,
        }
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn selected(&self) -> Option<BookId> {
        self.selected
    }

    pub fn is_selected(&self, book_id: BookId) -> bool {
        self.selected == Some(book_id)
    }

    pub fn select(&mut self, book_id: BookId) {
        self.selected = Some(book_id);
    }

    /// Clears the selection, returning the previous one.
    pub fn clear(&mut self) -> Option<BookId> {
        self.selected.take()
    }

    /// Applies the policy after a listing change.
    ///
    /// Returns `true` when a selection was dropped.
    pub fn on_listing_changed(&mut self) -> bool {
        match self.policy {
            SelectionPolicy::ClearOnMonthChange => self.clear().is_some(),
            SelectionPolicy::Keep => false,
        }
    }

    /// Book whose callout should be open: the selection, if it is listed.
    pub fn callout_target(&self, listing: &[Book]) -> Option<BookId> {
        let selected = self.selected?;
        listing
            .iter()
            .any(|book| book.id == selected)
            .then_some(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectionController, SelectionPolicy};
    use uuid::Uuid;

    #[test]
    fn clear_policy_drops_selection_on_listing_change() {
        let mut selection = SelectionController::new(SelectionPolicy::ClearOnMonthChange);
        assert!(!selection.on_listing_changed());
        selection.select(Uuid::new_v4());
        assert!(selection.on_listing_changed());
        assert_eq!(selection.selected(), None);
    }

    #[test]
    fn keep_policy_retains_selection() {
        let mut selection = SelectionController::new(SelectionPolicy::Keep);
        let id = Uuid::new_v4();
        selection.select(id);
        assert!(!selection.on_listing_changed());
        assert!(selection.is_selected(id));
    }

    #[test]
    fn callout_target_requires_listed_book() {
        let mut selection = SelectionController::default();
        selection.select(Uuid::new_v4());
        assert_eq!(selection.callout_target(&[]), None);
    }
}
