//! Single-element selection.

use crate::element::ElementId;

/// Tracks at most one selected element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<ElementId>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self { selected: None }
    }

    /// Select `id`, replacing any previous selection. Idempotent.
    pub fn select(&mut self, id: &ElementId) {
        if self.selected.as_ref() != Some(id) {
            tracing::debug!("Selected element {id}");
            self.selected = Some(id.clone());
        }
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        if let Some(id) = self.selected.take() {
            tracing::debug!("Deselected element {id}");
        }
    }

    /// Clear the selection if it holds `id`.
    pub fn forget(&mut self, id: &ElementId) {
        if self.is_selected(id) {
            self.clear();
        }
    }

    /// The selected element, if any.
    #[must_use]
    pub fn get(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    /// Whether `id` is the selected element.
    #[must_use]
    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selected.as_ref() == Some(id)
    }
}
