//! Element store for the open workspace.
//!
//! Holds elements in insertion order together with the canvas bounds they
//! are clamped to, the current selection, and the dirty tracker. Every
//! method leaves these invariants intact:
//!
//! - element ids are unique;
//! - every position or size change is clamped to the canvas;
//! - at most one element is selected, and only one that exists;
//! - every effective mutation marks the workspace dirty.

use crate::dirty::DirtyTracker;
use crate::element::{Element, ElementId, ElementPatch};
use crate::geometry::{CanvasSize, Rect};
use crate::selection::Selection;
use crate::{CanvasError, CanvasResult};

/// Ordered collection of the workspace's elements.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: Vec<Element>,
    canvas: CanvasSize,
    selection: Selection,
    dirty: DirtyTracker,
}

impl ElementStore {
    /// Create an empty store for a canvas of the given size.
    #[must_use]
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            ..Self::default()
        }
    }

    /// Create a store holding a freshly fetched element list.
    ///
    /// Later elements repeating an earlier id are dropped. The store starts
    /// clean.
    #[must_use]
    pub fn load(elements: Vec<Element>, canvas: CanvasSize) -> Self {
        let mut store = Self::new(canvas);
        for element in elements {
            if store.contains(&element.id) {
                tracing::warn!("Dropping element with duplicate id {} on load", element.id);
                continue;
            }
            store.elements.push(element);
        }
        store
    }

    /// Add an element, clamping it onto the canvas.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::DuplicateId`] without touching the store if an
    /// element with the same id already exists.
    pub fn add(&mut self, mut element: Element) -> CanvasResult<ElementId> {
        if self.contains(&element.id) {
            tracing::warn!("Refusing to add element with duplicate id {}", element.id);
            return Err(CanvasError::DuplicateId(element.id));
        }
        element.bounds = self.settle(element.bounds, true);
        let id = element.id.clone();
        tracing::debug!("Added {} element {id}", element.element_type());
        self.elements.push(element);
        self.dirty.mark();
        Ok(id)
    }

    /// Merge `patch` into an element and clamp the result onto the canvas.
    ///
    /// A patch that only changes size keeps the top-left corner fixed and
    /// shrinks the box to fit; any patch carrying a position moves the box
    /// back inside the canvas instead. Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ElementNotFound`] if the id is unknown, or the
    /// error from [`Element::patched`] if the patch does not fit the type.
    pub fn update(&mut self, id: &ElementId, patch: &ElementPatch) -> CanvasResult<bool> {
        let canvas = self.canvas;
        let index = self
            .index_of(id)
            .ok_or_else(|| CanvasError::ElementNotFound(id.clone()))?;
        let current = &self.elements[index];
        let mut next = current.patched(patch)?;
        let moves = patch.x.is_some() || patch.y.is_some();
        next.bounds = settle(next.bounds, canvas, moves);

        if next == *current {
            return Ok(false);
        }
        self.elements[index] = next;
        self.dirty.mark();
        Ok(true)
    }

    /// Remove an element, clearing the selection if it was selected.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ElementNotFound`] if the id is unknown.
    pub fn remove(&mut self, id: &ElementId) -> CanvasResult<Element> {
        let index = self
            .index_of(id)
            .ok_or_else(|| CanvasError::ElementNotFound(id.clone()))?;
        let removed = self.elements.remove(index);
        self.selection.forget(id);
        self.dirty.mark();
        tracing::debug!("Removed {} element {id}", removed.element_type());
        Ok(removed)
    }

    /// All elements in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Element] {
        &self.elements
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == *id)
    }

    /// Whether an element with this id exists.
    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.index_of(id).is_some()
    }

    /// Get the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Find the element at the given canvas coordinates.
    /// Later elements are drawn on top, so they win.
    ///
    /// Hit testing uses the stored box for every type. Labels render sized
    /// to their text, so a label is also hit in the part of its stored box
    /// the text does not cover.
    #[must_use]
    pub fn element_at(&self, x: f64, y: f64) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.contains_point(x, y))
            .map(|e| e.id.clone())
    }

    /// Select an element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn select(&mut self, id: &ElementId) -> CanvasResult<()> {
        if !self.contains(id) {
            return Err(CanvasError::ElementNotFound(id.clone()));
        }
        self.selection.select(id);
        Ok(())
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// The selected element's id.
    #[must_use]
    pub fn selected_id(&self) -> Option<&ElementId> {
        self.selection.get()
    }

    /// The selected element.
    #[must_use]
    pub fn selected(&self) -> Option<&Element> {
        self.selection.get().and_then(|id| self.get(id))
    }

    /// Current canvas bounds.
    #[must_use]
    pub const fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Set the canvas bounds used by subsequent mutations.
    ///
    /// Existing elements are left where they are.
    pub fn set_canvas_size(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
    }

    /// Whether there are unsaved changes.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    /// Current mutation revision.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.dirty.revision()
    }

    /// Record a change to workspace state held outside the element list.
    pub fn mark_dirty(&mut self) {
        self.dirty.mark();
    }

    /// Record that the backend now holds `revision`.
    pub fn mark_persisted(&mut self, revision: u64) {
        self.dirty.persisted_at(revision);
    }

    fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == *id)
    }

    fn settle(&self, bounds: Rect, moves: bool) -> Rect {
        settle(bounds, self.canvas, moves)
    }
}

fn settle(bounds: Rect, canvas: CanvasSize, moves: bool) -> Rect {
    if moves {
        bounds.clamped_to(canvas).resized_within(canvas)
    } else {
        bounds.resized_within(canvas).clamped_to(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, ElementType, ShapeKind};

    fn store_500() -> ElementStore {
        ElementStore::new(CanvasSize::new(500.0, 500.0))
    }

    fn button(id: u64) -> Element {
        Element::draft(ElementId::from_raw(id), ElementType::Button, 10.0, 10.0)
    }

    #[test]
    fn test_add_and_list_in_insertion_order() {
        let mut store = store_500();
        store.add(button(2)).expect("add");
        store.add(button(1)).expect("add");
        let ids: Vec<_> = store.list().iter().map(|e| e.id.as_number()).collect();
        assert_eq!(ids, vec![Some(2), Some(1)]);
        assert!(store.is_dirty());
    }

    #[test]
    fn test_add_duplicate_id_is_refused() {
        let mut store = store_500();
        store.add(button(1)).expect("add");
        let revision = store.revision();

        let result = store.add(button(1));
        assert!(matches!(result, Err(CanvasError::DuplicateId(_))));
        assert_eq!(store.len(), 1);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_add_clamps_onto_canvas() {
        let mut store = store_500();
        let element = Element::draft(ElementId::from_raw(1), ElementType::Input, 480.0, 490.0);
        store.add(element).expect("add");
        let bounds = store.list()[0].bounds;
        assert_eq!((bounds.x, bounds.y), (400.0, 460.0));
    }

    #[test]
    fn test_update_position_clamps() {
        let mut store = store_500();
        let id = store.add(button(1)).expect("add");

        store.update(&id, &ElementPatch::position(-50.0, -50.0)).expect("update");
        let b = store.get(&id).expect("exists").bounds;
        assert_eq!((b.x, b.y), (0.0, 0.0));

        store.update(&id, &ElementPatch::position(700.0, 700.0)).expect("update");
        let b = store.get(&id).expect("exists").bounds;
        assert_eq!((b.x, b.y), (400.0, 460.0));
    }

    #[test]
    fn test_update_size_keeps_origin() {
        let mut store = store_500();
        let id = store.add(button(1)).expect("add");
        store.update(&id, &ElementPatch::position(450.0, 100.0)).expect("move");
        store.update(&id, &ElementPatch::size(300.0, 60.0)).expect("resize");
        let b = store.get(&id).expect("exists").bounds;
        assert_eq!(b, Rect::new(400.0, 100.0, 100.0, 60.0));
    }

    #[test]
    fn test_update_noop_does_not_dirty() {
        let mut store = store_500();
        let id = store.add(button(1)).expect("add");
        let revision = store.revision();
        let changed = store.update(&id, &ElementPatch::position(10.0, 10.0)).expect("update");
        assert!(!changed);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_update_merges_content() {
        let mut store = store_500();
        let shape = Element::draft(ElementId::from_raw(9), ElementType::Shape, 0.0, 0.0);
        let id = store.add(shape).expect("add");
        store
            .update(
                &id,
                &ElementPatch {
                    shape: Some(ShapeKind::Circle),
                    ..ElementPatch::default()
                },
            )
            .expect("update");
        let ElementKind::Shape(p) = &store.get(&id).expect("exists").kind else {
            panic!("type changed");
        };
        assert_eq!(p.shape, ShapeKind::Circle);
    }

    #[test]
    fn test_update_unknown_fails() {
        let mut store = store_500();
        let result = store.update(&ElementId::from_raw(42), &ElementPatch::position(1.0, 1.0));
        assert!(matches!(result, Err(CanvasError::ElementNotFound(_))));
    }

    #[test]
    fn test_remove_clears_matching_selection() {
        let mut store = store_500();
        let a = store.add(button(1)).expect("add");
        let b = store.add(button(2)).expect("add");

        store.select(&b).expect("select");
        store.remove(&a).expect("remove");
        assert_eq!(store.selected_id(), Some(&b));

        store.remove(&b).expect("remove");
        assert_eq!(store.selected_id(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_select_unknown_fails() {
        let mut store = store_500();
        assert!(store.select(&ElementId::from_raw(1)).is_err());
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn test_element_at_prefers_latest() {
        let mut store = store_500();
        store.add(button(1)).expect("add");
        store.add(button(2)).expect("add");
        assert_eq!(store.element_at(20.0, 20.0), Some(ElementId::from_raw(2)));
        assert_eq!(store.element_at(300.0, 300.0), None);
    }

    #[test]
    fn test_label_hit_uses_stored_box() {
        let mut store = store_500();
        let label = Element::draft(ElementId::from("title"), ElementType::Label, 0.0, 0.0);
        let id = store.add(label).expect("add");
        assert_eq!(store.element_at(90.0, 30.0), Some(id));
    }

    #[test]
    fn test_load_is_clean_and_drops_duplicates() {
        let store = ElementStore::load(
            vec![button(1), button(1), button(2)],
            CanvasSize::new(500.0, 500.0),
        );
        assert_eq!(store.len(), 2);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_persisted_revision_clears_dirty() {
        let mut store = store_500();
        store.add(button(1)).expect("add");
        store.mark_persisted(store.revision());
        assert!(!store.is_dirty());
        store.mark_dirty();
        assert!(store.is_dirty());
    }
}
