//! Pointer and touch gestures that move or resize elements.
//!
//! A gesture is a small state machine, `Idle -> Active -> Idle`:
//!
//! ```text
//!            down on element / handle
//!   ┌──────┐ ───────────────────────► ┌────────┐ ──┐ move: clamp + store.update
//!   │ Idle │                          │ Active │ ◄─┘
//!   └──────┘ ◄─────────────────────── └────────┘
//!            up / touch end / cancel
//! ```
//!
//! While active the controller holds a [`ListenerGuard`] obtained from the
//! host. Leaving the active state drops the guard, which releases the host's
//! document-level listeners whichever way the gesture ends, including when
//! the controller itself is dropped mid-drag.

use crate::element::ElementId;
use crate::event::{EventResponse, InputEvent, PointerPhase, TouchPhase};
use crate::geometry::{Rect, MIN_ELEMENT_SIZE};
use crate::store::ElementStore;
use crate::{CanvasError, CanvasResult, ElementPatch};

/// Side length of the square resize handle, in pixels.
pub const RESIZE_HANDLE_SIZE: f64 = 10.0;

/// Which native event family drives a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    /// Mouse events.
    Mouse,
    /// Touch events.
    Touch,
}

/// What a gesture changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureMode {
    /// Drag the element's top-left corner.
    Move,
    /// Drag the element's bottom-right corner.
    Resize,
}

/// Releases host listeners when dropped.
pub struct ListenerGuard {
    source: InputSource,
    release: Option<Box<dyn FnOnce()>>,
}

impl ListenerGuard {
    /// Guard that runs `release` when dropped.
    #[must_use]
    pub fn new(source: InputSource, release: impl FnOnce() + 'static) -> Self {
        Self {
            source,
            release: Some(Box::new(release)),
        }
    }

    /// Guard with nothing to release.
    #[must_use]
    pub fn detached(source: InputSource) -> Self {
        Self {
            source,
            release: None,
        }
    }

    /// Event family the listeners were attached for.
    #[must_use]
    pub const fn source(&self) -> InputSource {
        self.source
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("source", &self.source)
            .field("attached", &self.release.is_some())
            .finish()
    }
}

/// Host environment able to subscribe to move/end events for one gesture.
///
/// A browser host adds `mousemove`/`mouseup` or non-passive
/// `touchmove`/`touchend`/`touchcancel` listeners on the document and
/// returns a guard that removes them.
pub trait ListenerHost {
    /// Attach listeners for `source` until the returned guard is dropped.
    fn attach(&mut self, source: InputSource) -> ListenerGuard;
}

/// Host for headless use where events are fed directly to the controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedHost;

impl ListenerHost for DetachedHost {
    fn attach(&mut self, source: InputSource) -> ListenerGuard {
        ListenerGuard::detached(source)
    }
}

#[derive(Debug)]
struct ActiveGesture {
    element: ElementId,
    mode: GestureMode,
    start_x: f64,
    start_y: f64,
    start_bounds: Rect,
    listeners: ListenerGuard,
}

impl ActiveGesture {
    fn patch_for(&self, x: f64, y: f64) -> ElementPatch {
        let dx = x - self.start_x;
        let dy = y - self.start_y;
        let b = self.start_bounds;
        match self.mode {
            GestureMode::Move => ElementPatch::position(b.x + dx, b.y + dy),
            GestureMode::Resize => ElementPatch::size(
                (b.width + dx).max(MIN_ELEMENT_SIZE),
                (b.height + dy).max(MIN_ELEMENT_SIZE),
            ),
        }
    }
}

#[derive(Debug, Default)]
enum GestureState {
    #[default]
    Idle,
    Active(ActiveGesture),
}

/// Turns pointer and touch streams into element moves and resizes.
pub struct InteractionController {
    state: GestureState,
    host: Box<dyn ListenerHost>,
}

impl InteractionController {
    /// Create a controller that attaches listeners through `host`.
    #[must_use]
    pub fn new(host: impl ListenerHost + 'static) -> Self {
        Self {
            state: GestureState::Idle,
            host: Box::new(host),
        }
    }

    /// Create a controller with no host listeners.
    #[must_use]
    pub fn headless() -> Self {
        Self::new(DetachedHost)
    }

    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, GestureState::Active(_))
    }

    /// Element targeted by the active gesture.
    #[must_use]
    pub fn active_element(&self) -> Option<&ElementId> {
        match &self.state {
            GestureState::Active(g) => Some(&g.element),
            GestureState::Idle => None,
        }
    }

    /// Mode of the active gesture.
    #[must_use]
    pub fn active_mode(&self) -> Option<GestureMode> {
        match &self.state {
            GestureState::Active(g) => Some(g.mode),
            GestureState::Idle => None,
        }
    }

    /// Dispatch a pointer or touch event. Keyboard events are ignored.
    pub fn handle(&mut self, event: &InputEvent, store: &mut ElementStore) -> EventResponse {
        match event {
            InputEvent::Pointer {
                phase,
                x,
                y,
                button,
            } => match phase {
                PointerPhase::Down if *button == 0 => {
                    self.pointer_down(InputSource::Mouse, *x, *y, store)
                }
                PointerPhase::Down => EventResponse::IGNORED,
                PointerPhase::Move => self.pointer_move(InputSource::Mouse, *x, *y, store),
                PointerPhase::Up => self.end_for(InputSource::Mouse),
            },
            InputEvent::Touch(touch) => match touch.phase {
                TouchPhase::Start if touch.touches.len() == 1 => {
                    let point = touch.touches[0];
                    self.pointer_down(InputSource::Touch, point.x, point.y, store)
                }
                TouchPhase::Start => EventResponse::IGNORED,
                TouchPhase::Move => match touch.primary_touch() {
                    Some(point) => self.pointer_move(InputSource::Touch, point.x, point.y, store),
                    None => EventResponse::IGNORED,
                },
                TouchPhase::End | TouchPhase::Cancel => self.end_for(InputSource::Touch),
            },
            InputEvent::Key { .. } => EventResponse::IGNORED,
        }
    }

    /// Start a gesture on `element` with the pointer at `(x, y)`.
    ///
    /// Selects the element and acquires host listeners. Any gesture already
    /// in progress is ended first.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ElementNotFound`] if the element does not exist,
    /// or [`CanvasError::InvalidOperation`] when resizing an auto-sized element.
    pub fn begin(
        &mut self,
        element: ElementId,
        mode: GestureMode,
        source: InputSource,
        x: f64,
        y: f64,
        store: &mut ElementStore,
    ) -> CanvasResult<()> {
        self.end();
        let Some(target) = store.get(&element) else {
            return Err(CanvasError::ElementNotFound(element));
        };
        if mode == GestureMode::Resize && target.element_type().is_auto_sized() {
            return Err(CanvasError::InvalidOperation(format!(
                "{} elements size themselves",
                target.element_type()
            )));
        }
        let start_bounds = target.bounds;
        store.select(&element)?;
        let listeners = self.host.attach(source);
        tracing::debug!("Gesture {mode:?} started on element {element} via {source:?}");
        self.state = GestureState::Active(ActiveGesture {
            element,
            mode,
            start_x: x,
            start_y: y,
            start_bounds,
            listeners,
        });
        Ok(())
    }

    /// Feed a pointer position to the active gesture.
    ///
    /// Returns whether the store changed. Does nothing when idle. If the
    /// target element has disappeared the gesture is abandoned.
    pub fn update(&mut self, x: f64, y: f64, store: &mut ElementStore) -> bool {
        let GestureState::Active(gesture) = &self.state else {
            return false;
        };
        let element = gesture.element.clone();
        let patch = gesture.patch_for(x, y);
        match store.update(&element, &patch) {
            Ok(changed) => changed,
            Err(e) => {
                tracing::warn!("Abandoning gesture on element {element}: {e}");
                self.end();
                false
            }
        }
    }

    /// End the active gesture, releasing its listeners. Idempotent.
    pub fn end(&mut self) {
        if let GestureState::Active(gesture) = std::mem::take(&mut self.state) {
            tracing::debug!("Gesture {:?} ended on element {}", gesture.mode, gesture.element);
            drop(gesture.listeners);
        }
    }

    fn pointer_down(
        &mut self,
        source: InputSource,
        x: f64,
        y: f64,
        store: &mut ElementStore,
    ) -> EventResponse {
        if self.is_active() {
            return EventResponse::IGNORED;
        }

        let handle_hit = store
            .selected()
            .filter(|e| !e.element_type().is_auto_sized())
            .filter(|e| resize_handle(&e.bounds).contains(x, y))
            .map(|e| e.id.clone());

        let target = match handle_hit {
            Some(id) => Some((id, GestureMode::Resize)),
            None => store.element_at(x, y).map(|id| (id, GestureMode::Move)),
        };

        match target {
            Some((id, mode)) => match self.begin(id, mode, source, x, y, store) {
                Ok(()) => EventResponse::CONSUMED,
                Err(e) => {
                    tracing::warn!("Could not start gesture: {e}");
                    EventResponse::IGNORED
                }
            },
            None => {
                store.clear_selection();
                EventResponse::HANDLED
            }
        }
    }

    fn pointer_move(
        &mut self,
        source: InputSource,
        x: f64,
        y: f64,
        store: &mut ElementStore,
    ) -> EventResponse {
        match &self.state {
            GestureState::Active(g) if g.listeners.source() == source => {}
            _ => return EventResponse::IGNORED,
        }
        self.update(x, y, store);
        match source {
            InputSource::Touch => EventResponse::CONSUMED,
            InputSource::Mouse => EventResponse::HANDLED,
        }
    }

    fn end_for(&mut self, source: InputSource) -> EventResponse {
        match &self.state {
            GestureState::Active(g) if g.listeners.source() == source => {
                self.end();
                EventResponse::HANDLED
            }
            _ => EventResponse::IGNORED,
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::headless()
    }
}

impl std::fmt::Debug for InteractionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionController")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Square resize handle centred on the bottom-right corner of `bounds`.
#[must_use]
pub fn resize_handle(bounds: &Rect) -> Rect {
    let half = RESIZE_HANDLE_SIZE / 2.0;
    Rect::new(
        bounds.right() - half,
        bounds.bottom() - half,
        RESIZE_HANDLE_SIZE,
        RESIZE_HANDLE_SIZE,
    )
}
