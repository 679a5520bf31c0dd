//! Editor session state for one open workspace.
//!
//! [`EditorSession`] ties the element store, gesture controller, config
//! editor and save lifecycle together. Hosts feed it input events and
//! palette drops, and drive saves through [`EditorSession::begin_save`] and
//! [`EditorSession::finish_save`] around their own network call.

use serde_json::Value;
use thiserror::Error;

use crate::editor::{CommitError, ConfigEditor};
use crate::element::{Element, ElementId, ElementType, IdGenerator};
use crate::event::{EventResponse, InputEvent, KeyCommand, PointerPhase, TouchPhase};
use crate::geometry::CanvasSize;
use crate::interaction::{InteractionController, ListenerHost};
use crate::schema::{ExportDocument, WorkspaceDocument, WorkspaceUpdate};
use crate::store::ElementStore;
use crate::{CanvasError, CanvasResult};

/// Why a save cannot start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SaveBlocked {
    /// Nothing changed since the last save.
    #[error("no unsaved changes")]
    Clean,
    /// A save is already waiting for the backend.
    #[error("a save is already in progress")]
    InFlight,
    /// The session expired; edits are abandoned.
    #[error("session expired")]
    Expired,
}

/// A save request handed to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveTicket {
    workspace_id: String,
    body: WorkspaceUpdate,
    revision: u64,
}

impl SaveTicket {
    /// Workspace to write.
    #[must_use]
    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    /// Body of the `PUT` request.
    #[must_use]
    pub const fn body(&self) -> &WorkspaceUpdate {
        &self.body
    }

    /// Store revision captured in the body.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

/// How the backend answered a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveFailure {
    /// The backend rejected the session (HTTP 401).
    AuthExpired,
    /// Any other failure; the user may retry.
    Failed(String),
}

/// What the host should do after a save completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The backend holds the saved revision.
    Saved {
        /// Edits made while the request was in flight are still unsaved.
        still_dirty: bool,
    },
    /// Navigate to the login boundary.
    LoginRequired,
    /// Show a retryable error; local state is unchanged.
    Failed(String),
}

/// Whether leaving the editor needs confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationGuard {
    /// Nothing would be lost.
    Leave,
    /// Unsaved changes would be discarded.
    ConfirmDiscard,
}

/// The complete editor state for an open workspace.
#[derive(Debug)]
pub struct EditorSession {
    workspace_id: String,
    name: String,
    canvas_color: String,
    created_at: Option<String>,
    updated_at: Option<String>,
    user: Value,
    store: ElementStore,
    controller: InteractionController,
    editor: Option<ConfigEditor>,
    ids: IdGenerator,
    canvas_focused: bool,
    save_in_flight: bool,
    expired: bool,
}

impl EditorSession {
    /// Open a fetched workspace on a canvas of the given size. Starts clean.
    #[must_use]
    pub fn from_workspace(doc: WorkspaceDocument, canvas: CanvasSize) -> Self {
        Self::with_controller(doc, canvas, InteractionController::headless())
    }

    /// Like [`from_workspace`](Self::from_workspace), attaching gesture
    /// listeners through `host`.
    #[must_use]
    pub fn with_host(
        doc: WorkspaceDocument,
        canvas: CanvasSize,
        host: impl ListenerHost + 'static,
    ) -> Self {
        Self::with_controller(doc, canvas, InteractionController::new(host))
    }

    fn with_controller(
        doc: WorkspaceDocument,
        canvas: CanvasSize,
        controller: InteractionController,
    ) -> Self {
        let WorkspaceDocument {
            id,
            name,
            elements,
            canvas_color,
            created_at,
            updated_at,
            user,
        } = doc;
        let ids = IdGenerator::seeded_past(elements.iter().map(|e| &e.id));
        let store = ElementStore::load(elements, canvas);
        tracing::info!("Opened workspace {id} with {} elements", store.len());
        Self {
            workspace_id: id,
            name,
            canvas_color,
            created_at,
            updated_at,
            user,
            store,
            controller,
            editor: None,
            ids,
            canvas_focused: false,
            save_in_flight: false,
            expired: false,
        }
    }

    /// Workspace identifier.
    #[must_use]
    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    /// Workspace display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canvas fill color.
    #[must_use]
    pub fn canvas_color(&self) -> &str {
        &self.canvas_color
    }

    /// The element store.
    #[must_use]
    pub const fn store(&self) -> &ElementStore {
        &self.store
    }

    /// The open config editor, if any.
    #[must_use]
    pub const fn editor(&self) -> Option<&ConfigEditor> {
        self.editor.as_ref()
    }

    /// The open config editor, for form input.
    pub fn editor_mut(&mut self) -> Option<&mut ConfigEditor> {
        self.editor.as_mut()
    }

    /// Whether a move or resize gesture is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.controller.is_active()
    }

    /// Whether the canvas has keyboard focus.
    #[must_use]
    pub const fn canvas_focused(&self) -> bool {
        self.canvas_focused
    }

    /// Record whether the canvas has keyboard focus.
    pub fn set_canvas_focus(&mut self, focused: bool) {
        self.canvas_focused = focused;
    }

    /// Whether there are unsaved changes.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    /// Whether a save is waiting for the backend.
    #[must_use]
    pub const fn save_in_flight(&self) -> bool {
        self.save_in_flight
    }

    /// Place a draft from the palette at `(x, y)` and open the editor on it.
    ///
    /// The store is not touched until the editor commits. Any draft already
    /// being edited is discarded.
    pub fn drop_palette_item(&mut self, element_type: ElementType, x: f64, y: f64) -> ElementId {
        let id = self.ids.next_id();
        self.controller.end();
        self.store.clear_selection();
        let draft = Element::draft(id.clone(), element_type, x, y);
        self.editor = Some(ConfigEditor::for_draft(draft));
        tracing::debug!("Dropped {element_type} draft {id} at ({x}, {y})");
        id
    }

    /// Dispatch a native input event.
    ///
    /// Pointer and touch events drive gestures. Keys act on the selection
    /// only while the canvas is focused. Everything is ignored while the
    /// config editor is open.
    pub fn handle_input(&mut self, event: &InputEvent) -> EventResponse {
        if self.editor.is_some() {
            return EventResponse::IGNORED;
        }
        match event {
            InputEvent::Key { key, pressed, .. } => {
                if !*pressed || !self.canvas_focused {
                    return EventResponse::IGNORED;
                }
                match KeyCommand::from_key(key) {
                    Some(command) => self.run_command(command),
                    None => EventResponse::IGNORED,
                }
            }
            InputEvent::Pointer { .. } | InputEvent::Touch(_) => {
                if starts_gesture(event) {
                    self.canvas_focused = true;
                }
                self.controller.handle(event, &mut self.store)
            }
        }
    }

    fn run_command(&mut self, command: KeyCommand) -> EventResponse {
        let Some(id) = self.store.selected_id().cloned() else {
            return EventResponse::IGNORED;
        };
        match command {
            KeyCommand::Edit => {
                self.open_editor(&id);
                EventResponse::CONSUMED
            }
            KeyCommand::Delete => {
                self.controller.end();
                match self.store.remove(&id) {
                    Ok(_) => EventResponse::CONSUMED,
                    Err(e) => {
                        tracing::warn!("Delete failed: {e}");
                        EventResponse::IGNORED
                    }
                }
            }
        }
    }

    fn open_editor(&mut self, id: &ElementId) {
        let Some(element) = self.store.get(id) else {
            return;
        };
        self.editor = Some(ConfigEditor::for_existing(element));
        self.controller.end();
    }

    /// Commit the open editor into the store, then close it and clear the
    /// selection. On error the editor stays open.
    ///
    /// # Errors
    ///
    /// Returns [`CommitError::Store`] with [`CanvasError::InvalidOperation`]
    /// if no editor is open, or the editor's own commit error.
    pub fn commit_editor(&mut self) -> Result<ElementId, CommitError> {
        let editor = self
            .editor
            .as_ref()
            .ok_or_else(|| CanvasError::InvalidOperation("no element is being edited".into()))?;
        let id = editor.commit(&mut self.store)?;
        self.editor = None;
        self.store.clear_selection();
        Ok(id)
    }

    /// Close the editor without touching the store.
    pub fn cancel_editor(&mut self) {
        if let Some(editor) = self.editor.take() {
            tracing::debug!("Config editor cancelled for element {}", editor.element_id());
        }
    }

    /// Change the canvas fill color.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidOperation`] unless `color` is `#rrggbb`.
    pub fn set_canvas_color(&mut self, color: &str) -> CanvasResult<()> {
        if !crate::editor::is_hex_color(color) {
            return Err(CanvasError::InvalidOperation(format!(
                "canvas color must be #rrggbb, got {color}"
            )));
        }
        let color = color.to_ascii_lowercase();
        if color != self.canvas_color {
            self.canvas_color = color;
            self.store.mark_dirty();
        }
        Ok(())
    }

    /// Update the canvas bounds after the host resized the canvas.
    pub fn set_canvas_size(&mut self, canvas: CanvasSize) {
        self.store.set_canvas_size(canvas);
    }

    /// Snapshot the workspace for a `PUT`.
    ///
    /// # Errors
    ///
    /// Returns [`SaveBlocked`] when there is nothing to save, a save is
    /// already in flight, or the session expired.
    pub fn begin_save(&mut self) -> Result<SaveTicket, SaveBlocked> {
        if self.expired {
            return Err(SaveBlocked::Expired);
        }
        if self.save_in_flight {
            return Err(SaveBlocked::InFlight);
        }
        if !self.store.is_dirty() {
            return Err(SaveBlocked::Clean);
        }
        self.save_in_flight = true;
        let ticket = SaveTicket {
            workspace_id: self.workspace_id.clone(),
            body: WorkspaceUpdate {
                name: self.name.clone(),
                elements: self.store.list().to_vec(),
                canvas_color: self.canvas_color.clone(),
            },
            revision: self.store.revision(),
        };
        tracing::debug!("Save started at revision {}", ticket.revision);
        Ok(ticket)
    }

    /// Apply the backend's answer to a save.
    pub fn finish_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<(), SaveFailure>,
    ) -> SaveOutcome {
        let SaveTicket {
            workspace_id,
            revision,
            ..
        } = ticket;
        self.save_in_flight = false;
        match result {
            Ok(()) => {
                self.store.mark_persisted(revision);
                let still_dirty = self.store.is_dirty();
                tracing::info!("Workspace {workspace_id} saved at revision {revision}");
                SaveOutcome::Saved { still_dirty }
            }
            Err(SaveFailure::AuthExpired) => {
                tracing::warn!("Session expired while saving {workspace_id}");
                self.expired = true;
                SaveOutcome::LoginRequired
            }
            Err(SaveFailure::Failed(message)) => {
                tracing::warn!("Save of {workspace_id} failed: {message}");
                SaveOutcome::Failed(message)
            }
        }
    }

    /// Snapshot for a local export file. Does not affect the dirty flag.
    #[must_use]
    pub fn export(&self) -> ExportDocument {
        ExportDocument {
            user_id: self.user.clone(),
            elements: self.store.list().to_vec(),
            workspace_name: self.name.clone(),
            canvas_color: self.canvas_color.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    /// Whether leaving the editor would lose work.
    #[must_use]
    pub const fn navigation_guard(&self) -> NavigationGuard {
        if self.store.is_dirty() && !self.expired {
            NavigationGuard::ConfirmDiscard
        } else {
            NavigationGuard::Leave
        }
    }
}

fn starts_gesture(event: &InputEvent) -> bool {
    match event {
        InputEvent::Pointer { phase, .. } => *phase == PointerPhase::Down,
        InputEvent::Touch(touch) => touch.phase == TouchPhase::Start,
        InputEvent::Key { .. } => false,
    }
}
