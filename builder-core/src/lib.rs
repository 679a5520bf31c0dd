//! # Page Builder Core
//!
//! Element model and interaction engine for a visual page builder.
//! No I/O happens here; hosts feed events in and carry saves to the backend.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               EditorSession                 │
//! ├─────────────────────────────────────────────┤
//! │  ElementStore      │  InteractionController │
//! │  - Elements        │  - Move / resize       │
//! │  - Geometry clamp  │  - Listener guards     │
//! │  - Selection       │                        │
//! │  - Dirty tracker   │  ConfigEditor          │
//! │                    │  - Typed form fields   │
//! ├─────────────────────────────────────────────┤
//! │  Schema (backend + export JSON)  │  Render  │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod dirty;
pub mod editor;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod image;
pub mod interaction;
pub mod render;
pub mod schema;
pub mod selection;
pub mod state;
pub mod store;

pub use editor::{CommitError, ConfigEditor, EditMode, Field, FieldError, ValidationErrors};
pub use element::{
    Element, ElementId, ElementKind, ElementPatch, ElementType, FontWeight, IdGenerator,
    ShapeKind,
};
pub use error::{CanvasError, CanvasResult};
pub use event::{EventResponse, InputEvent, PointerPhase, TouchEvent, TouchPhase, TouchPoint};
pub use geometry::{clamp, CanvasSize, Rect};
pub use image::ImageData;
pub use interaction::{InputSource, InteractionController, ListenerGuard, ListenerHost};
pub use render::{render_elements, Render, RenderNode};
pub use schema::{sanitize_file_name, ExportDocument, WorkspaceDocument, WorkspaceUpdate};
pub use state::{
    EditorSession, NavigationGuard, SaveBlocked, SaveFailure, SaveOutcome, SaveTicket,
};
pub use store::ElementStore;

/// Builder core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
