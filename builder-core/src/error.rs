//! Error types for canvas operations.

use thiserror::Error;

use crate::element::{ElementId, ElementType};

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Element not found in the store.
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    /// An element with the same id is already in the store.
    #[error("Duplicate element id: {0}")]
    DuplicateId(ElementId),

    /// A field was supplied that the element type does not carry.
    #[error("Field `{field}` is not valid for {element_type} elements")]
    InvalidField {
        /// Wire name of the rejected field.
        field: &'static str,
        /// Type of the element the field was applied to.
        element_type: ElementType,
    },

    /// Invalid element operation.
    #[error("Invalid operation on element: {0}")]
    InvalidOperation(String),

    /// Image bytes could not be embedded.
    #[error("Image error: {0}")]
    Image(String),

    /// Workspace serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
