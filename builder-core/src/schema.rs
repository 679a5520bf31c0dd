//! Wire representations shared with the workspace backend and export files.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::element::{
    ButtonProps, Element, ElementId, ElementKind, ElementType, FontWeight, ImageProps,
    InputProps, LabelProps, ShapeKind, ShapeProps, DEFAULT_COLOR, DEFAULT_FONT_SIZE,
    DRAFT_HEIGHT, DRAFT_WIDTH,
};
use crate::geometry::Rect;
use crate::CanvasResult;

/// Canvas fill used when the backend does not store one.
pub const DEFAULT_CANVAS_COLOR: &str = "#ffffff";

/// Flat element record as stored by the backend.
///
/// Every element carries `width`/`height`; type-specific fields are optional
/// and only emitted for the types that use them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    /// Element identifier.
    pub id: ElementId,
    /// Element type tag.
    #[serde(rename = "type")]
    pub element_type: ElementType,
    /// X position.
    pub x: f64,
    /// Y position.
    pub y: f64,
    /// Width in pixels.
    #[serde(default = "ElementRecord::default_width")]
    pub width: f64,
    /// Height in pixels.
    #[serde(default = "ElementRecord::default_height")]
    pub height: f64,
    /// Text, placeholder, or image data URI depending on type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Foreground or fill color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Shape geometry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeKind>,
    /// Label font size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Label font weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
}

impl ElementRecord {
    const fn default_width() -> f64 {
        DRAFT_WIDTH
    }

    const fn default_height() -> f64 {
        DRAFT_HEIGHT
    }
}

impl From<Element> for ElementRecord {
    fn from(element: Element) -> Self {
        let Element { id, bounds, kind } = element;
        let mut record = Self {
            id,
            element_type: kind.element_type(),
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            content: None,
            color: None,
            shape: None,
            font_size: None,
            font_weight: None,
        };
        match kind {
            ElementKind::Label(p) => {
                record.content = Some(p.content);
                record.color = Some(p.color);
                record.font_size = Some(p.font_size);
                record.font_weight = Some(p.font_weight);
            }
            ElementKind::Input(p) => {
                record.content = Some(p.placeholder);
                record.color = Some(p.color);
            }
            ElementKind::Button(p) => {
                record.content = Some(p.content);
                record.color = Some(p.color);
            }
            ElementKind::Image(p) => record.content = Some(p.src),
            ElementKind::Shape(p) => {
                record.shape = Some(p.shape);
                record.color = Some(p.color);
            }
        }
        record
    }
}

impl From<ElementRecord> for Element {
    fn from(record: ElementRecord) -> Self {
        let content = record.content.unwrap_or_default();
        let color = record.color.unwrap_or_else(|| DEFAULT_COLOR.to_string());
        let kind = match record.element_type {
            ElementType::Label => ElementKind::Label(LabelProps {
                content,
                color,
                font_size: record.font_size.unwrap_or(DEFAULT_FONT_SIZE),
                font_weight: record.font_weight.unwrap_or_default(),
            }),
            ElementType::Input => ElementKind::Input(InputProps {
                placeholder: content,
                color,
            }),
            ElementType::Button => ElementKind::Button(ButtonProps { content, color }),
            ElementType::Image => ElementKind::Image(ImageProps { src: content }),
            ElementType::Shape => ElementKind::Shape(ShapeProps {
                shape: record.shape.unwrap_or_default(),
                color,
            }),
        };
        Element::new(
            record.id,
            kind,
            Rect::new(record.x, record.y, record.width, record.height),
        )
    }
}

/// Workspace as returned by `GET /workspaces/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceDocument {
    /// Workspace identifier.
    #[serde(alias = "_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Elements in insertion order.
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Canvas fill color.
    #[serde(default = "WorkspaceDocument::default_canvas_color")]
    pub canvas_color: String,
    /// Creation timestamp as sent by the backend.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update timestamp as sent by the backend.
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Owning user reference, passed through untouched.
    #[serde(default)]
    pub user: Value,
}

impl WorkspaceDocument {
    fn default_canvas_color() -> String {
        DEFAULT_CANVAS_COLOR.to_string()
    }

    /// Deserialize a workspace document from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a workspace.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Body of `PUT /workspaces/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceUpdate {
    /// Display name.
    pub name: String,
    /// Full element list.
    pub elements: Vec<Element>,
    /// Canvas fill color.
    pub canvas_color: String,
}

/// Local-only export snapshot, written as `{workspaceName}_export.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    /// Owning user reference.
    pub user_id: Value,
    /// Elements in insertion order.
    pub elements: Vec<Element>,
    /// Workspace display name.
    pub workspace_name: String,
    /// Canvas fill color.
    pub canvas_color: String,
    /// Creation timestamp.
    pub created_at: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<String>,
}

impl ExportDocument {
    /// Download file name, `{workspaceName}_export.json` with characters
    /// unsafe in file names replaced.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}_export.json", sanitize_file_name(&self.workspace_name))
    }

    /// Serialize as pretty-printed JSON (two-space indent).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Replace characters that are unsafe in file names with `_`.
///
/// ASCII letters, digits, `-`, `_` and spaces are kept. A name with nothing
/// left to show becomes `workspace`.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim().is_empty() {
        "workspace".to_string()
    } else {
        cleaned
    }
}
