//! Page elements - the building blocks of a workspace layout.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::{CanvasError, CanvasResult};

/// Width given to freshly dropped elements.
pub const DRAFT_WIDTH: f64 = 100.0;

/// Height given to freshly dropped elements.
pub const DRAFT_HEIGHT: f64 = 40.0;

/// Color given to freshly dropped elements.
pub const DEFAULT_COLOR: &str = "#000000";

/// Label font size when none is stored.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Unique identifier for an element within a workspace.
///
/// Elements created here get numeric ids, but stored documents may carry
/// string ids. Both forms are kept as received and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementId {
    /// Numeric id, as produced by [`IdGenerator`].
    Num(u64),
    /// Opaque string id.
    Str(String),
}

impl ElementId {
    /// Create from a raw numeric id.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self::Num(raw)
    }

    /// The numeric value, for numeric ids.
    #[must_use]
    pub const fn as_number(&self) -> Option<u64> {
        match self {
            Self::Num(n) => Some(*n),
            Self::Str(_) => None,
        }
    }
}

impl From<u64> for ElementId {
    fn from(raw: u64) -> Self {
        Self::Num(raw)
    }
}

impl From<&str> for ElementId {
    fn from(raw: &str) -> Self {
        Self::Str(raw.to_string())
    }
}

impl From<String> for ElementId {
    fn from(raw: String) -> Self {
        Self::Str(raw)
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// Generates element ids from a millisecond clock.
///
/// Ids are strictly increasing for the lifetime of the generator, even when
/// the clock stalls or several elements are created within one millisecond.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// Create a generator with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator that will never return any of `existing`.
    ///
    /// String ids cannot collide with generated ones and are skipped.
    #[must_use]
    pub fn seeded_past<'a>(existing: impl IntoIterator<Item = &'a ElementId>) -> Self {
        Self {
            last: existing
                .into_iter()
                .filter_map(ElementId::as_number)
                .max()
                .unwrap_or(0),
        }
    }

    /// Produce the next id.
    pub fn next_id(&mut self) -> ElementId {
        let next = now_ms().max(self.last.saturating_add(1));
        self.last = next;
        ElementId::Num(next)
    }
}

#[allow(clippy::cast_possible_truncation)] // Millisecond timestamps fit in u64
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

/// The five kinds of element a page can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    /// Auto-sized text.
    Label,
    /// Text input with placeholder.
    Input,
    /// Push button with a caption.
    Button,
    /// Embedded image.
    Image,
    /// Filled geometric shape.
    Shape,
}

impl ElementType {
    /// Every element type, in palette order.
    pub const ALL: [Self; 5] = [
        Self::Label,
        Self::Input,
        Self::Button,
        Self::Image,
        Self::Shape,
    ];

    /// Wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Label => "Label",
            Self::Input => "Input",
            Self::Button => "Button",
            Self::Image => "Image",
            Self::Shape => "Shape",
        }
    }

    /// Whether the visual box is intrinsic rather than width/height driven.
    #[must_use]
    pub const fn is_auto_sized(self) -> bool {
        matches!(self, Self::Label)
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ElementType {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| CanvasError::InvalidOperation(format!("unknown element type: {s}")))
    }
}

/// Label font weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold.
    Bold,
    /// One step lighter than inherited.
    Lighter,
    /// One step bolder than inherited.
    Bolder,
}

impl FontWeight {
    /// Every weight, in menu order.
    pub const ALL: [Self; 4] = [Self::Normal, Self::Bold, Self::Lighter, Self::Bolder];

    /// CSS keyword for the weight.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Bold => "bold",
            Self::Lighter => "lighter",
            Self::Bolder => "bolder",
        }
    }
}

/// Geometry of a shape element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Rounded rectangle.
    #[default]
    Rectangle,
    /// Ellipse inscribed in the box.
    Circle,
    /// Upward-pointing triangle.
    Triangle,
}

impl ShapeKind {
    /// Every shape, in menu order.
    pub const ALL: [Self; 3] = [Self::Rectangle, Self::Circle, Self::Triangle];

    /// Wire name of the shape.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Triangle => "triangle",
        }
    }
}

/// Properties of a label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelProps {
    /// Literal text.
    pub content: String,
    /// Text color as hex.
    pub color: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Font weight.
    pub font_weight: FontWeight,
}

/// Properties of a text input.
#[derive(Debug, Clone, PartialEq)]
pub struct InputProps {
    /// Placeholder text.
    pub placeholder: String,
    /// Text color as hex.
    pub color: String,
}

/// Properties of a button.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonProps {
    /// Caption.
    pub content: String,
    /// Background color as hex.
    pub color: String,
}

/// Properties of an image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageProps {
    /// Base64 data URI of the image, empty until one is chosen.
    pub src: String,
}

/// Properties of a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeProps {
    /// Which shape to draw.
    pub shape: ShapeKind,
    /// Fill color as hex.
    pub color: String,
}

/// Type-specific content of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// A text label.
    Label(LabelProps),
    /// A text input.
    Input(InputProps),
    /// A button.
    Button(ButtonProps),
    /// An image.
    Image(ImageProps),
    /// A shape.
    Shape(ShapeProps),
}

impl ElementKind {
    /// Default content for a freshly dropped element of the given type.
    #[must_use]
    pub fn draft(element_type: ElementType) -> Self {
        let color = DEFAULT_COLOR.to_string();
        match element_type {
            ElementType::Label => Self::Label(LabelProps {
                content: String::new(),
                color,
                font_size: DEFAULT_FONT_SIZE,
                font_weight: FontWeight::Normal,
            }),
            ElementType::Input => Self::Input(InputProps {
                placeholder: String::new(),
                color,
            }),
            ElementType::Button => Self::Button(ButtonProps {
                content: String::new(),
                color,
            }),
            ElementType::Image => Self::Image(ImageProps { src: String::new() }),
            ElementType::Shape => Self::Shape(ShapeProps {
                shape: ShapeKind::Rectangle,
                color,
            }),
        }
    }

    /// The type tag of this content.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Label(_) => ElementType::Label,
            Self::Input(_) => ElementType::Input,
            Self::Button(_) => ElementType::Button,
            Self::Image(_) => ElementType::Image,
            Self::Shape(_) => ElementType::Shape,
        }
    }

    /// Text shown by the element: label text, button caption, or input placeholder.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Label(p) => Some(&p.content),
            Self::Button(p) => Some(&p.content),
            Self::Input(p) => Some(&p.placeholder),
            Self::Image(_) | Self::Shape(_) => None,
        }
    }

    /// Foreground or fill color, absent for images.
    #[must_use]
    pub fn color(&self) -> Option<&str> {
        match self {
            Self::Label(LabelProps { color, .. })
            | Self::Input(InputProps { color, .. })
            | Self::Button(ButtonProps { color, .. })
            | Self::Shape(ShapeProps { color, .. }) => Some(color),
            Self::Image(_) => None,
        }
    }
}

/// Shallow set of field changes merged into an element by the store.
///
/// `content` targets label text, button captions, and input placeholders;
/// `image` targets the image data URI.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    /// New x position.
    pub x: Option<f64>,
    /// New y position.
    pub y: Option<f64>,
    /// New width.
    pub width: Option<f64>,
    /// New height.
    pub height: Option<f64>,
    /// New text content.
    pub content: Option<String>,
    /// New color.
    pub color: Option<String>,
    /// New label font size.
    pub font_size: Option<f64>,
    /// New label font weight.
    pub font_weight: Option<FontWeight>,
    /// New shape geometry.
    pub shape: Option<ShapeKind>,
    /// New image data URI.
    pub image: Option<String>,
}

impl ElementPatch {
    /// Patch that moves an element.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch that resizes an element.
    #[must_use]
    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Patch that overwrites every field carried by `element`.
    #[must_use]
    pub fn replacing(element: &Element) -> Self {
        let mut patch = Self {
            x: Some(element.bounds.x),
            y: Some(element.bounds.y),
            width: Some(element.bounds.width),
            height: Some(element.bounds.height),
            ..Self::default()
        };
        match &element.kind {
            ElementKind::Label(p) => {
                patch.content = Some(p.content.clone());
                patch.color = Some(p.color.clone());
                patch.font_size = Some(p.font_size);
                patch.font_weight = Some(p.font_weight);
            }
            ElementKind::Input(p) => {
                patch.content = Some(p.placeholder.clone());
                patch.color = Some(p.color.clone());
            }
            ElementKind::Button(p) => {
                patch.content = Some(p.content.clone());
                patch.color = Some(p.color.clone());
            }
            ElementKind::Image(p) => patch.image = Some(p.src.clone()),
            ElementKind::Shape(p) => {
                patch.shape = Some(p.shape);
                patch.color = Some(p.color.clone());
            }
        }
        patch
    }

    /// Whether the patch changes position or size.
    #[must_use]
    pub fn touches_geometry(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.width.is_some() || self.height.is_some()
    }
}

/// A page element: identity, box, and typed content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "crate::schema::ElementRecord", into = "crate::schema::ElementRecord")]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Position and size in canvas-local pixels.
    pub bounds: Rect,
    /// Typed content.
    pub kind: ElementKind,
}

impl Element {
    /// Create an element.
    #[must_use]
    pub fn new(id: ElementId, kind: ElementKind, bounds: Rect) -> Self {
        Self { id, bounds, kind }
    }

    /// Create a draft for a palette drop at `(x, y)`.
    #[must_use]
    pub fn draft(id: ElementId, element_type: ElementType, x: f64, y: f64) -> Self {
        Self::new(
            id,
            ElementKind::draft(element_type),
            Rect::new(x, y, DRAFT_WIDTH, DRAFT_HEIGHT),
        )
    }

    /// The element's type tag.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Check if a point (in canvas coordinates) is within this element.
    #[must_use]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.bounds.contains(x, y)
    }

    /// Return a copy with `patch` merged in. Geometry is not clamped here.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidField`] if the patch sets a field this
    /// element's type does not carry, or [`CanvasError::InvalidOperation`]
    /// if a size is not a positive number.
    pub fn patched(&self, patch: &ElementPatch) -> CanvasResult<Self> {
        let element_type = self.element_type();
        let invalid = |field: &'static str| CanvasError::InvalidField {
            field,
            element_type,
        };

        let mut next = self.clone();
        if let Some(x) = patch.x {
            next.bounds.x = x;
        }
        if let Some(y) = patch.y {
            next.bounds.y = y;
        }
        if let Some(width) = patch.width {
            next.bounds.width = width;
        }
        if let Some(height) = patch.height {
            next.bounds.height = height;
        }
        let b = next.bounds;
        if [b.x, b.y, b.width, b.height].iter().any(|v| !v.is_finite()) {
            return Err(CanvasError::InvalidOperation(
                "position and size must be finite".into(),
            ));
        }
        if !element_type.is_auto_sized() && (b.width <= 0.0 || b.height <= 0.0) {
            return Err(CanvasError::InvalidOperation(format!(
                "{element_type} width and height must be positive"
            )));
        }

        match &mut next.kind {
            ElementKind::Label(p) => {
                if let Some(content) = &patch.content {
                    p.content.clone_from(content);
                }
                if let Some(color) = &patch.color {
                    p.color.clone_from(color);
                }
                if let Some(font_size) = patch.font_size {
                    p.font_size = font_size;
                }
                if let Some(font_weight) = patch.font_weight {
                    p.font_weight = font_weight;
                }
                if patch.shape.is_some() {
                    return Err(invalid("shape"));
                }
                if patch.image.is_some() {
                    return Err(invalid("image"));
                }
            }
            ElementKind::Input(InputProps {
                placeholder: text,
                color,
            })
            | ElementKind::Button(ButtonProps {
                content: text,
                color,
            }) => {
                if let Some(content) = &patch.content {
                    text.clone_from(content);
                }
                if let Some(c) = &patch.color {
                    color.clone_from(c);
                }
                reject_label_fields(patch, invalid)?;
                if patch.shape.is_some() {
                    return Err(invalid("shape"));
                }
                if patch.image.is_some() {
                    return Err(invalid("image"));
                }
            }
            ElementKind::Image(p) => {
                if let Some(src) = &patch.image {
                    p.src.clone_from(src);
                }
                if patch.content.is_some() {
                    return Err(invalid("content"));
                }
                if patch.color.is_some() {
                    return Err(invalid("color"));
                }
                reject_label_fields(patch, invalid)?;
                if patch.shape.is_some() {
                    return Err(invalid("shape"));
                }
            }
            ElementKind::Shape(p) => {
                if let Some(shape) = patch.shape {
                    p.shape = shape;
                }
                if let Some(color) = &patch.color {
                    p.color.clone_from(color);
                }
                if patch.content.is_some() {
                    return Err(invalid("content"));
                }
                reject_label_fields(patch, invalid)?;
                if patch.image.is_some() {
                    return Err(invalid("image"));
                }
            }
        }
        Ok(next)
    }
}

fn reject_label_fields(
    patch: &ElementPatch,
    invalid: impl Fn(&'static str) -> CanvasError,
) -> CanvasResult<()> {
    if patch.font_size.is_some() {
        return Err(invalid("fontSize"));
    }
    if patch.font_weight.is_some() {
        return Err(invalid("fontWeight"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generator_strictly_increasing() {
        let mut ids = IdGenerator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_id_generator_seeded_past_existing() {
        let far_future = ElementId::from_raw(u64::MAX - 10);
        let existing = [ElementId::from_raw(3), far_future.clone(), ElementId::from("el-9")];
        let mut ids = IdGenerator::seeded_past(&existing);
        assert!(ids.next_id() > far_future);
    }

    #[test]
    fn test_id_display_keeps_form() {
        assert_eq!(ElementId::from_raw(42).to_string(), "42");
        assert_eq!(ElementId::from("el-1").to_string(), "el-1");
        assert_eq!(ElementId::from("el-1").as_number(), None);
    }

    #[test]
    fn test_draft_defaults() {
        let draft = Element::draft(ElementId::from_raw(1), ElementType::Shape, 12.0, 34.0);
        assert_eq!(draft.bounds, Rect::new(12.0, 34.0, DRAFT_WIDTH, DRAFT_HEIGHT));
        match draft.kind {
            ElementKind::Shape(p) => {
                assert_eq!(p.shape, ShapeKind::Rectangle);
                assert_eq!(p.color, DEFAULT_COLOR);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_patch_merges_shallowly() {
        let label = Element::draft(ElementId::from_raw(1), ElementType::Label, 0.0, 0.0);
        let patched = label
            .patched(&ElementPatch {
                content: Some("Hello".into()),
                font_weight: Some(FontWeight::Bold),
                ..ElementPatch::default()
            })
            .expect("patch");
        let ElementKind::Label(p) = &patched.kind else {
            panic!("type changed");
        };
        assert_eq!(p.content, "Hello");
        assert_eq!(p.font_weight, FontWeight::Bold);
        assert_eq!(p.color, DEFAULT_COLOR);
        assert!((p.font_size - DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_patch_rejects_foreign_field() {
        let image = Element::draft(ElementId::from_raw(1), ElementType::Image, 0.0, 0.0);
        let err = image
            .patched(&ElementPatch {
                color: Some("#ff0000".into()),
                ..ElementPatch::default()
            })
            .unwrap_err();
        assert!(matches!(err, CanvasError::InvalidField { field: "color", .. }));
    }

    #[test]
    fn test_patch_rejects_zero_width_except_label() {
        let input = Element::draft(ElementId::from_raw(1), ElementType::Input, 0.0, 0.0);
        assert!(input.patched(&ElementPatch::size(0.0, 10.0)).is_err());

        let label = Element::draft(ElementId::from_raw(2), ElementType::Label, 0.0, 0.0);
        assert!(label.patched(&ElementPatch::size(0.0, 0.0)).is_ok());
    }

    #[test]
    fn test_replacing_patch_reproduces_element() {
        let mut target = Element::draft(ElementId::from_raw(1), ElementType::Button, 0.0, 0.0);
        let mut source = target.clone();
        source.bounds = Rect::new(5.0, 6.0, 70.0, 20.0);
        source.kind = ElementKind::Button(ButtonProps {
            content: "Go".into(),
            color: "#3366ff".into(),
        });
        target = target.patched(&ElementPatch::replacing(&source)).expect("patch");
        assert_eq!(target, source);
    }

    #[test]
    fn test_element_type_parse() {
        assert_eq!("Shape".parse::<ElementType>().expect("parse"), ElementType::Shape);
        assert!("Video".parse::<ElementType>().is_err());
    }
}
