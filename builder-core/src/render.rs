//! Conversion of stored elements into host-drawable nodes.
//!
//! Nodes describe what to draw, not how: a DOM host maps them to styled
//! boxes, a raster host to draw calls. Geometry is in canvas-local pixels.

use serde::Serialize;

use crate::element::{
    ButtonProps, Element, ElementId, ElementKind, FontWeight, ImageProps, InputProps, LabelProps,
    ShapeKind, ShapeProps,
};
use crate::geometry::Rect;
use crate::interaction::resize_handle;
use crate::store::ElementStore;

/// Corner radius of rectangle shapes, in pixels.
pub const RECTANGLE_RADIUS: f64 = 4.0;

/// Triangle clip polygon as fractions of the box, apex first.
pub const TRIANGLE_CLIP: [(f64, f64); 3] = [(0.5, 0.0), (0.0, 1.0), (1.0, 1.0)];

/// How a node's box is sized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BoxSize {
    /// Sized to its text; only the origin is fixed.
    Auto {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
    },
    /// Explicit box.
    Fixed(Rect),
}

/// Corner treatment of a node's box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Corners {
    /// Square corners.
    Square,
    /// Rounded by a pixel radius.
    Rounded {
        /// Radius in pixels.
        radius: f64,
    },
    /// Ellipse inscribed in the box.
    Ellipse,
}

/// Visual body of a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Visual {
    /// Plain text.
    Text {
        /// Text to draw.
        text: String,
        /// Text color.
        color: String,
        /// Font size in pixels.
        font_size: f64,
        /// Font weight.
        font_weight: FontWeight,
    },
    /// Empty text field showing a placeholder.
    TextField {
        /// Placeholder text.
        placeholder: String,
        /// Text color.
        color: String,
    },
    /// Clickable button with a caption.
    Button {
        /// Caption.
        caption: String,
        /// Background color.
        background: String,
    },
    /// Embedded picture, or a placeholder when `src` is empty.
    Picture {
        /// Data URI.
        src: String,
    },
    /// Filled shape.
    Fill {
        /// Fill color.
        color: String,
        /// Corner treatment.
        corners: Corners,
        /// Clip polygon as box fractions, if any.
        clip: Option<Vec<(f64, f64)>>,
    },
}

/// One drawable element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    /// Element the node was built from.
    pub id: ElementId,
    /// Placement.
    pub size: BoxSize,
    /// What to draw.
    pub visual: Visual,
    /// Whether to draw the selection ring.
    pub selected: bool,
    /// Resize handle to draw, for selected resizable elements.
    pub handle: Option<Rect>,
}

/// Builds the visual for one kind of element content.
pub trait Render {
    /// What to draw for this content.
    fn visual(&self) -> Visual;

    /// Whether the box follows the content instead of the stored size.
    fn auto_sized(&self) -> bool {
        false
    }
}

impl Render for LabelProps {
    fn visual(&self) -> Visual {
        Visual::Text {
            text: self.content.clone(),
            color: self.color.clone(),
            font_size: self.font_size,
            font_weight: self.font_weight,
        }
    }

    fn auto_sized(&self) -> bool {
        true
    }
}

impl Render for InputProps {
    fn visual(&self) -> Visual {
        Visual::TextField {
            placeholder: self.placeholder.clone(),
            color: self.color.clone(),
        }
    }
}

impl Render for ButtonProps {
    fn visual(&self) -> Visual {
        Visual::Button {
            caption: self.content.clone(),
            background: self.color.clone(),
        }
    }
}

impl Render for ImageProps {
    fn visual(&self) -> Visual {
        Visual::Picture {
            src: self.src.clone(),
        }
    }
}

impl Render for ShapeProps {
    fn visual(&self) -> Visual {
        let (corners, clip) = match self.shape {
            ShapeKind::Rectangle => (
                Corners::Rounded {
                    radius: RECTANGLE_RADIUS,
                },
                None,
            ),
            ShapeKind::Circle => (Corners::Ellipse, None),
            ShapeKind::Triangle => (Corners::Square, Some(TRIANGLE_CLIP.to_vec())),
        };
        Visual::Fill {
            color: self.color.clone(),
            corners,
            clip,
        }
    }
}

impl Render for ElementKind {
    fn visual(&self) -> Visual {
        match self {
            Self::Label(p) => p.visual(),
            Self::Input(p) => p.visual(),
            Self::Button(p) => p.visual(),
            Self::Image(p) => p.visual(),
            Self::Shape(p) => p.visual(),
        }
    }

    fn auto_sized(&self) -> bool {
        match self {
            Self::Label(p) => p.auto_sized(),
            Self::Input(p) => p.auto_sized(),
            Self::Button(p) => p.auto_sized(),
            Self::Image(p) => p.auto_sized(),
            Self::Shape(p) => p.auto_sized(),
        }
    }
}

/// Build the node for one element.
#[must_use]
pub fn render_element(element: &Element, selected: bool) -> RenderNode {
    let b = element.bounds;
    let size = if element.kind.auto_sized() {
        BoxSize::Auto { x: b.x, y: b.y }
    } else {
        BoxSize::Fixed(b)
    };
    let handle = (selected && !element.kind.auto_sized()).then(|| resize_handle(&b));
    tracing::trace!(
        "Render {} {} at ({}, {})",
        element.element_type(),
        element.id,
        b.x,
        b.y
    );
    RenderNode {
        id: element.id.clone(),
        size,
        visual: element.kind.visual(),
        selected,
        handle,
    }
}

/// Build nodes for every element, bottom to top.
#[must_use]
pub fn render_elements(store: &ElementStore) -> Vec<RenderNode> {
    let selected = store.selected_id();
    store
        .list()
        .iter()
        .map(|e| render_element(e, selected == Some(&e.id)))
        .collect()
}
