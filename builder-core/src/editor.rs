//! Property editor for a single element.
//!
//! The editor works on raw form text, the way a host form hands it over,
//! and only produces an [`Element`] once every visible field validates.
//! Which fields are visible is decided by [`fields_for`], a total match over
//! [`ElementType`].

use std::collections::BTreeMap;

use thiserror::Error;

use crate::element::{Element, ElementId, ElementPatch, ElementType, FontWeight, ShapeKind};
use crate::image::{is_image_data_uri, ImageData};
use crate::store::ElementStore;
use crate::{CanvasError, CanvasResult};

/// A form field of the config editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// X position.
    X,
    /// Y position.
    Y,
    /// Width.
    Width,
    /// Height.
    Height,
    /// Text content or placeholder.
    Content,
    /// Foreground or fill color.
    Color,
    /// Label font size.
    FontSize,
    /// Label font weight.
    FontWeight,
    /// Image data URI.
    ImageSource,
    /// Shape geometry.
    ShapeKind,
}

impl Field {
    /// Wire name of the field.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
            Self::Content => "content",
            Self::Color => "color",
            Self::FontSize => "fontSize",
            Self::FontWeight => "fontWeight",
            Self::ImageSource => "image",
            Self::ShapeKind => "shape",
        }
    }

    /// Form label for the field on an element of type `element_type`.
    #[must_use]
    pub const fn label(self, element_type: ElementType) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Width => "Width",
            Self::Height => "Height",
            Self::Content => match element_type {
                ElementType::Input => "Placeholder",
                _ => "Content",
            },
            Self::Color => "Color",
            Self::FontSize => "Font Size",
            Self::FontWeight => "Font Weight",
            Self::ImageSource => "Image",
            Self::ShapeKind => "Shape",
        }
    }

    /// Choices offered for select-style fields.
    #[must_use]
    pub fn options(self) -> Option<Vec<&'static str>> {
        match self {
            Self::FontWeight => Some(FontWeight::ALL.iter().map(|w| w.as_str()).collect()),
            Self::ShapeKind => Some(ShapeKind::ALL.iter().map(|s| s.as_str()).collect()),
            _ => None,
        }
    }
}

/// Fields shown for each element type.
#[must_use]
pub const fn fields_for(element_type: ElementType) -> &'static [Field] {
    match element_type {
        ElementType::Label => &[
            Field::X,
            Field::Y,
            Field::Content,
            Field::Color,
            Field::FontSize,
            Field::FontWeight,
        ],
        ElementType::Input | ElementType::Button => &[
            Field::X,
            Field::Y,
            Field::Width,
            Field::Height,
            Field::Content,
            Field::Color,
        ],
        ElementType::Image => &[
            Field::X,
            Field::Y,
            Field::Width,
            Field::Height,
            Field::ImageSource,
        ],
        ElementType::Shape => &[
            Field::X,
            Field::Y,
            Field::Width,
            Field::Height,
            Field::Color,
            Field::ShapeKind,
        ],
    }
}

/// Why a single field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Required value is empty.
    #[error("this field is required")]
    Missing,
    /// Value does not parse as a number.
    #[error("must be a number")]
    NotANumber,
    /// Value must be greater than zero.
    #[error("must be greater than zero")]
    NotPositive,
    /// Value is not a `#rrggbb` color.
    #[error("must be a color like #1a2b3c")]
    InvalidColor,
    /// Value is not one of the offered choices.
    #[error("`{0}` is not one of the available options")]
    UnknownOption(String),
    /// Value is not an embedded image.
    #[error("must be an embedded image")]
    InvalidImage,
    /// The element refused the value.
    #[error("{0}")]
    Rejected(String),
}

/// Field-level validation failures; the editor stays open.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(Vec<(Field, FieldError)>);

impl ValidationErrors {
    /// Error for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|(f, _)| *f == field).map(|(_, e)| e)
    }

    /// All failures in form order.
    pub fn iter(&self) -> impl Iterator<Item = &(Field, FieldError)> {
        self.0.iter()
    }

    /// Number of failed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a (Field, FieldError);
    type IntoIter = std::slice::Iter<'a, (Field, FieldError)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Errors from [`ConfigEditor::commit`].
#[derive(Debug, Error)]
pub enum CommitError {
    /// One or more fields are invalid.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// The store refused the element.
    #[error(transparent)]
    Store(#[from] CanvasError),
}

/// Whether the editor creates a new element or edits a stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Committing adds a new element.
    Create,
    /// Committing updates an existing element.
    Edit,
}

/// Type-dependent form over one draft or existing element.
#[derive(Debug, Clone)]
pub struct ConfigEditor {
    base: Element,
    mode: EditMode,
    values: BTreeMap<Field, String>,
}

impl ConfigEditor {
    /// Open the editor on a draft that is not yet in the store.
    #[must_use]
    pub fn for_draft(draft: Element) -> Self {
        Self::open(draft, EditMode::Create)
    }

    /// Open the editor pre-filled with a stored element.
    #[must_use]
    pub fn for_existing(element: &Element) -> Self {
        Self::open(element.clone(), EditMode::Edit)
    }

    fn open(base: Element, mode: EditMode) -> Self {
        let mut values = BTreeMap::new();
        let patch = ElementPatch::replacing(&base);
        for &field in fields_for(base.element_type()) {
            let value = match field {
                Field::X => patch.x.map(format_number),
                Field::Y => patch.y.map(format_number),
                Field::Width => patch.width.map(format_number),
                Field::Height => patch.height.map(format_number),
                Field::Content => patch.content.clone(),
                Field::Color => patch.color.clone(),
                Field::FontSize => patch.font_size.map(format_number),
                Field::FontWeight => patch.font_weight.map(|w| w.as_str().to_string()),
                Field::ImageSource => patch.image.clone(),
                Field::ShapeKind => patch.shape.map(|s| s.as_str().to_string()),
            };
            values.insert(field, value.unwrap_or_default());
        }
        tracing::debug!(
            "Config editor opened on {} element {} ({mode:?})",
            base.element_type(),
            base.id
        );
        Self { base, mode, values }
    }

    /// Id of the element being edited.
    #[must_use]
    pub const fn element_id(&self) -> &ElementId {
        &self.base.id
    }

    /// Type of the element being edited.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.base.element_type()
    }

    /// Create or edit.
    #[must_use]
    pub const fn mode(&self) -> EditMode {
        self.mode
    }

    /// Visible fields, in form order.
    #[must_use]
    pub const fn fields(&self) -> &'static [Field] {
        fields_for(self.base.element_type())
    }

    /// Current raw value of a visible field.
    #[must_use]
    pub fn value(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Set the raw value of a visible field.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidField`] if the field is hidden for this
    /// element type.
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> CanvasResult<()> {
        match self.values.get_mut(&field) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(CanvasError::InvalidField {
                field: field.name(),
                element_type: self.element_type(),
            }),
        }
    }

    /// Use an encoded image as the image source.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidField`] unless this is an image element.
    pub fn set_image(&mut self, image: ImageData) -> CanvasResult<()> {
        self.set(Field::ImageSource, image.into_data_uri())
    }

    /// Validate every visible field and build the resulting element.
    ///
    /// # Errors
    ///
    /// Returns every failing field at once.
    pub fn validate(&self) -> Result<Element, ValidationErrors> {
        let mut errors = Vec::new();
        let mut patch = ElementPatch::default();

        for &field in self.fields() {
            let raw = self.values.get(&field).map_or("", String::as_str);
            if let Err(e) = apply_field(&mut patch, field, raw) {
                errors.push((field, e));
            }
        }
        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        self.base.patched(&patch).map_err(|e| {
            let field = match &e {
                CanvasError::InvalidField { field, .. } => self
                    .fields()
                    .iter()
                    .copied()
                    .find(|f| f.name() == *field)
                    .unwrap_or(Field::X),
                _ => Field::Width,
            };
            tracing::warn!("Form rejected by {} element: {e}", self.element_type());
            ValidationErrors(vec![(field, FieldError::Rejected(e.to_string()))])
        })
    }

    /// Validate and write the element into the store.
    ///
    /// Adds the element when its id is new, otherwise updates the stored
    /// element in place. On error the store is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CommitError::Validation`] if a field is invalid, or
    /// [`CommitError::Store`] if the store refuses the element.
    pub fn commit(&self, store: &mut ElementStore) -> Result<ElementId, CommitError> {
        let element = self.validate()?;
        let id = element.id.clone();
        if store.contains(&id) {
            store.update(&id, &ElementPatch::replacing(&element))?;
        } else {
            store.add(element)?;
        }
        tracing::debug!("Config editor committed element {id}");
        Ok(id)
    }
}

fn apply_field(patch: &mut ElementPatch, field: Field, raw: &str) -> Result<(), FieldError> {
    match field {
        Field::X => patch.x = Some(parse_number(raw)?),
        Field::Y => patch.y = Some(parse_number(raw)?),
        Field::Width => patch.width = Some(parse_positive(raw)?),
        Field::Height => patch.height = Some(parse_positive(raw)?),
        Field::FontSize => patch.font_size = Some(parse_positive(raw)?),
        Field::Content => {
            if raw.is_empty() {
                return Err(FieldError::Missing);
            }
            patch.content = Some(raw.to_string());
        }
        Field::Color => patch.color = Some(parse_color(raw)?),
        Field::FontWeight => {
            let weight = FontWeight::ALL
                .into_iter()
                .find(|w| w.as_str() == raw)
                .ok_or_else(|| FieldError::UnknownOption(raw.to_string()))?;
            patch.font_weight = Some(weight);
        }
        Field::ShapeKind => {
            let shape = ShapeKind::ALL
                .into_iter()
                .find(|s| s.as_str() == raw)
                .ok_or_else(|| FieldError::UnknownOption(raw.to_string()))?;
            patch.shape = Some(shape);
        }
        Field::ImageSource => {
            if raw.is_empty() {
                return Err(FieldError::Missing);
            }
            if !is_image_data_uri(raw) {
                return Err(FieldError::InvalidImage);
            }
            patch.image = Some(raw.to_string());
        }
    }
    Ok(())
}

fn parse_number(raw: &str) -> Result<f64, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FieldError::Missing);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(FieldError::NotANumber),
    }
}

fn parse_positive(raw: &str) -> Result<f64, FieldError> {
    let value = parse_number(raw)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(FieldError::NotPositive)
    }
}

fn parse_color(raw: &str) -> Result<String, FieldError> {
    if raw.is_empty() {
        return Err(FieldError::Missing);
    }
    if is_hex_color(raw) {
        Ok(raw.to_ascii_lowercase())
    } else {
        Err(FieldError::InvalidColor)
    }
}

/// Whether `value` is a `#rrggbb` color.
#[must_use]
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn format_number(value: f64) -> String {
    format!("{value}")
}
