//! Overlay elements placed on top of the base image.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;
use crate::geometry::{Placement, Point, Size};
use crate::text::{TextRasterizer, TextStyle};

/// Handle to an element owned by an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A text label and its current raster.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    text: String,
    style: TextStyle,
    raster: DecodedImage,
}

impl TextLabel {
    pub fn new(text: impl Into<String>, style: TextStyle, rasterizer: &dyn TextRasterizer) -> Self {
        let text = text.into();
        let raster = rasterizer.rasterize(&text, &style);
        Self {
            text,
            style,
            raster,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn raster(&self) -> &DecodedImage {
        &self.raster
    }

    /// Replace text and/or style and re-render.
    pub fn update(
        &mut self,
        text: Option<String>,
        style: Option<TextStyle>,
        rasterizer: &dyn TextRasterizer,
    ) {
        if let Some(text) = text {
            self.text = text;
        }
        if let Some(style) = style {
            self.style = style;
        }
        self.raster = rasterizer.rasterize(&self.text, &self.style);
    }
}

/// What an element shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementContent {
    Text(TextLabel),
    Image(DecodedImage),
}

impl ElementContent {
    /// Pixels painted for this element, before scaling to the element's size.
    pub fn raster(&self) -> &DecodedImage {
        match self {
            ElementContent::Text(label) => label.raster(),
            ElementContent::Image(image) => image,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ElementContent::Text(_))
    }
}

/// A draggable overlay inside the container.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) id: ElementId,
    pub(crate) position: Point,
    pub(crate) size: Size,
    pub(crate) content: ElementContent,
}

impl Element {
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Top-left corner in container coordinates.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn placement(&self) -> Placement {
        Placement::new(self.position, self.size)
    }

    pub fn content(&self) -> &ElementContent {
        &self.content
    }

    /// The label, if this element is text.
    pub fn text(&self) -> Option<&TextLabel> {
        match &self.content {
            ElementContent::Text(label) => Some(label),
            ElementContent::Image(_) => None,
        }
    }

    /// True when the point lies inside the element's rectangle.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.position.x
            && point.y >= self.position.y
            && point.x < self.position.x + self.size.width
            && point.y < self.position.y + self.size.height
    }
}
