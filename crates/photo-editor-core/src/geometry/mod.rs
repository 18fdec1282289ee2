//! Geometric transform model shared by every draggable and scalable layer.
//!
//! This module provides:
//! - Bounded dragging of overlay elements inside the container
//! - Pinch scale clamping with snap-back detection
//! - Aspect-fit sizing for the base image and overlay images
//!
//! # Coordinate System
//!
//! - Positions are the top-left corner of a layer in container coordinates
//! - Origin is the top-left corner of the container
//! - All values are in (fractional) pixels

mod drag;
mod fit;
mod pinch;

pub use drag::{clamp_position, DragSession, GestureOutcome};
pub use fit::{fit, FitPolicy};
pub use pinch::{apply_pinch, InvalidScaleBounds, PinchOutcome, ScaleBounds, ScaleState};

use serde::{Deserialize, Serialize};

/// A point in container coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width and height of a container or layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Size of a raster with the given pixel dimensions.
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    /// True when either dimension is zero, negative or not a number.
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// An axis-aligned rectangle: where a layer sits and how large it is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Placement {
    pub fn new(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Scale the rectangle about its own center.
    pub fn scaled_about_center(&self, factor: f32) -> Self {
        let width = self.width * factor;
        let height = self.height * factor;
        Self {
            x: self.x + (self.width - width) / 2.0,
            y: self.y + (self.height - height) / 2.0,
            width,
            height,
        }
    }
}
