//! Stateless geometry bindings.
//!
//! Hosts that keep their own element state can call the transform model
//! directly instead of going through a `JsPhotoEditor`.
//!
//! # Example
//!
//! ```typescript
//! import { clamp_position, apply_pinch, fit_size } from '@photo-editor/wasm';
//!
//! const [x, y] = clamp_position(1040, 810, 100, 50, 1000, 800); // [900, 750]
//! const outcome = apply_pinch(1.0, 0.4, 0.5, 3.0);              // factor 0.5, snap_back true
//! const [fx, fy, fw, fh] = fit_size(2000, 1000, 500, 500, false);
//! ```

use photo_editor_core::geometry::{self, FitPolicy, InvalidScaleBounds, Point, ScaleBounds, Size};
use wasm_bindgen::prelude::*;

use crate::types::rect_to_vec;

/// Result of one pinch sample.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsPinchOutcome {
    factor: f32,
    snap_back: bool,
}

#[wasm_bindgen]
impl JsPinchOutcome {
    /// New zoom factor, clamped to the bounds.
    #[wasm_bindgen(getter)]
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// True when the factor fell below 1.0 and should animate back.
    #[wasm_bindgen(getter)]
    pub fn snap_back(&self) -> bool {
        self.snap_back
    }
}

/// Clamp a proposed top-left position so the element stays in the container.
///
/// Returns `[x, y]`.
#[wasm_bindgen]
pub fn clamp_position(
    x: f32,
    y: f32,
    element_width: f32,
    element_height: f32,
    container_width: f32,
    container_height: f32,
) -> Vec<f32> {
    let pos = geometry::clamp_position(
        Point::new(x, y),
        Size::new(element_width, element_height),
        Size::new(container_width, container_height),
    );
    vec![pos.x, pos.y]
}

/// Apply a pinch delta to the current factor within `[min, max]`.
///
/// Throws unless `0 < min <= max` and both bounds are finite.
#[wasm_bindgen]
pub fn apply_pinch(
    current: f32,
    delta: f32,
    min: f32,
    max: f32,
) -> Result<JsPinchOutcome, JsValue> {
    pinch_outcome(current, delta, min, max).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn pinch_outcome(
    current: f32,
    delta: f32,
    min: f32,
    max: f32,
) -> Result<JsPinchOutcome, InvalidScaleBounds> {
    let outcome = geometry::apply_pinch(current, delta, ScaleBounds::new(min, max)?);
    Ok(JsPinchOutcome {
        factor: outcome.factor,
        snap_back: outcome.snap_back,
    })
}

/// Fit an image into a container, centered.
///
/// With `fill_axis` false the image is only ever shrunk; with `fill_axis` true
/// it fills the container along its relatively wider axis.
///
/// Returns `[x, y, width, height]`.
#[wasm_bindgen]
pub fn fit_size(
    image_width: f32,
    image_height: f32,
    container_width: f32,
    container_height: f32,
    fill_axis: bool,
) -> Vec<f32> {
    let policy = if fill_axis {
        FitPolicy::FillAxis
    } else {
        FitPolicy::DownscaleCentered
    };
    rect_to_vec(geometry::fit(
        Size::new(image_width, image_height),
        Size::new(container_width, container_height),
        policy,
    ))
}
