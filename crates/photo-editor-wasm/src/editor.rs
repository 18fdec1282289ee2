//! Editor session bindings.
//!
//! `JsPhotoEditor` wraps a core `PhotoEditor` whose text labels are rendered
//! with a font supplied by the page. The browser has no shared pictures
//! directory, so saving is split into `export_png` and `export_file_name`
//! and the page writes the file itself.
//!
//! # Example
//!
//! ```typescript
//! import { JsPhotoEditor } from '@photo-editor/wasm';
//!
//! const font = new Uint8Array(await (await fetch('/Roboto.ttf')).arrayBuffer());
//! const editor = new JsPhotoEditor(font, { fit_policy: 'downscale_centered' });
//! editor.set_container_size(canvas.width, canvas.height);
//! editor.set_base_image(photoBytes);
//!
//! const id = editor.add_text('Type here');
//! editor.press(id, ev.offsetX, ev.offsetY);
//! const [x, y] = editor.drag_to(ev.offsetX, ev.offsetY);
//! editor.release(); // 'tap' | 'drag'
//!
//! const png = editor.export_png();
//! const name = editor.export_file_name();
//! ```

use std::time::Duration;

use photo_editor_core::encode::encode_image_png;
use photo_editor_core::geometry::{GestureOutcome, Point, Size};
use photo_editor_core::storage::output_file_name;
use photo_editor_core::{EditorConfig, ElementId, GlyphRasterizer, PhotoEditor, TextStyle};
use wasm_bindgen::prelude::*;

use crate::types::{rect_to_vec, JsDecodedImage};

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct JsPhotoEditor {
    inner: PhotoEditor<GlyphRasterizer>,
}

#[wasm_bindgen]
impl JsPhotoEditor {
    /// Create an editor that renders text with `font` (TrueType/OpenType bytes).
    ///
    /// `config` is a partial `EditorConfig` object; `undefined` uses defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(font: Vec<u8>, config: JsValue) -> Result<JsPhotoEditor, JsValue> {
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid editor config: {}", e)))?
        };
        let rasterizer = GlyphRasterizer::from_bytes(font).map_err(js_err)?;

        Ok(JsPhotoEditor {
            inner: PhotoEditor::new(config, rasterizer),
        })
    }

    pub fn set_container_size(&mut self, width: f32, height: f32) {
        self.inner.set_container_size(Size::new(width, height));
    }

    /// Decode and show a base image. Returns false (empty state) if unreadable.
    pub fn set_base_image(&mut self, bytes: &[u8]) -> bool {
        self.inner.set_base_image_bytes(bytes)
    }

    pub fn clear_base_image(&mut self) {
        self.inner.set_base_image(None);
    }

    /// On-screen `[x, y, width, height]` of the base image, zoom included.
    pub fn base_rect(&self) -> Option<Vec<f32>> {
        self.inner.displayed_base_rect().map(rect_to_vec)
    }

    pub fn add_text(&mut self, text: &str) -> u64 {
        self.inner.add_text(text).0
    }

    /// Add a label with a `TextStyle` object.
    pub fn add_styled_text(&mut self, text: &str, style: JsValue) -> Result<u64, JsValue> {
        let style = parse_style(style)?;
        self.inner
            .add_text_with_style(text, style)
            .map(|id| id.0)
            .map_err(js_err)
    }

    /// Decode and add an overlay image. `undefined` if the bytes are unreadable.
    pub fn add_image(&mut self, bytes: &[u8]) -> Option<u64> {
        self.inner.add_image_bytes(bytes).map(|id| id.0)
    }

    pub fn remove(&mut self, id: u64) -> Result<(), JsValue> {
        self.inner.remove(ElementId(id)).map(|_| ()).map_err(js_err)
    }

    pub fn set_text(&mut self, id: u64, text: &str) -> Result<(), JsValue> {
        self.inner.set_text(ElementId(id), text).map_err(js_err)
    }

    pub fn set_text_style(&mut self, id: u64, style: JsValue) -> Result<(), JsValue> {
        let style = parse_style(style)?;
        self.inner.set_text_style(ElementId(id), style).map_err(js_err)
    }

    /// `[x, y, width, height]` of an element.
    pub fn element_rect(&self, id: u64) -> Option<Vec<f32>> {
        self.inner
            .element(ElementId(id))
            .map(|e| rect_to_vec(e.placement()))
    }

    /// Element ids bottom to top.
    pub fn element_ids(&self) -> Vec<u64> {
        self.inner.elements().iter().map(|e| e.id().0).collect()
    }

    /// Topmost element under the point.
    pub fn element_at(&self, x: f32, y: f32) -> Option<u64> {
        self.inner.element_at(Point::new(x, y)).map(|id| id.0)
    }

    pub fn press(&mut self, id: u64, x: f32, y: f32) -> Result<(), JsValue> {
        self.inner
            .press(ElementId(id), Point::new(x, y))
            .map_err(js_err)
    }

    /// New `[x, y]` of the dragged element, or `undefined` with no active drag.
    pub fn drag_to(&mut self, x: f32, y: f32) -> Option<Vec<f32>> {
        self.inner
            .drag_to(Point::new(x, y))
            .map(|pos| vec![pos.x, pos.y])
    }

    /// End the drag: `"tap"`, `"drag"`, or `undefined` with no active drag.
    pub fn release(&mut self) -> Option<String> {
        self.inner
            .release()
            .map(|(_, outcome)| gesture_name(outcome).to_string())
    }

    pub fn begin_pinch(&mut self) {
        self.inner.begin_pinch();
    }

    /// Apply a pinch delta. Returns true when a snap-back animation started.
    pub fn pinch(&mut self, delta: f32) -> bool {
        self.inner.pinch(delta).snap_back
    }

    /// Advance the snap-back by `dt_ms`. Returns the factor to display, or
    /// `undefined` when nothing is animating.
    pub fn advance_animation(&mut self, dt_ms: f64) -> Option<f32> {
        self.inner
            .advance_animation(frame_duration(dt_ms))
            .map(|frame| frame.factor)
    }

    #[wasm_bindgen(getter)]
    pub fn is_animating(&self) -> bool {
        self.inner.is_animating()
    }

    /// Zoom factor currently on screen.
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f32 {
        self.inner.displayed_scale()
    }

    /// Compose the base image and all elements.
    pub fn flatten(&self) -> Result<JsDecodedImage, JsValue> {
        self.inner
            .flatten()
            .map(JsDecodedImage::from_decoded)
            .map_err(js_err)
    }

    /// Flatten and encode as PNG.
    pub fn export_png(&self) -> Result<Vec<u8>, JsValue> {
        let image = self.inner.flatten().map_err(js_err)?;
        let png = encode_image_png(&image).map_err(js_err)?;
        log::debug!("exported {}x{} png ({} bytes)", image.width, image.height, png.len());
        Ok(png)
    }

    /// File name for an export made now.
    pub fn export_file_name(&self) -> String {
        let millis = js_sys::Date::now().max(0.0) as u128;
        output_file_name(&self.inner.config().file_prefix, millis)
    }
}

fn parse_style(style: JsValue) -> Result<TextStyle, JsValue> {
    serde_wasm_bindgen::from_value(style)
        .map_err(|e| JsValue::from_str(&format!("Invalid text style: {}", e)))
}

fn gesture_name(outcome: GestureOutcome) -> &'static str {
    match outcome {
        GestureOutcome::Tap => "tap",
        GestureOutcome::Drag => "drag",
    }
}

/// Frame time from JS milliseconds; negative or NaN counts as zero.
fn frame_duration(dt_ms: f64) -> Duration {
    if dt_ms.is_finite() && dt_ms > 0.0 {
        Duration::try_from_secs_f64(dt_ms / 1000.0).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}
