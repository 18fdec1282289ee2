//! The photo editor session.
//!
//! `PhotoEditor` owns everything a host's editing screen shows: the container
//! size, the base image with its zoom state, and the overlay elements in
//! z-order. The host forwards layout changes, pointer samples, pinch deltas
//! and animation frames; the editor answers with positions, sizes and the
//! flattened output. All methods are synchronous and meant to be called from
//! one UI thread.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::animation::{SnapBack, SnapFrame};
use crate::compose::{flatten, Layer};
use crate::config::EditorConfig;
use crate::decode::{load_image, DecodeError, DecodedImage};
use crate::element::{Element, ElementContent, ElementId, TextLabel};
use crate::error::EditorError;
use crate::geometry::{
    clamp_position, fit, DragSession, GestureOutcome, PinchOutcome, Placement, Point, ScaleState,
    Size,
};
use crate::storage::{save_png, MediaIndex, NoopMediaIndex};
use crate::text::{TextRasterizer, TextStyle};

/// Active single-pointer drag.
#[derive(Debug, Clone, Copy)]
struct ActiveDrag {
    id: ElementId,
    session: DragSession,
}

pub struct PhotoEditor<R: TextRasterizer> {
    config: EditorConfig,
    rasterizer: R,
    media_index: Box<dyn MediaIndex>,
    container: Size,
    base: Option<DecodedImage>,
    base_layout: Placement,
    scale: ScaleState,
    snap_back: Option<SnapBack>,
    elements: Vec<Element>,
    next_id: u64,
    drag: Option<ActiveDrag>,
}

impl<R: TextRasterizer> PhotoEditor<R> {
    pub fn new(config: EditorConfig, rasterizer: R) -> Self {
        let scale = ScaleState::new(config.scale_bounds);
        Self {
            config,
            rasterizer,
            media_index: Box::new(NoopMediaIndex),
            container: Size::default(),
            base: None,
            base_layout: Placement::default(),
            scale,
            snap_back: None,
            elements: Vec::new(),
            next_id: 1,
            drag: None,
        }
    }

    /// Use `media_index` to announce saved files.
    pub fn with_media_index(mut self, media_index: Box<dyn MediaIndex>) -> Self {
        self.media_index = media_index;
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn container(&self) -> Size {
        self.container
    }

    /// Apply a layout/resize of the container.
    ///
    /// The base image is re-fitted. Elements keep their positions; they are
    /// only clamped again when next dragged.
    pub fn set_container_size(&mut self, size: Size) {
        self.container = size;
        self.relayout();
        log::debug!("container resized to {}x{}", size.width, size.height);
    }

    // ------------------------------------------------------------------
    // Base image
    // ------------------------------------------------------------------

    /// Replace the base image; `None` shows the empty state.
    ///
    /// Zoom returns to 1.0 and any running snap-back is dropped.
    pub fn set_base_image(&mut self, image: Option<DecodedImage>) {
        self.base = image.filter(|img| !img.is_empty());
        self.snap_back = None;
        self.scale.reset();
        self.relayout();
    }

    /// Decode and set the base image. Returns false (and shows the empty
    /// state) when the bytes cannot be decoded.
    pub fn set_base_image_bytes(&mut self, bytes: &[u8]) -> bool {
        let image = load_image(bytes);
        let loaded = image.is_some();
        self.set_base_image(image);
        loaded
    }

    pub fn base_image(&self) -> Option<&DecodedImage> {
        self.base.as_ref()
    }

    /// Fitted rectangle of the base image at zoom 1.0.
    pub fn base_placement(&self) -> Option<Placement> {
        self.base.as_ref().map(|_| self.base_layout)
    }

    /// Rectangle the base image currently occupies, zoom included.
    pub fn displayed_base_rect(&self) -> Option<Placement> {
        self.base_placement()
            .map(|rect| rect.scaled_about_center(self.displayed_scale()))
    }

    fn relayout(&mut self) {
        self.base_layout = match &self.base {
            Some(image) => fit(image.size(), self.container, self.config.fit_policy),
            None => Placement::default(),
        };
    }

    // ------------------------------------------------------------------
    // Elements
    // ------------------------------------------------------------------

    /// Add a text label with the configured default style, centered.
    pub fn add_text(&mut self, text: impl Into<String>) -> ElementId {
        let style = self.config.text_style;
        self.push_label(text.into(), style)
    }

    /// Add a text label with its own style.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Text` if the style fails [`TextStyle::validate`].
    pub fn add_text_with_style(
        &mut self,
        text: impl Into<String>,
        style: TextStyle,
    ) -> Result<ElementId, EditorError> {
        style.validate()?;
        Ok(self.push_label(text.into(), style))
    }

    fn push_label(&mut self, text: String, style: TextStyle) -> ElementId {
        let label = TextLabel::new(text, style, &self.rasterizer);
        let size = label.raster().size();
        self.push_element(size, ElementContent::Text(label))
    }

    /// Add an overlay image, fitted within the base image bounds (or the
    /// container when there is no base image) and centered in the container.
    pub fn add_image(&mut self, image: DecodedImage) -> Result<ElementId, EditorError> {
        if image.is_empty() {
            return Err(DecodeError::InvalidDimensions {
                width: image.width,
                height: image.height,
            }
            .into());
        }

        let bounds = match self.base_placement() {
            Some(rect) if !rect.size().is_empty() => rect.size(),
            _ => self.container,
        };
        let size = if bounds.is_empty() {
            image.size()
        } else {
            fit(image.size(), bounds, self.config.fit_policy).size()
        };

        Ok(self.push_element(size, ElementContent::Image(image)))
    }

    /// Decode and add an overlay image; `None` if the bytes are unreadable.
    pub fn add_image_bytes(&mut self, bytes: &[u8]) -> Option<ElementId> {
        let image = load_image(bytes)?;
        self.add_image(image).ok()
    }

    fn push_element(&mut self, size: Size, content: ElementContent) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;

        let centered = Point::new(
            (self.container.width - size.width) / 2.0,
            (self.container.height - size.height) / 2.0,
        );
        let position = clamp_position(centered, size, self.container);

        log::debug!(
            "added {} element {} ({}x{}) at ({}, {})",
            if content.is_text() { "text" } else { "image" },
            id,
            size.width,
            size.height,
            position.x,
            position.y
        );

        self.elements.push(Element {
            id,
            position,
            size,
            content,
        });
        id
    }

    /// Replace a label's text and re-render it. The position is kept.
    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) -> Result<(), EditorError> {
        self.update_label(id, Some(text.into()), None)
    }

    /// Restyle a label (color, background, size). The position is kept.
    pub fn set_text_style(&mut self, id: ElementId, style: TextStyle) -> Result<(), EditorError> {
        style.validate()?;
        self.update_label(id, None, Some(style))
    }

    fn update_label(
        &mut self,
        id: ElementId,
        text: Option<String>,
        style: Option<TextStyle>,
    ) -> Result<(), EditorError> {
        let element = self
            .elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(EditorError::UnknownElement(id))?;

        let ElementContent::Text(label) = &mut element.content else {
            return Err(EditorError::NotText(id));
        };
        label.update(text, style, &self.rasterizer);
        element.size = label.raster().size();
        Ok(())
    }

    /// Remove and return an element. An active drag on it ends.
    pub fn remove(&mut self, id: ElementId) -> Result<Element, EditorError> {
        let index = self
            .elements
            .iter()
            .position(|e| e.id == id)
            .ok_or(EditorError::UnknownElement(id))?;

        if self.drag.is_some_and(|d| d.id == id) {
            self.drag = None;
        }
        log::debug!("removed element {}", id);
        Ok(self.elements.remove(index))
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Elements bottom to top.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Topmost element under `point`.
    pub fn element_at(&self, point: Point) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.contains(point))
            .map(|e| e.id)
    }

    // ------------------------------------------------------------------
    // Dragging
    // ------------------------------------------------------------------

    /// Pointer went down on an element. Replaces any drag in progress.
    pub fn press(&mut self, id: ElementId, pointer: Point) -> Result<(), EditorError> {
        let element = self.element(id).ok_or(EditorError::UnknownElement(id))?;
        self.drag = Some(ActiveDrag {
            id,
            session: DragSession::begin(pointer, element.position),
        });
        Ok(())
    }

    /// Move sample of the active drag. Returns the element's new position.
    pub fn drag_to(&mut self, pointer: Point) -> Option<Point> {
        let container = self.container;
        let drag = self.drag.as_mut()?;
        let element = self.elements.iter_mut().find(|e| e.id == drag.id)?;

        element.position = drag.session.update(pointer, element.size, container);
        log::trace!(
            "drag {} to ({}, {})",
            element.id,
            element.position.x,
            element.position.y
        );
        Some(element.position)
    }

    /// Pointer went up. Returns which element the gesture was on and whether
    /// it was a tap or a drag.
    pub fn release(&mut self) -> Option<(ElementId, GestureOutcome)> {
        self.drag
            .take()
            .map(|drag| (drag.id, drag.session.finish()))
    }

    pub fn dragging(&self) -> Option<ElementId> {
        self.drag.map(|d| d.id)
    }

    // ------------------------------------------------------------------
    // Zoom
    // ------------------------------------------------------------------

    /// Stored zoom factor.
    pub fn scale_factor(&self) -> f32 {
        self.scale.factor()
    }

    /// Zoom factor on screen: the animated value while snapping back.
    pub fn displayed_scale(&self) -> f32 {
        self.snap_back
            .as_ref()
            .map_or(self.scale.factor(), SnapBack::current)
    }

    pub fn is_animating(&self) -> bool {
        self.snap_back.is_some()
    }

    /// A new pinch gesture started: a running snap-back is cancelled and the
    /// factor on screen becomes the stored factor.
    pub fn begin_pinch(&mut self) {
        if let Some(anim) = self.snap_back.take() {
            let shown = anim.cancel();
            self.scale.set(shown);
            log::debug!("snap-back cancelled at {}", shown);
        }
    }

    /// Apply one pinch sample. Starts a snap-back when the factor drops
    /// below natural size.
    pub fn pinch(&mut self, delta: f32) -> PinchOutcome {
        self.begin_pinch();
        let outcome = self.scale.apply(delta);
        if outcome.snap_back {
            self.snap_back = Some(SnapBack::new(
                outcome.factor,
                self.config.snap_back_duration(),
                self.config.overshoot_tension,
            ));
            log::debug!("snap-back started from {}", outcome.factor);
        }
        outcome
    }

    /// Advance the snap-back by one frame. `None` when nothing is animating.
    ///
    /// On the final frame the factor is stored as exactly 1.0 and the base
    /// image is re-fitted to the container.
    pub fn advance_animation(&mut self, dt: Duration) -> Option<SnapFrame> {
        let frame = self.snap_back.as_mut()?.advance(dt);
        if frame.finished {
            self.snap_back = None;
            self.scale.reset();
            self.relayout();
        }
        Some(frame)
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Compose the base image and all elements into one raster.
    pub fn flatten(&self) -> Result<DecodedImage, EditorError> {
        let mut layers = Vec::with_capacity(self.elements.len() + 1);
        if let (Some(base), Some(rect)) = (&self.base, self.displayed_base_rect()) {
            layers.push(Layer::new(base, rect));
        }
        layers.extend(
            self.elements
                .iter()
                .map(|e| Layer::new(e.content.raster(), e.placement())),
        );

        Ok(flatten(self.container, &layers, self.config.resize_filter)?)
    }

    /// Flatten and save as PNG into `dir`; returns the written path.
    ///
    /// Failures leave the editor untouched.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, EditorError> {
        let image = self.flatten()?;
        let path = save_png(
            &image,
            dir,
            &self.config.file_prefix,
            self.media_index.as_ref(),
        )?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::ComposeError;
    use crate::geometry::{FitPolicy, ScaleBounds};
    use crate::storage::ChannelMediaIndex;
    use crate::text::TextError;
    use std::sync::mpsc;

    /// Renders each character as a 10x20 block in the text color.
    struct BlockRasterizer;

    impl TextRasterizer for BlockRasterizer {
        fn rasterize(&self, text: &str, style: &TextStyle) -> DecodedImage {
            let width = (text.chars().count() as u32 * 10).max(1);
            let height = (style.font_size as u32).max(1);
            DecodedImage::filled(width, height, style.color)
        }
    }

    const RED: [u8; 4] = [255, 0, 0, 255];
    const GREEN: [u8; 4] = [0, 255, 0, 255];

    fn editor(width: f32, height: f32) -> PhotoEditor<BlockRasterizer> {
        let mut editor = PhotoEditor::new(EditorConfig::default(), BlockRasterizer);
        editor.set_container_size(Size::new(width, height));
        editor
    }

    #[test]
    fn test_base_image_fitted_and_centered() {
        let mut ed = editor(500.0, 500.0);
        ed.set_base_image(Some(DecodedImage::filled(2000, 1000, RED)));

        let rect = ed.base_placement().unwrap();
        assert_eq!(rect.size(), Size::new(500.0, 250.0));
        assert_eq!(rect.origin(), Point::new(0.0, 125.0));
    }

    #[test]
    fn test_base_image_refit_on_resize() {
        let mut ed = editor(500.0, 500.0);
        ed.set_base_image(Some(DecodedImage::filled(2000, 1000, RED)));
        ed.set_container_size(Size::new(1000.0, 1000.0));

        assert_eq!(ed.base_placement().unwrap().size(), Size::new(1000.0, 500.0));
    }

    #[test]
    fn test_undecodable_base_is_empty_state() {
        let mut ed = editor(100.0, 100.0);
        ed.set_base_image(Some(DecodedImage::filled(10, 10, RED)));

        assert!(!ed.set_base_image_bytes(b"garbage"));
        assert!(ed.base_image().is_none());
        assert!(ed.base_placement().is_none());

        // Still flattens: transparent canvas.
        let out = ed.flatten().unwrap();
        assert!(out.pixels.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_add_text_centered() {
        let mut ed = editor(1000.0, 800.0);
        let id = ed.add_text("hello"); // 50x18 block

        let element = ed.element(id).unwrap();
        assert_eq!(element.size(), Size::new(50.0, 18.0));
        assert_eq!(element.position(), Point::new(475.0, 391.0));
        assert_eq!(element.text().unwrap().text(), "hello");
    }

    #[test]
    fn test_add_image_fitted_within_base() {
        let mut ed = editor(1000.0, 1000.0);
        ed.set_base_image(Some(DecodedImage::filled(1000, 500, RED)));

        let id = ed.add_image(DecodedImage::filled(800, 800, GREEN)).unwrap();
        let element = ed.element(id).unwrap();

        // Base occupies 1000x500; overlay shrinks to fit its height.
        assert_eq!(element.size(), Size::new(500.0, 500.0));
        assert_eq!(element.position(), Point::new(250.0, 250.0));
    }

    #[test]
    fn test_add_image_without_base_uses_container() {
        let mut ed = editor(200.0, 100.0);
        let id = ed.add_image(DecodedImage::filled(400, 400, GREEN)).unwrap();
        assert_eq!(ed.element(id).unwrap().size(), Size::new(100.0, 100.0));
    }

    #[test]
    fn test_add_empty_image_rejected() {
        let mut ed = editor(200.0, 100.0);
        let result = ed.add_image(DecodedImage::new(0, 0, vec![]));
        assert!(matches!(result, Err(EditorError::Decode(_))));
        assert!(ed.elements().is_empty());
    }

    #[test]
    fn test_add_image_bytes_unreadable() {
        let mut ed = editor(200.0, 100.0);
        assert!(ed.add_image_bytes(&[1, 2, 3]).is_none());
        assert!(ed.elements().is_empty());
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut ed = editor(200.0, 200.0);
        let a = ed.add_text("a");
        let b = ed.add_text("b");
        ed.remove(a).unwrap();
        let c = ed.add_text("c");

        assert!(a < b && b < c);
        let order: Vec<_> = ed.elements().iter().map(Element::id).collect();
        assert_eq!(order, vec![b, c]);
    }

    #[test]
    fn test_remove_unknown() {
        let mut ed = editor(200.0, 200.0);
        assert!(matches!(
            ed.remove(ElementId(99)),
            Err(EditorError::UnknownElement(ElementId(99)))
        ));
    }

    #[test]
    fn test_set_text_resizes_but_keeps_position() {
        let mut ed = editor(1000.0, 800.0);
        let id = ed.add_text("hi");
        let before = ed.element(id).unwrap().position();

        ed.set_text(id, "a much longer label").unwrap();

        let element = ed.element(id).unwrap();
        assert_eq!(element.position(), before);
        assert_eq!(element.size().width, 190.0);
    }

    #[test]
    fn test_set_text_style() {
        let mut ed = editor(1000.0, 800.0);
        let id = ed.add_text("hi");
        let style = TextStyle {
            font_size: 30.0,
            color: RED,
            background: Some([255, 255, 255, 255]),
            ..TextStyle::default()
        };

        ed.set_text_style(id, style).unwrap();

        let element = ed.element(id).unwrap();
        assert_eq!(element.size().height, 30.0);
        assert_eq!(element.text().unwrap().style().color, RED);
    }

    #[test]
    fn test_out_of_range_style_rejected() {
        let mut ed = editor(1000.0, 800.0);
        let huge = TextStyle {
            padding: 1.0e9,
            ..TextStyle::default()
        };

        assert!(matches!(
            ed.add_text_with_style("hi", huge),
            Err(EditorError::Text(TextError::InvalidStyle(_)))
        ));
        assert!(ed.elements().is_empty());

        let id = ed.add_text_with_style("hi", TextStyle::default()).unwrap();
        let before = ed.element(id).unwrap().size();
        assert!(ed.set_text_style(id, huge).is_err());
        assert_eq!(ed.element(id).unwrap().size(), before);
    }

    #[test]
    fn test_set_text_on_image_rejected() {
        let mut ed = editor(100.0, 100.0);
        let id = ed.add_image(DecodedImage::filled(10, 10, RED)).unwrap();
        assert!(matches!(ed.set_text(id, "x"), Err(EditorError::NotText(_))));
    }

    #[test]
    fn test_drag_clamped_inside_container() {
        let mut ed = editor(1000.0, 800.0);
        let id = ed.add_image(DecodedImage::filled(100, 50, RED)).unwrap();
        assert_eq!(ed.element(id).unwrap().position(), Point::new(450.0, 375.0));

        ed.press(id, Point::new(460.0, 385.0)).unwrap();
        assert_eq!(ed.dragging(), Some(id));

        let pos = ed.drag_to(Point::new(2000.0, 2000.0)).unwrap();
        assert_eq!(pos, Point::new(900.0, 750.0));

        let pos = ed.drag_to(Point::new(-50.0, 100.0)).unwrap();
        assert_eq!(pos, Point::new(0.0, 90.0));

        assert_eq!(ed.release(), Some((id, GestureOutcome::Drag)));
        assert_eq!(ed.dragging(), None);
        assert_eq!(ed.drag_to(Point::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_press_release_is_tap() {
        let mut ed = editor(300.0, 300.0);
        let id = ed.add_text("tap");
        ed.press(id, Point::new(150.0, 150.0)).unwrap();
        assert_eq!(ed.release(), Some((id, GestureOutcome::Tap)));
        assert_eq!(ed.release(), None);
    }

    #[test]
    fn test_press_unknown_element() {
        let mut ed = editor(300.0, 300.0);
        assert!(ed.press(ElementId(5), Point::default()).is_err());
    }

    #[test]
    fn test_removing_dragged_element_ends_drag() {
        let mut ed = editor(300.0, 300.0);
        let id = ed.add_text("x");
        ed.press(id, Point::new(150.0, 150.0)).unwrap();
        ed.remove(id).unwrap();

        assert_eq!(ed.dragging(), None);
        assert_eq!(ed.drag_to(Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn test_element_at_prefers_topmost() {
        let mut ed = editor(100.0, 100.0);
        let bottom = ed.add_image(DecodedImage::filled(40, 40, RED)).unwrap();
        let top = ed.add_image(DecodedImage::filled(20, 20, GREEN)).unwrap();

        assert_eq!(ed.element_at(Point::new(50.0, 50.0)), Some(top));
        assert_eq!(ed.element_at(Point::new(31.0, 31.0)), Some(bottom));
        assert_eq!(ed.element_at(Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn test_pinch_zoom_in_has_no_animation() {
        let mut ed = editor(100.0, 100.0);
        let outcome = ed.pinch(2.0);

        assert_eq!(outcome.factor, 2.0);
        assert!(!ed.is_animating());
        assert_eq!(ed.displayed_scale(), 2.0);
    }

    #[test]
    fn test_pinch_below_natural_snaps_back() {
        let mut ed = editor(500.0, 500.0);
        ed.set_base_image(Some(DecodedImage::filled(2000, 1000, RED)));

        let outcome = ed.pinch(0.4);
        assert_eq!(outcome.factor, 0.5);
        assert!(outcome.snap_back);
        assert!(ed.is_animating());

        let mut last = None;
        while let Some(frame) = ed.advance_animation(Duration::from_millis(16)) {
            last = Some(frame);
        }

        let last = last.unwrap();
        assert!(last.finished);
        assert_eq!(last.factor, 1.0);
        assert_eq!(ed.scale_factor(), 1.0);
        assert!(!ed.is_animating());
        assert_eq!(ed.base_placement().unwrap().size(), Size::new(500.0, 250.0));
    }

    #[test]
    fn test_new_pinch_cancels_snap_back() {
        let mut ed = editor(500.0, 500.0);
        ed.pinch(0.6);
        let frame = ed.advance_animation(Duration::from_millis(100)).unwrap();
        assert!(!frame.finished);

        ed.begin_pinch();
        assert!(!ed.is_animating());
        let bounds = ed.config().scale_bounds;
        assert_eq!(ed.scale_factor(), bounds.clamp(frame.factor));
        assert_eq!(ed.advance_animation(Duration::from_millis(16)), None);
    }

    #[test]
    fn test_unit_minimum_never_animates() {
        let config = EditorConfig {
            scale_bounds: ScaleBounds::new(1.0, 3.0).unwrap(),
            ..EditorConfig::default()
        };
        let mut ed = PhotoEditor::new(config, BlockRasterizer);
        let outcome = ed.pinch(0.2);

        assert_eq!(outcome.factor, 1.0);
        assert!(!ed.is_animating());
    }

    #[test]
    fn test_fill_axis_policy_applies_to_base_and_overlays() {
        let config = EditorConfig {
            fit_policy: FitPolicy::FillAxis,
            ..EditorConfig::default()
        };
        let mut ed = PhotoEditor::new(config, BlockRasterizer);
        ed.set_container_size(Size::new(1000.0, 1000.0));
        ed.set_base_image(Some(DecodedImage::filled(200, 100, RED)));

        assert_eq!(ed.base_placement().unwrap().size(), Size::new(1000.0, 500.0));

        let id = ed.add_image(DecodedImage::filled(10, 10, GREEN)).unwrap();
        assert_eq!(ed.element(id).unwrap().size(), Size::new(500.0, 500.0));
    }

    #[test]
    fn test_flatten_zero_width_container() {
        let ed = editor(0.0, 100.0);
        assert!(matches!(
            ed.flatten(),
            Err(EditorError::Compose(ComposeError::InvalidState { .. }))
        ));
    }

    #[test]
    fn test_flatten_paints_base_then_elements() {
        let mut ed = editor(10.0, 10.0);
        ed.set_base_image(Some(DecodedImage::filled(10, 10, RED)));
        let id = ed.add_image(DecodedImage::filled(2, 2, GREEN)).unwrap();
        ed.press(id, Point::new(4.0, 4.0)).unwrap();
        ed.drag_to(Point::new(0.0, 0.0));
        ed.release();

        let out = ed.flatten().unwrap();
        assert_eq!((out.width, out.height), (10, 10));
        assert_eq!(out.pixel(0, 0), Some(GREEN));
        assert_eq!(out.pixel(1, 1), Some(GREEN));
        assert_eq!(out.pixel(5, 5), Some(RED));
    }

    #[test]
    fn test_flatten_includes_zoom() {
        let mut ed = editor(10.0, 10.0);
        ed.set_base_image(Some(DecodedImage::filled(4, 4, RED)));

        let before = ed.flatten().unwrap();
        assert_eq!(before.pixel(2, 2), Some([0, 0, 0, 0]));

        ed.pinch(2.5);
        let after = ed.flatten().unwrap();
        assert_eq!(after.pixel(2, 2), Some(RED));
    }

    #[test]
    fn test_flatten_oversized_container() {
        let ed = editor(9000.0, 100.0);
        assert!(matches!(
            ed.flatten(),
            Err(EditorError::Compose(ComposeError::CanvasTooLarge { .. }))
        ));
    }

    #[test]
    fn test_flatten_at_max_zoom_fills_container() {
        let mut ed = editor(400.0, 300.0);
        ed.set_base_image(Some(DecodedImage::filled(400, 300, RED)));
        ed.pinch(3.0);
        assert_eq!(
            ed.displayed_base_rect().unwrap(),
            Placement::new(Point::new(-400.0, -300.0), Size::new(1200.0, 900.0))
        );

        let out = ed.flatten().unwrap();
        assert_eq!((out.width, out.height), (400, 300));
        assert!(out.pixels.chunks(4).all(|px| px == RED));
    }

    #[test]
    fn test_save_writes_png_and_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel();
        let mut ed = PhotoEditor::new(EditorConfig::default(), BlockRasterizer)
            .with_media_index(Box::new(ChannelMediaIndex::new(tx)));
        ed.set_container_size(Size::new(20.0, 10.0));
        ed.set_base_image(Some(DecodedImage::filled(20, 10, RED)));

        let path = ed.save(dir.path()).unwrap();

        assert!(path.exists());
        assert_eq!(rx.recv().unwrap(), path);
        let written = crate::decode::decode_image(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!((written.width, written.height), (20, 10));
    }

    #[test]
    fn test_failed_save_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let mut ed = editor(20.0, 10.0);
        let id = ed.add_text("a");
        let before = ed.element(id).unwrap().clone();

        assert!(matches!(ed.save(&blocker), Err(EditorError::Save(_))));
        assert_eq!(ed.element(id).unwrap(), &before);
    }
}
