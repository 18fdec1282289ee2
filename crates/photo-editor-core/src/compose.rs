//! Flattening of the visible layers into one raster.
//!
//! Layers are painted in the order given (first = bottom), each resampled to
//! the rectangle it occupies on screen and alpha-blended source-over onto a
//! transparent buffer the size of the container. Only the part of a layer
//! that overlaps the container is resampled. The output depends only on the
//! arguments; nothing is cached between calls.

use image::imageops;
use image::RgbaImage;
use thiserror::Error;

use crate::decode::{DecodeError, DecodedImage, FilterType, MAX_RASTER_SIDE};
use crate::geometry::{Placement, Size};

/// Errors that can occur while flattening.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The container has no drawable area.
    #[error("Invalid state: container size {width}x{height} has no drawable area")]
    InvalidState { width: f32, height: f32 },

    /// The container is larger than any raster the editor allocates.
    #[error("Container size {width}x{height} exceeds the {max} px limit")]
    CanvasTooLarge { width: f32, height: f32, max: u32 },

    /// A layer's pixels could not be resampled.
    #[error("Layer could not be drawn: {0}")]
    Layer(#[from] DecodeError),
}

/// One visible layer: its pixels and where they are drawn.
#[derive(Debug, Clone, Copy)]
pub struct Layer<'a> {
    pub image: &'a DecodedImage,
    pub rect: Placement,
}

impl<'a> Layer<'a> {
    pub fn new(image: &'a DecodedImage, rect: Placement) -> Self {
        Self { image, rect }
    }
}

/// Compose `layers` bottom-to-top into a buffer the size of `container`.
///
/// Fractional container sizes are rounded up to whole pixels. Layers with an
/// empty rectangle or no pixels are skipped; layers partially outside the
/// container are clipped.
///
/// # Errors
///
/// Returns `ComposeError::InvalidState` if the container is zero-sized,
/// negative or not finite, and `ComposeError::CanvasTooLarge` if either side
/// rounds up past `MAX_RASTER_SIDE`.
pub fn flatten(
    container: Size,
    layers: &[Layer<'_>],
    filter: FilterType,
) -> Result<DecodedImage, ComposeError> {
    if container.is_empty() {
        return Err(ComposeError::InvalidState {
            width: container.width,
            height: container.height,
        });
    }
    let max = MAX_RASTER_SIDE as f32;
    if container.width.ceil() > max || container.height.ceil() > max {
        return Err(ComposeError::CanvasTooLarge {
            width: container.width,
            height: container.height,
            max: MAX_RASTER_SIDE,
        });
    }

    let width = container.width.ceil() as u32;
    let height = container.height.ceil() as u32;
    let mut canvas = RgbaImage::new(width, height);

    for layer in layers {
        if layer.image.is_empty() || layer.rect.size().is_empty() {
            continue;
        }

        let Some(source) = layer.image.to_rgba_image() else {
            return Err(ComposeError::Layer(DecodeError::CorruptedFile(
                "layer pixel buffer does not match its dimensions".to_string(),
            )));
        };

        let x = Span::resolve(
            layer.rect.x.round() as i64,
            (layer.rect.width.round() as u32).max(1),
            source.width(),
            width,
        );
        let y = Span::resolve(
            layer.rect.y.round() as i64,
            (layer.rect.height.round() as u32).max(1),
            source.height(),
            height,
        );
        let (Some(x), Some(y)) = (x, y) else {
            continue;
        };

        if x.overdraws() || y.overdraws() {
            let drawn = RgbaImage::from_fn(x.visible_len, y.visible_len, |dx, dy| {
                *source.get_pixel(x.nearest(dx), y.nearest(dy))
            });
            imageops::overlay(&mut canvas, &drawn, x.visible_start, y.visible_start);
        } else {
            let crop = imageops::crop_imm(&source, x.src_start, y.src_start, x.src_len, y.src_len)
                .to_image();
            let drawn = if crop.dimensions() == (x.dst_len, y.dst_len) {
                crop
            } else {
                imageops::resize(&crop, x.dst_len, y.dst_len, filter.to_image_filter())
            };
            imageops::overlay(&mut canvas, &drawn, x.dst_start, y.dst_start);
        }
    }

    Ok(DecodedImage::from_rgba_image(canvas))
}

/// Widest resampling kernel radius (Lanczos3), in output pixels.
const KERNEL_SUPPORT: f64 = 3.0;

/// How a layer's source pixels map onto the canvas along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    /// Top-left of the whole layer on the canvas.
    origin: i64,
    /// Source pixels per canvas pixel.
    step: f64,
    /// Source pixels that reach the canvas.
    src_start: u32,
    src_len: u32,
    /// Where those source pixels land once scaled; may start off-canvas.
    dst_start: i64,
    dst_len: u32,
    /// Canvas pixels covered by the layer.
    visible_start: i64,
    visible_len: u32,
}

impl Span {
    /// Map a layer drawn at `origin` with `len` canvas pixels from `source`
    /// pixels onto a canvas of `canvas` pixels. `None` if nothing is visible.
    fn resolve(origin: i64, len: u32, source: u32, canvas: u32) -> Option<Self> {
        if source == 0 {
            return None;
        }
        let lo = origin.max(0);
        let hi = origin.saturating_add(len as i64).min(canvas as i64);
        if hi <= lo {
            return None;
        }

        let step = source as f64 / len as f64;
        let first = (((lo - origin) as f64 * step).floor() as u32).min(source - 1);
        let last = (((hi - origin) as f64 * step).ceil() as u32).clamp(first + 1, source);
        // Keep the kernel's reach around the visible part so edge pixels
        // blend with the same neighbours as in a full resample.
        let margin = (KERNEL_SUPPORT * step.max(1.0)).ceil() as u32;
        let src_start = first.saturating_sub(margin);
        let src_end = last.saturating_add(margin).min(source);
        let dst_start = origin + (src_start as f64 / step).round() as i64;
        let dst_end = origin + (src_end as f64 / step).round() as i64;

        Some(Self {
            origin,
            step,
            src_start,
            src_len: src_end - src_start,
            dst_start,
            dst_len: (dst_end - dst_start).clamp(1, u32::MAX as i64) as u32,
            visible_start: lo,
            visible_len: (hi - lo) as u32,
        })
    }

    /// Source pixels are so large that resampling the crop would mostly
    /// produce off-canvas pixels.
    fn overdraws(&self) -> bool {
        let overhang = (self.dst_len as u64).saturating_sub(self.visible_len as u64);
        overhang > self.visible_len as u64 / 2 + 64
    }

    /// Source pixel under canvas pixel `visible_start + offset`.
    fn nearest(&self, offset: u32) -> u32 {
        let at = (self.visible_start + offset as i64 - self.origin) as f64 + 0.5;
        ((at * self.step).floor() as u32).clamp(self.src_start, self.src_start + self.src_len - 1)
    }
}
