//! Rasterization of text labels.
//!
//! A text label's on-screen content is a raster produced from its text and
//! style. The editor only depends on the [`TextRasterizer`] trait; the
//! [`GlyphRasterizer`] implementation renders with `ab_glyph` from font bytes
//! supplied by the host.

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, PxScaleFont, ScaleFont};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{DecodedImage, BYTES_PER_PIXEL, MAX_RASTER_SIDE};

/// Largest accepted `TextStyle::font_size`, in pixels.
pub const MAX_FONT_SIZE: f32 = 512.0;

/// Largest accepted `TextStyle::padding`, in pixels.
pub const MAX_PADDING: f32 = 512.0;

/// Errors raised while preparing text rendering.
#[derive(Debug, Error)]
pub enum TextError {
    /// The supplied bytes are not a usable TrueType/OpenType font.
    #[error("Invalid font data")]
    InvalidFont,

    /// A style value is out of range.
    #[error("Invalid text style: {0}")]
    InvalidStyle(&'static str),
}

/// Visual style of a text label.
///
/// Deserialization applies [`TextStyle::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTextStyle")]
pub struct TextStyle {
    /// Glyph height in pixels, `1..=MAX_FONT_SIZE`.
    pub font_size: f32,
    /// Text color, RGBA.
    pub color: [u8; 4],
    /// Fill behind the text, RGBA; `None` leaves it transparent.
    pub background: Option<[u8; 4]>,
    /// Space between the text and the label's edge, `0..=MAX_PADDING` pixels.
    pub padding: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 18.0,
            color: [0, 0, 0, 255],
            background: None,
            padding: 8.0,
        }
    }
}

impl TextStyle {
    pub fn validate(&self) -> Result<(), TextError> {
        if !(self.font_size.is_finite() && (1.0..=MAX_FONT_SIZE).contains(&self.font_size)) {
            return Err(TextError::InvalidStyle("font_size must be between 1 and 512"));
        }
        if !(self.padding.is_finite() && (0.0..=MAX_PADDING).contains(&self.padding)) {
            return Err(TextError::InvalidStyle("padding must be between 0 and 512"));
        }
        Ok(())
    }

    /// Copy with sizes forced into range; NaN falls back to the default.
    fn clamped(&self) -> Self {
        let defaults = Self::default();
        let font_size = if self.font_size.is_nan() {
            defaults.font_size
        } else {
            self.font_size.clamp(1.0, MAX_FONT_SIZE)
        };
        let padding = if self.padding.is_nan() {
            defaults.padding
        } else {
            self.padding.clamp(0.0, MAX_PADDING)
        };
        Self {
            font_size,
            padding,
            ..*self
        }
    }
}

/// Wire form of `TextStyle`; missing fields take their defaults.
#[derive(Deserialize)]
#[serde(default)]
struct RawTextStyle {
    font_size: f32,
    color: [u8; 4],
    background: Option<[u8; 4]>,
    padding: f32,
}

impl Default for RawTextStyle {
    fn default() -> Self {
        let style = TextStyle::default();
        Self {
            font_size: style.font_size,
            color: style.color,
            background: style.background,
            padding: style.padding,
        }
    }
}

impl TryFrom<RawTextStyle> for TextStyle {
    type Error = TextError;

    fn try_from(raw: RawTextStyle) -> Result<Self, Self::Error> {
        let style = Self {
            font_size: raw.font_size,
            color: raw.color,
            background: raw.background,
            padding: raw.padding,
        };
        style.validate()?;
        Ok(style)
    }
}

/// Turns a text label into pixels.
pub trait TextRasterizer {
    /// Render `text` with `style`. The returned image's size is the label's size.
    fn rasterize(&self, text: &str, style: &TextStyle) -> DecodedImage;
}

/// Text rasterizer backed by an `ab_glyph` font.
///
/// Lines are split on `\n` and centered horizontally. Out-of-range sizes are
/// clamped, and a raster never exceeds `MAX_RASTER_SIDE` on either side;
/// glyphs past that edge are cut off.
#[derive(Clone)]
pub struct GlyphRasterizer {
    font: FontArc,
}

impl GlyphRasterizer {
    /// Load a TrueType/OpenType font from its raw bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, TextError> {
        let font = FontArc::try_from_vec(bytes).map_err(|_| TextError::InvalidFont)?;
        Ok(Self { font })
    }

    pub fn from_font(font: FontArc) -> Self {
        Self { font }
    }

    fn line_width(scaled: &PxScaleFont<&FontArc>, line: &str) -> f32 {
        let mut width = 0.0;
        let mut previous: Option<GlyphId> = None;
        for c in line.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        width
    }
}

impl TextRasterizer for GlyphRasterizer {
    fn rasterize(&self, text: &str, style: &TextStyle) -> DecodedImage {
        let style = &style.clamped();
        let scaled = self.font.as_scaled(PxScale::from(style.font_size));
        let lines: Vec<&str> = text.split('\n').collect();

        let line_height = scaled.ascent() - scaled.descent() + scaled.line_gap();
        let padding = style.padding;
        let line_widths: Vec<f32> = lines
            .iter()
            .map(|line| Self::line_width(&scaled, line))
            .collect();
        let text_width = line_widths.iter().copied().fold(0.0f32, f32::max);
        let text_height = line_height * lines.len() as f32;

        let width = raster_side(text_width + padding * 2.0);
        let height = raster_side(text_height + padding * 2.0);
        let mut canvas = Canvas::new(width, height, style.background.unwrap_or([0, 0, 0, 0]));

        for (row, (line, line_width)) in lines.iter().zip(&line_widths).enumerate() {
            let baseline = padding + scaled.ascent() + line_height * row as f32;
            let mut caret = padding + (text_width - line_width) / 2.0;
            let mut previous: Option<GlyphId> = None;

            for c in line.chars() {
                let id = scaled.glyph_id(c);
                if let Some(prev) = previous {
                    caret += scaled.kern(prev, id);
                }
                let glyph = id.with_scale_and_position(scaled.scale(), point(caret, baseline));
                caret += scaled.h_advance(id);
                previous = Some(id);

                if let Some(outlined) = self.font.outline_glyph(glyph) {
                    let bounds = outlined.px_bounds();
                    outlined.draw(|gx, gy, coverage| {
                        let x = bounds.min.x as i64 + gx as i64;
                        let y = bounds.min.y as i64 + gy as i64;
                        canvas.blend(x, y, style.color, coverage);
                    });
                }
            }
        }

        canvas.into_image()
    }
}

/// Whole pixels needed for `extent`, within `1..=MAX_RASTER_SIDE`.
fn raster_side(extent: f32) -> u32 {
    (extent.ceil().min(MAX_RASTER_SIDE as f32) as u32).max(1)
}

/// Minimal RGBA target for glyph coverage.
struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    fn new(width: u32, height: u32, fill: [u8; 4]) -> Self {
        let image = DecodedImage::filled(width, height, fill);
        Self {
            width,
            height,
            pixels: image.pixels,
        }
    }

    /// Source-over blend of `color` scaled by glyph `coverage`.
    fn blend(&mut self, x: i64, y: i64, color: [u8; 4], coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let Some(dst) = self.pixels.get_mut(idx..idx + BYTES_PER_PIXEL) else {
            return;
        };

        let src_a = (color[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return;
        }

        for channel in 0..3 {
            let src = color[channel] as f32 / 255.0;
            let existing = dst[channel] as f32 / 255.0;
            let value = (src * src_a + existing * dst_a * (1.0 - src_a)) / out_a;
            dst[channel] = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
        dst[3] = (out_a.clamp(0.0, 1.0) * 255.0).round() as u8;
    }

    fn into_image(self) -> DecodedImage {
        DecodedImage::new(self.width, self.height, self.pixels)
    }
}
