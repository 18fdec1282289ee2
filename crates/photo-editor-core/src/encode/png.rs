//! Lossless PNG encoding of the flattened output.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use thiserror::Error;

use crate::decode::{DecodedImage, BYTES_PER_PIXEL};

/// Errors that can occur during PNG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode RGBA pixel data to PNG bytes.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Example
///
/// ```
/// use photo_editor_core::encode::encode_png;
///
/// let pixels = vec![128u8; 10 * 10 * 4];
/// let png = encode_png(&pixels, 10, 10).unwrap();
/// assert_eq!(&png[1..4], b"PNG");
/// ```
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = width as usize * height as usize * BYTES_PER_PIXEL;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}

/// Encode a decoded image to PNG bytes.
pub fn encode_image_png(image: &DecodedImage) -> Result<Vec<u8>, EncodeError> {
    encode_png(&image.pixels, image.width, image.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_image;

    const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_png_basic() {
        let pixels = vec![128u8; 100 * 100 * 4];
        let png = encode_png(&pixels, 100, 100).unwrap();
        assert_eq!(&png[0..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_encode_png_is_lossless() {
        let mut pixels = Vec::with_capacity(16 * 8 * 4);
        for y in 0..8u32 {
            for x in 0..16u32 {
                pixels.extend_from_slice(&[(x * 16) as u8, (y * 32) as u8, 7, (x * y) as u8]);
            }
        }
        let original = DecodedImage::new(16, 8, pixels);

        let png = encode_image_png(&original).unwrap();
        let decoded = decode_image(&png).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_encode_png_invalid_pixel_data() {
        let short = vec![0u8; 99 * 100 * 4];
        assert!(matches!(
            encode_png(&short, 100, 100),
            Err(EncodeError::InvalidPixelData { .. })
        ));

        // RGB-sized buffer is rejected
        let rgb = vec![0u8; 10 * 10 * 3];
        assert!(matches!(
            encode_png(&rgb, 10, 10),
            Err(EncodeError::InvalidPixelData {
                expected: 400,
                actual: 300
            })
        ));
    }

    #[test]
    fn test_encode_png_zero_dimensions() {
        assert!(matches!(
            encode_png(&[], 0, 100),
            Err(EncodeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            encode_png(&[], 100, 0),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_encode_png_single_pixel() {
        let png = encode_png(&[255, 0, 0, 255], 1, 1).unwrap();
        assert_eq!(&png[0..8], &PNG_SIGNATURE);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
