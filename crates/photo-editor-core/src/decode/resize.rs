//! Resampling of decoded images to their on-screen size.
//!
//! The source image is never modified; a new buffer is returned.

use super::{DecodeError, DecodedImage, FilterType};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either target dimension is zero.
/// Returns `DecodeError::CorruptedFile` if the pixel buffer does not match the
/// image dimensions.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgba = image.to_rgba_image().ok_or_else(|| {
        DecodeError::CorruptedFile("pixel buffer does not match dimensions".to_string())
    })?;

    let resized = image::imageops::resize(&rgba, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgba_image(resized))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8);
                pixels.push(((y * 255) / height.max(1)) as u8);
                pixels.push(128);
                pixels.push(255);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_resize_basic() {
        let img = gradient(100, 50);
        let resized = resize(&img, 50, 25, FilterType::Bilinear).unwrap();

        assert_eq!(resized.width, 50);
        assert_eq!(resized.height, 25);
        assert_eq!(resized.pixels.len(), 50 * 25 * 4);
    }

    #[test]
    fn test_resize_same_dimensions_is_identity() {
        let img = gradient(100, 50);
        let resized = resize(&img, 100, 50, FilterType::Lanczos3).unwrap();
        assert_eq!(resized, img);
    }

    #[test]
    fn test_resize_zero_dimensions_error() {
        let img = gradient(100, 50);

        assert!(matches!(
            resize(&img, 0, 50, FilterType::Bilinear),
            Err(DecodeError::InvalidDimensions { .. })
        ));
        assert!(resize(&img, 50, 0, FilterType::Bilinear).is_err());
    }

    #[test]
    fn test_resize_mismatched_buffer() {
        let img = DecodedImage {
            width: 10,
            height: 10,
            pixels: vec![0u8; 12],
        };
        assert!(matches!(
            resize(&img, 5, 5, FilterType::Nearest),
            Err(DecodeError::CorruptedFile(_))
        ));
    }

    #[test]
    fn test_all_filter_types() {
        let img = gradient(100, 50);

        for filter in [
            FilterType::Nearest,
            FilterType::Bilinear,
            FilterType::Lanczos3,
        ] {
            let resized = resize(&img, 50, 25, filter).unwrap();
            assert_eq!(resized.width, 50);
            assert_eq!(resized.height, 25);
        }
    }
}
