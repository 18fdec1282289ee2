//! Decoding of image content handed over by the host (JPEG or PNG bytes).

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, DecodedImage};

/// Decode image bytes, applying EXIF orientation correction.
///
/// The format is sniffed from the content; the result is always RGBA8.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be recognized.
/// Returns `DecodeError::CorruptedFile` if the data is truncated or corrupted.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let orientation = exif_orientation(bytes);
    let img = decode_dynamic(bytes)?;
    let oriented = orient(img, orientation);
    Ok(DecodedImage::from_rgba_image(oriented.into_rgba8()))
}

/// Decode image bytes, treating any failure as "no image".
///
/// An absent image is a valid, displayable empty state for the editor, so the
/// error is logged rather than returned.
pub fn load_image(bytes: &[u8]) -> Option<DecodedImage> {
    match decode_image(bytes) {
        Ok(img) if !img.is_empty() => Some(img),
        Ok(_) => {
            log::warn!("decoded image is empty, treating as absent");
            None
        }
        Err(e) => {
            log::warn!("failed to decode image ({} bytes): {}", bytes.len(), e);
            None
        }
    }
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

/// EXIF orientation tag (1-8); 1 when absent or unreadable.
fn exif_orientation(bytes: &[u8]) -> u32 {
    Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .unwrap_or(1)
}

/// Bring a camera photo upright according to its orientation tag.
fn orient(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}
