//! Image encoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { encode_png_from_image } from '@photo-editor/wasm';
//!
//! const png = encode_png_from_image(image);
//! await writable.write(new Blob([png], { type: 'image/png' }));
//! ```

use crate::types::JsDecodedImage;
use photo_editor_core::encode;
use wasm_bindgen::prelude::*;

/// Encode RGBA pixel data to PNG bytes.
///
/// # Errors
///
/// Returns an error if:
/// - The pixel data length doesn't match width * height * 4
/// - Width or height is zero
#[wasm_bindgen]
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(pixels, width, height).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode a JsDecodedImage to PNG bytes.
#[wasm_bindgen]
pub fn encode_png_from_image(image: &JsDecodedImage) -> Result<Vec<u8>, JsValue> {
    encode::encode_image_png(&image.to_decoded()).map_err(|e| JsValue::from_str(&e.to_string()))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_encode_png_basic() {
        let png = encode_png(&vec![128u8; 20 * 20 * 4], 20, 20).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[wasm_bindgen_test]
    fn test_encode_png_invalid_pixel_data() {
        assert!(encode_png(&vec![0u8; 10], 20, 20).is_err());
    }

    #[wasm_bindgen_test]
    fn test_encode_png_from_image() {
        let img = JsDecodedImage::new(5, 5, vec![1u8; 5 * 5 * 4]);
        assert!(encode_png_from_image(&img).is_ok());
    }
}
