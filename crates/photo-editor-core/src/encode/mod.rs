//! Image encoding for export.
//!
//! The flattened editor output is always written as a lossless RGBA PNG.
//!
//! # Examples
//!
//! ```ignore
//! use photo_editor_core::encode::encode_png;
//!
//! let pixels = vec![128u8; 100 * 100 * 4]; // Gray, half transparent
//! let png_bytes = encode_png(&pixels, 100, 100).unwrap();
//! println!("Encoded {} bytes", png_bytes.len());
//! ```

mod png;

pub use png::{encode_image_png, encode_png, EncodeError};
