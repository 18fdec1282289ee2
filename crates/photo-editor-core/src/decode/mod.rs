//! Image decoding pipeline.
//!
//! This module provides functionality for:
//! - Decoding JPEG and PNG content to RGBA pixels
//! - Correcting EXIF orientation of camera photos
//! - Resampling images to their on-screen size
//!
//! # Architecture
//!
//! All operations are synchronous. Hosts that cannot afford to block their UI
//! thread should decode on a worker and hand the `DecodedImage` back.
//!
//! # Examples
//!
//! ```ignore
//! use photo_editor_core::decode::load_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! match load_image(&bytes) {
//!     Some(image) => println!("Decoded {}x{} image", image.width, image.height),
//!     None => println!("No image"),
//! }
//! ```

mod resize;
mod source;
mod types;

pub use resize::resize;
pub use source::{decode_image, load_image};
pub use types::{DecodeError, DecodedImage, FilterType, BYTES_PER_PIXEL, MAX_RASTER_SIDE};
