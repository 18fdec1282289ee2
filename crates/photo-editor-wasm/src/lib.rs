//! Photo Editor WASM - WebAssembly bindings for the photo editor
//!
//! This crate exposes the photo-editor-core session and its stateless helpers
//! to JavaScript/TypeScript.
//!
//! # Module Structure
//!
//! - `editor` - `JsPhotoEditor`, the stateful editing session
//! - `geometry` - Stateless drag clamping, pinch and fit helpers
//! - `decode` - Image decoding and resizing
//! - `encode` - PNG encoding
//! - `types` - WASM-compatible wrapper types for image data
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsPhotoEditor, set_log_level } from '@photo-editor/wasm';
//!
//! await init();
//! set_log_level('debug');
//! const editor = new JsPhotoEditor(fontBytes, undefined);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod editor;
mod encode;
mod geometry;
mod types;

pub use decode::{decode_image, resize};
pub use editor::JsPhotoEditor;
pub use encode::{encode_png, encode_png_from_image};
pub use geometry::{apply_pinch, clamp_position, fit_size, JsPinchOutcome};
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
///
/// Panics are reported in the browser console, and `log` records go to the
/// console at `info` and above until `set_log_level` says otherwise.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // The logger accepts everything; the global max level does the filtering.
    wasm_logger::init(wasm_logger::Config::new(log::Level::Trace));
    log::set_max_level(log::LevelFilter::Info);
}

/// Set the console log level ("off", "error", "warn", "info", "debug", "trace").
///
/// Returns false for an unknown level.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> bool {
    match parse_level(level) {
        Some(filter) => {
            log::set_max_level(filter);
            true
        }
        None => false,
    }
}

fn parse_level(level: &str) -> Option<log::LevelFilter> {
    level.parse().ok()
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(log::LevelFilter::Debug));
        assert_eq!(parse_level("WARN"), Some(log::LevelFilter::Warn));
        assert_eq!(parse_level("off"), Some(log::LevelFilter::Off));
        assert_eq!(parse_level("loud"), None);
    }
}
