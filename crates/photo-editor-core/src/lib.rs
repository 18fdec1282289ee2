//! Photo Editor Core - interaction model of a single-image photo editor
//!
//! This crate holds everything a photo editing screen needs apart from the
//! drawing surface itself: fitting the base image into its container, pinch
//! zoom with a snap-back animation, draggable text and image overlays kept
//! inside the container, flattening everything into one raster, and saving
//! the result as a PNG.
//!
//! The host UI owns the event loop and forwards pointer samples, pinch deltas
//! and frame ticks to a [`PhotoEditor`].

pub mod animation;
pub mod compose;
pub mod config;
pub mod decode;
pub mod editor;
pub mod element;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod storage;
pub mod text;

pub use animation::{SnapBack, SnapFrame};
pub use compose::{flatten, ComposeError, Layer};
pub use config::EditorConfig;
pub use decode::{
    decode_image, load_image, DecodeError, DecodedImage, FilterType, MAX_RASTER_SIDE,
};
pub use editor::PhotoEditor;
pub use element::{Element, ElementContent, ElementId, TextLabel};
pub use encode::{encode_image_png, encode_png, EncodeError};
pub use error::EditorError;
pub use geometry::{
    apply_pinch, clamp_position, fit, DragSession, FitPolicy, GestureOutcome, InvalidScaleBounds,
    PinchOutcome, Placement, Point, ScaleBounds, ScaleState, Size,
};
pub use storage::{save_png, ChannelMediaIndex, MediaIndex, MediaIndexError, NoopMediaIndex};
pub use text::{GlyphRasterizer, TextError, TextRasterizer, TextStyle};
