//! Error type of the editor session.

use thiserror::Error;

use crate::compose::ComposeError;
use crate::decode::DecodeError;
use crate::element::ElementId;
use crate::storage::SaveError;
use crate::text::TextError;

#[derive(Debug, Error)]
pub enum EditorError {
    /// No element with this id is owned by the editor.
    #[error("Unknown element {0}")]
    UnknownElement(ElementId),

    /// The element exists but is not a text label.
    #[error("Element {0} is not a text label")]
    NotText(ElementId),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error(transparent)]
    Text(#[from] TextError),
}
