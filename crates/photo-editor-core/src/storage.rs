//! Writing the flattened image to disk and announcing it to the media index.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::decode::DecodedImage;
use crate::encode::{encode_image_png, EncodeError};

/// Default output file name prefix.
pub const DEFAULT_FILE_PREFIX: &str = "photo_editor_image_";

/// Names tried for one timestamp before a save gives up.
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Errors that can occur while saving.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Registers new files with the platform's media index.
///
/// Registration is fire-and-forget: the save has already succeeded when it
/// runs and its outcome is never reported back to the caller.
pub trait MediaIndex {
    fn register(&self, path: &Path) -> Result<(), MediaIndexError>;
}

/// Failure reported by a media index; only ever logged.
#[derive(Debug, Error)]
#[error("Media index registration failed: {0}")]
pub struct MediaIndexError(pub String);

/// Media index that ignores every file.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMediaIndex;

impl MediaIndex for NoopMediaIndex {
    fn register(&self, _path: &Path) -> Result<(), MediaIndexError> {
        Ok(())
    }
}

/// Media index that forwards saved paths over a channel.
///
/// The receiving end may live on any thread; a dropped receiver is reported
/// as an error and ignored by the save.
#[derive(Debug, Clone)]
pub struct ChannelMediaIndex {
    sender: Sender<PathBuf>,
}

impl ChannelMediaIndex {
    pub fn new(sender: Sender<PathBuf>) -> Self {
        Self { sender }
    }
}

impl MediaIndex for ChannelMediaIndex {
    fn register(&self, path: &Path) -> Result<(), MediaIndexError> {
        self.sender
            .send(path.to_path_buf())
            .map_err(|e| MediaIndexError(e.to_string()))
    }
}

/// Output file name for a save at `millis` since the Unix epoch.
///
/// # Example
///
/// ```
/// use photo_editor_core::storage::output_file_name;
///
/// assert_eq!(
///     output_file_name("photo_editor_image_", 1700000000123),
///     "photo_editor_image_1700000000123.png"
/// );
/// ```
pub fn output_file_name(prefix: &str, millis: u128) -> String {
    format!("{prefix}{millis}.png")
}

/// Milliseconds since the Unix epoch; 0 if the clock is before it.
pub fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Encode `image` as PNG into `dir` and return the written path.
///
/// The directory is created if missing. Existing files are never replaced:
/// when the timestamped name is taken, `_1`, `_2`, ... is appended before the
/// extension. After a successful write the path is handed to `media_index`;
/// a registration failure is logged and does not fail the save.
pub fn save_png(
    image: &DecodedImage,
    dir: &Path,
    prefix: &str,
    media_index: &dyn MediaIndex,
) -> Result<PathBuf, SaveError> {
    save_png_at(image, dir, prefix, unix_millis(), media_index)
}

fn save_png_at(
    image: &DecodedImage,
    dir: &Path,
    prefix: &str,
    millis: u128,
    media_index: &dyn MediaIndex,
) -> Result<PathBuf, SaveError> {
    let bytes = encode_image_png(image)?;

    fs::create_dir_all(dir).map_err(|source| SaveError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let (path, mut file) = create_unique(dir, prefix, millis)?;
    if let Err(source) = file.write_all(&bytes) {
        drop(file);
        if let Err(e) = fs::remove_file(&path) {
            log::warn!("could not remove partial file {}: {}", path.display(), e);
        }
        return Err(SaveError::Io { path, source });
    }

    log::debug!(
        "saved {}x{} image ({} bytes) to {}",
        image.width,
        image.height,
        bytes.len(),
        path.display()
    );

    if let Err(e) = media_index.register(&path) {
        log::warn!("{} ({})", e, path.display());
    }

    Ok(path)
}

/// Create a new file for `millis`, numbering the name if it is taken.
fn create_unique(
    dir: &Path,
    prefix: &str,
    millis: u128,
) -> Result<(PathBuf, fs::File), SaveError> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let name = match attempt {
            0 => output_file_name(prefix, millis),
            n => format!("{prefix}{millis}_{n}.png"),
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(source) => return Err(SaveError::Io { path, source }),
        }
    }

    Err(SaveError::Io {
        path: dir.join(output_file_name(prefix, millis)),
        source: io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{MAX_NAME_ATTEMPTS} file names already taken"),
        ),
    })
}
