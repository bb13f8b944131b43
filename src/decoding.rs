//! Image source decoding.
//!
//! Sources are filesystem paths (png/jpeg/webp). Decode failures surface as
//! [`LoadError`] carrying the source reference and the underlying cause;
//! they are never retried here, the caller decides.

use std::fmt;
use std::path::Path;

use image::{ImageReader, RgbaImage};
use tiny_skia::{ColorU8, Pixmap};

#[derive(Debug)]
pub struct LoadError {
    source_ref: String,
    cause: LoadErrorCause,
}

#[derive(Debug)]
pub enum LoadErrorCause {
    Io(std::io::Error),
    Decode(image::ImageError),
    EmptyImage,
}

impl LoadError {
    fn new(source: &Path, cause: LoadErrorCause) -> Self {
        Self {
            source_ref: source.display().to_string(),
            cause,
        }
    }

    /// The source reference the failed load was asked to decode.
    pub fn source_ref(&self) -> &str {
        &self.source_ref
    }

    pub fn cause(&self) -> &LoadErrorCause {
        &self.cause
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            LoadErrorCause::Io(error) => {
                write!(f, "failed to read image {}: {error}", self.source_ref)
            }
            LoadErrorCause::Decode(error) => {
                write!(f, "failed to decode image {}: {error}", self.source_ref)
            }
            LoadErrorCause::EmptyImage => {
                write!(f, "image {} has zero-sized dimensions", self.source_ref)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            LoadErrorCause::Io(error) => Some(error),
            LoadErrorCause::Decode(error) => Some(error),
            LoadErrorCause::EmptyImage => None,
        }
    }
}

/// Decode an image file into a premultiplied pixmap ready for compositing.
pub fn load_image(path: &Path) -> Result<Pixmap, LoadError> {
    let reader = ImageReader::open(path)
        .map_err(|error| LoadError::new(path, LoadErrorCause::Io(error)))?;
    let decoded = reader
        .decode()
        .map_err(|error| LoadError::new(path, LoadErrorCause::Decode(error)))?;
    let rgba = decoded.to_rgba8();
    pixmap_from_rgba8(&rgba).ok_or_else(|| LoadError::new(path, LoadErrorCause::EmptyImage))
}

/// Convert straight-alpha RGBA8 into a premultiplied pixmap. `None` when
/// either dimension is zero.
pub fn pixmap_from_rgba8(image: &RgbaImage) -> Option<Pixmap> {
    let (width, height) = image.dimensions();
    let mut pixmap = Pixmap::new(width, height)?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}
