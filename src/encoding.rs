//! Canvas export: raster encoding, data URLs, and file output.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};
use tiny_skia::Pixmap;

/// Default quality for lossy encodings, matching the canvas export default.
pub const DEFAULT_JPEG_QUALITY: f32 = 0.92;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    /// Accepts short names and MIME types; `None` for anything else.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "png" | "image/png" => Some(Self::Png),
            "jpg" | "jpeg" | "image/jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    fn from_extension(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("jpg") | Some("jpeg") => Self::Jpeg,
            _ => Self::Png,
        }
    }
}

/// Demultiply the canvas back into straight-alpha RGBA8 for encoding.
pub fn rgba8_from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let straight = src.demultiply();
        dst.0 = [
            straight.red(),
            straight.green(),
            straight.blue(),
            straight.alpha(),
        ];
    }
    image
}

/// Encode the canvas into the given format. `quality` is only consulted for
/// lossy encodings and is clamped to [0, 1].
pub fn encode(pixmap: &Pixmap, format: ExportFormat, quality: f32) -> Result<Vec<u8>> {
    let rgba = rgba8_from_pixmap(pixmap);
    let mut buffer = Vec::new();

    match format {
        ExportFormat::Png => {
            PngEncoder::new(Cursor::new(&mut buffer))
                .write_image(
                    rgba.as_raw(),
                    rgba.width(),
                    rgba.height(),
                    ExtendedColorType::Rgba8,
                )
                .context("failed to encode png")?;
        }
        ExportFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();
            let quality = (quality.clamp(0.0, 1.0) * 100.0).round() as u8;
            JpegEncoder::new_with_quality(Cursor::new(&mut buffer), quality.max(1))
                .write_image(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ExtendedColorType::Rgb8,
                )
                .context("failed to encode jpeg")?;
        }
    }

    Ok(buffer)
}

/// Encode as a `data:<mime>;base64,...` URL.
pub fn data_url(pixmap: &Pixmap, format: ExportFormat, quality: f32) -> Result<String> {
    let bytes = encode(pixmap, format, quality)?;
    Ok(format!(
        "data:{};base64,{}",
        format.mime_type(),
        BASE64_STANDARD.encode(bytes)
    ))
}

/// File-save counterpart of the browser download path. The format follows
/// the file extension, defaulting to png.
pub fn write_image(pixmap: &Pixmap, path: &Path) -> Result<()> {
    let format = ExportFormat::from_extension(path);
    let bytes = encode(pixmap, format, DEFAULT_JPEG_QUALITY)?;
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}
