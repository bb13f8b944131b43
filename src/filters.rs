//! In-place pixel filters over the composited canvas.
//!
//! Grayscale and sepia are linear channel mixes, so they run directly on
//! the premultiplied buffer (results are clamped to the pixel's alpha to
//! keep the buffer well-formed). Contrast is affine around the midpoint and
//! must demultiply first. Filter kinds are parsed leniently from manifest
//! strings; unknown names are reported by the caller and skipped.

use tiny_skia::{ColorU8, Pixmap, PremultipliedColorU8};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterKind {
    Grayscale,
    Sepia,
    Brightness,
    Contrast,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Filter {
    pub kind: FilterKind,
    /// Strength for brightness/contrast. Ignored by grayscale and sepia.
    pub value: f32,
}

impl Filter {
    pub fn new(kind: FilterKind) -> Self {
        Self { kind, value: 1.0 }
    }

    pub fn with_value(kind: FilterKind, value: f32) -> Self {
        Self { kind, value }
    }
}

/// Parse a manifest filter spec: `grayscale`, `sepia`, `brightness=1.2`,
/// `contrast=0.8`. Returns `None` for unknown names or unparsable values.
pub fn parse_filter(spec: &str) -> Option<Filter> {
    let trimmed = spec.trim();
    let (name, value) = match trimmed.split_once('=') {
        Some((name, raw)) => (name.trim(), Some(raw.trim().parse::<f32>().ok()?)),
        None => (trimmed, None),
    };

    let kind = match name.to_ascii_lowercase().as_str() {
        "grayscale" | "greyscale" => FilterKind::Grayscale,
        "sepia" => FilterKind::Sepia,
        "brightness" => FilterKind::Brightness,
        "contrast" => FilterKind::Contrast,
        _ => return None,
    };

    Some(Filter {
        kind,
        value: value.unwrap_or(1.0),
    })
}

pub fn apply(pixmap: &mut Pixmap, filter: Filter) {
    match filter.kind {
        FilterKind::Grayscale => grayscale(pixmap),
        FilterKind::Sepia => sepia(pixmap),
        FilterKind::Brightness => brightness(pixmap, filter.value),
        FilterKind::Contrast => contrast(pixmap, filter.value),
    }
}

fn grayscale(pixmap: &mut Pixmap) {
    for pixel in pixmap.pixels_mut() {
        let (r, g, b, a) = (
            pixel.red() as f32,
            pixel.green() as f32,
            pixel.blue() as f32,
            pixel.alpha(),
        );
        let luma = (0.299 * r + 0.587 * g + 0.114 * b).round().min(a as f32) as u8;
        *pixel = PremultipliedColorU8::from_rgba(luma, luma, luma, a).unwrap_or(*pixel);
    }
}

fn sepia(pixmap: &mut Pixmap) {
    for pixel in pixmap.pixels_mut() {
        let (r, g, b, a) = (
            pixel.red() as f32,
            pixel.green() as f32,
            pixel.blue() as f32,
            pixel.alpha(),
        );
        let max = a as f32;
        let new_r = (0.393 * r + 0.769 * g + 0.189 * b).min(max) as u8;
        let new_g = (0.349 * r + 0.686 * g + 0.168 * b).min(max) as u8;
        let new_b = (0.272 * r + 0.534 * g + 0.131 * b).min(max) as u8;
        *pixel = PremultipliedColorU8::from_rgba(new_r, new_g, new_b, a).unwrap_or(*pixel);
    }
}

fn brightness(pixmap: &mut Pixmap, value: f32) {
    let value = value.max(0.0);
    for pixel in pixmap.pixels_mut() {
        let a = pixel.alpha();
        let max = a as f32;
        let scale = |channel: u8| (channel as f32 * value).min(max) as u8;
        *pixel = PremultipliedColorU8::from_rgba(
            scale(pixel.red()),
            scale(pixel.green()),
            scale(pixel.blue()),
            a,
        )
        .unwrap_or(*pixel);
    }
}

fn contrast(pixmap: &mut Pixmap, value: f32) {
    let value = value.max(0.0);
    for pixel in pixmap.pixels_mut() {
        let straight = pixel.demultiply();
        let adjust =
            |channel: u8| ((channel as f32 - 128.0) * value + 128.0).clamp(0.0, 255.0) as u8;
        *pixel = ColorU8::from_rgba(
            adjust(straight.red()),
            adjust(straight.green()),
            adjust(straight.blue()),
            straight.alpha(),
        )
        .premultiply();
    }
}
