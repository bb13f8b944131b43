//! Default placement presets for try-on item categories.
//!
//! Each category maps to a fractional rectangle of the base image, tuned for
//! a roughly centered standing figure. Callers can always override with an
//! explicit position; these are only the starting placements.

use serde::Deserialize;

use crate::geometry::{Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Top,
    Bottom,
    Shoes,
    Accessory,
}

impl ItemKind {
    /// Lenient tag parsing. Unrecognized tags yield `None`; callers that
    /// mirror the storefront behavior fall back to [`ItemKind::Top`].
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "shoes" => Some(Self::Shoes),
            "accessory" => Some(Self::Accessory),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Shoes => "shoes",
            Self::Accessory => "accessory",
        }
    }
}

/// Fractional placement rect for a known item kind on a base image of the
/// given size. Deterministic and side-effect free.
pub fn best_fit_position(kind: ItemKind, base: Size) -> Rect {
    let (fx, fy, fw, fh) = match kind {
        ItemKind::Top => (0.2, 0.15, 0.6, 0.3),
        ItemKind::Bottom => (0.2, 0.45, 0.6, 0.4),
        ItemKind::Shoes => (0.3, 0.85, 0.4, 0.15),
        ItemKind::Accessory => (0.4, 0.05, 0.2, 0.1),
    };
    Rect::new(
        base.width * fx,
        base.height * fy,
        base.width * fw,
        base.height * fh,
    )
}

/// Tag-based variant used by manifest items: unknown tags place like a top.
pub fn best_fit_position_for_tag(tag: &str, base: Size) -> Rect {
    let kind = ItemKind::parse(tag).unwrap_or(ItemKind::Top);
    best_fit_position(kind, base)
}
