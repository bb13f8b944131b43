//! Rectangle math for layer placement and overlap reporting.
//!
//! All coordinates are canvas pixels. Rectangles are axis-aligned; negative
//! extents are tolerated everywhere and treated as zero-area at use sites.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Multiply every component by `factor`, keeping the rect anchored to
    /// the same logical point on the base image.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Edge-based AABB test: two rects intersect unless one lies entirely
    /// to the left, right, above or below the other.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.x + self.width < other.x
            || other.x + other.width < self.x
            || self.y + self.height < other.y
            || other.y + other.height < self.y)
    }

    /// Area of the intersection, with each axis extent clamped to >= 0.
    pub fn overlap_area(&self, other: &Rect) -> f32 {
        let x_overlap = ((self.x + self.width).min(other.x + other.width)
            - self.x.max(other.x))
        .max(0.0);
        let y_overlap = ((self.y + self.height).min(other.y + other.height)
            - self.y.max(other.y))
        .max(0.0);
        x_overlap * y_overlap
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}
