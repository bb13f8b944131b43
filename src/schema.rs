//! Scene manifest schema.
//!
//! A scene is a viewport, an optional base image, the overlay items to try
//! on, and a list of canvas filters applied after compositing. Field-level
//! validation lives here; path resolution against the manifest location is
//! the loader's job.

use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::Deserialize;

use crate::compositor::BlendMode;
use crate::geometry::Rect;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneManifest {
    pub viewport: Viewport,
    #[serde(default)]
    pub base_image: Option<PathBuf>,
    #[serde(default)]
    pub items: Vec<SceneItem>,
    /// Filter specs such as `grayscale` or `brightness=1.2`. Unknown names
    /// warn and are skipped at compose time rather than failing validation,
    /// so manifests stay portable across versions.
    #[serde(default)]
    pub filters: Vec<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneItem {
    pub source: PathBuf,
    /// Category tag (top/bottom/shoes/accessory) used for best-fit
    /// placement when no explicit position is given. Unrecognized tags
    /// place like a top.
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub position: Option<Rect>,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub blend_mode: BlendMode,
    #[serde(default)]
    pub rotation_degrees: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_opacity() -> f32 {
    1.0
}

fn default_scale() -> f32 {
    1.0
}

impl SceneManifest {
    pub fn validate(&self) -> Result<()> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            bail!(
                "viewport must be positive, got {}x{}",
                self.viewport.width,
                self.viewport.height
            );
        }

        if self.base_image.is_none() && self.items.is_empty() {
            bail!("scene must define a base_image or at least one item");
        }

        for (index, item) in self.items.iter().enumerate() {
            item.validate()
                .map_err(|error| anyhow::anyhow!("item #{index}: {error}"))?;
        }

        Ok(())
    }
}

impl SceneItem {
    fn validate(&self) -> Result<()> {
        if self.source.as_os_str().is_empty() {
            bail!("source path cannot be empty");
        }
        if !self.opacity.is_finite() {
            bail!("opacity must be a finite number");
        }
        if let Some(position) = &self.position {
            if !position.x.is_finite()
                || !position.y.is_finite()
                || !position.width.is_finite()
                || !position.height.is_finite()
            {
                bail!("position components must be finite");
            }
        }
        if !self.scale.is_finite() || self.scale < 0.0 {
            bail!("scale must be finite and non-negative, got {}", self.scale);
        }
        if !self.rotation_degrees.is_finite() {
            bail!("rotation_degrees must be finite");
        }
        Ok(())
    }
}
