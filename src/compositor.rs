//! The try-on canvas: a base image plus an ordered stack of positioned,
//! styled overlay layers, flattened on demand.
//!
//! Mutations are synchronous and only arm the render scheduler; painting
//! happens when the owner calls [`Compositor::tick`], so rapid mutation
//! bursts collapse into a single repaint. Layers are addressed by the
//! stable [`LayerId`] handed out at insertion; operations on a stale id
//! return `false` and leave the stack untouched.

use std::path::Path;

use anyhow::{bail, Result};
use log::warn;
use serde::Deserialize;
use tiny_skia::{Color, FilterQuality, Paint, Pixmap, PixmapPaint, Transform};

use crate::decoding::{load_image, LoadError};
use crate::encoding::{self, ExportFormat};
use crate::filters::{self, parse_filter, Filter};
use crate::geometry::{Rect, Size};
use crate::placement::best_fit_position_for_tag;
use crate::scheduler::{Generation, RenderScheduler};
use crate::schema::SceneManifest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    #[serde(alias = "source-over", alias = "source_over")]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
}

impl BlendMode {
    fn to_skia(self) -> tiny_skia::BlendMode {
        match self {
            Self::Normal => tiny_skia::BlendMode::SourceOver,
            Self::Multiply => tiny_skia::BlendMode::Multiply,
            Self::Screen => tiny_skia::BlendMode::Screen,
            Self::Overlay => tiny_skia::BlendMode::Overlay,
            Self::Darken => tiny_skia::BlendMode::Darken,
            Self::Lighten => tiny_skia::BlendMode::Lighten,
        }
    }
}

/// Stable handle for one layer, issued at insertion. Ids are never reused
/// within a compositor's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(u64);

#[derive(Debug, Clone, Copy)]
pub struct LayerOptions {
    pub opacity: f32,
    pub blend_mode: BlendMode,
    pub rotation_degrees: f32,
    pub scale: f32,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            rotation_degrees: 0.0,
            scale: 1.0,
        }
    }
}

/// Field-wise update for [`Compositor::update_layer`]; absent fields keep
/// their current value. A present position is interpreted as fresh logical
/// coordinates and re-scaled by the current session factor.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerUpdate {
    pub position: Option<Rect>,
    pub opacity: Option<f32>,
    pub blend_mode: Option<BlendMode>,
    pub rotation_degrees: Option<f32>,
    pub scale: Option<f32>,
}

#[derive(Debug)]
pub struct Layer {
    id: LayerId,
    image: Pixmap,
    position: Rect,
    opacity: f32,
    blend_mode: BlendMode,
    rotation_degrees: f32,
    scale: f32,
}

impl Layer {
    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn position(&self) -> Rect {
        self.position
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Collision {
    pub index: usize,
    pub id: LayerId,
    pub overlap_area: f32,
}

/// A decoded layer waiting to be committed. Carries the scheduler
/// generation observed when the decode started; committing against a
/// compositor that was destroyed in the meantime is a clean no-op.
#[derive(Debug)]
pub struct PendingLayer {
    image: Pixmap,
    position: Rect,
    options: LayerOptions,
    generation: Generation,
}

#[derive(Debug)]
pub struct Compositor {
    canvas: Option<Pixmap>,
    viewport: Size,
    base_image: Option<Pixmap>,
    layers: Vec<Layer>,
    scale_factor: Option<f32>,
    scheduler: RenderScheduler,
    next_layer_id: u64,
}

impl Compositor {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Result<Self> {
        let Some(canvas) = Pixmap::new(viewport_width, viewport_height) else {
            bail!(
                "viewport must be positive, got {}x{}",
                viewport_width,
                viewport_height
            );
        };
        Ok(Self {
            canvas: Some(canvas),
            viewport: Size::new(viewport_width as f32, viewport_height as f32),
            base_image: None,
            layers: Vec::new(),
            scale_factor: None,
            scheduler: RenderScheduler::new(),
            next_layer_id: 0,
        })
    }

    // -----------------------------------------------------------------
    // Base image
    // -----------------------------------------------------------------

    /// Decode and install the backdrop. On decode failure nothing is
    /// overwritten; the error is surfaced and never retried here.
    pub fn set_base_image(&mut self, source: &Path) -> Result<(), LoadError> {
        let image = load_image(source)?;
        self.set_base_image_pixmap(image);
        Ok(())
    }

    /// Install an already-decoded backdrop: fit the canvas to the viewport
    /// preserving aspect ratio and record the session scale factor applied
    /// to all subsequently added layer positions.
    pub fn set_base_image_pixmap(&mut self, image: Pixmap) {
        if self.canvas.is_none() {
            return;
        }
        let ratio = (self.viewport.width / image.width() as f32)
            .min(self.viewport.height / image.height() as f32);
        let canvas_width = ((image.width() as f32 * ratio).round() as u32).max(1);
        let canvas_height = ((image.height() as f32 * ratio).round() as u32).max(1);
        if let Some(canvas) = Pixmap::new(canvas_width, canvas_height) {
            self.canvas = Some(canvas);
        }
        self.scale_factor = Some(ratio);
        self.base_image = Some(image);
        self.scheduler.request();
    }

    pub fn base_image_size(&self) -> Option<Size> {
        self.base_image
            .as_ref()
            .map(|base| Size::new(base.width() as f32, base.height() as f32))
    }

    pub fn scale_factor(&self) -> Option<f32> {
        self.scale_factor
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        match &self.canvas {
            Some(canvas) => (canvas.width(), canvas.height()),
            None => (0, 0),
        }
    }

    /// The flattened canvas as painted by the last completed render cycle.
    pub fn canvas(&self) -> Option<&Pixmap> {
        self.canvas.as_ref()
    }

    // -----------------------------------------------------------------
    // Layer stack
    // -----------------------------------------------------------------

    /// Decode a source and append it as the topmost layer. The position is
    /// given in logical base-image coordinates and stored pre-scaled by the
    /// current session factor (unscaled while no factor is established).
    pub fn add_layer(
        &mut self,
        source: &Path,
        position: Rect,
        options: LayerOptions,
    ) -> Result<LayerId, LoadError> {
        let image = load_image(source)?;
        Ok(self.add_layer_image(image, position, options))
    }

    /// Append an already-decoded raster as the topmost layer.
    pub fn add_layer_image(
        &mut self,
        image: Pixmap,
        position: Rect,
        options: LayerOptions,
    ) -> LayerId {
        let id = LayerId(self.next_layer_id);
        self.next_layer_id += 1;
        if self.canvas.is_none() {
            return id;
        }
        self.layers.push(Layer {
            id,
            image,
            position: self.scaled_position(position),
            opacity: options.opacity.clamp(0.0, 1.0),
            blend_mode: options.blend_mode,
            rotation_degrees: options.rotation_degrees,
            scale: options.scale,
        });
        self.scheduler.request();
        id
    }

    /// First half of a decode that may outlive the compositor: the result
    /// must be handed back through [`Compositor::commit_layer`], which
    /// refuses it if the session was destroyed in between.
    pub fn begin_layer(
        &self,
        source: &Path,
        position: Rect,
        options: LayerOptions,
    ) -> Result<PendingLayer, LoadError> {
        let image = load_image(source)?;
        Ok(PendingLayer {
            image,
            position,
            options,
            generation: self.scheduler.generation(),
        })
    }

    pub fn commit_layer(&mut self, pending: PendingLayer) -> Option<LayerId> {
        if !self.scheduler.is_current(pending.generation) {
            return None;
        }
        Some(self.add_layer_image(pending.image, pending.position, pending.options))
    }

    /// Remove the layer with the given id. Returns whether anything was
    /// removed; a stale id leaves the stack untouched.
    pub fn remove_layer(&mut self, id: LayerId) -> bool {
        let Some(index) = self.layers.iter().position(|layer| layer.id == id) else {
            return false;
        };
        self.layers.remove(index);
        self.scheduler.request();
        true
    }

    /// Merge the present fields of `updates` into the layer. Returns whether
    /// the id was known.
    pub fn update_layer(&mut self, id: LayerId, updates: LayerUpdate) -> bool {
        let scaled_position = updates.position.map(|position| self.scaled_position(position));
        let Some(layer) = self.layers.iter_mut().find(|layer| layer.id == id) else {
            return false;
        };
        if let Some(position) = scaled_position {
            layer.position = position;
        }
        if let Some(opacity) = updates.opacity {
            layer.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(blend_mode) = updates.blend_mode {
            layer.blend_mode = blend_mode;
        }
        if let Some(rotation) = updates.rotation_degrees {
            layer.rotation_degrees = rotation;
        }
        if let Some(scale) = updates.scale {
            layer.scale = scale;
        }
        self.scheduler.request();
        true
    }

    pub fn clear_layers(&mut self) {
        self.layers.clear();
        self.scheduler.request();
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    fn scaled_position(&self, position: Rect) -> Rect {
        match self.scale_factor {
            Some(factor) => position.scaled(factor),
            None => position,
        }
    }

    // -----------------------------------------------------------------
    // Geometry helpers
    // -----------------------------------------------------------------

    /// All current layers whose rectangle intersects `rect` (canvas-space),
    /// annotated with the clamped overlap area. Symmetric per pair.
    pub fn detect_collisions(&self, rect: &Rect) -> Vec<Collision> {
        self.layers
            .iter()
            .enumerate()
            .filter(|(_, layer)| layer.position.intersects(rect))
            .map(|(index, layer)| Collision {
                index,
                id: layer.id,
                overlap_area: layer.position.overlap_area(rect),
            })
            .collect()
    }

    // -----------------------------------------------------------------
    // Render scheduling
    // -----------------------------------------------------------------

    pub fn queue_render(&mut self) {
        if self.canvas.is_some() {
            self.scheduler.request();
        }
    }

    /// Paint tick: runs at most one owed render cycle and reports whether a
    /// paint happened. All requests since the previous tick collapse into
    /// this single cycle, which observes only the current state.
    pub fn tick(&mut self) -> bool {
        if self.scheduler.begin_cycle().is_none() {
            return false;
        }
        self.render();
        true
    }

    fn render(&mut self) {
        let Self {
            canvas,
            base_image,
            layers,
            ..
        } = self;
        let Some(canvas) = canvas.as_mut() else {
            return;
        };

        canvas.fill(Color::TRANSPARENT);
        match base_image {
            Some(base) => {
                let stretch = Transform::from_scale(
                    canvas.width() as f32 / base.width() as f32,
                    canvas.height() as f32 / base.height() as f32,
                );
                canvas.draw_pixmap(
                    0,
                    0,
                    base.as_ref(),
                    &PixmapPaint {
                        opacity: 1.0,
                        blend_mode: tiny_skia::BlendMode::SourceOver,
                        quality: FilterQuality::Bilinear,
                    },
                    stretch,
                    None,
                );
            }
            None => draw_placeholder(canvas),
        }

        for layer in layers.iter() {
            draw_layer(canvas, layer);
        }
    }

    // -----------------------------------------------------------------
    // Filters and export
    // -----------------------------------------------------------------

    /// Mutate the canvas pixels in place and schedule a repaint.
    pub fn apply_filter(&mut self, filter: Filter) {
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };
        filters::apply(canvas, filter);
        self.scheduler.request();
    }

    /// String-keyed filter dispatch for manifest/CLI callers. Unknown kinds
    /// warn and mutate nothing; returns whether a filter ran.
    pub fn apply_filter_named(&mut self, spec: &str) -> bool {
        match parse_filter(spec) {
            Some(filter) => {
                self.apply_filter(filter);
                true
            }
            None => {
                warn!("unsupported filter '{spec}', skipping");
                false
            }
        }
    }

    pub fn encode(&self, format: ExportFormat, quality: f32) -> Result<Vec<u8>> {
        let Some(canvas) = &self.canvas else {
            bail!("compositor has been destroyed");
        };
        encoding::encode(canvas, format, quality)
    }

    pub fn image_data_url(&self, format: ExportFormat, quality: f32) -> Result<String> {
        let Some(canvas) = &self.canvas else {
            bail!("compositor has been destroyed");
        };
        encoding::data_url(canvas, format, quality)
    }

    /// File-save counterpart of the browser download path.
    pub fn write_image(&self, path: &Path) -> Result<()> {
        let Some(canvas) = &self.canvas else {
            bail!("compositor has been destroyed");
        };
        encoding::write_image(canvas, path)
    }

    // -----------------------------------------------------------------
    // Teardown
    // -----------------------------------------------------------------

    /// Release layers, backdrop and pending render accounting, and zero the
    /// canvas dimensions. Pending decodes committed afterwards are refused
    /// via the scheduler generation.
    pub fn destroy(&mut self) {
        self.layers.clear();
        self.base_image = None;
        self.scale_factor = None;
        self.canvas = None;
        self.scheduler.invalidate();
    }
}

/// Assemble a compositor from a validated scene manifest: backdrop, items
/// (explicit position or category best-fit), one paint, then canvas filters.
pub fn compose_scene(scene: &SceneManifest) -> Result<Compositor> {
    let mut compositor = Compositor::new(scene.viewport.width, scene.viewport.height)?;

    if let Some(base) = &scene.base_image {
        compositor.set_base_image(base)?;
    }

    let base_size = compositor
        .base_image_size()
        .unwrap_or(Size::new(scene.viewport.width as f32, scene.viewport.height as f32));

    for item in &scene.items {
        let position = match item.position {
            Some(position) => position,
            None => best_fit_position_for_tag(item.kind.as_deref().unwrap_or("top"), base_size),
        };
        compositor.add_layer(
            &item.source,
            position,
            LayerOptions {
                opacity: item.opacity,
                blend_mode: item.blend_mode,
                rotation_degrees: item.rotation_degrees,
                scale: item.scale,
            },
        )?;
    }

    compositor.tick();
    for spec in &scene.filters {
        compositor.apply_filter_named(spec);
    }

    Ok(compositor)
}

fn draw_layer(canvas: &mut Pixmap, layer: &Layer) {
    let position = layer.position;
    let width = position.width.max(0.0);
    let height = position.height.max(0.0);
    let per_layer_scale = layer.scale.max(0.0);
    let scaled_width = width * per_layer_scale;
    let scaled_height = height * per_layer_scale;
    if scaled_width <= 0.0 || scaled_height <= 0.0 {
        // Zero-area layers render nothing; not an error.
        return;
    }

    // Per-layer scale shrinks or grows the drawn image about the rect
    // center, leaving the rect itself where the caller put it.
    let offset_x = (width - scaled_width) / 2.0;
    let offset_y = (height - scaled_height) / 2.0;

    let mut transform = Transform::from_scale(
        scaled_width / layer.image.width() as f32,
        scaled_height / layer.image.height() as f32,
    )
    .post_translate(position.x + offset_x, position.y + offset_y);

    if layer.rotation_degrees != 0.0 {
        let (center_x, center_y) = Rect::new(position.x, position.y, width, height).center();
        transform =
            transform.post_concat(Transform::from_rotate_at(layer.rotation_degrees, center_x, center_y));
    }

    canvas.draw_pixmap(
        0,
        0,
        layer.image.as_ref(),
        &PixmapPaint {
            opacity: layer.opacity,
            blend_mode: layer.blend_mode.to_skia(),
            quality: FilterQuality::Bilinear,
        },
        transform,
        None,
    );
}

/// Backdrop shown until a base image arrives: the storefront's light frame
/// with a muted band where its loading message sits (the headless build
/// carries no font asset, so the band stands in for the text).
fn draw_placeholder(canvas: &mut Pixmap) {
    canvas.fill(Color::from_rgba8(0xF8, 0xF9, 0xFA, 0xFF));

    let band_width = canvas.width() as f32 * 0.5;
    let band_height = (canvas.height() as f32 * 0.03).max(4.0);
    let band = tiny_skia::Rect::from_xywh(
        (canvas.width() as f32 - band_width) / 2.0,
        (canvas.height() as f32 - band_height) / 2.0,
        band_width,
        band_height,
    );
    if let Some(band) = band {
        let mut paint = Paint::default();
        paint.set_color(Color::from_rgba8(0x6C, 0x75, 0x7D, 0xFF));
        canvas.fill_rect(band, &paint, Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::ColorU8;

    fn solid(width: u32, height: u32, r: u8, g: u8, b: u8) -> Pixmap {
        let mut pixmap = Pixmap::new(width, height).expect("pixmap");
        pixmap.fill(Color::from_rgba8(r, g, b, 255));
        pixmap
    }

    fn pixel(compositor: &Compositor, x: u32, y: u32) -> ColorU8 {
        compositor
            .canvas()
            .expect("canvas")
            .pixel(x, y)
            .expect("pixel in bounds")
            .demultiply()
    }

    #[test]
    fn scale_factor_established_by_base_image() {
        let mut compositor = Compositor::new(200, 300).expect("compositor");
        compositor.set_base_image_pixmap(solid(400, 600, 255, 255, 255));
        assert_eq!(compositor.scale_factor(), Some(0.5));
        assert_eq!(compositor.canvas_size(), (200, 300));
    }

    #[test]
    fn positions_added_after_base_are_scaled() {
        let mut compositor = Compositor::new(200, 300).expect("compositor");
        compositor.set_base_image_pixmap(solid(400, 600, 255, 255, 255));
        let id = compositor.add_layer_image(
            solid(10, 10, 255, 0, 0),
            Rect::new(100.0, 100.0, 50.0, 50.0),
            LayerOptions::default(),
        );
        let layer = compositor.layer(id).expect("layer");
        assert_eq!(layer.position(), Rect::new(50.0, 50.0, 25.0, 25.0));
    }

    #[test]
    fn positions_without_scale_factor_are_stored_unscaled() {
        let mut compositor = Compositor::new(400, 600).expect("compositor");
        let id = compositor.add_layer_image(
            solid(10, 10, 255, 0, 0),
            Rect::new(80.0, 90.0, 240.0, 180.0),
            LayerOptions::default(),
        );
        assert_eq!(
            compositor.layer(id).expect("layer").position(),
            Rect::new(80.0, 90.0, 240.0, 180.0)
        );
    }

    #[test]
    fn unit_scale_factor_keeps_positions_unchanged() {
        let mut compositor = Compositor::new(400, 600).expect("compositor");
        compositor.set_base_image_pixmap(solid(400, 600, 20, 20, 20));
        assert_eq!(compositor.scale_factor(), Some(1.0));
        let id = compositor.add_layer_image(
            solid(10, 10, 255, 0, 0),
            Rect::new(80.0, 90.0, 240.0, 180.0),
            LayerOptions::default(),
        );
        assert_eq!(
            compositor.layer(id).expect("layer").position(),
            Rect::new(80.0, 90.0, 240.0, 180.0)
        );
    }

    #[test]
    fn opacity_is_clamped_on_insert_and_update() {
        let mut compositor = Compositor::new(100, 100).expect("compositor");
        let id = compositor.add_layer_image(
            solid(10, 10, 255, 0, 0),
            Rect::new(0.0, 0.0, 10.0, 10.0),
            LayerOptions {
                opacity: 1.5,
                ..LayerOptions::default()
            },
        );
        assert_eq!(compositor.layer(id).expect("layer").opacity(), 1.0);

        compositor.update_layer(
            id,
            LayerUpdate {
                opacity: Some(-1.0),
                ..LayerUpdate::default()
            },
        );
        assert_eq!(compositor.layer(id).expect("layer").opacity(), 0.0);
    }

    #[test]
    fn stale_id_removal_is_a_distinguishable_no_op() {
        let mut compositor = Compositor::new(100, 100).expect("compositor");
        let first = compositor.add_layer_image(
            solid(4, 4, 1, 2, 3),
            Rect::new(0.0, 0.0, 4.0, 4.0),
            LayerOptions::default(),
        );
        let second = compositor.add_layer_image(
            solid(4, 4, 3, 2, 1),
            Rect::new(4.0, 0.0, 4.0, 4.0),
            LayerOptions::default(),
        );

        assert!(compositor.remove_layer(first));
        assert!(!compositor.remove_layer(first), "id must not be reusable");
        assert_eq!(compositor.layers().len(), 1);
        assert_eq!(compositor.layers()[0].id(), second);
        assert!(compositor.tick(), "stack mutation still owes a paint");
    }

    #[test]
    fn last_added_layer_wins_at_overlap() {
        let mut compositor = Compositor::new(50, 50).expect("compositor");
        compositor.add_layer_image(
            solid(10, 10, 255, 0, 0),
            Rect::new(10.0, 10.0, 20.0, 20.0),
            LayerOptions::default(),
        );
        compositor.add_layer_image(
            solid(10, 10, 0, 0, 255),
            Rect::new(15.0, 15.0, 20.0, 20.0),
            LayerOptions::default(),
        );
        compositor.tick();

        let px = pixel(&compositor, 24, 24);
        assert_eq!((px.red(), px.green(), px.blue()), (0, 0, 255));
    }

    #[test]
    fn collisions_report_each_overlapping_layer_with_area() {
        let mut compositor = Compositor::new(100, 100).expect("compositor");
        let a = compositor.add_layer_image(
            solid(4, 4, 0, 0, 0),
            Rect::new(0.0, 0.0, 10.0, 10.0),
            LayerOptions::default(),
        );
        compositor.add_layer_image(
            solid(4, 4, 0, 0, 0),
            Rect::new(50.0, 50.0, 10.0, 10.0),
            LayerOptions::default(),
        );

        let hits = compositor.detect_collisions(&Rect::new(5.0, 5.0, 10.0, 10.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, a);
        assert_eq!(hits[0].index, 0);
        assert!((hits[0].overlap_area - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn coalesced_updates_paint_once_with_final_state() {
        let mut compositor = Compositor::new(40, 40).expect("compositor");
        let id = compositor.add_layer_image(
            solid(8, 8, 0, 255, 0),
            Rect::new(0.0, 0.0, 8.0, 8.0),
            LayerOptions::default(),
        );
        compositor.tick();

        for step in 1..=20 {
            compositor.update_layer(
                id,
                LayerUpdate {
                    position: Some(Rect::new(step as f32, 0.0, 8.0, 8.0)),
                    ..LayerUpdate::default()
                },
            );
        }

        assert!(compositor.tick(), "one paint owed for the whole burst");
        assert!(!compositor.tick(), "burst collapses to a single cycle");
        // Only the final position is observable.
        let px = pixel(&compositor, 24, 4);
        assert_eq!((px.red(), px.green(), px.blue()), (0, 255, 0));
        let px = pixel(&compositor, 2, 4);
        assert_ne!((px.red(), px.green(), px.blue()), (0, 255, 0));
    }

    #[test]
    fn clear_layers_is_idempotent() {
        let mut compositor = Compositor::new(30, 30).expect("compositor");
        compositor.add_layer_image(
            solid(6, 6, 9, 9, 9),
            Rect::new(0.0, 0.0, 6.0, 6.0),
            LayerOptions::default(),
        );
        compositor.clear_layers();
        compositor.tick();
        let once = compositor.canvas().expect("canvas").data().to_vec();

        compositor.clear_layers();
        compositor.tick();
        assert_eq!(compositor.canvas().expect("canvas").data(), once.as_slice());
    }

    #[test]
    fn fully_transparent_layer_leaves_backdrop_visible() {
        let mut compositor = Compositor::new(20, 20).expect("compositor");
        compositor.set_base_image_pixmap(solid(20, 20, 250, 250, 250));
        compositor.add_layer_image(
            solid(20, 20, 255, 0, 0),
            Rect::new(0.0, 0.0, 20.0, 20.0),
            LayerOptions {
                opacity: -1.0,
                ..LayerOptions::default()
            },
        );
        compositor.tick();
        let px = pixel(&compositor, 10, 10);
        assert_eq!((px.red(), px.green(), px.blue()), (250, 250, 250));
    }

    #[test]
    fn destroy_makes_ticks_inert_and_refuses_pending_commits() {
        let mut compositor = Compositor::new(30, 30).expect("compositor");
        compositor.add_layer_image(
            solid(4, 4, 1, 1, 1),
            Rect::new(0.0, 0.0, 4.0, 4.0),
            LayerOptions::default(),
        );

        let pending = PendingLayer {
            image: solid(4, 4, 2, 2, 2),
            position: Rect::new(0.0, 0.0, 4.0, 4.0),
            options: LayerOptions::default(),
            generation: compositor.scheduler.generation(),
        };

        compositor.destroy();
        assert_eq!(compositor.canvas_size(), (0, 0));
        assert!(!compositor.tick());
        assert!(compositor.commit_layer(pending).is_none());
        assert!(compositor.layers().is_empty());
    }

    #[test]
    fn negative_extent_layer_renders_as_zero_area() {
        let mut compositor = Compositor::new(20, 20).expect("compositor");
        compositor.set_base_image_pixmap(solid(20, 20, 200, 200, 200));
        compositor.add_layer_image(
            solid(4, 4, 255, 0, 0),
            Rect::new(5.0, 5.0, -10.0, 10.0),
            LayerOptions::default(),
        );
        compositor.tick();
        let px = pixel(&compositor, 10, 10);
        assert_eq!((px.red(), px.green(), px.blue()), (200, 200, 200));
    }

    #[test]
    fn placeholder_backdrop_painted_until_base_arrives() {
        let mut compositor = Compositor::new(40, 40).expect("compositor");
        compositor.queue_render();
        compositor.tick();
        let corner = pixel(&compositor, 1, 1);
        assert_eq!(
            (corner.red(), corner.green(), corner.blue()),
            (0xF8, 0xF9, 0xFA)
        );
        let center = pixel(&compositor, 20, 20);
        assert_eq!(
            (center.red(), center.green(), center.blue()),
            (0x6C, 0x75, 0x7D)
        );
    }
}
