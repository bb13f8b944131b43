//! stylevision: headless virtual try-on image compositor.
//!
//! The heart of the crate is [`compositor::Compositor`]: a base image plus
//! an ordered stack of positioned overlay layers, with coalesced repaints,
//! collision reporting, canvas filters, and raster export. Scene manifests
//! (`schema`, `manifest`) describe a composition declaratively for the CLI.

pub mod compositor;
pub mod decoding;
pub mod encoding;
pub mod filters;
pub mod geometry;
pub mod manifest;
pub mod placement;
pub mod scheduler;
pub mod schema;
