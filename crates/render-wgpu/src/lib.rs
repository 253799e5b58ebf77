//! wgpu render backend for the sketchbook.
//!
//! Draws either a 2D canvas draw list (letterboxed to keep its aspect) or a
//! 3D scene frame whose meshes, materials and textures were uploaded once.
//!
//! # Invariants
//! - The renderer never mutates sketch state; it only reads [`Frame`]s.
//! - Scene resources are uploaded by [`WgpuRenderer::upload_scene`] before
//!   the first scene frame; draws that reference unknown meshes are errors.
//! - Shader compilation failures are reported, never panicked on.
//!
//! [`Frame`]: sketchbook_render::Frame

mod context;
mod error;
mod gpu;
mod shaders;
mod textures;

pub use context::GpuContext;
pub use error::RenderError;
pub use gpu::{Viewport, WgpuRenderer, letterbox};

pub fn crate_info() -> &'static str {
    "sketchbook-render-wgpu v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render-wgpu"));
    }
}
