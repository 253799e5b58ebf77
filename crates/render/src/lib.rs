//! Rendering Adapter: renderer-agnostic description of what a sketch draws.
//!
//! Sketches produce a [`Frame`] every redraw: either a 2D [`DrawList2d`] in
//! canvas pixels, or a 3D [`SceneFrame`] referencing meshes and materials
//! that were handed to the backend once, up front, as [`SceneAssets`].
//!
//! # Invariants
//! - Nothing here talks to a GPU; the wgpu backend consumes these types.
//! - Vertex types are `#[repr(C)]` + `Pod` so backends upload them as-is.
//! - Every mesh in a [`SceneAssets`] passes [`IndexedMesh::validate`] before
//!   it reaches a backend.

mod camera;
mod canvas;
mod mesh;
mod renderer;
mod scene;
mod sketch;

pub use camera::OrbitCamera;
pub use canvas::{CIRCLE_SEGMENTS, CanvasVertex, DrawList2d, Shape2d, Stroke, tessellate};
pub use mesh::{ColorVertex, IndexedMesh, LitVertex, MeshData, MeshError};
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::{
    DrawItem, Frame, Lighting, LineStrip, Material, MaterialKey, MeshKey, PointLight,
    SceneAssets, SceneFrame,
};
pub use sketch::Sketch;

pub fn crate_info() -> &'static str {
    "sketchbook-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
