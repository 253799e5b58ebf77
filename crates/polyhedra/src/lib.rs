//! Four rotating vertex-colored polyhedra.
//!
//! Each object keeps its own model-view matrix and accumulates a rotation
//! about its axis every tick; the octahedron also bobs vertically.
//!
//! # Invariants
//! - Every mesh is an indexed triangle list that passes validation.
//! - Rotation and bob are post-multiplied, i.e. applied in model space.

mod meshes;
mod polyhedron;
mod sketch;

pub use meshes::{cube, dodecahedron, octahedron, pyramid};
pub use polyhedron::{BOB_LIMIT, BOB_STEP, Bob, Polyhedron, projection};
pub use sketch::PolyhedraSketch;

pub fn crate_info() -> &'static str {
    "sketchbook-polyhedra v0.1.0"
}
