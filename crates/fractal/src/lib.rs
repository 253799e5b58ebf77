//! Sierpinski triangle on a 2D canvas.
//!
//! Geometry is pure and GPU-free: [`initial_triangle`] fits the outer
//! triangle to a canvas, [`subdivide`] splits it into corner triangles and
//! [`cutouts`] lists the inverted middle triangles a drawing paints over it.
//!
//! # Invariants
//! - `subdivide(t, n)` returns exactly `3^n` triangles.
//! - `cutouts(t, d)` returns exactly `(3^d - 1) / 2` triangles, parent before
//!   children.

mod geometry;
mod sketch;

pub use geometry::{Triangle, cutouts, initial_triangle, midpoint, subdivide};
pub use sketch::{MAX_DEPTH, SierpinskiSketch};

pub fn crate_info() -> &'static str {
    "sketchbook-fractal v0.1.0"
}
