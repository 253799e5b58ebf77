//! Textured solar system on a hierarchical scene graph.
//!
//! The [`Catalog`] lists the bodies; [`SolarSystem::build`] turns it into a
//! [`SceneGraph`] of orbit groups, planet groups, pivots and moons, plus the
//! meshes and materials a renderer uploads once. Animation only spins nodes
//! about their local Y axis; nested groups compose the motion.
//!
//! # Invariants
//! - Parents precede children in the graph, so world matrices take one pass.
//! - Random placement and jitter come from a seeded [`SplitMix64`], so a
//!   given seed always builds and animates the same system.
//!
//! [`SplitMix64`]: sketchbook_common::SplitMix64

mod catalog;
mod geometry;
mod graph;
mod sketch;
mod system;

pub use catalog::{
    AsteroidSpec, Catalog, CatalogError, MoonSpec, PlanetSpec, RING_SEGMENTS, RingSpec, StarSpec,
};
pub use geometry::{circle_xz, ring, sphere};
pub use graph::{Node, NodeId, NodeKind, SceneGraph};
pub use sketch::SolarSketch;
pub use system::{BuildOptions, PlanetNodes, SolarSystem, initial_eye};

pub fn crate_info() -> &'static str {
    "sketchbook-solar v0.1.0"
}
