//! Vertex-colored polyhedron literals.
//!
//! Every face owns its vertices so each can carry a flat face color.

use sketchbook_render::{ColorVertex, IndexedMesh};

const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
const MAGENTA: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
const CYAN: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Pair positions with colors; `faces` lists each color and how many
/// consecutive vertices it covers.
fn colored(
    positions: &[[f32; 3]],
    faces: &[([f32; 4], usize)],
    indices: Vec<u16>,
) -> IndexedMesh<ColorVertex> {
    let colors = faces
        .iter()
        .flat_map(|&(color, count)| std::iter::repeat_n(color, count));
    let vertices = positions
        .iter()
        .zip(colors)
        .map(|(&position, color)| ColorVertex { position, color })
        .collect();
    IndexedMesh::new(vertices, indices)
}

/// Fan-triangulate consecutive polygons of `sides` vertices each.
fn fans(polygons: u16, sides: u16) -> Vec<u16> {
    let mut out = Vec::with_capacity((polygons * (sides - 2) * 3) as usize);
    for p in 0..polygons {
        let base = p * sides;
        for k in 1..sides - 1 {
            out.extend_from_slice(&[base, base + k, base + k + 1]);
        }
    }
    out
}

/// Two-unit cube: 6 quads, 24 vertices, 36 indices.
pub fn cube() -> IndexedMesh<ColorVertex> {
    #[rustfmt::skip]
    let positions = [
        // front
        [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0],
        // back
        [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0, -1.0, -1.0],
        // top
        [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0],
        // bottom
        [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],
        // right
        [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0],
        // left
        [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],
    ];
    let faces = [(RED, 4), (GREEN, 4), (BLUE, 4), (YELLOW, 4), (MAGENTA, 4), (CYAN, 4)];
    colored(&positions, &faces, fans(6, 4))
}

/// Pentagonal pyramid: five side triangles and a pentagon base,
/// 20 vertices, 24 indices.
pub fn pyramid() -> IndexedMesh<ColorVertex> {
    #[rustfmt::skip]
    let positions = [
        [ 0.0,  3.0,  0.0], [ 2.0, -1.0,  0.5], [ 0.0, -1.0,  2.0],
        [ 0.0,  3.0,  0.0], [ 0.0, -1.0,  2.0], [-2.0, -1.0,  0.5],
        [ 0.0,  3.0,  0.0], [-2.0, -1.0,  0.5], [-1.0, -1.0, -2.0],
        [ 0.0,  3.0,  0.0], [-1.0, -1.0, -2.0], [ 1.0, -1.0, -2.0],
        [ 0.0,  3.0,  0.0], [ 1.0, -1.0, -2.0], [ 2.0, -1.0,  0.5],
        // base
        [ 2.0, -1.0,  0.5], [ 0.0, -1.0,  2.0], [-2.0, -1.0,  0.5], [-1.0, -1.0, -2.0],
        [ 1.0, -1.0, -2.0],
    ];
    let faces = [(RED, 3), (GREEN, 3), (BLUE, 3), (YELLOW, 3), (MAGENTA, 3), (CYAN, 5)];
    let mut indices = fans(5, 3);
    indices.extend(fans(1, 5).iter().map(|i| i + 15));
    colored(&positions, &faces, indices)
}

/// Regular octahedron with vertices at distance 1.5 on each axis,
/// 24 vertices, 24 indices.
pub fn octahedron() -> IndexedMesh<ColorVertex> {
    #[rustfmt::skip]
    let positions = [
        [ 1.5,  0.0,  0.0], [ 0.0, -1.5,  0.0], [ 0.0,  0.0,  1.5],
        [ 1.5,  0.0,  0.0], [ 0.0, -1.5,  0.0], [ 0.0,  0.0, -1.5],
        [ 1.5,  0.0,  0.0], [ 0.0,  1.5,  0.0], [ 0.0,  0.0, -1.5],
        [ 1.5,  0.0,  0.0], [ 0.0,  1.5,  0.0], [ 0.0,  0.0,  1.5],
        [-1.5,  0.0,  0.0], [ 0.0,  1.5,  0.0], [ 0.0,  0.0,  1.5],
        [-1.5,  0.0,  0.0], [ 0.0,  1.5,  0.0], [ 0.0,  0.0, -1.5],
        [-1.5,  0.0,  0.0], [ 0.0, -1.5,  0.0], [ 0.0,  0.0,  1.5],
        [-1.5,  0.0,  0.0], [ 0.0, -1.5,  0.0], [ 0.0,  0.0, -1.5],
    ];
    let faces = [
        (RED, 3),
        (GREEN, 3),
        (BLUE, 3),
        (YELLOW, 3),
        (MAGENTA, 3),
        (CYAN, 3),
        (WHITE, 3),
        ([0.0, 0.5, 0.0, 1.0], 3),
    ];
    colored(&positions, &faces, fans(8, 3))
}

/// Dodecahedron: 12 pentagons fanned into 3 triangles each,
/// 60 vertices, 108 indices.
pub fn dodecahedron() -> IndexedMesh<ColorVertex> {
    #[rustfmt::skip]
    let positions = [
        [ 0.8,  0.8,  0.8], [ 0.5,  1.3,  0.0], [ 0.8,  0.8, -0.8], [ 1.3,  0.0, -0.5], [ 1.3,  0.0,  0.5],
        [ 0.8, -0.8,  0.8], [ 1.3,  0.0,  0.5], [ 1.3,  0.0, -0.5], [ 0.8, -0.8, -0.8], [ 0.5, -1.3,  0.0],
        [ 0.8,  0.8,  0.8], [ 1.3,  0.0,  0.5], [ 0.8, -0.8,  0.8], [ 0.0, -0.5,  1.3], [ 0.0,  0.5,  1.3],
        [ 0.8,  0.8,  0.8], [ 0.0,  0.5,  1.3], [-0.8,  0.8,  0.8], [-0.5,  1.3,  0.0], [ 0.5,  1.3,  0.0],
        [ 0.5,  1.3,  0.0], [-0.5,  1.3,  0.0], [-0.8,  0.8, -0.8], [ 0.0,  0.5, -1.3], [ 0.8,  0.8, -0.8],
        [ 0.8,  0.8, -0.8], [ 0.0,  0.5, -1.3], [ 0.0, -0.5, -1.3], [ 0.8, -0.8, -0.8], [ 1.3,  0.0, -0.5],
        [ 0.8, -0.8, -0.8], [ 0.5, -1.3,  0.0], [-0.5, -1.3,  0.0], [-0.8, -0.8, -0.8], [ 0.0, -0.5, -1.3],
        [ 0.8, -0.8,  0.8], [ 0.0, -0.5,  1.3], [-0.8, -0.8,  0.8], [-0.5, -1.3,  0.0], [ 0.5, -1.3,  0.0],
        [ 0.0,  0.5,  1.3], [-0.8,  0.8,  0.8], [-1.3,  0.0,  0.5], [-0.8, -0.8,  0.8], [ 0.0, -0.5,  1.3],
        [-0.5,  1.3,  0.0], [-0.8,  0.8, -0.8], [-1.3,  0.0, -0.5], [-1.3,  0.0,  0.5], [-0.8,  0.8,  0.8],
        [ 0.0,  0.5, -1.3], [ 0.0, -0.5, -1.3], [-0.8, -0.8, -0.8], [-1.3,  0.0, -0.5], [-0.8,  0.8, -0.8],
        [-0.8, -0.8,  0.8], [-1.3,  0.0,  0.5], [-1.3,  0.0, -0.5], [-0.8, -0.8, -0.8], [-0.5, -1.3,  0.0],
    ];
    let faces = [
        (RED, 5),
        (GREEN, 5),
        (BLUE, 5),
        (YELLOW, 5),
        (MAGENTA, 5),
        (CYAN, 5),
        (WHITE, 5),
        ([0.5, 0.0, 0.0, 1.0], 5),
        ([0.0, 0.0, 0.5, 1.0], 5),
        ([0.0, 0.5, 0.0, 1.0], 5),
        ([0.0, 1.0, 0.5, 1.0], 5),
        ([0.5, 1.0, 0.0, 1.0], 5),
    ];
    colored(&positions, &faces, fans(12, 5))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_match_literals() {
        for (mesh, verts, indices) in [
            (cube(), 24, 36),
            (pyramid(), 20, 24),
            (octahedron(), 24, 24),
            (dodecahedron(), 60, 108),
        ] {
            assert_eq!(mesh.vertex_count(), verts);
            assert_eq!(mesh.index_count(), indices);
            mesh.validate().unwrap();
        }
    }

    #[test]
    fn every_vertex_has_a_color() {
        for mesh in [cube(), pyramid(), octahedron(), dodecahedron()] {
            assert!(mesh.vertices.iter().all(|v| v.color[3] == 1.0));
        }
    }

    #[test]
    fn pyramid_indices_match_fans() {
        assert_eq!(
            pyramid().indices,
            vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 15, 17, 18, 15, 18, 19]
        );
    }

    #[test]
    fn face_colors_are_flat() {
        let mesh = cube();
        for face in mesh.vertices.chunks(4) {
            assert!(face.iter().all(|v| v.color == face[0].color));
        }
        let base = &pyramid().vertices[15..];
        assert!(base.iter().all(|v| v.color == CYAN));
    }

    #[test]
    fn octahedron_vertices_on_axes() {
        for v in octahedron().vertices {
            let nonzero = v.position.iter().filter(|c| **c != 0.0).count();
            assert_eq!(nonzero, 1);
            assert!(v.position.iter().any(|c| c.abs() == 1.5));
        }
    }
}
