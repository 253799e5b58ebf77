use glam::Vec3;
use sketchbook_render::{IndexedMesh, LitVertex};
use std::f32::consts::{PI, TAU};

/// UV sphere with `width_segments` around and `height_segments` pole to pole.
///
/// Vertices form a `(w + 1) x (h + 1)` grid so the texture seam gets its own
/// column; the pole rows emit one triangle per quad instead of two.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> IndexedMesh<LitVertex> {
    let w = width_segments.max(3);
    let h = height_segments.max(2);
    let mut vertices = Vec::with_capacity(((w + 1) * (h + 1)) as usize);
    for iy in 0..=h {
        let v = iy as f32 / h as f32;
        for ix in 0..=w {
            let u = ix as f32 / w as f32;
            let normal = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            vertices.push(LitVertex {
                position: (normal * radius).to_array(),
                normal: normal.to_array(),
                uv: [u, v],
            });
        }
    }

    let row = w + 1;
    let at = |ix: u32, iy: u32| (iy * row + ix) as u16;
    let mut indices = Vec::with_capacity((w * (h - 1) * 6) as usize);
    for iy in 0..h {
        for ix in 0..w {
            let a = at(ix + 1, iy);
            let b = at(ix, iy);
            let c = at(ix, iy + 1);
            let d = at(ix + 1, iy + 1);
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != h - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    IndexedMesh::new(vertices, indices)
}

/// Flat annulus in the XY plane facing +Z, one band of `segments` quads.
///
/// UVs project the disc onto the texture square, centred at (0.5, 0.5).
pub fn ring(inner: f32, outer: f32, segments: u32) -> IndexedMesh<LitVertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity(2 * (segments + 1) as usize);
    for radius in [inner, outer] {
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * TAU;
            let (x, y) = (radius * theta.cos(), radius * theta.sin());
            vertices.push(LitVertex {
                position: [x, y, 0.0],
                normal: [0.0, 0.0, 1.0],
                uv: [(x / outer + 1.0) / 2.0, 1.0 - (y / outer + 1.0) / 2.0],
            });
        }
    }

    let mut indices = Vec::with_capacity(6 * segments as usize);
    for i in 0..segments {
        let a = i as u16;
        let b = (i + segments + 1) as u16;
        let c = (i + segments + 2) as u16;
        let d = (i + 1) as u16;
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }
    IndexedMesh::new(vertices, indices)
}

/// Closed circle in the XZ plane: `segments + 1` points, first equals last.
pub fn circle_xz(radius: f32, segments: u32) -> Vec<Vec3> {
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32 * TAU;
            Vec3::new(radius * t.cos(), 0.0, radius * t.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_counts() {
        let mesh = sphere(0.2, 32, 32);
        assert_eq!(mesh.vertex_count(), 33 * 33);
        assert_eq!(mesh.triangle_count(), 32 * 31 * 2);
        mesh.validate().unwrap();
    }

    #[test]
    fn sphere_vertices_on_surface() {
        let mesh = sphere(0.5, 16, 8);
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            assert!((p.length() - 0.5).abs() < 1e-5);
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn ring_counts_and_radii() {
        let mesh = ring(0.08, 0.15, 70);
        assert_eq!(mesh.vertex_count(), 2 * 71);
        assert_eq!(mesh.triangle_count(), 140);
        mesh.validate().unwrap();
        for v in &mesh.vertices {
            let r = Vec3::from_array(v.position).length();
            assert!((0.08 - 1e-5..=0.15 + 1e-5).contains(&r));
            assert!(v.uv.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }

    #[test]
    fn circle_is_closed_and_flat() {
        let points = circle_xz(0.57, 50);
        assert_eq!(points.len(), 51);
        assert!((points[0] - points[50]).length() < 1e-5);
        assert!(points.iter().all(|p| p.y == 0.0));
        assert!(points.iter().all(|p| (p.length() - 0.57).abs() < 1e-5));
    }
}
