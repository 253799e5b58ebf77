use glam::Vec2;
use sketchbook_common::CanvasSize;

/// Three canvas-space points, apex first for the outer triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Vec2,
    pub b: Vec2,
    pub c: Vec2,
}

impl Triangle {
    pub const fn new(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Self { a, b, c }
    }

    pub fn points(&self) -> [Vec2; 3] {
        [self.a, self.b, self.c]
    }

    pub fn area(&self) -> f32 {
        ((self.b - self.a).perp_dot(self.c - self.a) / 2.0).abs()
    }

    /// The triangle joining the three edge midpoints.
    pub fn middle(&self) -> Triangle {
        Triangle::new(
            midpoint(self.a, self.b),
            midpoint(self.b, self.c),
            midpoint(self.a, self.c),
        )
    }

    /// The three corner triangles left after removing [`middle`](Self::middle).
    pub fn corners(&self) -> [Triangle; 3] {
        let ab = midpoint(self.a, self.b);
        let bc = midpoint(self.b, self.c);
        let ac = midpoint(self.a, self.c);
        [
            Triangle::new(self.a, ab, ac),
            Triangle::new(ab, self.b, bc),
            Triangle::new(ac, bc, self.c),
        ]
    }
}

pub fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    (a + b) / 2.0
}

/// Equilateral triangle two thirds of the canvas height, centred, apex up.
pub fn initial_triangle(size: CanvasSize) -> Triangle {
    let height = size.height * 2.0 / 3.0;
    let side = height / 60.0_f32.to_radians().sin();
    let apex = Vec2::new(size.width / 2.0, (size.height - height) / 2.0);
    let base_left = Vec2::new((size.width - side) / 2.0, apex.y + height);
    let base_right = Vec2::new(base_left.x + side, base_left.y);
    Triangle::new(apex, base_left, base_right)
}

/// Up-front reservation ceiling; deeper recursions grow the vector as they go.
const MAX_RESERVE: usize = 1 << 16;

/// `3^depth`, saturating instead of overflowing.
fn leaves(depth: u32) -> usize {
    3usize.checked_pow(depth).unwrap_or(usize::MAX)
}

fn reserve_for(count: usize) -> usize {
    count.min(MAX_RESERVE)
}

/// Split `depth` times into corner triangles.
///
/// Yields `3^depth` triangles, so callers keep `depth` small.
pub fn subdivide(triangle: Triangle, depth: u32) -> Vec<Triangle> {
    let mut out = Vec::with_capacity(reserve_for(leaves(depth)));
    subdivide_into(triangle, depth, &mut out);
    out
}

fn subdivide_into(triangle: Triangle, depth: u32, out: &mut Vec<Triangle>) {
    if depth == 0 {
        out.push(triangle);
        return;
    }
    for corner in triangle.corners() {
        subdivide_into(corner, depth - 1, out);
    }
}

/// Middle triangles removed by `depth` levels of recursion, in draw order.
pub fn cutouts(triangle: Triangle, depth: u32) -> Vec<Triangle> {
    let mut out = Vec::with_capacity(reserve_for((leaves(depth) - 1) / 2));
    cutouts_into(triangle, depth, &mut out);
    out
}

fn cutouts_into(triangle: Triangle, depth: u32, out: &mut Vec<Triangle>) {
    if depth == 0 {
        return;
    }
    out.push(triangle.middle());
    for corner in triangle.corners() {
        cutouts_into(corner, depth - 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: CanvasSize = CanvasSize::new(800.0, 600.0);

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn initial_triangle_fits_canvas() {
        let t = initial_triangle(SIZE);
        let side = 400.0 / 60.0_f32.to_radians().sin();
        assert!(close(t.a, Vec2::new(400.0, 100.0)));
        assert!(close(t.b, Vec2::new((800.0 - side) / 2.0, 500.0)));
        assert!(close(t.c, Vec2::new((800.0 + side) / 2.0, 500.0)));
        // Equilateral.
        let ab = (t.b - t.a).length();
        let bc = (t.c - t.b).length();
        let ca = (t.a - t.c).length();
        assert!((ab - bc).abs() < 1e-2 && (bc - ca).abs() < 1e-2);
    }

    #[test]
    fn midpoint_is_average() {
        assert_eq!(
            midpoint(Vec2::new(0.0, 0.0), Vec2::new(4.0, -2.0)),
            Vec2::new(2.0, -1.0)
        );
    }

    #[test]
    fn subdivide_counts() {
        let t = initial_triangle(SIZE);
        for n in 0..=6 {
            assert_eq!(subdivide(t, n).len(), 3usize.pow(n));
        }
    }

    #[test]
    fn cutout_counts() {
        let t = initial_triangle(SIZE);
        for d in 0..=6 {
            assert_eq!(cutouts(t, d).len(), (3usize.pow(d) - 1) / 2);
        }
    }

    #[test]
    fn subdivided_area_shrinks_by_three_quarters() {
        let t = initial_triangle(SIZE);
        for n in 0..=5 {
            let total: f32 = subdivide(t, n).iter().map(Triangle::area).sum();
            let expected = t.area() * 0.75_f32.powi(n as i32);
            assert!((total - expected).abs() / expected < 1e-4, "depth {n}");
        }
    }

    #[test]
    fn cutouts_are_pre_order() {
        let t = initial_triangle(SIZE);
        let list = cutouts(t, 2);
        assert_eq!(list[0], t.middle());
        let corners = t.corners();
        assert_eq!(list[1], corners[0].middle());
        assert_eq!(list[2], corners[1].middle());
        assert_eq!(list[3], corners[2].middle());
    }

    #[test]
    fn cutouts_and_remainder_cover_outer_triangle() {
        let t = initial_triangle(SIZE);
        let depth = 4;
        let kept: f32 = subdivide(t, depth).iter().map(Triangle::area).sum();
        let removed: f32 = cutouts(t, depth).iter().map(Triangle::area).sum();
        assert!(((kept + removed) - t.area()).abs() / t.area() < 1e-4);
    }

    #[test]
    fn reservation_saturates_for_deep_recursion() {
        assert_eq!(leaves(4), 81);
        assert_eq!(leaves(41), usize::MAX);
        assert_eq!(reserve_for(leaves(41)), MAX_RESERVE);
        assert_eq!(reserve_for((leaves(64) - 1) / 2), MAX_RESERVE);
        assert_eq!(reserve_for(leaves(3)), 27);
    }
}
