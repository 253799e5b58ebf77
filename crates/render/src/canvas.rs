use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use sketchbook_common::{CanvasSize, Color};

/// Number of fan segments used to approximate a circle.
pub const CIRCLE_SEGMENTS: usize = 48;

/// Outline drawn along the edges of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

impl Stroke {
    /// The canvas default: 1px black.
    pub const HAIRLINE: Stroke = Stroke {
        color: Color::BLACK,
        width: 1.0,
    };
}

/// A filled 2D shape in canvas pixel coordinates (origin top-left, y down).
#[derive(Debug, Clone, PartialEq)]
pub enum Shape2d {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Triangle {
        points: [Vec2; 3],
        color: Color,
        stroke: Option<Stroke>,
    },
}

/// Everything a 2D sketch draws in one frame, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList2d {
    pub size: CanvasSize,
    pub clear: Color,
    pub shapes: Vec<Shape2d>,
}

impl DrawList2d {
    pub fn new(size: CanvasSize, clear: Color) -> Self {
        Self {
            size,
            clear,
            shapes: Vec::new(),
        }
    }

    pub fn push(&mut self, shape: Shape2d) {
        self.shapes.push(shape);
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Vertex of the 2D canvas pipeline. Color is linear.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CanvasVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Convert a draw list into a flat triangle list, preserving paint order.
pub fn tessellate(list: &DrawList2d) -> Vec<CanvasVertex> {
    let mut out = Vec::new();
    for shape in &list.shapes {
        match shape {
            Shape2d::Rect {
                x,
                y,
                width,
                height,
                color,
            } => {
                let c = color.to_linear_array();
                let (x0, y0, x1, y1) = (*x, *y, x + width, y + height);
                push_quad(
                    &mut out,
                    [
                        Vec2::new(x0, y0),
                        Vec2::new(x1, y0),
                        Vec2::new(x1, y1),
                        Vec2::new(x0, y1),
                    ],
                    c,
                );
            }
            Shape2d::Circle {
                center,
                radius,
                color,
            } => {
                if *radius <= 0.0 {
                    tracing::trace!(radius = *radius, "skipping empty circle");
                    continue;
                }
                let c = color.to_linear_array();
                let step = std::f32::consts::TAU / CIRCLE_SEGMENTS as f32;
                for i in 0..CIRCLE_SEGMENTS {
                    let a0 = step * i as f32;
                    let a1 = step * (i + 1) as f32;
                    push_triangle(
                        &mut out,
                        [
                            *center,
                            *center + Vec2::new(a0.cos(), a0.sin()) * *radius,
                            *center + Vec2::new(a1.cos(), a1.sin()) * *radius,
                        ],
                        c,
                    );
                }
            }
            Shape2d::Triangle {
                points,
                color,
                stroke,
            } => {
                push_triangle(&mut out, *points, color.to_linear_array());
                if let Some(stroke) = stroke {
                    let c = stroke.color.to_linear_array();
                    for i in 0..3 {
                        push_line(&mut out, points[i], points[(i + 1) % 3], stroke.width, c);
                    }
                }
            }
        }
    }
    tracing::trace!(shapes = list.shapes.len(), vertices = out.len(), "tessellated");
    out
}

fn push_triangle(out: &mut Vec<CanvasVertex>, p: [Vec2; 3], color: [f32; 4]) {
    out.extend(p.iter().map(|v| CanvasVertex {
        position: v.to_array(),
        color,
    }));
}

fn push_quad(out: &mut Vec<CanvasVertex>, p: [Vec2; 4], color: [f32; 4]) {
    push_triangle(out, [p[0], p[1], p[2]], color);
    push_triangle(out, [p[0], p[2], p[3]], color);
}

/// A line segment as a quad of the given width, centred on `a -> b`.
fn push_line(out: &mut Vec<CanvasVertex>, a: Vec2, b: Vec2, width: f32, color: [f32; 4]) {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO || width <= 0.0 {
        return;
    }
    let n = dir.perp() * (width * 0.5);
    push_quad(out, [a + n, b + n, b - n, a - n], color);
}
