use crate::canvas::{DrawList2d, Shape2d};
use crate::scene::{Frame, SceneFrame};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads a frame description and produces output. It never
/// mutates sketch state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, frame: &Frame) -> Self::Output;
}

/// Debug text renderer: a human-readable dump of a frame.
///
/// Useful for CLI output, logging, and testing sketches without a GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Print at most this many shapes or draws; the rest are summarised.
    pub max_items: Option<usize>,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(max_items: usize) -> Self {
        Self {
            max_items: Some(max_items),
        }
    }

    fn render_canvas(&self, list: &DrawList2d, out: &mut String) {
        out.push_str(&format!(
            "=== Canvas {}x{} (clear={}) ===\n",
            list.size.width, list.size.height, list.clear
        ));
        out.push_str(&format!("Shapes: {}\n", list.shapes.len()));
        let limit = self.max_items.unwrap_or(usize::MAX);
        for shape in list.shapes.iter().take(limit) {
            match shape {
                Shape2d::Rect {
                    x,
                    y,
                    width,
                    height,
                    color,
                } => out.push_str(&format!(
                    "  rect at=({x:.2}, {y:.2}) size=({width:.2}, {height:.2}) {color}\n"
                )),
                Shape2d::Circle {
                    center,
                    radius,
                    color,
                } => out.push_str(&format!(
                    "  circle at=({:.2}, {:.2}) r={radius:.2} {color}\n",
                    center.x, center.y
                )),
                Shape2d::Triangle {
                    points,
                    color,
                    stroke,
                } => out.push_str(&format!(
                    "  triangle ({:.2}, {:.2}) ({:.2}, {:.2}) ({:.2}, {:.2}) {color}{}\n",
                    points[0].x,
                    points[0].y,
                    points[1].x,
                    points[1].y,
                    points[2].x,
                    points[2].y,
                    if stroke.is_some() { " stroked" } else { "" }
                )),
            }
        }
        if list.shapes.len() > limit {
            out.push_str(&format!("  ... {} more\n", list.shapes.len() - limit));
        }
    }

    fn render_scene(&self, scene: &SceneFrame, out: &mut String) {
        let eye = scene.camera_position;
        out.push_str(&format!(
            "=== Scene (clear={}, draws={}) ===\n",
            scene.clear,
            scene.draws.len()
        ));
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2})\n",
            eye.x, eye.y, eye.z
        ));
        out.push_str(&format!(
            "Ambient: {} x{:.2}\n",
            scene.lighting.ambient, scene.lighting.ambient_intensity
        ));
        if let Some(light) = scene.lighting.point {
            out.push_str(&format!(
                "Point light: at=({:.2}, {:.2}, {:.2}) {} x{:.2}\n",
                light.position.x, light.position.y, light.position.z, light.color, light.intensity
            ));
        }
        let limit = self.max_items.unwrap_or(usize::MAX);
        for draw in scene.draws.iter().take(limit) {
            let p = draw.model.w_axis;
            let material = draw
                .material
                .map(|m| format!(" material={}", m.0))
                .unwrap_or_default();
            out.push_str(&format!(
                "  mesh={} pos=({:.3}, {:.3}, {:.3}){material}\n",
                draw.mesh.0, p.x, p.y, p.z
            ));
        }
        if scene.draws.len() > limit {
            out.push_str(&format!("  ... {} more\n", scene.draws.len() - limit));
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &Frame) -> String {
        let mut out = String::new();
        match frame {
            Frame::Canvas(list) => self.render_canvas(list, &mut out),
            Frame::Scene(scene) => self.render_scene(scene, &mut out),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{DrawItem, Lighting, MeshKey};
    use glam::{Mat4, Vec2, Vec3};
    use sketchbook_common::{CanvasSize, Color};

    #[test]
    fn debug_renderer_empty_canvas() {
        let frame = Frame::Canvas(DrawList2d::new(CanvasSize::new(600.0, 300.0), Color::BLACK));
        let output = DebugTextRenderer::new().render(&frame);

        assert!(output.contains("Canvas 600x300"));
        assert!(output.contains("Shapes: 0"));
        assert!(output.contains("#000000"));
    }

    #[test]
    fn debug_renderer_lists_shapes() {
        let mut list = DrawList2d::new(CanvasSize::new(100.0, 100.0), Color::BLACK);
        list.push(Shape2d::Circle {
            center: Vec2::new(50.0, 25.0),
            radius: 10.0,
            color: Color::WHITE,
        });
        list.push(Shape2d::Rect {
            x: 1.0,
            y: 2.0,
            width: 3.0,
            height: 4.0,
            color: Color::WHITE,
        });
        let output = DebugTextRenderer::new().render(&Frame::Canvas(list));
        assert!(output.contains("circle at=(50.00, 25.00) r=10.00"));
        assert!(output.contains("rect at=(1.00, 2.00)"));
    }

    #[test]
    fn debug_renderer_scene_with_limit() {
        let draws = (0..5)
            .map(|i| DrawItem {
                mesh: MeshKey(i),
                material: None,
                model: Mat4::from_translation(Vec3::new(i as f32, 0.0, 0.0)),
            })
            .collect();
        let frame = Frame::Scene(SceneFrame {
            clear: Color::BLACK,
            view_proj: Mat4::IDENTITY,
            camera_position: Vec3::new(5.0, 2.0, -1.3),
            lighting: Lighting::default(),
            draws,
        });
        let output = DebugTextRenderer::with_limit(2).render(&frame);
        assert!(output.contains("draws=5"));
        assert!(output.contains("eye=(5.00, 2.00, -1.30)"));
        assert!(output.contains("mesh=1 pos=(1.000, 0.000, 0.000)"));
        assert!(!output.contains("mesh=2"));
        assert!(output.contains("... 3 more"));
    }
}
