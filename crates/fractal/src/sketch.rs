use crate::geometry::{Triangle, cutouts, initial_triangle};
use sketchbook_common::{CanvasSize, Color, SierpinskiConfig};
use sketchbook_input::{Action, ActionState};
use sketchbook_render::{DrawList2d, Frame, Shape2d, Sketch, Stroke};

/// Deepest recursion the sketch allows.
pub const MAX_DEPTH: u32 = 8;

/// Static Sierpinski drawing with adjustable depth.
#[derive(Debug, Clone)]
pub struct SierpinskiSketch {
    size: CanvasSize,
    depth: u32,
    initial_depth: u32,
    fill: Color,
    cutout: Color,
    outline: Color,
    outer: Triangle,
    cutouts: Vec<Triangle>,
}

impl SierpinskiSketch {
    pub fn new(config: &SierpinskiConfig) -> Self {
        let size = CanvasSize::new(config.width, config.height);
        let depth = config.depth.min(MAX_DEPTH);
        let outer = initial_triangle(size);
        let mut sketch = Self {
            size,
            depth,
            initial_depth: depth,
            fill: config.fill,
            cutout: config.cutout,
            outline: config.outline,
            outer,
            cutouts: Vec::new(),
        };
        sketch.rebuild();
        sketch
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Change the depth, clamped to `0..=MAX_DEPTH`. Returns whether it changed.
    pub fn set_depth(&mut self, depth: u32) -> bool {
        let depth = depth.min(MAX_DEPTH);
        if depth == self.depth {
            return false;
        }
        self.depth = depth;
        self.rebuild();
        true
    }

    pub fn outer(&self) -> Triangle {
        self.outer
    }

    pub fn cutouts(&self) -> &[Triangle] {
        &self.cutouts
    }

    fn rebuild(&mut self) {
        self.cutouts = cutouts(self.outer, self.depth);
        tracing::debug!(depth = self.depth, cutouts = self.cutouts.len(), "sierpinski rebuilt");
    }

    pub fn draw_list(&self) -> DrawList2d {
        let stroke = Some(Stroke {
            color: self.outline,
            width: 1.0,
        });
        let mut list = DrawList2d::new(self.size, Color::WHITE);
        list.push(Shape2d::Triangle {
            points: self.outer.points(),
            color: self.fill,
            stroke,
        });
        for t in &self.cutouts {
            list.push(Shape2d::Triangle {
                points: t.points(),
                color: self.cutout,
                stroke,
            });
        }
        list
    }
}

impl Default for SierpinskiSketch {
    fn default() -> Self {
        Self::new(&SierpinskiConfig::default())
    }
}

impl Sketch for SierpinskiSketch {
    fn name(&self) -> &'static str {
        "sierpinski"
    }

    fn canvas_size(&self) -> Option<CanvasSize> {
        Some(self.size)
    }

    fn tick(&mut self, _dt: f32, _input: &ActionState) {}

    fn on_action(&mut self, action: Action) {
        let changed = match action {
            Action::DepthIncrease => self.set_depth(self.depth.saturating_add(1)),
            Action::DepthDecrease => self.set_depth(self.depth.saturating_sub(1)),
            Action::Reset => self.set_depth(self.initial_depth),
            _ => false,
        };
        if changed {
            tracing::info!(depth = self.depth, "sierpinski depth changed");
        }
    }

    fn frame(&self, _aspect: f32) -> Frame {
        Frame::Canvas(self.draw_list())
    }

    fn status(&self) -> String {
        format!("depth {} ({} cutouts)", self.depth, self.cutouts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_draws_outer_plus_thirteen_cutouts() {
        let sketch = SierpinskiSketch::default();
        assert_eq!(sketch.depth(), 3);
        let Frame::Canvas(list) = sketch.frame(4.0 / 3.0) else {
            panic!("sierpinski draws a canvas");
        };
        assert_eq!(list.clear, Color::WHITE);
        assert_eq!(list.len(), 14);
        match &list.shapes[0] {
            Shape2d::Triangle { color, stroke, .. } => {
                assert_eq!(*color, Color::from_hex(0xDD0C97));
                assert_eq!(stroke.map(|s| s.color), Some(Color::BLACK));
            }
            other => panic!("unexpected shape {other:?}"),
        }
        assert!(list.shapes[1..].iter().all(|s| matches!(
            s,
            Shape2d::Triangle { color, stroke: Some(_), .. } if *color == Color::WHITE
        )));
    }

    #[test]
    fn depth_actions_are_clamped() {
        let mut sketch = SierpinskiSketch::default();
        for _ in 0..20 {
            sketch.on_action(Action::DepthIncrease);
        }
        assert_eq!(sketch.depth(), MAX_DEPTH);
        assert_eq!(sketch.cutouts().len(), (3usize.pow(MAX_DEPTH) - 1) / 2);

        for _ in 0..20 {
            sketch.on_action(Action::DepthDecrease);
        }
        assert_eq!(sketch.depth(), 0);
        assert!(sketch.cutouts().is_empty());

        sketch.on_action(Action::Reset);
        assert_eq!(sketch.depth(), 3);
    }

    #[test]
    fn config_depth_is_clamped() {
        let config = SierpinskiConfig {
            depth: 40,
            ..SierpinskiConfig::default()
        };
        assert_eq!(SierpinskiSketch::new(&config).depth(), MAX_DEPTH);
    }
}
