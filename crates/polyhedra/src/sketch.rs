use crate::meshes::{cube, dodecahedron, octahedron, pyramid};
use crate::polyhedron::{Polyhedron, projection};
use glam::Vec3;
use sketchbook_common::{Color, PolyhedraConfig};
use sketchbook_input::{Action, ActionState};
use sketchbook_render::{
    DrawItem, Frame, Lighting, MeshData, MeshKey, SceneAssets, SceneFrame, Sketch,
};

/// Cube, pyramid, octahedron and dodecahedron side by side.
#[derive(Debug, Clone)]
pub struct PolyhedraSketch {
    objects: Vec<Polyhedron>,
    duration: f32,
    paused: bool,
    ticks: u64,
}

impl PolyhedraSketch {
    pub fn new(config: &PolyhedraConfig) -> Self {
        let objects = vec![
            Polyhedron::new("cube", Vec3::new(-4.5, 0.0, -5.0), Vec3::new(1.0, 1.0, 0.2)),
            Polyhedron::new("pyramid", Vec3::new(-1.5, 0.0, -5.0), Vec3::Y),
            Polyhedron::new("octahedron", Vec3::new(1.5, 0.0, -5.0), Vec3::Y).bobbing(),
            Polyhedron::new("dodecahedron", Vec3::new(4.5, 0.0, -5.0), Vec3::new(-0.4, 1.0, 0.1)),
        ];
        tracing::debug!(objects = objects.len(), duration = config.duration, "polyhedra created");
        Self {
            objects,
            duration: config.duration,
            paused: false,
            ticks: 0,
        }
    }

    pub fn objects(&self) -> &[Polyhedron] {
        &self.objects
    }
}

impl Default for PolyhedraSketch {
    fn default() -> Self {
        Self::new(&PolyhedraConfig::default())
    }
}

impl Sketch for PolyhedraSketch {
    fn name(&self) -> &'static str {
        "polyhedra"
    }

    /// Mesh `i` belongs to object `i`.
    fn scene_assets(&self) -> SceneAssets {
        let mut assets = SceneAssets::default();
        for mesh in [cube(), pyramid(), octahedron(), dodecahedron()] {
            assets.add_mesh(MeshData::Colored(mesh));
        }
        assets
    }

    fn tick(&mut self, dt: f32, _input: &ActionState) {
        if self.paused {
            return;
        }
        for object in &mut self.objects {
            object.update(dt, self.duration);
        }
        self.ticks += 1;
    }

    fn on_action(&mut self, action: Action) {
        match action {
            Action::Reset => {
                self.objects.iter_mut().for_each(Polyhedron::reset);
                self.ticks = 0;
            }
            Action::TogglePause => self.paused = !self.paused,
            _ => {}
        }
    }

    fn frame(&self, aspect: f32) -> Frame {
        let draws = self
            .objects
            .iter()
            .enumerate()
            .map(|(i, object)| DrawItem {
                mesh: MeshKey(i as u32),
                material: None,
                model: object.model_view,
            })
            .collect();
        Frame::Scene(SceneFrame {
            clear: Color::rgb(0.1, 0.1, 0.1),
            view_proj: projection(aspect),
            camera_position: Vec3::new(0.0, 0.0, 5.0),
            lighting: Lighting::default(),
            draws,
        })
    }

    fn status(&self) -> String {
        let octahedron = self.objects.iter().find(|o| o.bob.is_some());
        format!(
            "tick {} | octahedron y {:.2}{}",
            self.ticks,
            octahedron.map(Polyhedron::height).unwrap_or_default(),
            if self.paused { " [paused]" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assets_validate_with_one_mesh_per_object() {
        let sketch = PolyhedraSketch::default();
        let assets = sketch.scene_assets();
        assert_eq!(assets.meshes.len(), sketch.objects().len());
        assert!(assets.validate().is_ok());
        assert!(assets.materials.is_empty());
    }

    #[test]
    fn frame_clears_dark_grey() {
        let Frame::Scene(scene) = PolyhedraSketch::default().frame(16.0 / 9.0) else {
            panic!("polyhedra draw a scene");
        };
        assert_eq!(scene.clear, Color::rgb(0.1, 0.1, 0.1));
        assert_eq!(scene.draws.len(), 4);
        assert_eq!(scene.draws[3].mesh, MeshKey(3));
    }

    #[test]
    fn objects_are_visible_at_start() {
        let sketch = PolyhedraSketch::default();
        let Frame::Scene(scene) = sketch.frame(16.0 / 9.0) else {
            unreachable!()
        };
        for draw in &scene.draws {
            let clip = scene.view_proj * draw.model * Vec3::ZERO.extend(1.0);
            let ndc = clip.truncate() / clip.w;
            assert!(ndc.x.abs() < 1.0 && ndc.y.abs() < 1.0, "{ndc:?}");
            assert!((0.0..=1.0).contains(&ndc.z));
        }
    }

    #[test]
    fn ticking_rotates_and_reset_restores() {
        let mut sketch = PolyhedraSketch::default();
        let start: Vec<_> = sketch.objects().to_vec();
        let input = ActionState::new();
        for _ in 0..30 {
            sketch.tick(1.0 / 60.0, &input);
        }
        assert_ne!(sketch.objects(), start.as_slice());
        sketch.on_action(Action::Reset);
        assert_eq!(sketch.objects(), start.as_slice());
    }

    #[test]
    fn pause_freezes() {
        let mut sketch = PolyhedraSketch::default();
        sketch.on_action(Action::TogglePause);
        let start: Vec<_> = sketch.objects().to_vec();
        sketch.tick(1.0 / 60.0, &ActionState::new());
        assert_eq!(sketch.objects(), start.as_slice());
        assert!(sketch.status().contains("paused"));
    }
}
