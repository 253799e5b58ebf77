use crate::catalog::Catalog;
use crate::system::{BuildOptions, SolarSystem, initial_eye};
use glam::Vec3;
use sketchbook_common::{Color, SolarConfig, SplitMix64};
use sketchbook_input::{Action, ActionState};
use sketchbook_render::{Frame, OrbitCamera, SceneAssets, SceneFrame, Sketch};

/// Interactive solar system with an orbit camera.
#[derive(Debug, Clone)]
pub struct SolarSketch {
    system: SolarSystem,
    camera: OrbitCamera,
    rng: SplitMix64,
    duration: f32,
    paused: bool,
    ticks: u64,
}

impl SolarSketch {
    pub fn new(catalog: &Catalog, config: &SolarConfig, seed: u64) -> Self {
        let mut rng = SplitMix64::new(seed);
        let options = BuildOptions {
            asteroids: config.asteroids,
            ..BuildOptions::default()
        };
        let system = SolarSystem::build(catalog, options, &mut rng);
        tracing::info!(
            planets = system.planets().len(),
            moons = system.moon_count(),
            asteroids = system.asteroid_count(),
            "solar system ready"
        );
        Self {
            system,
            camera: Self::initial_camera(),
            rng,
            duration: config.duration,
            paused: false,
            ticks: 0,
        }
    }

    fn initial_camera() -> OrbitCamera {
        OrbitCamera {
            fov: 45.0_f32.to_radians(),
            near: 1.0,
            far: 4000.0,
            min_distance: 1.5,
            max_distance: 50.0,
            ..OrbitCamera::from_position(initial_eye(), Vec3::ZERO)
        }
    }

    pub fn system(&self) -> &SolarSystem {
        &self.system
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Sketch for SolarSketch {
    fn name(&self) -> &'static str {
        "solar"
    }

    fn scene_assets(&self) -> SceneAssets {
        self.system.assets().clone()
    }

    fn tick(&mut self, dt: f32, _input: &ActionState) {
        if self.paused {
            return;
        }
        self.system.animate(dt, self.duration, &mut self.rng);
        self.ticks += 1;
    }

    fn on_action(&mut self, action: Action) {
        match action {
            Action::Orbit(delta) => self.camera.rotate(-delta.x, delta.y),
            Action::Zoom(steps) => self.camera.zoom(steps),
            Action::Reset => self.camera = Self::initial_camera(),
            Action::TogglePause => self.paused = !self.paused,
            _ => {}
        }
    }

    fn frame(&self, aspect: f32) -> Frame {
        let camera = OrbitCamera {
            aspect,
            ..self.camera
        };
        Frame::Scene(SceneFrame {
            clear: Color::BLACK,
            view_proj: camera.view_projection(),
            camera_position: camera.position(),
            lighting: self.system.lighting(),
            draws: self.system.draws(),
        })
    }

    fn status(&self) -> String {
        format!(
            "tick {} | {} planets, {} moons, {} asteroids | distance {:.2}{}",
            self.ticks,
            self.system.planets().len(),
            self.system.moon_count(),
            self.system.asteroid_count(),
            self.camera.distance,
            if self.paused { " [paused]" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn sketch() -> SolarSketch {
        SolarSketch::new(&Catalog::builtin().unwrap(), &SolarConfig::default(), 42)
    }

    #[test]
    fn starts_at_configured_eye() {
        let s = sketch();
        assert!((s.camera().position() - Vec3::new(5.0, 2.0, -1.3)).length() < 1e-4);
        assert_eq!(s.camera().near, 1.0);
        assert_eq!(s.camera().far, 4000.0);
    }

    #[test]
    fn frame_draws_every_mesh_node() {
        let s = sketch();
        let Frame::Scene(scene) = s.frame(16.0 / 9.0) else {
            panic!("solar draws a scene");
        };
        assert_eq!(scene.draws.len(), 118);
        assert!(scene.lighting.point.is_some());
        assert!(scene.draws.iter().all(|d| d.material.is_some()));
    }

    #[test]
    fn zoom_and_reset() {
        let mut s = sketch();
        let start = s.camera().distance;
        s.on_action(Action::Zoom(3.0));
        assert!(s.camera().distance < start);
        s.on_action(Action::Orbit(Vec2::new(40.0, 10.0)));
        s.on_action(Action::Reset);
        assert!((s.camera().distance - start).abs() < 1e-5);
    }

    #[test]
    fn pause_stops_animation() {
        let mut s = sketch();
        let input = ActionState::new();
        s.on_action(Action::TogglePause);
        let before = s.system().draws();
        s.tick(1.0 / 60.0, &input);
        assert_eq!(s.system().draws(), before);
        assert_eq!(s.ticks(), 0);
        s.on_action(Action::TogglePause);
        s.tick(1.0 / 60.0, &input);
        assert_ne!(s.system().draws(), before);
    }

    #[test]
    fn asteroid_count_follows_config() {
        let config = SolarConfig {
            asteroids: 5,
            ..SolarConfig::default()
        };
        let s = SolarSketch::new(&Catalog::builtin().unwrap(), &config, 1);
        assert_eq!(s.system().asteroid_count(), 5);
    }
}
