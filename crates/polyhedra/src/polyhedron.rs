use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_4, TAU};

/// Model-space step of the vertical bob, per tick.
pub const BOB_STEP: f32 = 0.025;
/// The bob reverses once the translation's Y passes this magnitude.
pub const BOB_LIMIT: f32 = 1.25;

/// Direction of the vertical bob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bob {
    Up,
    Down,
}

/// One animated object: mesh slot, model-view matrix and spin axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyhedron {
    pub name: &'static str,
    pub model_view: Mat4,
    pub axis: Vec3,
    /// `Some` for objects that bob up and down while spinning.
    pub bob: Option<Bob>,
    initial: Mat4,
    initial_bob: Option<Bob>,
}

impl Polyhedron {
    pub fn new(name: &'static str, translation: Vec3, axis: Vec3) -> Self {
        let model_view = Mat4::from_translation(translation);
        Self {
            name,
            model_view,
            axis: axis.normalize_or(Vec3::Y),
            bob: None,
            initial: model_view,
            initial_bob: None,
        }
    }

    /// Start bobbing, heading down first.
    pub fn bobbing(mut self) -> Self {
        self.bob = Some(Bob::Down);
        self.initial_bob = self.bob;
        self
    }

    /// Y component of the model-view translation.
    pub fn height(&self) -> f32 {
        self.model_view.w_axis.y
    }

    /// Advance by `dt` seconds; one full turn takes `duration` seconds.
    ///
    /// Both the bob and the spin are applied in model space, so the bob
    /// follows the object's current orientation.
    pub fn update(&mut self, dt: f32, duration: f32) {
        if self.bob == Some(Bob::Up) {
            self.translate_local(BOB_STEP);
            if self.height() > BOB_LIMIT {
                self.bob = Some(Bob::Down);
            }
        }
        if self.bob == Some(Bob::Down) {
            self.translate_local(-BOB_STEP);
            if self.height() < -BOB_LIMIT {
                self.bob = Some(Bob::Up);
            }
        }
        let angle = TAU * dt / duration;
        self.model_view *= Mat4::from_axis_angle(self.axis, angle);
    }

    fn translate_local(&mut self, dy: f32) {
        self.model_view *= Mat4::from_translation(Vec3::new(0.0, dy, 0.0));
    }

    pub fn reset(&mut self) {
        self.model_view = self.initial;
        self.bob = self.initial_bob;
    }
}

/// Perspective with a 45 degree field of view, pulled back 5 units.
pub fn projection(aspect: f32) -> Mat4 {
    Mat4::perspective_rh(FRAC_PI_4, aspect, 1.0, 100.0)
        * Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_translated() {
        let p = Polyhedron::new("cube", Vec3::new(1.5, 0.0, -5.0), Vec3::new(1.0, 1.0, 0.2));
        assert_eq!(p.model_view.w_axis.truncate(), Vec3::new(1.5, 0.0, -5.0));
        assert!((p.axis.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn spin_keeps_position() {
        let mut p = Polyhedron::new("cube", Vec3::new(-4.5, 0.0, -5.0), Vec3::Y);
        for _ in 0..90 {
            p.update(1.0 / 60.0, 10.0);
        }
        assert!((p.model_view.w_axis.truncate() - Vec3::new(-4.5, 0.0, -5.0)).length() < 1e-5);
    }

    #[test]
    fn full_turn_after_duration() {
        let mut p = Polyhedron::new("pyramid", Vec3::ZERO, Vec3::Y);
        for _ in 0..600 {
            p.update(1.0 / 60.0, 10.0);
        }
        assert!(p.model_view.abs_diff_eq(Mat4::IDENTITY, 1e-3));
    }

    #[test]
    fn bob_moves_down_first_then_reverses() {
        let mut p = Polyhedron::new("octahedron", Vec3::ZERO, Vec3::Y).bobbing();
        p.update(1.0 / 60.0, 10.0);
        assert!(p.height() < 0.0);

        let mut min = 0.0_f32;
        let mut max = 0.0_f32;
        let mut reversed = false;
        for _ in 0..1000 {
            p.update(1.0 / 60.0, 10.0);
            min = min.min(p.height());
            max = max.max(p.height());
            reversed |= p.bob == Some(Bob::Up);
        }
        assert!(reversed);
        assert!(min >= -BOB_LIMIT - 2.0 * BOB_STEP);
        assert!(max <= BOB_LIMIT + 2.0 * BOB_STEP);
        assert!(max > BOB_LIMIT - BOB_STEP);
    }

    #[test]
    fn reset_restores_start() {
        let mut p = Polyhedron::new("octahedron", Vec3::new(1.5, 0.0, -5.0), Vec3::Y).bobbing();
        let start = p.clone();
        for _ in 0..50 {
            p.update(1.0 / 60.0, 10.0);
        }
        p.reset();
        assert_eq!(p, start);
    }

    #[test]
    fn projection_pushes_origin_into_view() {
        let clip = projection(16.0 / 9.0) * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
