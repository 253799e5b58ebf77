use glam::{Mat4, Vec3};

/// Orbit camera: circles a target point at a distance, like a turntable.
///
/// Dragging changes yaw/pitch, scrolling dollies in and out. Pitch is clamped
/// short of the poles so the up vector never flips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 10.0,
            yaw: 0.0,
            pitch: 0.0,
            fov: 45.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            sensitivity: 0.005,
            min_distance: 0.5,
            max_distance: 500.0,
        }
    }
}

const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

impl OrbitCamera {
    /// Camera at `eye` looking at `target`.
    pub fn from_position(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(f32::EPSILON);
        Self {
            target,
            distance,
            yaw: offset.z.atan2(offset.x),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            ..Self::default()
        }
    }

    pub fn position(&self) -> Vec3 {
        self.target
            + self.distance
                * Vec3::new(
                    self.pitch.cos() * self.yaw.cos(),
                    self.pitch.sin(),
                    self.pitch.cos() * self.yaw.sin(),
                )
    }

    /// Orbit by a pointer delta in pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Dolly by scroll steps; positive moves closer.
    pub fn zoom(&mut self, steps: f32) {
        self.distance =
            (self.distance * 0.9_f32.powf(steps)).clamp(self.min_distance, self.max_distance);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_position_round_trips() {
        let eye = Vec3::new(5.0, 2.0, -1.3);
        let cam = OrbitCamera::from_position(eye, Vec3::ZERO);
        assert!((cam.position() - eye).length() < 1e-4);
    }

    #[test]
    fn default_camera() {
        let cam = OrbitCamera::default();
        let vp = cam.view_projection();
        // Should produce a valid matrix (no NaN)
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn rotate_keeps_distance() {
        let mut cam = OrbitCamera::from_position(Vec3::new(3.0, 1.0, 4.0), Vec3::ZERO);
        let d = cam.position().length();
        cam.rotate(120.0, -40.0);
        assert!((cam.position().length() - d).abs() < 1e-4);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = OrbitCamera::default();
        cam.rotate(0.0, 1e6);
        assert!(cam.pitch <= PITCH_LIMIT);
        cam.rotate(0.0, -1e6);
        assert!(cam.pitch >= -PITCH_LIMIT);
    }

    #[test]
    fn zoom_moves_closer_within_limits() {
        let mut cam = OrbitCamera::default();
        let start = cam.distance;
        cam.zoom(1.0);
        assert!(cam.distance < start);
        cam.zoom(-1000.0);
        assert_eq!(cam.distance, cam.max_distance);
        cam.zoom(1000.0);
        assert_eq!(cam.distance, cam.min_distance);
    }

    #[test]
    fn target_projects_to_screen_centre() {
        let cam = OrbitCamera::from_position(Vec3::new(0.0, 3.0, 8.0), Vec3::ZERO);
        let clip = cam.view_projection() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
