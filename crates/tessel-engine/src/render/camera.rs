use glam::{Mat4, Vec3, Vec4};

use super::drawable::roll_pitch_yaw;

pub const NEAR_PLANE: f32 = 0.5;
pub const FAR_PLANE: f32 = 1000.0;

const DEFAULT_DISTANCE: f32 = 70.0;
const MIN_DISTANCE: f32 = 0.01;
const MAX_DISTANCE: f32 = 500.0;

/// Orbit camera looking at the origin.
///
/// `theta` and `phi` move the eye around the origin at `distance`; `pitch`,
/// `yaw` and `roll` turn the view in place afterwards. Angles are radians.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneCamera {
    pub distance: f32,
    pub theta: f32,
    pub phi: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Default for SceneCamera {
    fn default() -> Self {
        Self {
            distance: DEFAULT_DISTANCE,
            theta: 0.0,
            phi: 0.0,
            pitch: 0.0,
            yaw: 0.0,
            roll: 0.0,
        }
    }
}

impl SceneCamera {
    pub fn eye(&self) -> Vec3 {
        roll_pitch_yaw(self.phi, self.theta, 0.0).transform_point3(Vec3::new(0.0, 0.0, -self.distance))
    }

    pub fn view(&self) -> Mat4 {
        roll_pitch_yaw(self.pitch, -self.yaw, self.roll) * Mat4::look_at_lh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    pub fn orbit(&mut self, d_theta: f32, d_phi: f32) {
        self.theta += d_theta;
        self.phi += d_phi;
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Left-handed perspective with a view volume one unit wide at the near
/// plane and `height / width` tall. Depth maps to 0..1.
pub fn projection(width: u32, height: u32) -> Mat4 {
    let w = 1.0;
    let h = height.max(1) as f32 / width.max(1) as f32;
    let (n, f) = (NEAR_PLANE, FAR_PLANE);
    let range = f / (f - n);
    Mat4::from_cols(
        Vec4::new(2.0 * n / w, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 * n / h, 0.0, 0.0),
        Vec4::new(0.0, 0.0, range, 1.0),
        Vec4::new(0.0, 0.0, -range * n, 0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-3
    }

    #[test]
    fn default_eye_is_behind_origin() {
        let cam = SceneCamera::default();
        assert!(close(cam.eye(), Vec3::new(0.0, 0.0, -70.0)));
        // The origin lands straight ahead at the orbit distance.
        assert!(close(cam.view().transform_point3(Vec3::ZERO), Vec3::new(0.0, 0.0, 70.0)));
    }

    #[test]
    fn theta_orbits_about_y() {
        let mut cam = SceneCamera::default();
        cam.orbit(std::f32::consts::FRAC_PI_2, 0.0);
        assert!(close(cam.eye(), Vec3::new(-70.0, 0.0, 0.0)));
        assert!(close(cam.view().transform_point3(Vec3::ZERO), Vec3::new(0.0, 0.0, 70.0)));
    }

    #[test]
    fn zoom_is_clamped_and_reset_restores() {
        let mut cam = SceneCamera::default();
        cam.zoom(-1000.0);
        assert_eq!(cam.distance, MIN_DISTANCE);
        cam.zoom(10_000.0);
        assert_eq!(cam.distance, MAX_DISTANCE);
        cam.roll = 1.0;
        cam.reset();
        assert_eq!(cam, SceneCamera::default());
    }

    #[test]
    fn projection_maps_near_and_far_to_unit_depth() {
        let p = projection(1280, 720);
        let near = p * Vec4::new(0.0, 0.0, NEAR_PLANE, 1.0);
        let far = p * Vec4::new(0.0, 0.0, FAR_PLANE, 1.0);
        assert!((near.z / near.w).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-5);
    }

    #[test]
    fn projection_height_follows_aspect() {
        let p = projection(1600, 900);
        // Edge of the near plane's view volume lands on clip x = ±1.
        let edge = p * Vec4::new(0.5, 900.0 / 1600.0 / 2.0, NEAR_PLANE, 1.0);
        assert!((edge.x / edge.w - 1.0).abs() < 1e-5);
        assert!((edge.y / edge.w - 1.0).abs() < 1e-5);
    }
}
