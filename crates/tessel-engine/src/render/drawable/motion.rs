use std::f32::consts::{PI, TAU};

use glam::{EulerRot, Mat4, Vec3};
use rand::Rng;

/// Roll-pitch-yaw rotation (roll about Z, then pitch about X, then yaw about Y).
pub fn roll_pitch_yaw(pitch: f32, yaw: f32, roll: f32) -> Mat4 {
    Mat4::from_euler(EulerRot::YXZ, yaw, pitch, roll)
}

/// Animation state of one instance.
///
/// The naming is historical and does not match the math: `position` holds
/// angles that orbit the object around the origin, and `radius` is the
/// translation applied between the two rotations.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Motion {
    pub radius: Vec3,
    pub position: Vec3,
    pub rotation: Vec3,
    pub local_velocity: Vec3,
    pub world_velocity: Vec3,
}

fn random_vec3(rng: &mut impl Rng, min: f32, max: f32) -> Vec3 {
    Vec3::new(
        rng.gen_range(min..max),
        rng.gen_range(min..max),
        rng.gen_range(min..max),
    )
}

impl Motion {
    /// Scattered start state used for scene population.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            radius: random_vec3(rng, 5.0, 50.0),
            position: random_vec3(rng, 0.1, TAU),
            rotation: random_vec3(rng, 0.1, TAU),
            local_velocity: random_vec3(rng, 0.1, TAU),
            world_velocity: random_vec3(rng, 0.1, PI / 4.0),
        }
    }

    /// Everything zero: the transform is the identity until `set_position`.
    pub fn at_rest() -> Self {
        Self {
            radius: Vec3::ZERO,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            local_velocity: Vec3::ZERO,
            world_velocity: Vec3::ZERO,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.position += self.local_velocity * dt;
        self.rotation += self.world_velocity * dt;
    }

    /// rotation(position) then translation(radius) then rotation(rotation),
    /// applied to the object in that order.
    pub fn transform(&self) -> Mat4 {
        let p = self.position;
        let r = self.rotation;
        roll_pitch_yaw(r.x, r.y, r.z) * Mat4::from_translation(self.radius) * roll_pitch_yaw(p.x, p.y, p.z)
    }

    /// Writes the translation offset. Reads of `position` are unaffected.
    pub fn set_position(&mut self, offset: Vec3) {
        self.radius = offset;
    }
}
