use glam::Vec3;
use std::ops::RangeInclusive;

/// Pitch is kept inside `[-PITCH_LIMIT, PITCH_LIMIT]` degrees so the basis never flips.
pub const PITCH_LIMIT: f32 = 89.0;

/// Yaw window (degrees) enforced while the yaw lock is engaged. Centered on -90,
/// which looks down the negative Z corridor.
pub const YAW_LOCK_RANGE: RangeInclusive<f32> = -135.0..=-45.0;

/// Orthonormal view basis derived from yaw and pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub front: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Basis {
    /// Build the basis for `yaw`/`pitch` given in degrees.
    pub fn from_euler(yaw: f32, pitch: f32, world_up: Vec3) -> Self {
        let (yaw_sin, yaw_cos) = yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = pitch.to_radians().sin_cos();

        let front = Vec3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize();
        let right = front.cross(world_up).normalize();
        let up = right.cross(front).normalize();

        Self { front, right, up }
    }

    /// Strafe axis, `normalize(front × up)`.
    pub fn strafe(&self) -> Vec3 {
        self.front.cross(self.up).normalize()
    }

    /// Front vector with its vertical component dropped. Not renormalized, so
    /// looking up or down slows forward walking.
    pub fn horizontal_front(&self) -> Vec3 {
        Vec3::new(self.front.x, 0.0, self.front.z)
    }
}

/// Yaw/pitch pair in degrees plus the optional yaw lock used during auto-move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    yaw: f32,
    pitch: f32,
    yaw_locked: bool,
}

impl Orientation {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self {
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            yaw_locked: false,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn is_yaw_locked(&self) -> bool {
        self.yaw_locked
    }

    /// Apply an angular delta in degrees.
    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32, constrain_pitch: bool) {
        self.yaw += yaw_delta;
        self.pitch += pitch_delta;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
        if self.yaw_locked {
            self.yaw = clamp_to_lock(self.yaw);
        }
    }

    /// Engage the yaw lock. A yaw already outside the window snaps to its nearest edge.
    pub fn lock_yaw(&mut self) {
        self.yaw_locked = true;
        self.yaw = clamp_to_lock(self.yaw);
    }

    pub fn release_yaw(&mut self) {
        self.yaw_locked = false;
    }

    pub fn basis(&self, world_up: Vec3) -> Basis {
        Basis::from_euler(self.yaw, self.pitch, world_up)
    }
}

fn clamp_to_lock(yaw: f32) -> f32 {
    yaw.clamp(*YAW_LOCK_RANGE.start(), *YAW_LOCK_RANGE.end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meadowrun_common::WORLD_UP;

    const EPS: f32 = 1e-5;

    #[test]
    fn basis_is_orthonormal_over_sampled_angles() {
        let mut yaw = -360.0;
        while yaw <= 360.0 {
            let mut pitch = -89.0;
            while pitch <= 89.0 {
                let b = Basis::from_euler(yaw, pitch, WORLD_UP);
                assert!((b.front.length() - 1.0).abs() < EPS, "yaw={yaw} pitch={pitch}");
                assert!((b.right.length() - 1.0).abs() < EPS, "yaw={yaw} pitch={pitch}");
                assert!((b.up.length() - 1.0).abs() < EPS, "yaw={yaw} pitch={pitch}");
                assert!(b.front.dot(b.right).abs() < EPS);
                assert!(b.front.dot(b.up).abs() < EPS);
                assert!(b.right.dot(b.up).abs() < EPS);
                pitch += 7.5;
            }
            yaw += 15.0;
        }
    }

    #[test]
    fn default_yaw_looks_down_negative_z() {
        let b = Basis::from_euler(-90.0, 0.0, WORLD_UP);
        assert!((b.front - Vec3::NEG_Z).length() < EPS);
        assert!((b.right - Vec3::X).length() < EPS);
        assert!((b.up - Vec3::Y).length() < EPS);
    }

    #[test]
    fn strafe_axis_is_horizontal() {
        let b = Basis::from_euler(-60.0, 40.0, WORLD_UP);
        assert!(b.strafe().y.abs() < EPS);
        assert!((b.strafe() - b.right).length() < EPS);
    }

    #[test]
    fn pitch_clamps_to_limit() {
        let mut o = Orientation::new(-90.0, 0.0);
        o.rotate(0.0, 200.0, true);
        assert_eq!(o.pitch(), 89.0);
        o.rotate(0.0, -500.0, true);
        assert_eq!(o.pitch(), -89.0);
    }

    #[test]
    fn unconstrained_pitch_is_not_clamped() {
        let mut o = Orientation::new(-90.0, 0.0);
        o.rotate(0.0, 95.0, false);
        assert_eq!(o.pitch(), 95.0);
    }

    #[test]
    fn yaw_lock_confines_rotation() {
        let mut o = Orientation::new(-90.0, 0.0);
        o.lock_yaw();
        o.rotate(120.0, 0.0, true);
        assert_eq!(o.yaw(), -45.0);
        o.rotate(-400.0, 0.0, true);
        assert_eq!(o.yaw(), -135.0);

        o.release_yaw();
        o.rotate(-10.0, 0.0, true);
        assert_eq!(o.yaw(), -145.0);
    }

    #[test]
    fn locking_snaps_outside_yaw() {
        let mut o = Orientation::new(10.0, 0.0);
        o.lock_yaw();
        assert_eq!(o.yaw(), -45.0);
    }
}
