use glam::{Mat4, Vec3};
use meadowrun_common::{Direction, WORLD_UP};

use crate::orientation::{Basis, Orientation};
use crate::vertical::{JumpProfile, JumpTick, VerticalState};

/// Default camera values.
pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const DEFAULT_SPEED: f32 = 2.5;
pub const DEFAULT_SENSITIVITY: f32 = 0.05;
pub const DEFAULT_ZOOM: f32 = 45.0;

/// Bounds for the zoom (field of view, degrees).
pub const ZOOM_MIN: f32 = 1.0;
pub const ZOOM_MAX: f32 = 45.0;

/// Bounds for the mouse sensitivity (degrees per pixel).
pub const SENSITIVITY_MIN: f32 = 0.005;
pub const SENSITIVITY_MAX: f32 = 1.0;

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;

/// First-person camera with yaw/pitch look, ground-locked movement and a jump arc.
///
/// Horizontal position is driven by [`Camera::move_free`], [`Camera::move_lateral_only`]
/// and [`Camera::translate_horizontal`]. The vertical component is owned by the
/// height sub-state and only changes through the height/jump operations.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    start_position: Vec3,
    world_up: Vec3,
    orientation: Orientation,
    basis: Basis,
    vertical: VerticalState,
    movement_speed: f32,
    mouse_sensitivity: f32,
    zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Vec3::new(0.0, 1.0, 6.0),
            WORLD_UP,
            DEFAULT_YAW,
            DEFAULT_PITCH,
        )
    }
}

impl Camera {
    /// Spawn a camera. The spawn height becomes the rest height and the spawn
    /// position is snapshotted for [`Camera::reset_to_start_position`].
    pub fn new(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let orientation = Orientation::new(yaw, pitch);
        Self {
            position,
            start_position: position,
            world_up,
            basis: orientation.basis(world_up),
            orientation,
            vertical: VerticalState::new(position.y),
            movement_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
        }
    }

    pub fn with_movement_speed(mut self, speed: f32) -> Self {
        self.movement_speed = speed;
        self
    }

    pub fn with_mouse_sensitivity(mut self, sensitivity: f32) -> Self {
        self.set_mouse_sensitivity(sensitivity);
        self
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn start_position(&self) -> Vec3 {
        self.start_position
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    pub fn front(&self) -> Vec3 {
        self.basis.front
    }

    pub fn right(&self) -> Vec3 {
        self.basis.right
    }

    pub fn up(&self) -> Vec3 {
        self.basis.up
    }

    pub fn yaw(&self) -> f32 {
        self.orientation.yaw()
    }

    pub fn pitch(&self) -> f32 {
        self.orientation.pitch()
    }

    pub fn is_yaw_locked(&self) -> bool {
        self.orientation.is_yaw_locked()
    }

    /// Field of view in degrees.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Units per second for keyboard movement.
    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn mouse_sensitivity(&self) -> f32 {
        self.mouse_sensitivity
    }

    pub fn set_mouse_sensitivity(&mut self, sensitivity: f32) {
        self.mouse_sensitivity = sensitivity.clamp(SENSITIVITY_MIN, SENSITIVITY_MAX);
    }

    pub fn vertical(&self) -> &VerticalState {
        &self.vertical
    }

    pub fn base_height(&self) -> f32 {
        self.vertical.base_height()
    }

    pub fn current_height(&self) -> f32 {
        self.vertical.current_height()
    }

    pub fn is_jumping(&self) -> bool {
        self.vertical.is_jumping()
    }

    // ---- movement ----

    /// Free navigation: forward/backward along the horizontal projection of
    /// `front`, left/right along the strafe axis.
    pub fn move_free(&mut self, direction: Direction, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        let displacement = match direction {
            Direction::Forward => self.basis.horizontal_front() * velocity,
            Direction::Backward => -self.basis.horizontal_front() * velocity,
            Direction::Left => -self.basis.strafe() * velocity,
            Direction::Right => self.basis.strafe() * velocity,
        };
        self.translate_horizontal(displacement);
    }

    /// Auto-move steering: only left/right nudges are honored; forward and
    /// backward are dropped without touching any state.
    pub fn move_lateral_only(&mut self, direction: Direction, delta_time: f32) {
        if direction.is_lateral() {
            self.move_free(direction, delta_time);
        }
    }

    /// Add a displacement to the position, ignoring its vertical component.
    pub fn translate_horizontal(&mut self, delta: Vec3) {
        self.position.x += delta.x;
        self.position.z += delta.z;
    }

    // ---- look ----

    /// Mouse-look: offsets are in pixels and scaled by the sensitivity.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.orientation.rotate(
            x_offset * self.mouse_sensitivity,
            y_offset * self.mouse_sensitivity,
            constrain_pitch,
        );
        self.update_camera_vectors();
    }

    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn lock_yaw(&mut self) {
        self.orientation.lock_yaw();
        self.update_camera_vectors();
    }

    pub fn release_yaw(&mut self) {
        self.orientation.release_yaw();
        self.update_camera_vectors();
    }

    // ---- height ----

    pub fn set_base_height(&mut self, height: f32) {
        self.vertical.set_base_height(height);
        self.position.y = self.vertical.current_height();
    }

    /// Push a live height into `position.y` mid-jump. Ignored while grounded.
    pub fn update_height(&mut self, height: f32) {
        if self.vertical.set_current_height(height) {
            self.position.y = height;
        }
    }

    pub fn can_jump(&self) -> bool {
        self.vertical.can_jump()
    }

    pub fn start_jump(&mut self) -> bool {
        self.vertical.start_jump()
    }

    pub fn end_jump(&mut self) {
        self.vertical.end_jump();
        self.position.y = self.vertical.base_height();
    }

    /// Vertical half of the per-frame update. Must run after all horizontal
    /// updates of the same frame and before the view matrix is read.
    pub fn tick_jump(&mut self, profile: &JumpProfile, elapsed: f32) -> JumpTick {
        let tick = self.vertical.tick(profile, elapsed);
        if tick != JumpTick::Grounded {
            self.position.y = self.vertical.current_height();
        }
        tick
    }

    /// Back to the spawn point at rest height. Any jump in progress is cancelled.
    pub fn reset_to_start_position(&mut self) {
        self.vertical.end_jump();
        self.position = self.start_position;
        self.position.y = self.vertical.base_height();
        self.update_camera_vectors();
    }

    // ---- view ----

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.basis.front, self.basis.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    fn update_camera_vectors(&mut self) {
        self.basis = self.orientation.basis(self.world_up);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn spawn() -> Camera {
        Camera::new(Vec3::new(0.0, 1.0, 6.0), WORLD_UP, -90.0, 0.0)
    }

    #[test]
    fn default_camera() {
        let cam = Camera::default();
        assert_eq!(cam.position(), Vec3::new(0.0, 1.0, 6.0));
        assert_eq!(cam.base_height(), 1.0);
        assert_eq!(cam.zoom(), 45.0);
        let vp = cam.view_projection(4.0 / 3.0);
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn free_forward_moves_along_view() {
        let mut cam = spawn();
        cam.move_free(Direction::Forward, 1.0);
        assert!((cam.position().z - (6.0 - DEFAULT_SPEED)).abs() < EPS);
        assert!(cam.position().x.abs() < EPS);
    }

    #[test]
    fn free_movement_never_changes_height() {
        let mut cam = spawn();
        cam.process_mouse_movement(0.0, 45.0 / DEFAULT_SENSITIVITY, true);
        assert!((cam.pitch() - 45.0).abs() < 1e-3);
        for dir in [
            Direction::Forward,
            Direction::Backward,
            Direction::Left,
            Direction::Right,
        ] {
            cam.move_free(dir, 0.5);
            assert_eq!(cam.position().y, 1.0);
        }
    }

    #[test]
    fn pitched_forward_uses_horizontal_projection() {
        let mut cam = spawn();
        cam.process_mouse_movement(0.0, 60.0 / DEFAULT_SENSITIVITY, true);
        cam.move_free(Direction::Forward, 1.0);
        let travelled = 6.0 - cam.position().z;
        let expected = DEFAULT_SPEED * cam.pitch().to_radians().cos();
        assert!((travelled - expected).abs() < 1e-4);
    }

    #[test]
    fn strafe_right_moves_positive_x() {
        let mut cam = spawn();
        cam.move_free(Direction::Right, 1.0);
        assert!((cam.position().x - DEFAULT_SPEED).abs() < EPS);
        cam.move_free(Direction::Left, 2.0);
        assert!((cam.position().x + DEFAULT_SPEED).abs() < EPS);
    }

    #[test]
    fn lateral_only_ignores_forward_and_backward() {
        let mut cam = spawn();
        let before = cam.position();
        cam.move_lateral_only(Direction::Forward, 1.0);
        cam.move_lateral_only(Direction::Backward, 1.0);
        assert_eq!(cam.position(), before);

        cam.move_lateral_only(Direction::Left, 0.4);
        assert!((cam.position().x + DEFAULT_SPEED * 0.4).abs() < EPS);
        assert_eq!(cam.position().z, before.z);
    }

    #[test]
    fn zero_delta_time_is_noop() {
        let mut cam = spawn();
        let before = cam.position();
        cam.move_free(Direction::Forward, 0.0);
        assert_eq!(cam.position(), before);
    }

    #[test]
    fn pitch_clamp_from_cumulative_mouse() {
        let mut cam = spawn();
        // 4000 px * 0.05 deg/px = 200 degrees
        for _ in 0..40 {
            cam.process_mouse_movement(0.0, 100.0, true);
        }
        assert_eq!(cam.pitch(), 89.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = spawn();
        cam.process_mouse_scroll(100.0);
        assert_eq!(cam.zoom(), 1.0);
        cam.process_mouse_scroll(-100.0);
        assert_eq!(cam.zoom(), 45.0);
        cam.process_mouse_scroll(5.0);
        assert_eq!(cam.zoom(), 40.0);
    }

    #[test]
    fn sensitivity_is_clamped() {
        let mut cam = spawn();
        cam.set_mouse_sensitivity(10.0);
        assert_eq!(cam.mouse_sensitivity(), SENSITIVITY_MAX);
        cam.set_mouse_sensitivity(0.0);
        assert_eq!(cam.mouse_sensitivity(), SENSITIVITY_MIN);
    }

    #[test]
    fn yaw_lock_refreshes_basis() {
        let mut cam = spawn();
        cam.process_mouse_movement(1200.0, 0.0, true); // yaw -30
        cam.lock_yaw();
        assert_eq!(cam.yaw(), -45.0);
        let expected = Basis::from_euler(-45.0, 0.0, WORLD_UP);
        assert!((cam.front() - expected.front).length() < EPS);
        cam.release_yaw();
        assert!(!cam.is_yaw_locked());
    }

    #[test]
    fn jump_writes_position_y() {
        let mut cam = spawn();
        let profile = JumpProfile::default();
        assert!(cam.start_jump());
        assert_eq!(
            cam.tick_jump(&profile, 0.5),
            JumpTick::Airborne { height: 3.0 }
        );
        assert_eq!(cam.position().y, 3.0);
        assert_eq!(cam.tick_jump(&profile, 1.2), JumpTick::Landed);
        assert_eq!(cam.position().y, 1.0);
        assert!(cam.can_jump());
    }

    #[test]
    fn set_base_height_moves_camera() {
        let mut cam = spawn();
        cam.set_base_height(2.5);
        assert_eq!(cam.position().y, 2.5);
        assert_eq!(cam.current_height(), 2.5);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut cam = spawn();
        cam.move_free(Direction::Forward, 3.0);
        cam.move_free(Direction::Left, 1.0);
        assert!(cam.start_jump());
        cam.update_height(2.0);
        assert_eq!(cam.position().y, 2.0);

        cam.reset_to_start_position();
        let first = cam.position();
        cam.reset_to_start_position();
        let second = cam.position();

        assert_eq!(first, second);
        assert_eq!(first, cam.start_position());
        assert_eq!(first.y, cam.base_height());
        assert_eq!(cam.current_height(), cam.base_height());
        assert!(!cam.is_jumping());
        assert!(cam.can_jump());
    }

    #[test]
    fn movement_speed_scales_free_movement() {
        let mut cam = spawn().with_movement_speed(4.0);
        assert_eq!(cam.movement_speed(), 4.0);
        cam.move_free(Direction::Right, 0.5);
        assert!((cam.position().x - 2.0).abs() < EPS);
    }

    #[test]
    fn grounded_height_update_is_ignored() {
        let mut cam = spawn();
        cam.update_height(2.0);
        assert_eq!(cam.position().y, 1.0);
        assert_eq!(cam.current_height(), cam.base_height());
    }

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let cam = spawn();
        let eye_in_view = cam.view_matrix().transform_point3(cam.position());
        assert!(eye_in_view.length() < EPS);
        let ahead = cam.view_matrix().transform_point3(cam.position() + cam.front());
        assert!((ahead - Vec3::new(0.0, 0.0, -1.0)).length() < EPS);
    }
}
