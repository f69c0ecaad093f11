use meadowrun_camera::Camera;
use meadowrun_common::Obstacle;
use serde::{Deserialize, Serialize};

use crate::config::{CollisionConfig, ConfigError};

/// Length of the auto-move run along negative Z.
pub const MAX_MOVE_DISTANCE: f32 = 45.0;

/// Coarse state of a round, derived from the run flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to confirm the start; free movement.
    Idle,
    /// Forced forward progress with lateral steering only.
    AutoMoving,
    /// Ran into an obstacle.
    GameOver,
    /// Reached the end of the run.
    GameSuccess,
}

impl GamePhase {
    pub fn is_finished(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::GameSuccess)
    }
}

/// What a single auto-move update did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutoMoveOutcome {
    /// Not auto-moving; nothing happened.
    Inactive,
    /// Moved forward; the run continues.
    Advanced,
    /// Touched the obstacle at this index. The camera did not move this tick.
    Collided { obstacle: usize },
    /// Time ran out without a collision.
    Completed,
}

/// Flags for one round of the corridor run.
///
/// Owned by the session and handed the camera explicitly; there is no shared
/// global state between sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRunState {
    is_auto_moving: bool,
    is_initial_phase: bool,
    auto_move_start_time: f32,
    auto_move_duration: f32,
    game_over: bool,
    game_success: bool,
    hit_box: CollisionConfig,
}

impl GameRunState {
    /// Fails unless `auto_move_duration` is finite and positive.
    pub fn new(auto_move_duration: f32, hit_box: CollisionConfig) -> Result<Self, ConfigError> {
        if !(auto_move_duration.is_finite() && auto_move_duration > 0.0) {
            return Err(ConfigError::Invalid {
                field: "auto_move.duration",
                reason: "must be greater than zero",
            });
        }
        Ok(Self {
            is_auto_moving: false,
            is_initial_phase: true,
            auto_move_start_time: 0.0,
            auto_move_duration,
            game_over: false,
            game_success: false,
            hit_box,
        })
    }

    pub fn is_auto_moving(&self) -> bool {
        self.is_auto_moving
    }

    pub fn is_initial_phase(&self) -> bool {
        self.is_initial_phase
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn game_success(&self) -> bool {
        self.game_success
    }

    pub fn auto_move_start_time(&self) -> f32 {
        self.auto_move_start_time
    }

    pub fn auto_move_duration(&self) -> f32 {
        self.auto_move_duration
    }

    pub fn phase(&self) -> GamePhase {
        if self.game_over {
            GamePhase::GameOver
        } else if self.game_success {
            GamePhase::GameSuccess
        } else if self.is_auto_moving {
            GamePhase::AutoMoving
        } else {
            GamePhase::Idle
        }
    }

    /// Forced forward speed in units per second.
    pub fn speed(&self) -> f32 {
        MAX_MOVE_DISTANCE / self.auto_move_duration
    }

    /// Seconds left in the current run, or `None` when not auto-moving.
    pub fn time_remaining(&self, current_time: f32) -> Option<f32> {
        self.is_auto_moving.then(|| {
            (self.auto_move_duration - (current_time - self.auto_move_start_time)).max(0.0)
        })
    }

    /// `Idle -> AutoMoving`. Engages the yaw lock. Returns `false` outside `Idle`.
    pub fn start_auto_move(&mut self, camera: &mut Camera, start_time: f32) -> bool {
        if self.phase() != GamePhase::Idle {
            tracing::debug!(phase = ?self.phase(), "ignoring auto-move start");
            return false;
        }
        self.is_auto_moving = true;
        self.is_initial_phase = false;
        self.auto_move_start_time = start_time;
        camera.lock_yaw();
        tracing::info!(start_time, duration = self.auto_move_duration, "auto-move started");
        true
    }

    /// One auto-move tick. Collision is checked first and wins over the
    /// time-out, so an obstacle at the finish line still ends the game.
    pub fn update_auto_move(
        &mut self,
        camera: &mut Camera,
        delta_time: f32,
        current_time: f32,
        obstacles: &[Obstacle],
    ) -> AutoMoveOutcome {
        if !self.is_auto_moving {
            return AutoMoveOutcome::Inactive;
        }

        if !camera.is_jumping() {
            let position = camera.position();
            if let Some(index) = obstacles
                .iter()
                .position(|o| self.hit_box.hits(position, o.position))
            {
                self.stop_auto_move(camera);
                self.game_over = true;
                tracing::info!(obstacle = index, ?position, "collision, game over");
                return AutoMoveOutcome::Collided { obstacle: index };
            }
        }

        camera.translate_horizontal(glam::Vec3::new(0.0, 0.0, -self.speed() * delta_time));

        let elapsed = current_time - self.auto_move_start_time;
        if elapsed >= self.auto_move_duration {
            self.stop_auto_move(camera);
            self.game_success = true;
            tracing::info!(elapsed, "auto-move complete, game success");
            return AutoMoveOutcome::Completed;
        }

        AutoMoveOutcome::Advanced
    }

    /// Leave auto-move and release the yaw lock.
    pub fn stop_auto_move(&mut self, camera: &mut Camera) {
        self.is_auto_moving = false;
        camera.release_yaw();
    }

    /// Back to the initial phase with both outcome flags cleared.
    pub fn reset(&mut self) {
        self.is_auto_moving = false;
        self.is_initial_phase = true;
        self.auto_move_start_time = 0.0;
        self.game_over = false;
        self.game_success = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn setup() -> (GameRunState, Camera) {
        (
            GameRunState::new(5.0, CollisionConfig::default()).unwrap(),
            Camera::default(),
        )
    }

    fn assert_flags_consistent(run: &GameRunState) {
        assert!(!(run.game_over() && run.game_success()));
        if run.is_auto_moving() {
            assert!(!run.game_over() && !run.game_success());
        }
    }

    #[test]
    fn starts_idle_in_initial_phase() {
        let (run, _) = setup();
        assert_eq!(run.phase(), GamePhase::Idle);
        assert!(run.is_initial_phase());
        assert_eq!(run.speed(), 9.0);
    }

    #[test]
    fn start_engages_yaw_lock() {
        let (mut run, mut cam) = setup();
        assert!(run.start_auto_move(&mut cam, 2.0));
        assert_eq!(run.phase(), GamePhase::AutoMoving);
        assert!(!run.is_initial_phase());
        assert!(cam.is_yaw_locked());
        assert_eq!(run.auto_move_start_time(), 2.0);
        assert!(!run.start_auto_move(&mut cam, 3.0));
        assert_eq!(run.auto_move_start_time(), 2.0);
    }

    #[test]
    fn update_when_idle_is_inactive() {
        let (mut run, mut cam) = setup();
        let before = cam.position();
        assert_eq!(
            run.update_auto_move(&mut cam, 0.1, 0.1, &[]),
            AutoMoveOutcome::Inactive
        );
        assert_eq!(cam.position(), before);
    }

    #[test]
    fn forced_progress_is_constant_speed() {
        let (mut run, mut cam) = setup();
        run.start_auto_move(&mut cam, 0.0);
        let z0 = cam.position().z;
        assert_eq!(
            run.update_auto_move(&mut cam, 0.5, 0.5, &[]),
            AutoMoveOutcome::Advanced
        );
        assert!((cam.position().z - (z0 - 4.5)).abs() < 1e-5);
        assert_eq!(cam.position().y, 1.0);
        assert_eq!(run.time_remaining(0.5), Some(4.5));
    }

    #[test]
    fn time_out_in_one_step_is_success() {
        let (mut run, mut cam) = setup();
        run.start_auto_move(&mut cam, 0.0);
        let outcome = run.update_auto_move(&mut cam, 5.0, 5.0, &[]);
        assert_eq!(outcome, AutoMoveOutcome::Completed);
        assert!(run.game_success());
        assert!(!run.is_auto_moving());
        assert!(!run.game_over());
        assert!(!cam.is_yaw_locked());
        assert!((cam.position().z - (6.0 - MAX_MOVE_DISTANCE)).abs() < 1e-4);
        assert_flags_consistent(&run);
    }

    #[test]
    fn collision_beats_time_out() {
        let (mut run, mut cam) = setup();
        let obstacles = [Obstacle::new(cam.position())];
        run.start_auto_move(&mut cam, 0.0);
        let before = cam.position();

        let outcome = run.update_auto_move(&mut cam, 5.0, 5.0, &obstacles);
        assert_eq!(outcome, AutoMoveOutcome::Collided { obstacle: 0 });
        assert!(run.game_over());
        assert!(!run.game_success());
        assert!(!run.is_auto_moving());
        assert!(!cam.is_yaw_locked());
        assert_eq!(cam.position(), before);
        assert_flags_consistent(&run);
    }

    #[test]
    fn non_positive_duration_is_rejected() {
        for duration in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                GameRunState::new(duration, CollisionConfig::default()),
                Err(ConfigError::Invalid {
                    field: "auto_move.duration",
                    ..
                })
            ));
        }
    }

    #[test]
    fn jumping_clears_obstacles() {
        let (mut run, mut cam) = setup();
        let obstacles = [Obstacle::new(cam.position())];
        run.start_auto_move(&mut cam, 0.0);
        cam.start_jump();
        assert_eq!(
            run.update_auto_move(&mut cam, 0.01, 0.01, &obstacles),
            AutoMoveOutcome::Advanced
        );
        assert!(!run.game_over());
    }

    #[test]
    fn obstacle_outside_lane_is_missed() {
        let (mut run, mut cam) = setup();
        let p = cam.position();
        let obstacles = [Obstacle::new(Vec3::new(p.x + 0.5, 0.5, p.z))];
        run.start_auto_move(&mut cam, 0.0);
        assert_eq!(
            run.update_auto_move(&mut cam, 0.01, 0.01, &obstacles),
            AutoMoveOutcome::Advanced
        );
    }

    #[test]
    fn first_hit_obstacle_index_is_reported() {
        let (mut run, mut cam) = setup();
        let p = cam.position();
        let obstacles = [
            Obstacle::new(Vec3::new(1.5, 0.5, -20.0)),
            Obstacle::new(Vec3::new(p.x + 0.2, 0.5, p.z - 0.05)),
        ];
        run.start_auto_move(&mut cam, 0.0);
        assert_eq!(
            run.update_auto_move(&mut cam, 0.01, 0.01, &obstacles),
            AutoMoveOutcome::Collided { obstacle: 1 }
        );
    }

    #[test]
    fn reset_restores_initial_phase() {
        let (mut run, mut cam) = setup();
        run.start_auto_move(&mut cam, 0.0);
        run.update_auto_move(&mut cam, 5.0, 5.0, &[]);
        assert_eq!(run.phase(), GamePhase::GameSuccess);

        run.reset();
        assert_eq!(run.phase(), GamePhase::Idle);
        assert!(run.is_initial_phase());
        assert!(!run.game_success());
        assert!(run.start_auto_move(&mut cam, 10.0));
    }

    #[test]
    fn finished_phases() {
        assert!(GamePhase::GameOver.is_finished());
        assert!(GamePhase::GameSuccess.is_finished());
        assert!(!GamePhase::Idle.is_finished());
        assert!(!GamePhase::AutoMoving.is_finished());
    }
}
