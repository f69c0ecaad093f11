use glam::{Mat4, Vec3};
use meadowrun_camera::{Camera, JumpProfile, JumpTick};
use meadowrun_input::{Action, FrameInput};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, GameConfig};
use crate::obstacles::{ObstacleField, clock_seed, round_seed};
use crate::run_state::{AutoMoveOutcome, GamePhase, GameRunState};

/// A record of every round-level transition, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    AutoMoveStarted { at: f32 },
    Jumped { at: f32 },
    Landed { at: f32 },
    Collided { at: f32, obstacle: usize, position: Vec3 },
    Completed { at: f32, position: Vec3 },
    Restarted { round: u64, seed: u64 },
}

/// One player's game: camera, run flags, obstacles and jump timing.
///
/// The application drives it with one [`Session::tick`] per frame and reads the
/// view afterwards. Sessions share nothing, so several can run side by side.
#[derive(Debug, Clone)]
pub struct Session {
    config: GameConfig,
    camera: Camera,
    run: GameRunState,
    obstacles: ObstacleField,
    jump: JumpProfile,
    jump_started_at: Option<f32>,
    round: u64,
    event_log: Vec<GameEvent>,
}

impl Session {
    /// Validate `config` and spawn round 0.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let camera = config.camera.build();
        let run = GameRunState::new(config.auto_move.duration, config.collision)?;
        let jump = config.jump.profile()?;
        let obstacles = ObstacleField::generate(&config.corridor, next_seed(&config, 0));
        tracing::info!(seed = obstacles.seed(), obstacles = obstacles.len(), "session created");

        Ok(Self {
            config,
            camera,
            run,
            obstacles,
            jump,
            jump_started_at: None,
            round: 0,
            event_log: Vec::new(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn run_state(&self) -> &GameRunState {
        &self.run
    }

    pub fn phase(&self) -> GamePhase {
        self.run.phase()
    }

    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix()
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[GameEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Advance one frame: apply the frame's actions, then the horizontal
    /// (auto-move) update, then the vertical (jump) update.
    pub fn tick(&mut self, frame: &FrameInput) {
        let _span = tracing::trace_span!("session_tick", t = frame.current_time).entered();

        for action in frame.actions() {
            self.apply(action, frame.delta_time, frame.current_time);
        }
        self.horizontal_update(frame.delta_time, frame.current_time);
        self.vertical_update(frame.current_time);
    }

    fn apply(&mut self, action: &Action, delta_time: f32, now: f32) {
        match action {
            Action::Move(direction) => match self.run.phase() {
                GamePhase::AutoMoving => self.camera.move_lateral_only(*direction, delta_time),
                GamePhase::Idle => self.camera.move_free(*direction, delta_time),
                GamePhase::GameOver | GamePhase::GameSuccess => {}
            },
            Action::Look(delta) => self.camera.process_mouse_movement(delta.x, delta.y, true),
            Action::Zoom(lines) => self.camera.process_mouse_scroll(*lines),
            Action::Jump => {
                if !self.run.phase().is_finished() && self.camera.start_jump() {
                    self.jump_started_at = Some(now);
                    tracing::debug!(at = now, "jump");
                    self.event_log.push(GameEvent::Jumped { at: now });
                }
            }
            Action::ConfirmStart => {
                if self.run.is_initial_phase() && self.run.start_auto_move(&mut self.camera, now) {
                    self.event_log.push(GameEvent::AutoMoveStarted { at: now });
                }
            }
            Action::Restart => {
                if self.run.phase().is_finished() {
                    self.restart();
                }
            }
            Action::Noop => {}
        }
    }

    /// Auto-move step against the current obstacle list.
    pub fn horizontal_update(&mut self, delta_time: f32, now: f32) -> AutoMoveOutcome {
        let outcome = self.run.update_auto_move(
            &mut self.camera,
            delta_time,
            now,
            self.obstacles.as_slice(),
        );
        let position = self.camera.position();
        match outcome {
            AutoMoveOutcome::Collided { obstacle } => {
                self.event_log.push(GameEvent::Collided {
                    at: now,
                    obstacle,
                    position,
                });
            }
            AutoMoveOutcome::Completed => {
                self.event_log
                    .push(GameEvent::Completed { at: now, position });
            }
            AutoMoveOutcome::Inactive | AutoMoveOutcome::Advanced => {}
        }
        outcome
    }

    /// Jump arc step. Writes `position.y` last so the view sees this frame's height.
    pub fn vertical_update(&mut self, now: f32) -> JumpTick {
        let Some(started_at) = self.jump_started_at else {
            return JumpTick::Grounded;
        };
        let tick = self.camera.tick_jump(&self.jump, now - started_at);
        if tick == JumpTick::Landed {
            self.jump_started_at = None;
            self.event_log.push(GameEvent::Landed { at: now });
        }
        tick
    }

    /// Start a new round: clear the outcome, return to the spawn point and
    /// regenerate obstacles. The run begins again on the next confirm.
    pub fn restart(&mut self) {
        self.run.stop_auto_move(&mut self.camera);
        self.run.reset();
        self.camera.end_jump();
        self.jump_started_at = None;
        self.camera.reset_to_start_position();

        self.round += 1;
        self.obstacles =
            ObstacleField::generate(&self.config.corridor, next_seed(&self.config, self.round));
        tracing::info!(round = self.round, seed = self.obstacles.seed(), "round restarted");
        self.event_log.push(GameEvent::Restarted {
            round: self.round,
            seed: self.obstacles.seed(),
        });
    }
}

fn next_seed(config: &GameConfig, round: u64) -> u64 {
    match config.seed {
        Some(base) => round_seed(base, round),
        None => clock_seed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use meadowrun_common::Direction;

    const DT: f32 = 1.0 / 120.0;

    fn seeded(seed: u64) -> GameConfig {
        GameConfig {
            seed: Some(seed),
            ..GameConfig::default()
        }
    }

    fn frame(i: u32) -> FrameInput {
        FrameInput::new(DT, i as f32 * DT)
    }

    /// Tick until the round finishes or `limit` frames pass. Returns the frame index.
    fn run_until_finished(session: &mut Session, start: u32, limit: u32) -> u32 {
        for i in start..start + limit {
            session.tick(&frame(i));
            if session.phase().is_finished() {
                return i;
            }
        }
        start + limit
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = GameConfig::default();
        config.auto_move.duration = -1.0;
        assert!(Session::new(config).is_err());
    }

    #[test]
    fn fixed_seed_reproduces_obstacles() {
        let a = Session::new(seeded(42)).unwrap();
        let b = Session::new(seeded(42)).unwrap();
        assert_eq!(a.obstacles(), b.obstacles());
        assert_eq!(a.obstacles().len(), 5);
    }

    #[test]
    fn idle_allows_free_movement() {
        let mut s = Session::new(seeded(1)).unwrap();
        s.tick(&frame(1).with(Action::Move(Direction::Forward)));
        assert!(s.camera().position().z < 6.0);
        assert_eq!(s.phase(), GamePhase::Idle);
    }

    #[test]
    fn empty_corridor_run_succeeds() {
        let mut config = seeded(1);
        config.corridor.count = 0;
        let mut s = Session::new(config).unwrap();

        s.tick(&frame(0).with(Action::ConfirmStart));
        assert_eq!(s.phase(), GamePhase::AutoMoving);

        let end = run_until_finished(&mut s, 1, 1000);
        assert_eq!(s.phase(), GamePhase::GameSuccess);
        assert!(end >= 599);
        assert!(!s.camera().is_yaw_locked());
        assert!(matches!(
            s.events().last(),
            Some(GameEvent::Completed { .. })
        ));
    }

    #[test]
    fn centered_obstacles_end_the_run() {
        let mut config = seeded(5);
        config.corridor.half_width = 0.0;
        let mut s = Session::new(config).unwrap();

        s.tick(&frame(0).with(Action::ConfirmStart));
        run_until_finished(&mut s, 1, 1000);

        assert_eq!(s.phase(), GamePhase::GameOver);
        assert!(s.run_state().game_over());
        assert!(!s.run_state().game_success());
        assert!(
            s.events()
                .iter()
                .any(|e| matches!(e, GameEvent::Collided { .. }))
        );
    }

    #[test]
    fn forward_keys_are_ignored_while_auto_moving() {
        let mut config = seeded(3);
        config.corridor.count = 0;
        let mut a = Session::new(config.clone()).unwrap();
        let mut b = Session::new(config).unwrap();
        a.tick(&frame(0).with(Action::ConfirmStart));
        b.tick(&frame(0).with(Action::ConfirmStart));

        for i in 1..30 {
            a.tick(&frame(i).with(Action::Move(Direction::Forward)));
            b.tick(&frame(i).with(Action::Move(Direction::Backward)));
        }
        assert_eq!(a.camera().position(), b.camera().position());
    }

    #[test]
    fn strafing_while_auto_moving_keeps_height() {
        let mut config = seeded(3);
        config.corridor.count = 0;
        let mut s = Session::new(config).unwrap();
        s.tick(&frame(0).with(Action::ConfirmStart));
        for i in 1..30 {
            s.tick(&frame(i).with(Action::Move(Direction::Left)));
        }
        assert!(s.camera().position().x < 0.0);
        assert_eq!(s.camera().position().y, 1.0);
    }

    #[test]
    fn jump_rises_and_lands() {
        let mut s = Session::new(seeded(9)).unwrap();
        s.tick(&FrameInput::new(DT, 0.0).with(Action::Jump));
        assert!(s.camera().is_jumping());

        s.tick(&FrameInput::new(DT, 0.5));
        assert_eq!(s.camera().position().y, 3.0);

        // holding jump mid-air does not restart the arc
        s.tick(&FrameInput::new(DT, 0.75).with(Action::Jump));
        assert_eq!(s.camera().position().y, 2.0);

        s.tick(&FrameInput::new(DT, 1.1));
        assert!(!s.camera().is_jumping());
        assert_eq!(s.camera().position().y, 1.0);

        assert_eq!(s.events().len(), 2);
        assert!(matches!(s.events()[0], GameEvent::Jumped { at } if at == 0.0));
        assert!(matches!(s.events()[1], GameEvent::Landed { .. }));
    }

    #[test]
    fn restart_after_finish_resets_round() {
        let mut config = seeded(5);
        config.corridor.half_width = 0.0;
        let mut s = Session::new(config).unwrap();
        let first_field = s.obstacles().clone();

        // restart is ignored while a round is still open
        s.tick(&frame(0).with(Action::Restart));
        assert_eq!(s.round(), 0);

        s.tick(&frame(1).with(Action::ConfirmStart));
        let end = run_until_finished(&mut s, 2, 1000);
        assert!(s.phase().is_finished());

        // movement is frozen until restart
        let frozen = s.camera().position();
        s.tick(&frame(end + 1).with(Action::Move(Direction::Left)));
        assert_eq!(s.camera().position(), frozen);

        s.tick(&frame(end + 2).with(Action::Restart));
        assert_eq!(s.phase(), GamePhase::Idle);
        assert!(s.run_state().is_initial_phase());
        assert_eq!(s.round(), 1);
        assert_eq!(s.camera().position(), s.camera().start_position());
        assert_ne!(s.obstacles(), &first_field);
        assert!(matches!(
            s.events().last(),
            Some(GameEvent::Restarted { round: 1, .. })
        ));
    }

    #[test]
    fn look_and_zoom_reach_the_camera() {
        let mut s = Session::new(seeded(2)).unwrap();
        s.tick(
            &frame(1)
                .with(Action::Look(Vec2::new(0.0, 4000.0)))
                .with(Action::Zoom(10.0)),
        );
        assert_eq!(s.camera().pitch(), 89.0);
        assert_eq!(s.camera().zoom(), 35.0);
    }

    #[test]
    fn drain_events_clears_log() {
        let mut s = Session::new(seeded(2)).unwrap();
        s.tick(&frame(0).with(Action::ConfirmStart));
        let events = s.drain_events();
        assert_eq!(events, vec![GameEvent::AutoMoveStarted { at: 0.0 }]);
        assert!(s.events().is_empty());
    }

    #[test]
    fn sessions_do_not_share_state() {
        let mut a = Session::new(seeded(4)).unwrap();
        let b = Session::new(seeded(4)).unwrap();
        a.tick(&frame(0).with(Action::ConfirmStart));
        assert_eq!(a.phase(), GamePhase::AutoMoving);
        assert_eq!(b.phase(), GamePhase::Idle);
    }
}
