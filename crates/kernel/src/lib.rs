//! Game kernel: configuration, obstacle corridor, auto-move state machine and
//! the per-frame session that composes them with the camera.
//!
//! # Invariants
//! - At most one of `game_over` / `game_success` is set, and neither while auto-moving.
//! - Within a tick: input actions, then the horizontal (auto-move) update, then the
//!   vertical (jump) update. The view is read after the tick completes.
//! - Every session owns its own run state and obstacle list; nothing is process-global.

pub mod config;
pub mod obstacles;
pub mod run_state;
pub mod session;

pub use config::{
    AutoMoveConfig, CameraConfig, CollisionConfig, ConfigError, CorridorConfig, GameConfig,
    JumpConfig,
};
pub use obstacles::{ObstacleField, OBSTACLE_Y, clock_seed, generate, round_seed};
pub use run_state::{AutoMoveOutcome, GamePhase, GameRunState, MAX_MOVE_DISTANCE};
pub use session::{GameEvent, Session};
