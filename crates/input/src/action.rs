use glam::Vec2;
use meadowrun_common::Direction;

/// A high-level action produced by the input layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A movement key is held this frame.
    Move(Direction),
    /// Mouse-look delta in pixels. Positive `y` looks up.
    Look(Vec2),
    /// Scroll delta in lines. Positive values zoom in.
    Zoom(f32),
    /// Jump key is down.
    Jump,
    /// Begin the auto-move run from the initial phase.
    ConfirmStart,
    /// Start a new round after a win or a loss.
    Restart,
    /// No-op (used for input mapping that hasn't been bound yet).
    Noop,
}

impl Action {
    /// Look action from a raw pointer motion delta. Window coordinates grow
    /// downward, so the vertical axis is flipped.
    pub fn look_from_motion(dx: f64, dy: f64) -> Self {
        Action::Look(Vec2::new(dx as f32, -dy as f32))
    }
}
