use glam::Vec3;
use serde::{Deserialize, Serialize};

/// World-space up axis. The camera basis and the ground plane are built against it.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Discrete movement direction forwarded by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

impl Direction {
    /// Whether the direction strafes sideways rather than moving along the view.
    pub fn is_lateral(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// A grass tuft the player must not run into during the auto-move phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Vec3,
}

impl Obstacle {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }
}
