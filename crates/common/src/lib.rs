//! Shared value types used by the camera, kernel, input and render crates.

pub mod types;

pub use types::{Direction, Obstacle, WORLD_UP};
