//! First-person camera shared by free-look navigation and the auto-move run.
//!
//! # Invariants
//! - `front`, `right` and `up` are unit length and mutually orthogonal after every
//!   yaw/pitch mutation.
//! - `position.y` is written only by the height sub-state (base height, jump arc);
//!   horizontal movement never touches it.

pub mod camera;
pub mod orientation;
pub mod vertical;

pub use camera::Camera;
pub use orientation::{Basis, Orientation, PITCH_LIMIT, YAW_LOCK_RANGE};
pub use vertical::{JumpPhase, JumpProfile, JumpTick, VerticalState};
