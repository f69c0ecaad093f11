//! Input layer: raw device events are translated into [`Action`]s and batched
//! into one [`FrameInput`] per frame.
//!
//! # Invariants
//! - The kernel consumes actions, never raw window events.
//! - Every frame carries its own `delta_time` and `current_time`.

pub mod action;
pub mod frame;

pub use action::Action;
pub use frame::FrameInput;
