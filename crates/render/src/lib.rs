//! Rendering adapter: turns a camera and an obstacle list into a renderer-agnostic
//! frame description.
//!
//! # Invariants
//! - Nothing here mutates game state; a frame is derived from a camera snapshot,
//!   the obstacle positions and the wall clock.
//! - Billboards are ordered back-to-front by distance from the eye. Equal
//!   distances keep their input order.

mod renderer;
mod scene;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use scene::{
    DrawItem, DrawKind, FrameScene, PointLight, SceneLayout, directional_marker,
    light_positions, sort_back_to_front,
};
