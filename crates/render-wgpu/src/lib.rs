//! wgpu render backend.
//!
//! Draws a [`meadowrun_render::FrameScene`]: lit ground, curbs and crates,
//! flat-coloured light markers, then alpha-blended grass quads.
//!
//! # Invariants
//! - The renderer only reads the frame and view it is handed.
//! - Grass is drawn after all opaque geometry, in the order given, with depth writes off.

mod gpu;
mod shaders;

pub use gpu::WgpuRenderer;
