//! Developer tooling: read-only views of a running session for the HUD and the
//! CLI, and a headless fixed-timestep runner.

mod inspector;
mod simulate;

pub use inspector::{SessionInspector, SessionSummary, hud_lines};
pub use simulate::{SimulationPlan, SimulationReport, simulate};
