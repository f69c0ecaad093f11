use meadowrun_common::Direction;
use meadowrun_input::{Action, FrameInput};
use meadowrun_kernel::{ConfigError, GameConfig, GameEvent, GamePhase, Session};
use serde::Serialize;

use crate::inspector::{SessionInspector, SessionSummary};

/// Scripted input for a headless round.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationPlan {
    /// Fixed timestep in seconds.
    pub delta_time: f32,
    /// Held for the whole run when set.
    pub strafe: Option<Direction>,
    /// Run times (seconds after the start) at which jump is pressed.
    pub jump_at: Vec<f32>,
    /// Hard stop, in frames, in case the round never finishes.
    pub max_frames: u32,
}

impl Default for SimulationPlan {
    fn default() -> Self {
        Self {
            delta_time: 1.0 / 60.0,
            strafe: None,
            jump_at: Vec::new(),
            max_frames: 100_000,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub phase: GamePhase,
    pub frames: u32,
    pub elapsed: f32,
    pub summary: SessionSummary,
    pub events: Vec<GameEvent>,
}

impl std::fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Outcome: {:?} after {} frames ({:.2}s)",
            self.phase, self.frames, self.elapsed
        )?;
        writeln!(f, "{}", self.summary)?;
        for event in &self.events {
            writeln!(f, "  {event:?}")?;
        }
        Ok(())
    }
}

/// Play one round start to finish with a fixed timestep. The clock starts at
/// zero and auto-move is confirmed on the first frame.
pub fn simulate(config: GameConfig, plan: &SimulationPlan) -> Result<SimulationReport, ConfigError> {
    let mut session = Session::new(config)?;
    let mut pending_jumps = plan.jump_at.clone();
    pending_jumps.sort_by(f32::total_cmp);
    let mut pending_jumps = pending_jumps.into_iter().peekable();

    let mut frames = 0u32;
    let mut now = 0.0f32;
    while frames < plan.max_frames {
        let mut frame = FrameInput::new(plan.delta_time, now);
        if frames == 0 {
            frame.push(Action::ConfirmStart);
        }
        if let Some(direction) = plan.strafe {
            frame.push(Action::Move(direction));
        }
        if pending_jumps.next_if(|&t| t <= now).is_some() {
            frame.push(Action::Jump);
        }
        session.tick(&frame);
        frames += 1;

        if session.phase().is_finished() {
            break;
        }
        now = frames as f32 * plan.delta_time;
    }

    tracing::info!(phase = ?session.phase(), frames, "simulation finished");
    Ok(SimulationReport {
        phase: session.phase(),
        frames,
        elapsed: now,
        summary: SessionInspector::summary(&session, now),
        events: session.drain_events(),
    })
}
