use glam::Vec3;
use meadowrun_kernel::{GamePhase, Session};
use serde::Serialize;

/// Read-only queries against a session for debugging and overlays.
pub struct SessionInspector;

impl SessionInspector {
    /// Snapshot of the session at wall-clock time `now`.
    pub fn summary(session: &Session, now: f32) -> SessionSummary {
        let camera = session.camera();
        SessionSummary {
            phase: session.phase(),
            round: session.round(),
            seed: session.obstacles().seed(),
            position: camera.position(),
            yaw: camera.yaw(),
            pitch: camera.pitch(),
            zoom: camera.zoom(),
            jumping: camera.is_jumping(),
            obstacle_count: session.obstacles().len(),
            time_remaining: session.run_state().time_remaining(now),
        }
    }

    /// Obstacle closest to the camera on the XZ plane, with its horizontal distance.
    pub fn nearest_obstacle(session: &Session) -> Option<(usize, f32)> {
        let eye = session.camera().position();
        session
            .obstacles()
            .positions()
            .map(|p| Vec3::new(p.x - eye.x, 0.0, p.z - eye.z).length())
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub phase: GamePhase,
    pub round: u64,
    pub seed: u64,
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub zoom: f32,
    pub jumping: bool,
    pub obstacle_count: usize,
    pub time_remaining: Option<f32>,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Session: phase={:?} round={} seed={} pos=({:.2}, {:.2}, {:.2}) yaw={:.1} pitch={:.1} fov={:.0} obstacles={}",
            self.phase,
            self.round,
            self.seed,
            self.position.x,
            self.position.y,
            self.position.z,
            self.yaw,
            self.pitch,
            self.zoom,
            self.obstacle_count,
        )?;
        if let Some(t) = self.time_remaining {
            write!(f, " remaining={t:.2}s")?;
        }
        Ok(())
    }
}

/// Overlay text for the current phase.
pub fn hud_lines(summary: &SessionSummary) -> Vec<String> {
    match summary.phase {
        GamePhase::Idle => vec![
            "Press Enter to start".to_owned(),
            "WASD to move, Space to jump".to_owned(),
        ],
        GamePhase::AutoMoving => vec![
            format!("Time left: {:.1}s", summary.time_remaining.unwrap_or(0.0)),
            "A/D to dodge, Space to jump the grass".to_owned(),
        ],
        GamePhase::GameOver => vec!["Game over".to_owned(), "Press R to restart".to_owned()],
        GamePhase::GameSuccess => vec!["You made it!".to_owned(), "Press R to restart".to_owned()],
    }
}
