use glam::Vec3;
use meadowrun_camera::{Camera, JumpProfile};
use meadowrun_common::WORLD_UP;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a [`GameConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Spawn pose and look/move tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub spawn: Vec3,
    /// Degrees.
    pub yaw: f32,
    /// Degrees.
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    /// Initial field of view in degrees.
    pub zoom: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            spawn: Vec3::new(0.0, 1.0, 6.0),
            yaw: -90.0,
            pitch: 0.0,
            movement_speed: 2.5,
            mouse_sensitivity: 0.05,
            zoom: 45.0,
        }
    }
}

impl CameraConfig {
    pub fn build(&self) -> Camera {
        Camera::new(self.spawn, WORLD_UP, self.yaw, self.pitch)
            .with_movement_speed(self.movement_speed)
            .with_mouse_sensitivity(self.mouse_sensitivity)
            .with_zoom(self.zoom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Seconds in the air.
    pub duration: f32,
    pub max_height: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        let profile = JumpProfile::default();
        Self {
            duration: profile.duration(),
            max_height: profile.max_height(),
        }
    }
}

impl JumpConfig {
    pub fn profile(&self) -> Result<JumpProfile, ConfigError> {
        JumpProfile::new(self.duration, self.max_height).ok_or(ConfigError::Invalid {
            field: "jump",
            reason: "duration must be greater than zero and max_height non-negative",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoMoveConfig {
    /// Seconds to cover the whole run. Must be positive.
    pub duration: f32,
}

impl Default for AutoMoveConfig {
    fn default() -> Self {
        Self { duration: 5.0 }
    }
}

/// Region the obstacles are scattered in: `x` in `[-half_width, half_width]`,
/// `z` in `[-length, 0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorridorConfig {
    pub half_width: f32,
    pub length: f32,
    pub count: usize,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            half_width: 1.8,
            length: 35.0,
            count: 5,
        }
    }
}

/// Hit box around each obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Maximum `|Δz|` that counts as touching.
    pub depth_tolerance: f32,
    /// Half extent along `x`.
    pub half_width: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            depth_tolerance: 0.1,
            half_width: 0.3,
        }
    }
}

impl CollisionConfig {
    /// Whether an eye at `position` touches an obstacle at `obstacle`. Height is ignored.
    pub fn hits(&self, position: Vec3, obstacle: Vec3) -> bool {
        (position.z - obstacle.z).abs() < self.depth_tolerance
            && position.x >= obstacle.x - self.half_width
            && position.x <= obstacle.x + self.half_width
    }
}

/// Complete game configuration, loadable from YAML. Every section falls back to
/// its defaults when omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub camera: CameraConfig,
    pub jump: JumpConfig,
    pub auto_move: AutoMoveConfig,
    pub corridor: CorridorConfig,
    pub collision: CollisionConfig,
    /// Fixed obstacle seed. `None` reseeds from the wall clock every round.
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded game config");
        Ok(config)
    }

    /// Load `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Reject configurations the game loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.camera;
        ensure(c.spawn.is_finite(), "camera.spawn", "must be finite")?;
        ensure(c.yaw.is_finite(), "camera.yaw", "must be finite")?;
        ensure(c.pitch.is_finite(), "camera.pitch", "must be finite")?;
        ensure(
            c.movement_speed.is_finite() && c.movement_speed >= 0.0,
            "camera.movement_speed",
            "must be a non-negative number",
        )?;
        ensure(
            c.mouse_sensitivity.is_finite(),
            "camera.mouse_sensitivity",
            "must be finite",
        )?;
        ensure(c.zoom.is_finite(), "camera.zoom", "must be finite")?;

        ensure(
            self.jump.duration.is_finite() && self.jump.duration > 0.0,
            "jump.duration",
            "must be greater than zero",
        )?;
        ensure(
            self.jump.max_height.is_finite() && self.jump.max_height >= 0.0,
            "jump.max_height",
            "must be a non-negative number",
        )?;
        ensure(
            self.auto_move.duration.is_finite() && self.auto_move.duration > 0.0,
            "auto_move.duration",
            "must be greater than zero",
        )?;
        ensure(
            self.corridor.half_width.is_finite() && self.corridor.half_width >= 0.0,
            "corridor.half_width",
            "must be a non-negative number",
        )?;
        ensure(
            self.corridor.length.is_finite() && self.corridor.length >= 0.0,
            "corridor.length",
            "must be a non-negative number",
        )?;
        ensure(
            self.collision.depth_tolerance.is_finite() && self.collision.depth_tolerance >= 0.0,
            "collision.depth_tolerance",
            "must be a non-negative number",
        )?;
        ensure(
            self.collision.half_width.is_finite() && self.collision.half_width >= 0.0,
            "collision.half_width",
            "must be a non-negative number",
        )?;
        Ok(())
    }
}

fn ensure(ok: bool, field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason })
    }
}
