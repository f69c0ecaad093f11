//! Height sub-state: rest height plus the jump arc layered on top of it.
//!
//! The arc is a triangular profile: height rises linearly to `max_height` at the
//! midpoint of `duration` and falls linearly back. The component never reads a
//! clock; callers pass the elapsed time since the jump started.

/// Jump timing and peak height. Only constructible with a positive duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpProfile {
    duration: f32,
    max_height: f32,
}

impl Default for JumpProfile {
    fn default() -> Self {
        Self {
            duration: 1.0,
            max_height: 2.0,
        }
    }
}

impl JumpProfile {
    /// `None` unless `duration` is finite and positive and `max_height` is
    /// finite and non-negative.
    pub fn new(duration: f32, max_height: f32) -> Option<Self> {
        let valid = duration.is_finite()
            && duration > 0.0
            && max_height.is_finite()
            && max_height >= 0.0;
        valid.then_some(Self {
            duration,
            max_height,
        })
    }

    /// Total air time in seconds.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Peak height above the rest height.
    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    /// Height offset `elapsed` seconds into the jump, or `None` once the jump is over.
    pub fn offset_at(&self, elapsed: f32) -> Option<f32> {
        if elapsed > self.duration {
            return None;
        }
        let t = elapsed.max(0.0) / self.duration;
        Some(self.max_height * (1.0 - (1.0 - 2.0 * t).abs()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpPhase {
    Grounded,
    Jumping,
}

/// Result of advancing the jump by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpTick {
    /// No jump in progress; nothing changed.
    Grounded,
    /// Still in the air at the given absolute height.
    Airborne { height: f32 },
    /// The arc finished this tick and the camera is back at rest height.
    Landed,
}

/// Rest height, live height and jump phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalState {
    base_height: f32,
    current_height: f32,
    phase: JumpPhase,
}

impl VerticalState {
    pub fn new(base_height: f32) -> Self {
        Self {
            base_height,
            current_height: base_height,
            phase: JumpPhase::Grounded,
        }
    }

    pub fn base_height(&self) -> f32 {
        self.base_height
    }

    pub fn current_height(&self) -> f32 {
        self.current_height
    }

    pub fn phase(&self) -> JumpPhase {
        self.phase
    }

    pub fn is_jumping(&self) -> bool {
        self.phase == JumpPhase::Jumping
    }

    pub fn can_jump(&self) -> bool {
        self.phase == JumpPhase::Grounded
    }

    /// Reconfigure the rest height. A grounded state follows it immediately.
    pub fn set_base_height(&mut self, height: f32) {
        self.base_height = height;
        if self.phase == JumpPhase::Grounded {
            self.current_height = height;
        }
    }

    /// Override the live height mid-jump. Ignored while grounded, where the
    /// live height always equals the rest height. Returns whether it applied.
    pub fn set_current_height(&mut self, height: f32) -> bool {
        if !self.is_jumping() {
            return false;
        }
        self.current_height = height;
        true
    }

    /// `Grounded -> Jumping`. Returns `false` if a jump is already in progress.
    pub fn start_jump(&mut self) -> bool {
        if !self.can_jump() {
            return false;
        }
        self.phase = JumpPhase::Jumping;
        true
    }

    /// `Jumping -> Grounded`, back at rest height.
    pub fn end_jump(&mut self) {
        self.phase = JumpPhase::Grounded;
        self.current_height = self.base_height;
    }

    /// Advance the arc. Pure with respect to the clock: the caller supplies `elapsed`.
    pub fn tick(&mut self, profile: &JumpProfile, elapsed: f32) -> JumpTick {
        if !self.is_jumping() {
            return JumpTick::Grounded;
        }
        match profile.offset_at(elapsed) {
            Some(offset) => {
                self.current_height = self.base_height + offset;
                JumpTick::Airborne {
                    height: self.current_height,
                }
            }
            None => {
                self.end_jump();
                JumpTick::Landed
            }
        }
    }
}
