use crate::action::Action;

/// Everything the core needs for one tick: timing plus the actions observed
/// since the previous frame, in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Seconds since the previous frame. Assumed non-negative.
    pub delta_time: f32,
    /// Seconds since the application started.
    pub current_time: f32,
    actions: Vec<Action>,
}

impl FrameInput {
    pub fn new(delta_time: f32, current_time: f32) -> Self {
        Self {
            delta_time,
            current_time,
            actions: Vec::new(),
        }
    }

    /// Builder-style push.
    pub fn with(mut self, action: Action) -> Self {
        self.push(action);
        self
    }

    pub fn push(&mut self, action: Action) {
        if action != Action::Noop {
            self.actions.push(action);
        }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
