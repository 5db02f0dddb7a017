use std::fmt;

/// States of a render target's build cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    Building,
}

impl RenderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Building => "building",
        }
    }
}

impl fmt::Display for RenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Events driving the render cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEvent {
    Start,
    Finish,
}

#[derive(Debug, Clone)]
pub struct RenderStateMachine {
    state: RenderState,
}

impl RenderStateMachine {
    pub fn new() -> Self {
        Self { state: RenderState::Idle }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Consumes an event and transitions the state.
    /// Returns Ok previous_state on success, Err if invalid transition.
    pub fn consume(&mut self, event: RenderEvent) -> Result<RenderState, String> {
        let prev_state = self.state;
        let new_state = match (prev_state, event) {
            (RenderState::Idle, RenderEvent::Start) => RenderState::Building,
            (RenderState::Building, RenderEvent::Finish) => RenderState::Idle,
            _ => return Err(format!("Invalid transition from {:?} with event {:?}", prev_state, event)),
        };

        self.state = new_state;
        Ok(prev_state)
    }

    pub fn is_building(&self) -> bool {
        self.state == RenderState::Building
    }
}

impl Default for RenderStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
