use glam::Vec2;
use std::fmt;
use std::str::FromStr;

/// A high-level action a sketch can react to.
///
/// Discrete actions come from bound keys and can be held; `Orbit` and `Zoom`
/// come from the pointer and are delivered once per event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    LeftPaddleUp,
    LeftPaddleDown,
    RightPaddleUp,
    RightPaddleDown,
    /// Add one level of fractal recursion.
    DepthIncrease,
    /// Remove one level of fractal recursion.
    DepthDecrease,
    /// Restore the sketch's initial state.
    Reset,
    /// Freeze or resume ticking.
    TogglePause,
    /// Pointer drag, in physical pixels.
    Orbit(Vec2),
    /// Scroll amount; positive zooms in.
    Zoom(f32),
    /// No-op (used for input mapping that hasn't been bound yet).
    Noop,
}

impl Action {
    /// Name used in key binding configuration, for discrete actions.
    pub fn name(&self) -> Option<&'static str> {
        Some(match self {
            Action::LeftPaddleUp => "LeftPaddleUp",
            Action::LeftPaddleDown => "LeftPaddleDown",
            Action::RightPaddleUp => "RightPaddleUp",
            Action::RightPaddleDown => "RightPaddleDown",
            Action::DepthIncrease => "DepthIncrease",
            Action::DepthDecrease => "DepthDecrease",
            Action::Reset => "Reset",
            Action::TogglePause => "TogglePause",
            Action::Noop => "Noop",
            Action::Orbit(_) | Action::Zoom(_) => return None,
        })
    }

    /// Whether the action can be held down (comes from a key).
    pub fn is_discrete(&self) -> bool {
        self.name().is_some()
    }
}

/// Error for an unknown action name in a binding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action {0:?}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "LeftPaddleUp" => Action::LeftPaddleUp,
            "LeftPaddleDown" => Action::LeftPaddleDown,
            "RightPaddleUp" => Action::RightPaddleUp,
            "RightPaddleDown" => Action::RightPaddleDown,
            "DepthIncrease" => Action::DepthIncrease,
            "DepthDecrease" => Action::DepthDecrease,
            "Reset" => Action::Reset,
            "TogglePause" => Action::TogglePause,
            "Noop" => Action::Noop,
            other => return Err(UnknownAction(other.to_string())),
        })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Orbit(d) => write!(f, "Orbit({:.1}, {:.1})", d.x, d.y),
            Action::Zoom(z) => write!(f, "Zoom({z:.2})"),
            discrete => f.write_str(discrete.name().unwrap_or("?")),
        }
    }
}

/// Set of discrete actions currently held down.
#[derive(Debug, Clone, Default)]
pub struct ActionState {
    held: Vec<Action>,
}

impl ActionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an action as held. Returns `true` if it was not held before.
    pub fn press(&mut self, action: Action) -> bool {
        if !action.is_discrete() || self.is_held(action) {
            return false;
        }
        self.held.push(action);
        true
    }

    /// Release an action. Returns `true` if it was held.
    pub fn release(&mut self, action: Action) -> bool {
        let before = self.held.len();
        self.held.retain(|a| *a != action);
        self.held.len() != before
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn held(&self) -> &[Action] {
        &self.held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for action in [
            Action::LeftPaddleUp,
            Action::LeftPaddleDown,
            Action::RightPaddleUp,
            Action::RightPaddleDown,
            Action::DepthIncrease,
            Action::DepthDecrease,
            Action::Reset,
            Action::TogglePause,
            Action::Noop,
        ] {
            let name = action.name().unwrap();
            assert_eq!(name.parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn pointer_actions_have_no_name() {
        assert!(Action::Orbit(Vec2::ONE).name().is_none());
        assert!(!Action::Zoom(1.0).is_discrete());
        assert!("Orbit".parse::<Action>().is_err());
    }

    #[test]
    fn press_and_release() {
        let mut state = ActionState::new();
        assert!(state.press(Action::LeftPaddleUp));
        assert!(!state.press(Action::LeftPaddleUp));
        assert!(state.is_held(Action::LeftPaddleUp));
        assert!(!state.is_held(Action::LeftPaddleDown));

        assert!(state.release(Action::LeftPaddleUp));
        assert!(!state.is_held(Action::LeftPaddleUp));
        assert!(!state.release(Action::LeftPaddleUp));
    }

    #[test]
    fn pointer_actions_are_never_held() {
        let mut state = ActionState::new();
        assert!(!state.press(Action::Zoom(2.0)));
        assert!(state.held().is_empty());
    }

    #[test]
    fn clear_releases_everything() {
        let mut state = ActionState::new();
        state.press(Action::LeftPaddleUp);
        state.press(Action::RightPaddleDown);
        state.clear();
        assert!(state.held().is_empty());
    }

    #[test]
    fn display_formats() {
        assert_eq!(Action::Reset.to_string(), "Reset");
        assert_eq!(Action::Zoom(0.5).to_string(), "Zoom(0.50)");
    }
}
