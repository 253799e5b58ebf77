use crate::action::{Action, UnknownAction};
use std::collections::BTreeMap;

/// Errors from building key bindings.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("binding for key {key}: {source}")]
    UnknownAction {
        key: String,
        #[source]
        source: UnknownAction,
    },
}

/// Key name to action table.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    keys: BTreeMap<String, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = [
            ("KeyW", Action::LeftPaddleUp),
            ("KeyS", Action::LeftPaddleDown),
            ("ArrowUp", Action::RightPaddleUp),
            ("ArrowDown", Action::RightPaddleDown),
            ("Equal", Action::DepthIncrease),
            ("NumpadAdd", Action::DepthIncrease),
            ("Minus", Action::DepthDecrease),
            ("NumpadSubtract", Action::DepthDecrease),
            ("KeyR", Action::Reset),
            ("KeyP", Action::TogglePause),
        ]
        .into_iter()
        .map(|(k, a)| (k.to_string(), a))
        .collect();
        Self { keys }
    }
}

impl KeyBindings {
    /// Default bindings with `overrides` (key name to action name) applied on top.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Result<Self, InputError> {
        let mut bindings = Self::default();
        for (key, action_name) in overrides {
            let action = action_name
                .parse::<Action>()
                .map_err(|source| InputError::UnknownAction {
                    key: key.clone(),
                    source,
                })?;
            tracing::debug!("binding {key} -> {action}");
            bindings.bind(key, action);
        }
        Ok(bindings)
    }

    pub fn bind(&mut self, key: &str, action: Action) {
        if action == Action::Noop {
            self.keys.remove(key);
        } else {
            self.keys.insert(key.to_string(), action);
        }
    }

    pub fn action_for(&self, key: &str) -> Option<Action> {
        self.keys.get(key).copied()
    }

    /// Keys bound to `action`, in key-name order.
    pub fn keys_for(&self, action: Action) -> Vec<&str> {
        self.keys
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| k.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paddle_keys() {
        let b = KeyBindings::default();
        assert_eq!(b.action_for("KeyW"), Some(Action::LeftPaddleUp));
        assert_eq!(b.action_for("KeyS"), Some(Action::LeftPaddleDown));
        assert_eq!(b.action_for("ArrowUp"), Some(Action::RightPaddleUp));
        assert_eq!(b.action_for("ArrowDown"), Some(Action::RightPaddleDown));
        assert_eq!(b.action_for("KeyQ"), None);
    }

    #[test]
    fn overrides_replace_defaults() {
        let mut overrides = BTreeMap::new();
        overrides.insert("KeyI".to_string(), "RightPaddleUp".to_string());
        overrides.insert("ArrowUp".to_string(), "Noop".to_string());
        let b = KeyBindings::with_overrides(&overrides).unwrap();
        assert_eq!(b.action_for("KeyI"), Some(Action::RightPaddleUp));
        assert_eq!(b.action_for("ArrowUp"), None);
        assert_eq!(b.keys_for(Action::RightPaddleUp), vec!["KeyI"]);
    }

    #[test]
    fn unknown_action_name_is_an_error() {
        let mut overrides = BTreeMap::new();
        overrides.insert("KeyX".to_string(), "Jump".to_string());
        let err = KeyBindings::with_overrides(&overrides).unwrap_err();
        assert!(err.to_string().contains("KeyX"));
    }

    #[test]
    fn depth_has_two_keys() {
        let b = KeyBindings::default();
        assert_eq!(b.keys_for(Action::DepthIncrease), vec!["Equal", "NumpadAdd"]);
    }
}
