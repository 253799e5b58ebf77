//! Input vocabulary shared by the sketches.
//!
//! The host translates window events into [`Action`]s; sketches never see raw
//! key codes. Held actions live in an [`ActionState`] that sketches poll each
//! tick, which is how the paddles keep moving while a key stays down.
//!
//! # Invariants
//! - Key names follow winit's `KeyCode` debug names (`KeyW`, `ArrowUp`, ...),
//!   so this crate does not depend on winit.
//! - Releasing a key always releases its action.

pub mod action;
pub mod bindings;

pub use action::{Action, ActionState};
pub use bindings::{InputError, KeyBindings};

pub fn crate_info() -> &'static str {
    "sketchbook-input v0.1.0"
}
