//! Input: raw key edges mapped to named logical actions.
//!
//! # Invariants
//! - Gameplay code consumes actions, never raw key events.
//! - Exactly one trigger type per action name; the last definition wins.
//! - An action bound to a key but never defined is a silent no-op.
//! - `pressed` fires once per physical down edge; auto-repeat never re-fires it.

pub mod action;
pub mod bindings;
pub mod router;

pub use action::{ActionCallback, ActionDefinition, ActionEvent, TriggerType};
pub use bindings::KeyBindings;
pub use router::{HeldDispatch, InputActionRouter};

pub fn crate_info() -> &'static str {
    "lemmings-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
