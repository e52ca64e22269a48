//! Pointer-driven attacker control.

mod controller;

pub use controller::{AttackTrigger, AttackerController, AttackerMode, ControllerState, PointerEvent};
