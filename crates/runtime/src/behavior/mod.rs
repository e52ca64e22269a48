//! Actor behaviors and the autonomous selector that sequences them.

mod agent;
mod selector;

pub use agent::{ActorAgent, BehaviorOutcome};
pub use selector::{AutonomousBehavior, SelectorExit};
