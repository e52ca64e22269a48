//! Watch-channel signals shared between the stage worker and actor tasks.
//!
//! - [`TerminationSignal`] fires once when an actor commits to dying and
//!   replays to listeners that subscribe afterwards.
//! - [`RefreshSource`] publishes display refresh ticks that pace the frame
//!   drivers and the render scheduler.

mod refresh;
mod termination;

pub use refresh::{RefreshSignal, RefreshSource};
pub use termination::{TerminationListener, TerminationSignal};
