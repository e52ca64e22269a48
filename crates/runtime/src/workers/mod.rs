//! Worker tasks that back the stage orchestration.
//!
//! The stage worker serializes every mutation of the population arena and
//! every draw call; everything else talks to it through commands.

mod metrics;
mod stage;

pub use metrics::{RenderMetrics, RenderSnapshot};
pub use stage::{Command, StageWorker};
