//! Stage lifecycle events.
//!
//! The stage worker owns a single `broadcast` sender; every subscriber sees
//! the same ordered stream of [`StageEvent`]s.

mod stage_event;

pub use stage_event::StageEvent;
