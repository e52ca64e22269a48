//! Pure data model for the sprite stage.
//!
//! `stage-core` defines the canonical types (geometry, frame crop tables,
//! animation clips, species, actor state) and the population arena
//! [`StageState`]. Everything here is synchronous and deterministic given an
//! RNG; the async orchestration lives in the `runtime` crate, which owns a
//! single [`StageState`] inside its stage worker.
pub mod actor;
pub mod animation;
pub mod behavior;
pub mod config;
pub mod frames;
pub mod geometry;
pub mod species;
pub mod state;

pub use actor::{ActorId, ActorState, Role};
pub use animation::{AnimationClip, FrameCycle};
pub use behavior::{BehaviorKind, BehaviorPlan, Direction};
pub use config::{DelayRange, StageConfig};
pub use frames::{CropTable, FrameCrop, SpriteFrame};
pub use geometry::{Bounds, Point, Rect, Size};
pub use species::{Clips, SpeciesError, SpeciesSpec};
pub use state::{Placement, StageState};
