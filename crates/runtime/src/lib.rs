//! Async orchestration for the sprite stage.
//!
//! This crate wires the pure `stage-core` model into a running stage: a
//! worker task owns the population arena and the drawing surface, actor
//! behaviors run as cancelable tasks, and attacks flow through the
//! retaliation pipeline. Consumers build a [`Stage`] and interact with it
//! through [`StageHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the handle, errors and collaborator traits
//! - [`behavior`], [`lifecycle`], [`combat`] and [`input`] implement the
//!   actor pipelines
//! - [`signals`], [`animation`] and [`render`] provide the pacing primitives
//! - [`headless`] supplies collaborators for tests and headless shells
pub mod animation;
pub mod api;
pub mod behavior;
pub mod combat;
pub mod events;
pub mod headless;
pub mod input;
pub mod lifecycle;
pub mod render;
pub mod runtime;
pub mod signals;

mod workers;

pub use animation::FrameDriver;
pub use api::{
    DrawingSurface, FrameAck, FrameUpdate, ImageHandle, ImageLoadError, ImageLoader, Result,
    RuntimeError, StageHandle,
};
pub use behavior::{ActorAgent, AutonomousBehavior, BehaviorOutcome, SelectorExit};
pub use combat::{Retaliation, RetaliationPipeline};
pub use events::StageEvent;
pub use headless::{HeadlessSurface, ImmediateImageLoader, SurfaceStats};
pub use input::{AttackTrigger, AttackerController, AttackerMode, ControllerState, PointerEvent};
pub use lifecycle::Lifecycle;
pub use render::RenderScheduler;
pub use runtime::{Stage, StageBuilder};
pub use signals::{RefreshSignal, RefreshSource, TerminationListener, TerminationSignal};
pub use workers::{RenderMetrics, RenderSnapshot};
