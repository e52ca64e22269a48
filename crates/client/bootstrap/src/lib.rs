//! Shared bootstrap utilities for stage shells.
//!
//! Provides environment configuration, logging setup and stage assembly
//! that can be reused by the headless demo or any windowed front-end.
pub mod builder;
pub mod config;
pub mod logging;

pub use builder::{StageBootstrap, StageSetup};
pub use config::ClientConfig;
pub use logging::setup_logging;
