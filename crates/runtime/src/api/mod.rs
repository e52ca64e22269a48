//! Public API surface for stage consumers.
//!
//! Re-exports the façade handle, error types, and the collaborator traits a
//! presentation shell implements.
mod errors;
mod handle;
mod surface;

pub use errors::{ImageLoadError, Result, RuntimeError};
pub use handle::{FrameAck, FrameUpdate, StageHandle};
pub use surface::{DrawingSurface, ImageHandle, ImageLoader};
