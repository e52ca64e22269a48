//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, collaborators, and stale actor
//! handles so callers can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use stage_core::ActorId;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("stage worker command channel closed")]
    CommandChannelClosed,

    #[error("stage worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("stage worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("display refresh signal closed")]
    RefreshClosed,

    /// The actor was removed from the stage; its id no longer resolves.
    #[error("actor {0:?} is no longer on stage")]
    ActorNotFound(ActorId),

    #[error("stage requires a {0} before building")]
    MissingCollaborator(&'static str),

    #[error("no player actor installed")]
    NoPlayer,

    #[error(transparent)]
    ImageLoad(#[from] ImageLoadError),
}

impl RuntimeError {
    /// True when the error only means the actor has left the stage.
    pub fn is_actor_gone(&self) -> bool {
        matches!(self, Self::ActorNotFound(_))
    }

    /// True when the stage worker or its refresh source has stopped.
    pub fn is_stage_closed(&self) -> bool {
        matches!(
            self,
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::RefreshClosed
        )
    }
}

/// Failure reported by an [`ImageLoader`](crate::ImageLoader).
#[derive(Debug, Error)]
#[error("failed to load sprite {source_id}: {reason}")]
pub struct ImageLoadError {
    pub source_id: String,
    pub reason: String,
}

impl ImageLoadError {
    pub fn new(source_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            reason: reason.into(),
        }
    }
}
