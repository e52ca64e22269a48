use std::fmt;
use std::sync::Arc;

use tracing::{trace, warn};

use stage_core::{ActorId, AnimationClip, BehaviorKind, Direction, SpeciesSpec};

use crate::animation::FrameDriver;
use crate::api::{FrameUpdate, Result, StageHandle};
use crate::signals::RefreshSignal;

/// How a behavior ended on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BehaviorOutcome {
    /// A one-shot clip reached its final column.
    Completed,
    /// A walk carried the bounding box past a surface edge.
    LeftBounds,
    /// Nothing was animated: the species lacks the clip, the actor was
    /// already dying, or a dying actor rejected the update.
    Skipped,
}

impl fmt::Display for BehaviorOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::LeftBounds => write!(f, "left-bounds"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// Drives one actor's behaviors through the stage worker.
///
/// Looping clips (stand, walk) run until the caller drops the future or the
/// walk leaves the surface. Every error is propagated; a removed actor
/// surfaces as [`RuntimeError::ActorNotFound`](crate::RuntimeError).
#[derive(Clone)]
pub struct ActorAgent {
    id: ActorId,
    species: Arc<SpeciesSpec>,
    handle: StageHandle,
    refresh: RefreshSignal,
}

impl ActorAgent {
    pub fn new(
        id: ActorId,
        species: Arc<SpeciesSpec>,
        handle: StageHandle,
        refresh: RefreshSignal,
    ) -> Self {
        Self {
            id,
            species,
            handle,
            refresh,
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn species(&self) -> &Arc<SpeciesSpec> {
        &self.species
    }

    pub fn handle(&self) -> &StageHandle {
        &self.handle
    }

    pub async fn perform(&self, kind: BehaviorKind) -> Result<BehaviorOutcome> {
        match kind {
            BehaviorKind::Stand => self.stand().await,
            BehaviorKind::Walk(direction) => self.walk(direction).await,
            BehaviorKind::Die => self.die().await,
            BehaviorKind::Attack => self.attack().await,
        }
    }

    pub async fn stand(&self) -> Result<BehaviorOutcome> {
        self.play(BehaviorKind::Stand, true).await
    }

    /// Walks until the bounding box leaves the surface, checked after every
    /// step.
    pub async fn walk(&self, direction: Direction) -> Result<BehaviorOutcome> {
        self.play(BehaviorKind::Walk(direction), true).await
    }

    pub async fn attack(&self) -> Result<BehaviorOutcome> {
        self.play(BehaviorKind::Attack, true).await
    }

    /// Commits to dying and plays the death clip once.
    ///
    /// On an actor that is already dying this is a no-op that completes
    /// immediately with [`BehaviorOutcome::Skipped`].
    pub async fn die(&self) -> Result<BehaviorOutcome> {
        if !self.handle.commit_death(self.id).await? {
            trace!(target: "runtime::behavior", id = ?self.id, "already dying");
            return Ok(BehaviorOutcome::Skipped);
        }
        self.play_death().await
    }

    /// Plays the death clip of an actor that already committed to dying.
    pub async fn play_death(&self) -> Result<BehaviorOutcome> {
        // Commit already positioned the actor on the first death frame.
        self.play(BehaviorKind::Die, false).await
    }

    async fn play(&self, kind: BehaviorKind, begin: bool) -> Result<BehaviorOutcome> {
        let Some(clip) = self.species.clip(kind).copied() else {
            warn!(
                target: "runtime::behavior",
                species = %self.species.name,
                behavior = %kind,
                "species has no clip for behavior"
            );
            return Ok(BehaviorOutcome::Skipped);
        };

        if begin
            && !self
                .handle
                .animate(self.id, kind, FrameUpdate::Begin(clip))
                .await?
                .accepted
        {
            return Ok(BehaviorOutcome::Skipped);
        }

        self.run_clip(kind, &clip).await
    }

    async fn run_clip(&self, kind: BehaviorKind, clip: &AnimationClip) -> Result<BehaviorOutcome> {
        let heading = match kind {
            BehaviorKind::Walk(direction) => Some(direction),
            _ => None,
        };
        let mut driver = FrameDriver::new(clip, self.refresh.subscribe());

        loop {
            let column = driver.next_column().await?;
            let ack = self
                .handle
                .animate(self.id, kind, FrameUpdate::Advance { column, heading })
                .await?;

            if !ack.accepted {
                return Ok(BehaviorOutcome::Skipped);
            }
            if !ack.in_bounds {
                return Ok(BehaviorOutcome::LeftBounds);
            }
            if clip.finished_at(column) {
                return Ok(BehaviorOutcome::Completed);
            }
        }
    }
}
