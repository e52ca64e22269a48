//! Cloneable façade for issuing commands to the stage worker.
//!
//! [`StageHandle`] hides channel plumbing: every method sends one
//! [`Command`] and awaits its reply. Handles are cheap to clone and are
//! shared by the lifecycle manager, behaviors, the retaliation pipeline and
//! the attacker controller.
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};

use stage_core::{
    ActorId, ActorState, AnimationClip, BehaviorKind, Direction, Placement, Point, SpeciesSpec,
};

use super::errors::{Result, RuntimeError};
use crate::events::StageEvent;
use crate::signals::TerminationListener;
use crate::workers::Command;

/// Frame mutation requested by a running behavior.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameUpdate {
    /// Switch to the clip's row, positioned on its first column.
    Begin(AnimationClip),
    /// Move to `column`; walking behaviors also take one step.
    Advance {
        column: u32,
        heading: Option<Direction>,
    },
}

/// Worker reply to a [`FrameUpdate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameAck {
    /// False when the actor is dying and the update came from anything but
    /// the death animation. The caller's behavior is over.
    pub accepted: bool,
    /// Bounding box still fully inside the surface after the update.
    pub in_bounds: bool,
}

impl FrameAck {
    pub(crate) const REJECTED: Self = Self {
        accepted: false,
        in_bounds: true,
    };
}

/// Client-facing handle to the stage.
#[derive(Clone)]
pub struct StageHandle {
    command_tx: mpsc::Sender<Command>,
    event_tx: broadcast::Sender<StageEvent>,
}

impl StageHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_tx: broadcast::Sender<StageEvent>,
    ) -> Self {
        Self {
            command_tx,
            event_tx,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Sizes the surface. The first call enables rendering and places
    /// actors spawned with [`Placement::Random`] so far.
    pub async fn mount(&self, width: u32, height: u32) -> Result<()> {
        self.request(|reply| Command::Mount {
            width,
            height,
            reply,
        })
        .await
    }

    /// Adds a population member. Does not start any behavior.
    pub async fn spawn(
        &self,
        species: Arc<SpeciesSpec>,
        placement: Placement,
    ) -> Result<(ActorId, TerminationListener)> {
        self.request(|reply| Command::Spawn {
            species,
            placement,
            reply,
        })
        .await
    }

    /// Installs the pointer-driven actor, replacing any previous one.
    pub async fn install_player(&self, species: Arc<SpeciesSpec>) -> Result<ActorId> {
        self.request(|reply| Command::InstallPlayer { species, reply })
            .await
    }

    pub async fn animate(
        &self,
        id: ActorId,
        behavior: BehaviorKind,
        update: FrameUpdate,
    ) -> Result<FrameAck> {
        self.request(|reply| Command::Animate {
            id,
            behavior,
            update,
            reply,
        })
        .await?
    }

    /// Flips the actor to dying, positions it on the first death frame and
    /// fires its termination signal. Returns false if it was already dying.
    pub async fn commit_death(&self, id: ActorId) -> Result<bool> {
        self.request(|reply| Command::CommitDeath { id, reply })
            .await?
    }

    /// Removes a population member. Returns false if it was already gone.
    pub async fn remove(&self, id: ActorId) -> Result<bool> {
        self.request(|reply| Command::Remove { id, reply }).await
    }

    /// Centers the player on `center`.
    pub async fn place_player(&self, center: Point) -> Result<()> {
        self.request(|reply| Command::PlacePlayer { center, reply })
            .await?
    }

    /// Live population members whose anchor is within `radius` of `origin`.
    pub async fn targets_within(
        &self,
        origin: Point,
        radius: f32,
    ) -> Result<Vec<(ActorId, Arc<SpeciesSpec>)>> {
        self.request(|reply| Command::TargetsWithin {
            origin,
            radius,
            reply,
        })
        .await
    }

    pub async fn request_render(&self) -> Result<()> {
        self.request(|reply| Command::RequestRender { reply }).await
    }

    pub async fn set_cursor_visible(&self, visible: bool) -> Result<()> {
        self.request(|reply| Command::SetCursorVisible { visible, reply })
            .await
    }

    /// Snapshot of one actor, population member or player.
    pub async fn actor(&self, id: ActorId) -> Result<Option<ActorState>> {
        self.request(|reply| Command::QueryActor { id, reply }).await
    }

    /// Snapshot of the population in insertion order.
    pub async fn population(&self) -> Result<Vec<(ActorId, ActorState)>> {
        self.request(|reply| Command::QueryPopulation { reply })
            .await
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<StageEvent> {
        self.event_tx.subscribe()
    }

    pub(crate) fn publish(&self, event: StageEvent) {
        let _ = self.event_tx.send(event);
    }

    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}
