//! Population lifecycle: spawning, respawning and removal.
//!
//! Membership lives in the stage worker's arena; this type issues the three
//! mutations (spawn, respawn, remove) and starts one autonomous behavior
//! task per spawned actor.
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use stage_core::{ActorId, DelayRange, Placement, SpeciesSpec};

use crate::api::{Result, StageHandle};
use crate::behavior::{ActorAgent, AutonomousBehavior, SelectorExit};
use crate::signals::RefreshSignal;

#[derive(Clone)]
pub struct Lifecycle {
    handle: StageHandle,
    refresh: RefreshSignal,
    behavior_duration: DelayRange,
}

impl Lifecycle {
    pub fn new(handle: StageHandle, refresh: RefreshSignal, behavior_duration: DelayRange) -> Self {
        Self {
            handle,
            refresh,
            behavior_duration,
        }
    }

    /// Spawns `count` actors at random positions, each with its own
    /// autonomous behavior.
    pub async fn spawn_initial(
        &self,
        species: Arc<SpeciesSpec>,
        count: usize,
    ) -> Result<Vec<ActorId>> {
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let (id, _behavior) = self.spawn(species.clone(), Placement::Random).await?;
            ids.push(id);
        }
        info!(
            target: "runtime::lifecycle",
            species = %species.name,
            count,
            "initial population spawned"
        );
        Ok(ids)
    }

    /// Adds one actor and starts its autonomous behavior.
    pub async fn spawn(
        &self,
        species: Arc<SpeciesSpec>,
        placement: Placement,
    ) -> Result<(ActorId, JoinHandle<SelectorExit>)> {
        let (id, termination) = self.handle.spawn(species.clone(), placement).await?;
        let agent = self.agent(id, species);
        let behavior = AutonomousBehavior::new(agent, termination, self.behavior_duration);
        Ok((id, tokio::spawn(behavior.run())))
    }

    /// Spawns a replacement at a fresh random position.
    pub async fn request_respawn(&self, species: Arc<SpeciesSpec>) -> Result<ActorId> {
        let (id, _behavior) = self.spawn(species, Placement::Random).await?;
        debug!(target: "runtime::lifecycle", ?id, "actor respawned");
        Ok(id)
    }

    /// Removes an actor whose death is complete.
    ///
    /// Absent actors are ignored; the return value tells whether this call
    /// did the removal. Never fails; a closed stage yields false.
    pub async fn remove_on_death_complete(&self, id: ActorId) -> bool {
        match self.handle.remove(id).await {
            Ok(removed) => removed,
            Err(error) => {
                debug!(target: "runtime::lifecycle", ?id, %error, "removal skipped");
                false
            }
        }
    }

    /// Behavior driver for an existing actor.
    pub fn agent(&self, id: ActorId, species: Arc<SpeciesSpec>) -> ActorAgent {
        ActorAgent::new(id, species, self.handle.clone(), self.refresh.clone())
    }

    pub fn handle(&self) -> &StageHandle {
        &self.handle
    }
}
