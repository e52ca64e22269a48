//! Attack resolution and the death, removal and respawn timeline.
//!
//! Every attack selects all live population members within the strike
//! radius. Each selected actor then runs its own timeline on a separate
//! task, so simultaneous kills never wait on each other:
//!
//! 1. commit to dying (first death frame, termination fires)
//! 2. removal `removal_grace` after step 1, whatever the clip length
//! 3. a replacement spawn after a random `respawn_delay`
//!
//! Timelines end early when the stage starts shutting down.
use std::sync::Arc;

use tokio::time::{self, Instant};
use tracing::{debug, info};

use stage_core::{ActorId, Point, SpeciesSpec, StageConfig};

use crate::api::Result;
use crate::events::StageEvent;
use crate::lifecycle::Lifecycle;
use crate::signals::TerminationListener;

/// What one target's timeline did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Retaliation {
    /// Died, was removed and replaced by `replacement`.
    Respawned { replacement: ActorId },
    /// Died and was removed, but the replacement spawn failed.
    Removed,
    /// Someone else had already committed this actor to dying.
    AlreadyDying,
    /// Gone before the timeline started.
    Vanished,
    /// The stage shut down before the timeline finished.
    Cancelled,
}

#[derive(Clone)]
pub struct RetaliationPipeline {
    lifecycle: Lifecycle,
    config: Arc<StageConfig>,
    closing: TerminationListener,
}

impl RetaliationPipeline {
    /// `closing` fires when the stage shuts down; running timelines stop
    /// at that point.
    pub fn new(
        lifecycle: Lifecycle,
        config: Arc<StageConfig>,
        closing: TerminationListener,
    ) -> Self {
        Self {
            lifecycle,
            config,
            closing,
        }
    }

    /// Resolves an attack at `origin` and starts one timeline per target.
    ///
    /// Returns the selected actors; the empty selection is not an error.
    pub async fn on_attack(&self, origin: Point) -> Result<Vec<ActorId>> {
        let handle = self.lifecycle.handle();
        handle.publish(StageEvent::AttackLaunched { origin });

        let targets = handle
            .targets_within(origin, self.config.strike_radius)
            .await?;
        info!(
            target: "runtime::combat",
            x = origin.x,
            y = origin.y,
            hits = targets.len(),
            "attack resolved"
        );

        let mut ids = Vec::with_capacity(targets.len());
        for (id, species) in targets {
            ids.push(id);
            let pipeline = self.clone();
            tokio::spawn(async move { pipeline.retaliate(id, species).await });
        }
        Ok(ids)
    }

    /// Runs the full timeline for one target, or until the stage closes.
    pub async fn retaliate(&self, id: ActorId, species: Arc<SpeciesSpec>) -> Retaliation {
        let mut closing = self.closing.clone();
        tokio::select! {
            biased;
            _ = closing.fired() => {
                debug!(target: "runtime::combat", ?id, "timeline cancelled by shutdown");
                Retaliation::Cancelled
            }
            outcome = self.timeline(id, species) => outcome,
        }
    }

    async fn timeline(&self, id: ActorId, species: Arc<SpeciesSpec>) -> Retaliation {
        let handle = self.lifecycle.handle();
        match handle.commit_death(id).await {
            Ok(true) => {}
            Ok(false) => return Retaliation::AlreadyDying,
            Err(error) => {
                debug!(target: "runtime::combat", ?id, %error, "target vanished");
                return Retaliation::Vanished;
            }
        }
        let dying_since = Instant::now();

        let agent = self.lifecycle.agent(id, species.clone());
        let death = async {
            if let Err(error) = agent.play_death().await {
                // Removal inside the grace window cuts the clip short.
                debug!(target: "runtime::combat", ?id, %error, "death animation cut");
            }
        };
        let timeline = async {
            time::sleep_until(dying_since + self.config.removal_grace()).await;
            self.lifecycle.remove_on_death_complete(id).await;

            let delay = self.config.respawn_delay.sample(&mut rand::thread_rng());
            debug!(target: "runtime::combat", ?id, ?delay, "respawn scheduled");
            time::sleep(delay).await;

            match self.lifecycle.request_respawn(species.clone()).await {
                Ok(replacement) => Retaliation::Respawned { replacement },
                Err(error) => {
                    debug!(target: "runtime::combat", ?id, %error, "respawn dropped");
                    Retaliation::Removed
                }
            }
        };

        let ((), outcome) = tokio::join!(death, timeline);
        outcome
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }
}
