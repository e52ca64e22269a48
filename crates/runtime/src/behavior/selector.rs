use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time;
use tracing::{debug, trace, warn};

use stage_core::{BehaviorPlan, DelayRange};

use super::agent::ActorAgent;
use crate::signals::TerminationListener;

/// Why an autonomous loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectorExit {
    /// The actor committed to dying.
    Terminated,
    /// The actor left the stage (or the stage shut down).
    ActorGone,
    /// A collaborator failed, e.g. the refresh source closed.
    Failed,
}

/// Randomized behavior loop for one population member.
///
/// Each round shuffles a fresh [`BehaviorPlan`] and runs its steps in order,
/// each capped by a random duration. Exactly one behavior future exists at
/// a time; when the termination signal fires, the in-flight behavior and
/// its timers are dropped before anything else runs.
pub struct AutonomousBehavior {
    agent: ActorAgent,
    termination: TerminationListener,
    durations: DelayRange,
    rng: StdRng,
}

impl AutonomousBehavior {
    pub fn new(agent: ActorAgent, termination: TerminationListener, durations: DelayRange) -> Self {
        Self {
            agent,
            termination,
            durations,
            rng: StdRng::from_entropy(),
        }
    }

    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub async fn run(mut self) -> SelectorExit {
        let id = self.agent.id();
        let exit = self.drive().await;
        debug!(target: "runtime::behavior", ?id, ?exit, "autonomous behavior stopped");
        exit
    }

    async fn drive(&mut self) -> SelectorExit {
        loop {
            for kind in BehaviorPlan::shuffled(&mut self.rng) {
                if self.termination.is_fired() {
                    return SelectorExit::Terminated;
                }
                let cap = self.durations.sample(&mut self.rng);

                tokio::select! {
                    biased;
                    _ = self.termination.fired() => return SelectorExit::Terminated,
                    result = time::timeout(cap, self.agent.perform(kind)) => match result {
                        Err(_elapsed) => {
                            trace!(target: "runtime::behavior", id = ?self.agent.id(), behavior = %kind, ?cap, "behavior capped");
                        }
                        Ok(Ok(outcome)) => {
                            trace!(target: "runtime::behavior", id = ?self.agent.id(), behavior = %kind, %outcome, "behavior ended");
                        }
                        Ok(Err(error)) if error.is_actor_gone() || error.is_stage_closed() => {
                            return SelectorExit::ActorGone;
                        }
                        Ok(Err(error)) => {
                            warn!(target: "runtime::behavior", id = ?self.agent.id(), %error, "behavior failed");
                            return SelectorExit::Failed;
                        }
                    },
                }
            }
        }
    }
}
