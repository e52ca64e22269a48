use stage_core::{ActorId, BehaviorKind, Point};

/// Lifecycle notifications published by the stage worker and the pipelines
/// built on top of it.
///
/// Events are best-effort: the broadcast channel drops the oldest entries
/// for lagging subscribers and sends without receivers are ignored.
#[derive(Clone, Debug, PartialEq)]
pub enum StageEvent {
    /// Surface was sized (first mount or a later resize).
    Mounted { width: u32, height: u32 },
    ActorSpawned { id: ActorId, species: String },
    /// A behavior positioned the actor on the first frame of its clip.
    ClipStarted { id: ActorId, behavior: BehaviorKind },
    /// Actor committed to dying; its termination signal has fired.
    ActorDying { id: ActorId },
    /// Actor left the population.
    ActorRemoved { id: ActorId },
    /// Attacker launched a strike at the muzzle-adjusted origin.
    AttackLaunched { origin: Point },
    /// One coalesced redraw ran and drew `drawn` sprites.
    Redrawn { frame: u64, drawn: usize },
}

impl StageEvent {
    /// Actor the event concerns, if any.
    pub fn actor(&self) -> Option<ActorId> {
        match self {
            Self::ActorSpawned { id, .. }
            | Self::ClipStarted { id, .. }
            | Self::ActorDying { id }
            | Self::ActorRemoved { id } => Some(*id),
            _ => None,
        }
    }
}
