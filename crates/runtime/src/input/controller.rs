use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use stage_core::Point;

use crate::api::{Result, StageHandle};
use crate::behavior::{ActorAgent, BehaviorOutcome};
use crate::combat::RetaliationPipeline;

/// Pointer input in surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Move(Point),
    /// Primary button pressed at a position.
    Down(Point),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AttackerMode {
    #[default]
    Moving,
    Attacking,
}

/// Result of feeding a pointer-down into the state machine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttackTrigger {
    /// Already attacking; the press is collapsed into the running attack.
    Ignored,
    /// Entered `Attacking`. `origin` is the muzzle-adjusted strike point,
    /// absent when no pointer position has ever been seen.
    Attack { origin: Option<Point> },
}

/// Move/attack state machine of the pointer-driven actor.
#[derive(Clone, Debug, Default)]
pub struct ControllerState {
    mode: AttackerMode,
    pointer: Option<Point>,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> AttackerMode {
        self.mode
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Tracks the pointer. Returns the point to center the attacker on,
    /// which only happens while moving.
    pub fn on_pointer_move(&mut self, point: Point) -> Option<Point> {
        self.pointer = Some(point);
        (self.mode == AttackerMode::Moving).then_some(point)
    }

    /// Enters `Attacking` unless already there.
    ///
    /// The press position counts as the latest pointer position. The strike
    /// origin is captured here, at the moment the attack begins.
    pub fn on_pointer_down(&mut self, point: Option<Point>, muzzle: Point) -> AttackTrigger {
        if let Some(point) = point {
            self.pointer = Some(point);
        }
        if self.mode == AttackerMode::Attacking {
            return AttackTrigger::Ignored;
        }
        self.mode = AttackerMode::Attacking;
        AttackTrigger::Attack {
            origin: self.pointer.map(|pointer| pointer.offset(muzzle)),
        }
    }

    /// Attack clip finished; back to following the pointer.
    pub fn on_attack_finished(&mut self) {
        self.mode = AttackerMode::Moving;
    }
}

type Animation = Pin<Box<dyn Future<Output = Result<BehaviorOutcome>> + Send>>;

/// Drives the player actor from a pointer event stream.
///
/// Idles on the stand clip while moving and swaps in the attack clip on
/// each accepted press. The cursor stays hidden while the controller runs.
pub struct AttackerController {
    agent: ActorAgent,
    pipeline: RetaliationPipeline,
    state: ControllerState,
}

impl AttackerController {
    pub fn new(agent: ActorAgent, pipeline: RetaliationPipeline) -> Self {
        Self {
            agent,
            pipeline,
            state: ControllerState::new(),
        }
    }

    /// Runs until the pointer stream ends or the player actor is gone.
    pub async fn run(mut self, mut pointer_rx: mpsc::Receiver<PointerEvent>) -> Result<()> {
        let handle = self.handle().clone();
        handle.set_cursor_visible(false).await?;
        info!(target: "runtime::input", id = ?self.agent.id(), "attacker controller started");

        let result = self.drive(&mut pointer_rx).await;

        if let Err(error) = handle.set_cursor_visible(true).await {
            debug!(target: "runtime::input", %error, "cursor not restored");
        }
        info!(target: "runtime::input", "attacker controller stopped");
        match result {
            Err(error) if error.is_actor_gone() || error.is_stage_closed() => Ok(()),
            other => other,
        }
    }

    async fn drive(&mut self, pointer_rx: &mut mpsc::Receiver<PointerEvent>) -> Result<()> {
        let mut animation = self.idle();
        loop {
            tokio::select! {
                event = pointer_rx.recv() => {
                    let Some(event) = event else { return Ok(()) };
                    if let Some(attack) = self.on_pointer(event).await? {
                        animation = attack;
                    }
                }
                outcome = &mut animation => {
                    outcome?;
                    if self.state.mode() == AttackerMode::Attacking {
                        self.state.on_attack_finished();
                        debug!(target: "runtime::input", "attack finished");
                    }
                    animation = self.idle();
                }
            }
        }
    }

    /// Applies one pointer event. Returns the attack animation when the
    /// event started an attack.
    async fn on_pointer(&mut self, event: PointerEvent) -> Result<Option<Animation>> {
        match event {
            PointerEvent::Move(point) => {
                if let Some(center) = self.state.on_pointer_move(point) {
                    self.handle().place_player(center).await?;
                }
                Ok(None)
            }
            PointerEvent::Down(point) => {
                let muzzle = self.agent.species().muzzle();
                match self.state.on_pointer_down(Some(point), muzzle) {
                    AttackTrigger::Ignored => Ok(None),
                    AttackTrigger::Attack { origin } => {
                        match origin {
                            Some(origin) => {
                                if let Err(error) = self.pipeline.on_attack(origin).await {
                                    warn!(target: "runtime::input", %error, "attack not resolved");
                                }
                            }
                            None => debug!(target: "runtime::input", "attack without pointer history"),
                        }
                        let agent = self.agent.clone();
                        Ok(Some(Box::pin(async move { agent.attack().await })))
                    }
                }
            }
        }
    }

    fn idle(&self) -> Animation {
        let agent = self.agent.clone();
        Box::pin(async move { agent.stand().await })
    }

    fn handle(&self) -> &StageHandle {
        self.agent.handle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MUZZLE: Point = Point::new(-55.0, 0.0);

    #[test]
    fn moves_follow_pointer_only_while_moving() {
        let mut state = ControllerState::new();
        assert_eq!(
            state.on_pointer_move(Point::new(10.0, 20.0)),
            Some(Point::new(10.0, 20.0))
        );

        state.on_pointer_down(None, MUZZLE);
        assert_eq!(state.on_pointer_move(Point::new(30.0, 40.0)), None);
        assert_eq!(state.pointer(), Some(Point::new(30.0, 40.0)));
    }

    #[test]
    fn repeated_press_while_attacking_is_ignored() {
        let mut state = ControllerState::new();
        state.on_pointer_move(Point::new(100.0, 100.0));

        assert_eq!(
            state.on_pointer_down(None, MUZZLE),
            AttackTrigger::Attack {
                origin: Some(Point::new(45.0, 100.0))
            }
        );
        assert_eq!(
            state.on_pointer_down(Some(Point::new(1.0, 1.0)), MUZZLE),
            AttackTrigger::Ignored
        );
        assert_eq!(state.mode(), AttackerMode::Attacking);

        state.on_attack_finished();
        assert_eq!(state.mode(), AttackerMode::Moving);
    }

    #[test]
    fn next_attack_uses_position_tracked_during_attack() {
        let mut state = ControllerState::new();
        state.on_pointer_down(Some(Point::new(0.0, 0.0)), MUZZLE);
        state.on_pointer_move(Point::new(200.0, 50.0));
        state.on_attack_finished();

        assert_eq!(
            state.on_pointer_down(None, MUZZLE),
            AttackTrigger::Attack {
                origin: Some(Point::new(145.0, 50.0))
            }
        );
    }

    #[test]
    fn press_without_history_has_no_origin() {
        let mut state = ControllerState::new();
        assert_eq!(
            state.on_pointer_down(None, MUZZLE),
            AttackTrigger::Attack { origin: None }
        );
    }
}
