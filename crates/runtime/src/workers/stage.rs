//! Stage worker that owns the authoritative [`StageState`].
//!
//! Receives commands from [`StageHandle`](crate::StageHandle), mutates the
//! population arena, coalesces render requests and draws on refresh ticks.
//! It is the only task that touches the drawing surface.

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use slotmap::SecondaryMap;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, trace, warn};

use stage_core::{
    ActorId, ActorState, BehaviorKind, Bounds, Placement, Point, SpeciesSpec, StageState,
};

use crate::api::{
    DrawingSurface, FrameAck, FrameUpdate, ImageHandle, ImageLoadError, ImageLoader, Result,
    RuntimeError,
};
use crate::events::StageEvent;
use crate::render::RenderScheduler;
use crate::signals::{RefreshSignal, TerminationListener, TerminationSignal};

use super::RenderMetrics;

/// Commands that can be sent to the stage worker.
pub enum Command {
    Mount {
        width: u32,
        height: u32,
        reply: oneshot::Sender<()>,
    },
    Spawn {
        species: Arc<SpeciesSpec>,
        placement: Placement,
        reply: oneshot::Sender<(ActorId, TerminationListener)>,
    },
    InstallPlayer {
        species: Arc<SpeciesSpec>,
        reply: oneshot::Sender<ActorId>,
    },
    /// Frame update from the behavior currently animating `id`.
    Animate {
        id: ActorId,
        behavior: BehaviorKind,
        update: FrameUpdate,
        reply: oneshot::Sender<Result<FrameAck>>,
    },
    CommitDeath {
        id: ActorId,
        reply: oneshot::Sender<Result<bool>>,
    },
    Remove {
        id: ActorId,
        reply: oneshot::Sender<bool>,
    },
    PlacePlayer {
        center: Point,
        reply: oneshot::Sender<Result<()>>,
    },
    TargetsWithin {
        origin: Point,
        radius: f32,
        reply: oneshot::Sender<Vec<(ActorId, Arc<SpeciesSpec>)>>,
    },
    RequestRender {
        reply: oneshot::Sender<()>,
    },
    SetCursorVisible {
        visible: bool,
        reply: oneshot::Sender<()>,
    },
    QueryActor {
        id: ActorId,
        reply: oneshot::Sender<Option<ActorState>>,
    },
    QueryPopulation {
        reply: oneshot::Sender<Vec<(ActorId, ActorState)>>,
    },
    /// Stops the worker loop after the commands already queued.
    Shutdown,
}

/// Load state of one sprite sheet.
enum SpriteSlot {
    Loading,
    Ready(ImageHandle),
    Failed,
}

type SpriteLoaded = (String, std::result::Result<ImageHandle, ImageLoadError>);

/// Background task that owns the population and the drawing surface.
pub struct StageWorker {
    state: StageState,
    signals: SecondaryMap<ActorId, TerminationSignal>,
    render: RenderScheduler,
    metrics: Arc<RenderMetrics>,
    surface: Box<dyn DrawingSurface>,
    loader: Arc<dyn ImageLoader>,
    sprites: HashMap<String, SpriteSlot>,
    sprite_tx: mpsc::Sender<SpriteLoaded>,
    sprite_rx: mpsc::Receiver<SpriteLoaded>,
    refresh: RefreshSignal,
    refresh_open: bool,
    rng: StdRng,
    command_rx: mpsc::Receiver<Command>,
    event_tx: broadcast::Sender<StageEvent>,
}

impl StageWorker {
    pub fn new(
        surface: Box<dyn DrawingSurface>,
        loader: Arc<dyn ImageLoader>,
        refresh: RefreshSignal,
        rng: StdRng,
        metrics: Arc<RenderMetrics>,
        command_rx: mpsc::Receiver<Command>,
        event_tx: broadcast::Sender<StageEvent>,
    ) -> Self {
        let (sprite_tx, sprite_rx) = mpsc::channel(16);
        Self {
            state: StageState::new(),
            signals: SecondaryMap::new(),
            render: RenderScheduler::new(),
            metrics,
            surface,
            loader,
            sprites: HashMap::new(),
            sprite_tx,
            sprite_rx,
            refresh,
            refresh_open: true,
            rng,
            command_rx,
            event_tx,
        }
    }

    /// Main worker loop.
    ///
    /// Every refresh tick is consumed, pending or not, and ahead of any
    /// command that became ready at the same time. A tick therefore closes
    /// the window of requests that arrived before it, and a request made
    /// after a tick is drawn on the following one.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                frame = self.refresh.next_frame(), if self.refresh_open => match frame {
                    Ok(frame) => self.redraw(frame),
                    Err(error) => {
                        warn!(target: "runtime::stage", %error, "refresh source gone; rendering stops");
                        self.refresh_open = false;
                    }
                },
                cmd = self.command_rx.recv() => match cmd {
                    Some(Command::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
                Some((source, loaded)) = self.sprite_rx.recv() => {
                    self.finish_sprite(source, loaded);
                }
            }
        }
        debug!(
            target: "runtime::stage",
            redraws = self.render.redraws(),
            "stage worker stopped"
        );
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Mount {
                width,
                height,
                reply,
            } => {
                self.mount(width, height);
                let _ = reply.send(());
            }
            Command::Spawn {
                species,
                placement,
                reply,
            } => {
                let spawned = self.spawn(species, placement);
                let _ = reply.send(spawned);
            }
            Command::InstallPlayer { species, reply } => {
                self.load_sprite(&species.sprite_source);
                let id = self.state.install_player(species);
                self.request_render();
                let _ = reply.send(id);
            }
            Command::Animate {
                id,
                behavior,
                update,
                reply,
            } => {
                let _ = reply.send(self.animate(id, behavior, update));
            }
            Command::CommitDeath { id, reply } => {
                let _ = reply.send(self.commit_death(id));
            }
            Command::Remove { id, reply } => {
                let _ = reply.send(self.remove(id));
            }
            Command::PlacePlayer { center, reply } => {
                let _ = reply.send(self.place_player(center));
            }
            Command::TargetsWithin {
                origin,
                radius,
                reply,
            } => {
                let targets = self
                    .state
                    .targets_within(origin, radius)
                    .into_iter()
                    .filter_map(|id| self.state.get(id).map(|a| (id, a.species.clone())))
                    .collect();
                let _ = reply.send(targets);
            }
            Command::RequestRender { reply } => {
                self.request_render();
                let _ = reply.send(());
            }
            Command::SetCursorVisible { visible, reply } => {
                self.surface.set_cursor_visible(visible);
                let _ = reply.send(());
            }
            Command::QueryActor { id, reply } => {
                let _ = reply.send(self.state.get(id).cloned());
            }
            Command::QueryPopulation { reply } => {
                let snapshot = self
                    .state
                    .population()
                    .map(|(id, actor)| (id, actor.clone()))
                    .collect();
                let _ = reply.send(snapshot);
            }
            Command::Shutdown => {}
        }
    }

    fn mount(&mut self, requested_width: u32, requested_height: u32) {
        self.surface.resize(requested_width, requested_height);
        let (width, height) = (self.surface.width(), self.surface.height());
        if (width, height) != (requested_width, requested_height) {
            debug!(
                target: "runtime::stage",
                requested_width,
                requested_height,
                width,
                height,
                "surface kept its own size"
            );
        }
        let placed = self.state.mount(Bounds::new(width, height), &mut self.rng);
        self.render.mount();
        info!(
            target: "runtime::stage",
            width,
            height,
            placed = placed.len(),
            "surface mounted"
        );
        let _ = self.event_tx.send(StageEvent::Mounted { width, height });
    }

    fn spawn(
        &mut self,
        species: Arc<SpeciesSpec>,
        placement: Placement,
    ) -> (ActorId, TerminationListener) {
        self.load_sprite(&species.sprite_source);
        let name = species.name.clone();
        let id = self.state.spawn(species, placement, &mut self.rng);

        let signal = TerminationSignal::new();
        let listener = signal.subscribe();
        self.signals.insert(id, signal);
        self.request_render();

        debug!(target: "runtime::stage", ?id, species = %name, ?placement, "actor spawned");
        let _ = self
            .event_tx
            .send(StageEvent::ActorSpawned { id, species: name });
        (id, listener)
    }

    fn animate(
        &mut self,
        id: ActorId,
        behavior: BehaviorKind,
        update: FrameUpdate,
    ) -> Result<FrameAck> {
        let bounds = self.state.bounds();
        let actor = self
            .state
            .get_mut(id)
            .ok_or(RuntimeError::ActorNotFound(id))?;

        // Once dying, only the death animation may touch the frame.
        if !actor.alive && behavior != BehaviorKind::Die {
            trace!(target: "runtime::stage", ?id, %behavior, "update rejected for dying actor");
            return Ok(FrameAck::REJECTED);
        }

        let began = matches!(update, FrameUpdate::Begin(_));
        match update {
            FrameUpdate::Begin(clip) => actor.begin_clip(&clip),
            FrameUpdate::Advance { column, heading } => {
                actor.set_column(column);
                if let Some(direction) = heading {
                    actor.step(direction);
                }
            }
        }
        let in_bounds = bounds.is_none_or(|bounds| actor.within(&bounds));

        self.request_render();
        if began {
            let _ = self.event_tx.send(StageEvent::ClipStarted { id, behavior });
        }
        Ok(FrameAck {
            accepted: true,
            in_bounds,
        })
    }

    fn commit_death(&mut self, id: ActorId) -> Result<bool> {
        let actor = self
            .state
            .get_mut(id)
            .ok_or(RuntimeError::ActorNotFound(id))?;
        if !actor.commit_death() {
            return Ok(false);
        }
        if let Some(die) = actor.species.clips.die {
            actor.begin_clip(&die);
        }

        if let Some(signal) = self.signals.get(id) {
            signal.fire();
        }
        self.request_render();

        debug!(target: "runtime::stage", ?id, "actor dying");
        let _ = self.event_tx.send(StageEvent::ActorDying { id });
        let _ = self.event_tx.send(StageEvent::ClipStarted {
            id,
            behavior: BehaviorKind::Die,
        });
        Ok(true)
    }

    fn remove(&mut self, id: ActorId) -> bool {
        if self.state.remove(id).is_none() {
            trace!(target: "runtime::stage", ?id, "removal of absent actor ignored");
            return false;
        }
        self.signals.remove(id);
        self.request_render();

        debug!(
            target: "runtime::stage",
            ?id,
            population = self.state.population_len(),
            "actor removed"
        );
        let _ = self.event_tx.send(StageEvent::ActorRemoved { id });
        true
    }

    fn place_player(&mut self, center: Point) -> Result<()> {
        let id = self.state.player().ok_or(RuntimeError::NoPlayer)?;
        let player = self
            .state
            .get_mut(id)
            .ok_or(RuntimeError::ActorNotFound(id))?;
        player.center_on(center);
        self.request_render();
        Ok(())
    }

    fn request_render(&mut self) {
        if self.render.is_mounted() {
            self.metrics.record_request();
        }
        self.render.request();
    }

    /// Starts loading `source` unless it is already cached or in flight.
    fn load_sprite(&mut self, source: &str) {
        if self.sprites.contains_key(source) {
            return;
        }
        self.sprites.insert(source.to_owned(), SpriteSlot::Loading);

        let loader = Arc::clone(&self.loader);
        let tx = self.sprite_tx.clone();
        let source = source.to_owned();
        tokio::spawn(async move {
            let loaded = loader.load(&source).await;
            let _ = tx.send((source, loaded)).await;
        });
    }

    fn finish_sprite(
        &mut self,
        source: String,
        loaded: std::result::Result<ImageHandle, ImageLoadError>,
    ) {
        let slot = match loaded {
            Ok(image) => {
                debug!(target: "runtime::stage", %source, %image, "sprite ready");
                SpriteSlot::Ready(image)
            }
            Err(error) => {
                warn!(target: "runtime::stage", %error, "sprite unavailable; actors using it stay hidden");
                SpriteSlot::Failed
            }
        };
        self.sprites.insert(source, slot);
        self.request_render();
    }

    fn redraw(&mut self, frame: u64) {
        if !self.render.take_redraw() {
            return;
        }

        self.surface.clear();
        let mut drawn = 0;
        for actor in self.state.draw_order() {
            let Some(SpriteSlot::Ready(image)) = self.sprites.get(&actor.species.sprite_source)
            else {
                self.metrics.record_unready();
                continue;
            };
            let Some(sprite) = actor.sprite_frame() else {
                trace!(
                    target: "runtime::stage",
                    species = %actor.species.name,
                    row = actor.row,
                    column = actor.column,
                    "no crop entry; draw skipped"
                );
                self.metrics.record_missing_crop();
                continue;
            };
            self.surface.draw_sprite(*image, sprite.source, sprite.dest);
            drawn += 1;
        }

        self.metrics.record_redraw(drawn);
        let _ = self.event_tx.send(StageEvent::Redrawn { frame, drawn });
    }
}
