//! High-level stage orchestrator.
//!
//! The stage owns the worker task, wires up command/event channels and the
//! refresh source, and exposes a builder-based API for shells to assemble
//! the population, the retaliation pipeline and the attacker controller.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::info;

use stage_core::{ActorId, SpeciesSpec, StageConfig};

use crate::api::{DrawingSurface, ImageLoader, Result, RuntimeError, StageHandle};
use crate::combat::RetaliationPipeline;
use crate::events::StageEvent;
use crate::input::{AttackerController, PointerEvent};
use crate::lifecycle::Lifecycle;
use crate::signals::{RefreshSource, TerminationSignal};
use crate::workers::{Command, RenderMetrics, StageWorker};

/// Running stage.
///
/// [`StageHandle`] is the cloneable façade; the stage itself keeps the
/// worker and refresh tasks so it can shut them down.
pub struct Stage {
    handle: StageHandle,
    lifecycle: Lifecycle,
    pipeline: RetaliationPipeline,
    refresh: RefreshSource,
    config: Arc<StageConfig>,
    metrics: Arc<RenderMetrics>,
    closing: TerminationSignal,

    worker_handle: JoinHandle<()>,
    refresh_handle: Option<JoinHandle<()>>,
}

impl Stage {
    pub fn builder() -> StageBuilder {
        StageBuilder::new()
    }

    pub fn handle(&self) -> StageHandle {
        self.handle.clone()
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn pipeline(&self) -> &RetaliationPipeline {
        &self.pipeline
    }

    pub fn refresh(&self) -> &RefreshSource {
        &self.refresh
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn metrics(&self) -> Arc<RenderMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<StageEvent> {
        self.handle.subscribe_events()
    }

    pub async fn mount(&self, width: u32, height: u32) -> Result<()> {
        self.handle.mount(width, height).await
    }

    /// Spawns the configured initial population of `species`.
    pub async fn spawn_initial(&self, species: Arc<SpeciesSpec>) -> Result<Vec<ActorId>> {
        self.lifecycle
            .spawn_initial(species, self.config.initial_population)
            .await
    }

    /// Installs `species` as the player and starts its controller on
    /// `pointer_rx`. The task ends when the pointer stream closes.
    pub async fn attach_attacker(
        &self,
        species: Arc<SpeciesSpec>,
        pointer_rx: mpsc::Receiver<PointerEvent>,
    ) -> Result<(ActorId, JoinHandle<Result<()>>)> {
        let id = self.handle.install_player(species.clone()).await?;
        let agent = self.lifecycle.agent(id, species);
        let controller = AttackerController::new(agent, self.pipeline.clone());
        Ok((id, tokio::spawn(controller.run(pointer_rx))))
    }

    /// Cancels retaliation timelines, stops the worker after queued
    /// commands and joins it.
    ///
    /// Behavior tasks still holding handles observe closed channels, and
    /// with the built-in refresh a closed refresh signal, and wind down on
    /// their own.
    pub async fn shutdown(self) -> Result<()> {
        self.closing.fire();
        self.handle.shutdown().await?;
        self.worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        if let Some(refresh) = self.refresh_handle {
            refresh.abort();
            let _ = refresh.await;
        }
        info!(target: "runtime::stage", "stage shut down");
        Ok(())
    }
}

/// Builder for [`Stage`].
pub struct StageBuilder {
    config: StageConfig,
    surface: Option<Box<dyn DrawingSurface>>,
    loader: Option<Arc<dyn ImageLoader>>,
    refresh: Option<RefreshSource>,
    seed: Option<u64>,
}

impl StageBuilder {
    fn new() -> Self {
        Self {
            config: StageConfig::default(),
            surface: None,
            loader: None,
            refresh: None,
            seed: None,
        }
    }

    pub fn config(mut self, config: StageConfig) -> Self {
        self.config = config;
        self
    }

    /// Set required drawing surface
    pub fn surface(mut self, surface: impl DrawingSurface + 'static) -> Self {
        self.surface = Some(Box::new(surface));
        self
    }

    pub fn boxed_surface(mut self, surface: Box<dyn DrawingSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Set required image loader
    pub fn image_loader(mut self, loader: impl ImageLoader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    pub fn shared_image_loader(mut self, loader: Arc<dyn ImageLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Drive refresh ticks externally instead of the built-in fixed rate.
    pub fn refresh(mut self, refresh: RefreshSource) -> Self {
        self.refresh = Some(refresh);
        self
    }

    /// Seeds random placement for reproducible layouts.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub async fn build(self) -> Result<Stage> {
        let surface = self
            .surface
            .ok_or(RuntimeError::MissingCollaborator("drawing surface"))?;
        let loader = self
            .loader
            .ok_or(RuntimeError::MissingCollaborator("image loader"))?;
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let config = Arc::new(self.config);
        let (command_tx, command_rx) = mpsc::channel::<Command>(config.command_buffer_size);
        let (event_tx, _event_rx) = broadcast::channel::<StageEvent>(config.event_buffer_size);
        let handle = StageHandle::new(command_tx, event_tx.clone());

        // The worker subscribes before the fixed-rate task starts watching
        // for subscribers.
        let external_refresh = self.refresh.is_some();
        let refresh = self.refresh.unwrap_or_default();
        let worker_refresh = refresh.subscribe();
        let refresh_handle = (!external_refresh)
            .then(|| refresh.spawn_fixed_rate(config.refresh_period()));

        let metrics = Arc::new(RenderMetrics::new());
        let worker = StageWorker::new(
            surface,
            loader,
            worker_refresh,
            rng,
            Arc::clone(&metrics),
            command_rx,
            event_tx,
        );
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        let closing = TerminationSignal::new();
        let lifecycle = Lifecycle::new(
            handle.clone(),
            refresh.subscribe(),
            config.behavior_duration,
        );
        let pipeline =
            RetaliationPipeline::new(lifecycle.clone(), Arc::clone(&config), closing.subscribe());

        Ok(Stage {
            handle,
            lifecycle,
            pipeline,
            refresh,
            config,
            metrics,
            closing,
            worker_handle,
            refresh_handle,
        })
    }
}
