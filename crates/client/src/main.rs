//! Headless stage demo binary.
//!
//! Composition root that assembles:
//! 1. Configuration from the environment (and `.env`)
//! 2. Logging to stderr and optionally a log file
//! 3. A mounted headless stage via `StageBootstrap`
//! 4. The initial population and the attacker controller
//! 5. A scripted pointer standing in for real input
//!
//! ```bash
//! STAGE_DEMO_SECS=30 RUST_LOG=runtime=debug cargo run -p stage-client
//! ```

use std::time::Duration;

use anyhow::{Context, Result};
use client_bootstrap::{ClientConfig, StageBootstrap, setup_logging};
use runtime::{PointerEvent, StageEvent};
use stage_core::Point;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::time;

const POINTER_STEP: Duration = Duration::from_millis(50);
const PRESS_EVERY: u32 = 40;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. Load configuration from environment
    let config = ClientConfig::from_env();

    // 2. Setup logging
    let _log_guard = setup_logging(config.log_dir.as_deref())?;
    tracing::info!("Starting stage demo");
    tracing::info!(
        "Population: {} x {}",
        config.stage.initial_population,
        config.species.population
    );
    tracing::info!("Refresh: {} Hz", config.stage.refresh_hz);

    // 3. Build and mount the stage
    let demo = Duration::from_secs(config.demo_secs);
    let setup = StageBootstrap::new(config).build().await?;
    let stage = setup.stage;
    let surface = setup.config.surface;

    // 4. Populate and attach the attacker
    let spawned = stage.spawn_initial(setup.population).await?;
    tracing::info!("Spawned {} actors", spawned.len());

    let (pointer_tx, pointer_rx) = mpsc::channel(64);
    let (player, controller) = stage.attach_attacker(setup.player, pointer_rx).await?;
    tracing::info!("Attacker installed as {:?}", player);

    let mut events = stage.subscribe_events();
    let observer = tokio::spawn(async move {
        let mut kills = 0usize;
        loop {
            match events.recv().await {
                Ok(StageEvent::ActorDying { id }) => {
                    kills += 1;
                    tracing::debug!("{:?} is dying", id);
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Event observer skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
        kills
    });

    // 5. Sweep the pointer across the surface, pressing now and then
    let width = surface.width as f32;
    let height = surface.height as f32;
    let mut ticker = time::interval(POINTER_STEP);
    let deadline = time::Instant::now() + demo;
    let mut step = 0u32;
    while time::Instant::now() < deadline {
        ticker.tick().await;
        let phase = step as f32 * 0.02;
        let pointer = Point::new(
            width * (0.5 + 0.4 * phase.cos()),
            height * (0.5 + 0.4 * (phase * 1.7).sin()),
        );
        let event = if step % PRESS_EVERY == PRESS_EVERY - 1 {
            PointerEvent::Down(pointer)
        } else {
            PointerEvent::Move(pointer)
        };
        if pointer_tx.send(event).await.is_err() {
            tracing::warn!("Attacker controller stopped early");
            break;
        }
        step += 1;
    }

    drop(pointer_tx);
    controller
        .await
        .context("attacker controller panicked")??;

    let snapshot = stage.metrics().snapshot();
    let population = stage.handle().population().await?;
    tracing::info!(
        requests = snapshot.requests,
        redraws = snapshot.redraws,
        sprites = snapshot.sprites_drawn,
        "Render summary"
    );
    tracing::info!("Population at exit: {}", population.len());

    stage.shutdown().await?;
    let kills = observer.await.context("event observer panicked")?;
    tracing::info!("Demo finished after {} kills", kills);
    Ok(())
}
