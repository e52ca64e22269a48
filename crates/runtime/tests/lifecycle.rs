use std::sync::Arc;
use std::time::Duration;

use runtime::{
    BehaviorOutcome, HeadlessSurface, ImmediateImageLoader, Retaliation, Stage, StageEvent,
};
use stage_content::poring;
use stage_core::{ActorId, Placement, Point, SpeciesSpec};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{self, Instant};

async fn headless_stage() -> Stage {
    let stage = Stage::builder()
        .surface(HeadlessSurface::new())
        .image_loader(ImmediateImageLoader::new())
        .seed(11)
        .build()
        .await
        .expect("stage should build");
    stage.mount(800, 600).await.expect("mount");
    stage
}

async fn members(stage: &Stage) -> Vec<ActorId> {
    stage
        .handle()
        .population()
        .await
        .expect("population query")
        .into_iter()
        .map(|(id, _)| id)
        .collect()
}

/// Polls the population every 10ms of virtual time until `done` holds.
async fn wait_until(stage: &Stage, done: impl Fn(&[ActorId]) -> bool) -> Instant {
    loop {
        if done(&members(stage).await) {
            return Instant::now();
        }
        time::sleep(Duration::from_millis(10)).await;
    }
}

/// Waits for every event sender to go away.
async fn until_closed(events: &mut broadcast::Receiver<StageEvent>) {
    loop {
        match events.recv().await {
            Err(RecvError::Closed) => return,
            Ok(_) | Err(RecvError::Lagged(_)) => continue,
        }
    }
}

/// Attack → dying → removal after the grace window → delayed respawn.
#[tokio::test(start_paused = true)]
async fn attack_kills_removes_and_respawns() {
    // ================================================================
    // Setup: one actor at (100, 100)
    // ================================================================
    let stage = headless_stage().await;
    let species = Arc::new(poring());
    let (victim, _behavior) = stage
        .lifecycle()
        .spawn(species, Placement::At(Point::new(100.0, 100.0)))
        .await
        .expect("spawn");
    let mut events = stage.subscribe_events();

    // ================================================================
    // Attack on the actor's anchor
    // ================================================================
    let attacked_at = Instant::now();
    let hits = stage
        .pipeline()
        .on_attack(Point::new(100.0, 100.0))
        .await
        .expect("attack");
    assert_eq!(hits, vec![victim]);

    loop {
        match events.recv().await.expect("event stream") {
            StageEvent::ActorDying { id } if id == victim => break,
            _ => continue,
        }
    }
    let dying = stage.handle().actor(victim).await.unwrap().expect("still present");
    assert!(!dying.alive);
    assert_eq!(dying.row, 3, "death clip row");

    // ================================================================
    // Removal inside [1.5s, 1.6s]
    // ================================================================
    let removed_at = wait_until(&stage, |ids| !ids.contains(&victim)).await;
    let grace = removed_at - attacked_at;
    assert!(
        grace >= Duration::from_millis(1_500) && grace <= Duration::from_millis(1_600),
        "removed after {grace:?}"
    );
    assert!(stage.handle().actor(victim).await.unwrap().is_none());

    // ================================================================
    // Replacement inside [11.5s, 41.6s] after the attack
    // ================================================================
    let respawned_at = wait_until(&stage, |ids| !ids.is_empty()).await;
    let since_attack = respawned_at - attacked_at;
    assert!(
        since_attack >= Duration::from_millis(11_500) && since_attack <= Duration::from_millis(41_600),
        "respawned after {since_attack:?}"
    );

    let population = members(&stage).await;
    assert_eq!(population.len(), 1);
    assert_ne!(population[0], victim);

    stage.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn retaliation_timeline_reports_replacement() {
    let stage = headless_stage().await;
    let species = Arc::new(poring());
    let (id, _termination) = stage
        .handle()
        .spawn(species.clone(), Placement::At(Point::new(50.0, 50.0)))
        .await
        .unwrap();

    let outcome = stage.pipeline().retaliate(id, species.clone()).await;
    let Retaliation::Respawned { replacement } = outcome else {
        panic!("expected a respawn, got {outcome:?}");
    };
    assert_eq!(members(&stage).await, vec![replacement]);

    // The victim is gone; a second timeline finds nothing to do.
    assert_eq!(
        stage.pipeline().retaliate(id, species).await,
        Retaliation::Vanished
    );
}

#[tokio::test(start_paused = true)]
async fn simultaneous_kills_do_not_serialize() {
    let stage = headless_stage().await;
    let species = Arc::new(poring());
    for x in [300.0, 320.0, 340.0] {
        stage
            .handle()
            .spawn(species.clone(), Placement::At(Point::new(x, 300.0)))
            .await
            .unwrap();
    }
    let bystander = stage
        .handle()
        .spawn(species, Placement::At(Point::new(700.0, 300.0)))
        .await
        .unwrap()
        .0;

    let attacked_at = Instant::now();
    let hits = stage.pipeline().on_attack(Point::new(320.0, 300.0)).await.unwrap();
    assert_eq!(hits.len(), 3);

    let cleared_at = wait_until(&stage, |ids| ids == [bystander]).await;
    assert!(cleared_at - attacked_at <= Duration::from_millis(1_600));
}

#[tokio::test(start_paused = true)]
async fn forcing_death_twice_is_a_noop() {
    let stage = headless_stage().await;
    let species = Arc::new(poring());
    let (id, termination) = stage
        .handle()
        .spawn(species.clone(), Placement::At(Point::new(200.0, 200.0)))
        .await
        .unwrap();
    let mut events = stage.subscribe_events();

    let agent = stage.lifecycle().agent(id, species);
    let (first, second) = tokio::join!(agent.die(), agent.die());
    let mut outcomes = vec![first.unwrap(), second.unwrap()];
    outcomes.sort_by_key(|outcome| *outcome == BehaviorOutcome::Skipped);
    assert_eq!(
        outcomes,
        vec![BehaviorOutcome::Completed, BehaviorOutcome::Skipped]
    );

    assert!(termination.is_fired());
    let actor = stage.handle().actor(id).await.unwrap().unwrap();
    assert!(!actor.alive);
    assert_eq!(actor.column, 5, "death clip ran to its last frame");

    let mut dying = 0;
    while let Ok(event) = events.try_recv() {
        if event == (StageEvent::ActorDying { id }) {
            dying += 1;
        }
    }
    assert_eq!(dying, 1);

    // A third attempt completes immediately.
    assert_eq!(agent.die().await.unwrap(), BehaviorOutcome::Skipped);
}

#[tokio::test(start_paused = true)]
async fn removing_an_absent_actor_leaves_population_unchanged() {
    let stage = headless_stage().await;
    let species: Arc<SpeciesSpec> = Arc::new(poring());
    let (gone, _) = stage
        .handle()
        .spawn(species.clone(), Placement::At(Point::ORIGIN))
        .await
        .unwrap();
    let (kept, _) = stage
        .handle()
        .spawn(species, Placement::At(Point::new(10.0, 10.0)))
        .await
        .unwrap();

    assert!(stage.lifecycle().remove_on_death_complete(gone).await);
    assert!(!stage.lifecycle().remove_on_death_complete(gone).await);
    assert_eq!(members(&stage).await, vec![kept]);
}

#[tokio::test(start_paused = true)]
async fn initial_population_is_placed_in_bounds_at_mount() {
    let stage = Stage::builder()
        .surface(HeadlessSurface::new())
        .image_loader(ImmediateImageLoader::new())
        .seed(5)
        .build()
        .await
        .unwrap();
    let species = Arc::new(poring());

    // Spawned before the surface has a size: placement waits for mount.
    let ids = stage.lifecycle().spawn_initial(species, 12).await.unwrap();
    assert_eq!(ids.len(), 12);
    stage.mount(400, 300).await.unwrap();

    for (_, actor) in stage.handle().population().await.unwrap() {
        assert!(actor.position.x >= 0.0 && actor.position.x <= 340.0);
        assert!(actor.position.y >= 0.0 && actor.position.y <= 240.0);
    }
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_respawns() {
    let stage = headless_stage().await;
    let species = Arc::new(poring());
    let (victim, _behavior) = stage
        .lifecycle()
        .spawn(species, Placement::At(Point::new(100.0, 100.0)))
        .await
        .unwrap();
    let mut events = stage.subscribe_events();

    stage.pipeline().on_attack(Point::new(100.0, 100.0)).await.unwrap();
    wait_until(&stage, |ids| !ids.contains(&victim)).await;

    // The timeline now sleeps on its 10-40s respawn delay.
    stage.shutdown().await.unwrap();
    time::timeout(Duration::from_millis(100), until_closed(&mut events))
        .await
        .expect("no task outlives the stage");
}

#[tokio::test(start_paused = true)]
async fn shutdown_during_death_clip_releases_everything() {
    let stage = headless_stage().await;
    let species = Arc::new(poring());
    for x in [100.0, 300.0, 500.0] {
        stage
            .lifecycle()
            .spawn(species.clone(), Placement::At(Point::new(x, 100.0)))
            .await
            .unwrap();
    }
    let mut events = stage.subscribe_events();

    let hits = stage.pipeline().on_attack(Point::new(100.0, 100.0)).await.unwrap();
    assert_eq!(hits.len(), 1);
    time::sleep(Duration::from_millis(200)).await;

    stage.shutdown().await.unwrap();
    time::timeout(Duration::from_millis(100), until_closed(&mut events))
        .await
        .expect("death clip and behaviors stop with the stage");
}

#[tokio::test(start_paused = true)]
async fn timeline_after_shutdown_signal_is_cancelled() {
    let stage = headless_stage().await;
    let species = Arc::new(poring());
    let (id, _) = stage
        .handle()
        .spawn(species.clone(), Placement::At(Point::ORIGIN))
        .await
        .unwrap();

    let pipeline = stage.pipeline().clone();
    stage.shutdown().await.unwrap();
    assert_eq!(pipeline.retaliate(id, species).await, Retaliation::Cancelled);
}
