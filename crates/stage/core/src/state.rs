//! Population arena.
//!
//! [`StageState`] owns every actor in a generational slot map. The
//! population is an insertion-ordered list of ids into that arena; it is
//! the only authority on who can be targeted or drawn. Removing an actor
//! invalidates its id, so late observers (death timelines, behavior loops)
//! resolve to nothing instead of to a stale or recycled actor.

use std::sync::Arc;

use rand::Rng;
use slotmap::SlotMap;

use crate::actor::{ActorId, ActorState, Role};
use crate::geometry::{Bounds, Point, Size};
use crate::species::SpeciesSpec;

/// Where a freshly spawned actor lands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// Uniformly inside the mounted surface. Deferred until mount.
    Random,
    At(Point),
}

#[derive(Debug, Default)]
pub struct StageState {
    actors: SlotMap<ActorId, ActorState>,
    population: Vec<ActorId>,
    player: Option<ActorId>,
    bounds: Option<Bounds>,
    /// Random placements waiting for the surface to be sized.
    unplaced: Vec<ActorId>,
}

impl StageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn is_mounted(&self) -> bool {
        self.bounds.is_some()
    }

    /// Sizes the stage and resolves deferred random placements.
    ///
    /// Returns the ids that were placed by this call.
    pub fn mount<R: Rng + ?Sized>(&mut self, bounds: Bounds, rng: &mut R) -> Vec<ActorId> {
        self.bounds = Some(bounds);
        let pending = std::mem::take(&mut self.unplaced);
        let mut placed = Vec::with_capacity(pending.len());
        for id in pending {
            if let Some(actor) = self.actors.get_mut(id) {
                actor.position = random_anchor(bounds, actor.size(), rng);
                placed.push(id);
            }
        }
        placed
    }

    /// Adds a population member at the end of the draw order.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        species: Arc<SpeciesSpec>,
        placement: Placement,
        rng: &mut R,
    ) -> ActorId {
        let position = match (placement, self.bounds) {
            (Placement::At(point), _) => point,
            (Placement::Random, Some(bounds)) => random_anchor(bounds, species.size, rng),
            (Placement::Random, None) => Point::ORIGIN,
        };
        let id = self
            .actors
            .insert(ActorState::new(species, Role::Autonomous, position));
        if placement == Placement::Random && self.bounds.is_none() {
            self.unplaced.push(id);
        }
        self.population.push(id);
        id
    }

    /// Installs the pointer-driven actor, replacing any previous one.
    pub fn install_player(&mut self, species: Arc<SpeciesSpec>) -> ActorId {
        if let Some(previous) = self.player.take() {
            self.actors.remove(previous);
        }
        let id = self
            .actors
            .insert(ActorState::new(species, Role::Player, Point::ORIGIN));
        self.player = Some(id);
        id
    }

    pub fn player(&self) -> Option<ActorId> {
        self.player
    }

    pub fn get(&self, id: ActorId) -> Option<&ActorState> {
        self.actors.get(id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut ActorState> {
        self.actors.get_mut(id)
    }

    pub fn is_member(&self, id: ActorId) -> bool {
        self.population.contains(&id)
    }

    /// Removes a population member. Absent ids are ignored and yield `None`.
    pub fn remove(&mut self, id: ActorId) -> Option<ActorState> {
        let index = self.population.iter().position(|member| *member == id)?;
        self.population.remove(index);
        self.unplaced.retain(|pending| *pending != id);
        self.actors.remove(id)
    }

    /// Population members in insertion order.
    pub fn population(&self) -> impl Iterator<Item = (ActorId, &ActorState)> {
        self.population
            .iter()
            .filter_map(|id| self.actors.get(*id).map(|actor| (*id, actor)))
    }

    pub fn population_len(&self) -> usize {
        self.population.len()
    }

    /// Live members whose anchor lies within `radius` of `origin`.
    pub fn targets_within(&self, origin: Point, radius: f32) -> Vec<ActorId> {
        self.population()
            .filter(|(_, actor)| actor.alive && actor.position.distance(origin) <= radius)
            .map(|(id, _)| id)
            .collect()
    }

    /// Everything that gets drawn: population in order, then the player.
    pub fn draw_order(&self) -> impl Iterator<Item = &ActorState> {
        self.population()
            .map(|(_, actor)| actor)
            .chain(self.player.and_then(|id| self.actors.get(id)))
    }
}

fn random_anchor<R: Rng + ?Sized>(bounds: Bounds, size: Size, rng: &mut R) -> Point {
    let max = bounds.max_anchor(size);
    Point::new(rng.gen_range(0.0..=max.x), rng.gen_range(0.0..=max.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::tests::blob;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn stage() -> (StageState, Arc<SpeciesSpec>, StdRng) {
        (StageState::new(), Arc::new(blob()), StdRng::seed_from_u64(3))
    }

    #[test]
    fn random_spawns_stay_in_bounds() {
        let (mut state, species, mut rng) = stage();
        state.mount(Bounds::new(300, 200), &mut rng);

        for _ in 0..50 {
            let id = state.spawn(species.clone(), Placement::Random, &mut rng);
            let actor = state.get(id).unwrap();
            assert!(actor.within(&Bounds::new(300, 200)), "{:?}", actor.position);
        }
    }

    #[test]
    fn random_placement_waits_for_mount() {
        let (mut state, species, mut rng) = stage();
        let id = state.spawn(species.clone(), Placement::Random, &mut rng);
        let fixed = state.spawn(species, Placement::At(Point::new(500.0, 500.0)), &mut rng);

        let placed = state.mount(Bounds::new(100, 100), &mut rng);

        assert_eq!(placed, vec![id]);
        assert!(state.get(id).unwrap().within(&Bounds::new(100, 100)));
        assert_eq!(state.get(fixed).unwrap().position, Point::new(500.0, 500.0));
    }

    #[test]
    fn strike_radius_selects_only_near_actors() {
        let (mut state, species, mut rng) = stage();
        let near = state.spawn(species.clone(), Placement::At(Point::new(520.0, 500.0)), &mut rng);
        let _far = state.spawn(species, Placement::At(Point::new(700.0, 500.0)), &mut rng);

        assert_eq!(state.targets_within(Point::new(500.0, 500.0), 80.0), vec![near]);
    }

    #[test]
    fn dying_actors_are_not_targets() {
        let (mut state, species, mut rng) = stage();
        let id = state.spawn(species, Placement::At(Point::new(10.0, 10.0)), &mut rng);
        state.get_mut(id).unwrap().commit_death();

        assert!(state.targets_within(Point::new(10.0, 10.0), 80.0).is_empty());
    }

    #[test]
    fn double_removal_is_ignored() {
        let (mut state, species, mut rng) = stage();
        let a = state.spawn(species.clone(), Placement::At(Point::ORIGIN), &mut rng);
        let b = state.spawn(species, Placement::At(Point::ORIGIN), &mut rng);

        assert!(state.remove(a).is_some());
        assert!(state.remove(a).is_none());

        let members: Vec<ActorId> = state.population().map(|(id, _)| id).collect();
        assert_eq!(members, vec![b]);
        assert!(state.get(a).is_none());
    }

    #[test]
    fn removed_slot_reuse_does_not_resurrect_old_id() {
        let (mut state, species, mut rng) = stage();
        let old = state.spawn(species.clone(), Placement::At(Point::ORIGIN), &mut rng);
        state.remove(old);
        let new = state.spawn(species, Placement::At(Point::ORIGIN), &mut rng);

        assert_ne!(old, new);
        assert!(state.get(old).is_none());
        assert!(!state.is_member(old));
    }

    #[test]
    fn draw_order_is_population_then_player() {
        let (mut state, species, mut rng) = stage();
        let first = state.spawn(species.clone(), Placement::At(Point::new(1.0, 0.0)), &mut rng);
        let player = state.install_player(species.clone());
        let second = state.spawn(species, Placement::At(Point::new(2.0, 0.0)), &mut rng);

        let order: Vec<Point> = state.draw_order().map(|a| a.position).collect();
        assert_eq!(
            order,
            vec![
                state.get(first).unwrap().position,
                state.get(second).unwrap().position,
                state.get(player).unwrap().position,
            ]
        );
        assert!(!state.is_member(player));
        assert_eq!(state.population_len(), 2);
    }
}
