//! Actor state: position, current animation frame and liveness.
use std::sync::Arc;

use crate::animation::AnimationClip;
use crate::behavior::Direction;
use crate::frames::SpriteFrame;
use crate::geometry::{Bounds, Point, Size};
use crate::species::SpeciesSpec;

slotmap::new_key_type! {
    /// Stable handle to an actor slot in the stage arena.
    ///
    /// Keys are generational: a removed actor's id never resolves to a
    /// later actor that reuses the slot.
    pub struct ActorId;
}

/// Who drives an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Population member run by the autonomous behavior selector.
    Autonomous,
    /// The pointer-driven attacker. Never part of the population.
    Player,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActorState {
    pub species: Arc<SpeciesSpec>,
    pub role: Role,
    /// Top-left anchor of the bounding box.
    pub position: Point,
    /// Crop-table row (behavior category).
    pub row: u32,
    /// Crop-table column (frame within the behavior).
    pub column: u32,
    /// Cleared exactly once, when the actor commits to dying.
    pub alive: bool,
}

impl ActorState {
    pub fn new(species: Arc<SpeciesSpec>, role: Role, position: Point) -> Self {
        let stand = species.clips.stand;
        Self {
            species,
            role,
            position,
            row: stand.row,
            column: stand.min_column,
            alive: true,
        }
    }

    pub fn size(&self) -> Size {
        self.species.size
    }

    pub fn is_player(&self) -> bool {
        self.role == Role::Player
    }

    /// Switches to `clip`, positioned on its first column.
    pub fn begin_clip(&mut self, clip: &AnimationClip) {
        self.row = clip.row;
        self.column = clip.min_column;
    }

    pub fn set_column(&mut self, column: u32) {
        self.column = column;
    }

    /// Moves one walking frame in `direction` at the species speed.
    pub fn step(&mut self, direction: Direction) {
        self.position = self.position.offset(direction.delta(self.species.speed));
    }

    /// Places the bounding box so its center sits on `point`.
    pub fn center_on(&mut self, point: Point) {
        let size = self.size();
        self.position = Point::new(point.x - size.width / 2.0, point.y - size.height / 2.0);
    }

    pub fn within(&self, bounds: &Bounds) -> bool {
        bounds.contains(self.position, self.size())
    }

    /// Flips `alive` off. Returns false when the actor was already dying.
    pub fn commit_death(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        true
    }

    /// Rectangles for the current frame, or `None` when the crop table has
    /// no entry for `(row, column)`.
    pub fn sprite_frame(&self) -> Option<SpriteFrame> {
        let crop = self.species.crops.entry(self.row, self.column)?;
        Some(crop.resolve(self.row, self.size(), self.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::tests::blob;

    fn actor_at(x: f32, y: f32) -> ActorState {
        ActorState::new(Arc::new(blob()), Role::Autonomous, Point::new(x, y))
    }

    #[test]
    fn starts_alive_on_stand_clip() {
        let actor = actor_at(0.0, 0.0);
        assert!(actor.alive);
        assert_eq!((actor.row, actor.column), (0, 0));
    }

    #[test]
    fn commit_death_flips_exactly_once() {
        let mut actor = actor_at(0.0, 0.0);
        assert!(actor.commit_death());
        assert!(!actor.alive);
        assert!(!actor.commit_death());
        assert!(!actor.alive);
    }

    #[test]
    fn step_then_bounds_check() {
        let bounds = Bounds::new(200, 200);
        let mut actor = actor_at(138.0, 10.0);
        assert!(actor.within(&bounds));

        actor.step(Direction::Right);
        assert_eq!(actor.position, Point::new(143.0, 10.0));
        assert!(!actor.within(&bounds));
    }

    #[test]
    fn center_on_pointer() {
        let mut actor = actor_at(0.0, 0.0);
        actor.center_on(Point::new(100.0, 100.0));
        assert_eq!(actor.position, Point::new(70.0, 70.0));
    }

    #[test]
    fn sprite_frame_missing_entry_is_skipped() {
        let mut actor = actor_at(5.0, 5.0);
        assert!(actor.sprite_frame().is_some());

        actor.set_column(12);
        assert!(actor.sprite_frame().is_none());
    }
}
