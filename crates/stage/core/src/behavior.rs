//! Behavior kinds and the shuffled plan autonomous actors run through.
use std::fmt;

use arrayvec::ArrayVec;
use rand::Rng;
use rand::seq::SliceRandom;
use strum::{EnumIter, IntoEnumIterator};

use crate::geometry::Point;

/// Eight walking headings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    /// Displacement for one frame at `speed` (surface y grows downward).
    pub fn delta(self, speed: Point) -> Point {
        let (sx, sy) = (speed.x, speed.y);
        match self {
            Self::Left => Point::new(-sx, 0.0),
            Self::Right => Point::new(sx, 0.0),
            Self::Up => Point::new(0.0, -sy),
            Self::Down => Point::new(0.0, sy),
            Self::UpLeft => Point::new(-sx, -sy),
            Self::UpRight => Point::new(sx, -sy),
            Self::DownLeft => Point::new(-sx, sy),
            Self::DownRight => Point::new(sx, sy),
        }
    }
}

/// A bounded unit of actor activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BehaviorKind {
    Stand,
    Walk(Direction),
    Die,
    Attack,
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stand => write!(f, "stand"),
            Self::Walk(direction) => write!(f, "walk-{direction:?}"),
            Self::Die => write!(f, "die"),
            Self::Attack => write!(f, "attack"),
        }
    }
}

/// Number of entries in one autonomous cycle: two stands plus eight walks.
pub const PLAN_LEN: usize = 10;

/// One shuffled round of autonomous behaviors.
///
/// Standing appears twice so idle actors outweigh walkers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BehaviorPlan {
    steps: ArrayVec<BehaviorKind, PLAN_LEN>,
}

impl BehaviorPlan {
    /// Unshuffled plan, in declaration order.
    pub fn ordered() -> Self {
        let mut steps = ArrayVec::new();
        steps.push(BehaviorKind::Stand);
        steps.push(BehaviorKind::Stand);
        for direction in Direction::iter() {
            steps.push(BehaviorKind::Walk(direction));
        }
        Self { steps }
    }

    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut plan = Self::ordered();
        plan.steps.shuffle(rng);
        plan
    }

    pub fn steps(&self) -> &[BehaviorKind] {
        &self.steps
    }
}

impl IntoIterator for BehaviorPlan {
    type Item = BehaviorKind;
    type IntoIter = arrayvec::IntoIter<BehaviorKind, PLAN_LEN>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn diagonals_move_on_both_axes() {
        let speed = Point::new(5.0, 3.0);
        assert_eq!(Direction::UpLeft.delta(speed), Point::new(-5.0, -3.0));
        assert_eq!(Direction::UpRight.delta(speed), Point::new(5.0, -3.0));
        assert_eq!(Direction::DownLeft.delta(speed), Point::new(-5.0, 3.0));
        assert_eq!(Direction::DownRight.delta(speed), Point::new(5.0, 3.0));
        assert_eq!(Direction::Left.delta(speed), Point::new(-5.0, 0.0));
        assert_eq!(Direction::Down.delta(speed), Point::new(0.0, 3.0));
    }

    #[test]
    fn shuffled_plan_keeps_every_behavior() {
        let mut rng = StdRng::seed_from_u64(7);
        let plan = BehaviorPlan::shuffled(&mut rng);

        assert_eq!(plan.steps().len(), PLAN_LEN);
        let stands = plan
            .steps()
            .iter()
            .filter(|kind| **kind == BehaviorKind::Stand)
            .count();
        assert_eq!(stands, 2);
        for direction in Direction::iter() {
            assert!(plan.steps().contains(&BehaviorKind::Walk(direction)));
        }
        assert!(!plan.steps().contains(&BehaviorKind::Die));
        assert!(!plan.steps().contains(&BehaviorKind::Attack));
    }
}
