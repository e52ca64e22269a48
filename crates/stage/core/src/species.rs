//! Data-driven species definitions.
//!
//! A species bundles everything that differs between kinds of actors: the
//! sprite sheet, nominal size, walking speed, the clip for each behavior and
//! the crop table. Actors of every species share the same behavior code.

use thiserror::Error;

use crate::animation::AnimationClip;
use crate::behavior::BehaviorKind;
use crate::frames::CropTable;
use crate::geometry::{Point, Size};

/// Clips for each behavior a species can perform.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clips {
    pub stand: AnimationClip,
    pub walk: Option<AnimationClip>,
    pub die: Option<AnimationClip>,
    pub attack: Option<AnimationClip>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeciesSpec {
    pub name: String,
    /// Identifier handed to the image loader.
    pub sprite_source: String,
    pub size: Size,
    /// Per-frame displacement magnitude while walking.
    pub speed: Point,
    /// Offset from the pointer to the attack origin. Defaults to half the
    /// width to the left.
    pub muzzle: Option<Point>,
    pub clips: Clips,
    pub crops: CropTable,
}

impl SpeciesSpec {
    pub fn clip(&self, kind: BehaviorKind) -> Option<&AnimationClip> {
        match kind {
            BehaviorKind::Stand => Some(&self.clips.stand),
            BehaviorKind::Walk(_) => self.clips.walk.as_ref(),
            BehaviorKind::Die => self.clips.die.as_ref(),
            BehaviorKind::Attack => self.clips.attack.as_ref(),
        }
    }

    pub fn muzzle(&self) -> Point {
        self.muzzle
            .unwrap_or_else(|| Point::new(-self.size.width / 2.0, 0.0))
    }

    /// Checks the clip and size invariants the runtime relies on.
    pub fn validate(&self) -> Result<(), SpeciesError> {
        if self.size.width <= 0.0 || self.size.height <= 0.0 {
            return Err(SpeciesError::EmptySize {
                species: self.name.clone(),
            });
        }

        let clips = [
            ("stand", Some(&self.clips.stand)),
            ("walk", self.clips.walk.as_ref()),
            ("die", self.clips.die.as_ref()),
            ("attack", self.clips.attack.as_ref()),
        ];

        for (behavior, clip) in clips {
            let Some(clip) = clip else { continue };
            if clip.frame_ms == 0 {
                return Err(SpeciesError::ZeroFrameDuration {
                    species: self.name.clone(),
                    behavior,
                });
            }
            if clip.min_column > clip.max_column {
                return Err(SpeciesError::InvertedColumns {
                    species: self.name.clone(),
                    behavior,
                    min: clip.min_column,
                    max: clip.max_column,
                });
            }
            if self.crops.row_len(clip.row) == 0 {
                return Err(SpeciesError::EmptyRow {
                    species: self.name.clone(),
                    behavior,
                    row: clip.row,
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpeciesError {
    #[error("species {species} has a zero-sized bounding box")]
    EmptySize { species: String },

    #[error("species {species}: {behavior} clip has a zero frame duration")]
    ZeroFrameDuration {
        species: String,
        behavior: &'static str,
    },

    #[error("species {species}: {behavior} clip columns {min}..={max} are inverted")]
    InvertedColumns {
        species: String,
        behavior: &'static str,
        min: u32,
        max: u32,
    },

    #[error("species {species}: {behavior} clip points at empty crop row {row}")]
    EmptyRow {
        species: String,
        behavior: &'static str,
        row: u32,
    },
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::frames::FrameCrop;

    pub(crate) fn blob() -> SpeciesSpec {
        SpeciesSpec {
            name: "blob".into(),
            sprite_source: "blob.png".into(),
            size: Size::new(60.0, 60.0),
            speed: Point::new(5.0, 5.0),
            muzzle: None,
            clips: Clips {
                stand: AnimationClip::looping(0, 250, 0, 3),
                walk: Some(AnimationClip::looping(1, 100, 0, 1)),
                die: Some(AnimationClip::once(2, 150, 0, 1)),
                attack: None,
            },
            crops: CropTable::new(vec![
                (0..4).map(|i| FrameCrop::new(i, i as f32 * 60.0, 60.0)).collect(),
                (0..2).map(|i| FrameCrop::new(i, i as f32 * 50.0, 50.0)).collect(),
                (0..2).map(|i| FrameCrop::new(i, i as f32 * 50.0, 50.0)).collect(),
            ]),
        }
    }

    #[test]
    fn valid_species_passes() {
        assert_eq!(blob().validate(), Ok(()));
    }

    #[test]
    fn clip_lookup_by_behavior() {
        let spec = blob();
        assert_eq!(spec.clip(BehaviorKind::Stand).map(|c| c.row), Some(0));
        assert_eq!(
            spec.clip(BehaviorKind::Walk(crate::Direction::Up)).map(|c| c.row),
            Some(1)
        );
        assert!(spec.clip(BehaviorKind::Attack).is_none());
    }

    #[test]
    fn muzzle_defaults_to_half_width_left() {
        let mut spec = blob();
        assert_eq!(spec.muzzle(), Point::new(-30.0, 0.0));
        spec.muzzle = Some(Point::new(4.0, 2.0));
        assert_eq!(spec.muzzle(), Point::new(4.0, 2.0));
    }

    #[test]
    fn rejects_inverted_and_uncropped_clips() {
        let mut spec = blob();
        spec.clips.die = Some(AnimationClip::once(2, 150, 3, 1));
        assert!(matches!(
            spec.validate(),
            Err(SpeciesError::InvertedColumns { min: 3, max: 1, .. })
        ));

        let mut spec = blob();
        spec.clips.attack = Some(AnimationClip::once(9, 100, 0, 2));
        assert!(matches!(
            spec.validate(),
            Err(SpeciesError::EmptyRow { row: 9, .. })
        ));
    }
}
