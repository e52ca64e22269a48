use stage_core::{AnimationClip, Clips, CropTable, FrameCrop, Point, Size, SpeciesSpec};

pub const ACIDUS_SHEET: &str = "sprites/acidus.png";

/// The pointer-driven attacker.
pub fn acidus() -> SpeciesSpec {
    let idle = (0..4)
        .map(|order| FrameCrop::new(order, order as f32 * 110.0, 110.0))
        .collect();

    let breath = (0..7)
        .map(|order| {
            FrameCrop::new(order, order as f32 * 130.0, 130.0)
                .with_vertical(100.0, 110.0)
                .with_margin(-10.0, -10.0)
        })
        .collect();

    SpeciesSpec {
        name: "acidus".into(),
        sprite_source: ACIDUS_SHEET.into(),
        size: Size::new(110.0, 100.0),
        speed: Point::new(0.0, 0.0),
        muzzle: None,
        clips: Clips {
            stand: AnimationClip::looping(0, 150, 0, 3),
            walk: None,
            die: None,
            attack: Some(AnimationClip::once(1, 80, 0, 6)),
        },
        crops: CropTable::new(vec![idle, breath]),
    }
}
