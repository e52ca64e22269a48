use stage_core::{AnimationClip, Clips, CropTable, FrameCrop, Point, Size, SpeciesSpec};

pub const PORING_SHEET: &str =
    "https://www.spriters-resource.com/resources/sheets/124/126666.png?updated=1582904836";

/// The autonomous blob that wanders the stage.
pub fn poring() -> SpeciesSpec {
    let stand = vec![
        FrameCrop::new(0, 0.0, 60.0),
        FrameCrop::new(1, 60.0, 60.0),
        FrameCrop::new(2, 120.0, 60.0),
        FrameCrop::new(3, 185.0, 60.0),
    ];

    let walk = [0.0, 50.0, 100.0, 155.0, 200.0, 255.0, 310.0, 365.0]
        .into_iter()
        .enumerate()
        .map(|(order, offset_x)| FrameCrop::new(order as u32, offset_x, 50.0))
        .collect();

    let die = vec![
        FrameCrop::new(0, 0.0, 50.0).with_vertical(200.0, 50.0),
        FrameCrop::new(1, 50.0, 50.0).with_vertical(200.0, 50.0),
        FrameCrop::new(2, 130.0, 90.0).with_vertical(200.0, 50.0),
        FrameCrop::new(3, 240.0, 90.0)
            .with_vertical(190.0, 80.0)
            .with_margin(0.0, -20.0),
        FrameCrop::new(4, 310.0, 130.0)
            .with_vertical(180.0, 80.0)
            .with_margin(-45.0, -25.0),
        FrameCrop::new(5, 430.0, 120.0)
            .with_vertical(200.0, 60.0)
            .with_margin(-45.0, -3.0),
    ];

    SpeciesSpec {
        name: "poring".into(),
        sprite_source: PORING_SHEET.into(),
        size: Size::new(60.0, 60.0),
        speed: Point::new(5.0, 5.0),
        muzzle: None,
        clips: Clips {
            stand: AnimationClip::looping(0, 250, 0, 3),
            walk: Some(AnimationClip::looping(1, 100, 0, 7)),
            die: Some(AnimationClip::once(3, 150, 0, 5)),
            attack: None,
        },
        // Row 2 is unused on this sheet.
        crops: CropTable::new(vec![stand, walk, Vec::new(), die]),
    }
}
