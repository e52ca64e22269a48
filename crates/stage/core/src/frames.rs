//! Sprite-sheet crop tables.
//!
//! A [`CropTable`] maps `(row, column)` to a [`FrameCrop`]: the source
//! rectangle inside the sprite sheet plus a draw offset. Rows are behavior
//! categories (stand, walk, die, ...) and columns are frames within the
//! behavior.

use crate::geometry::{Point, Rect, Size};

/// One animation frame inside a sprite sheet.
///
/// `offset_y` and `height` default to `row * actor_height` and
/// `actor_height`. Margins shift where the frame is drawn without changing
/// the source crop, for frames whose silhouette overflows the nominal box.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameCrop {
    pub order: u32,
    pub offset_x: f32,
    pub offset_y: Option<f32>,
    pub width: f32,
    pub height: Option<f32>,
    pub margin_width: Option<f32>,
    pub margin_height: Option<f32>,
}

impl FrameCrop {
    /// Crop with only the mandatory columns set.
    pub const fn new(order: u32, offset_x: f32, width: f32) -> Self {
        Self {
            order,
            offset_x,
            offset_y: None,
            width,
            height: None,
            margin_width: None,
            margin_height: None,
        }
    }

    #[must_use]
    pub const fn with_vertical(mut self, offset_y: f32, height: f32) -> Self {
        self.offset_y = Some(offset_y);
        self.height = Some(height);
        self
    }

    #[must_use]
    pub const fn with_margin(mut self, margin_width: f32, margin_height: f32) -> Self {
        self.margin_width = Some(margin_width);
        self.margin_height = Some(margin_height);
        self
    }

    /// Resolves defaults against the actor and produces the rectangles to draw.
    pub fn resolve(&self, row: u32, actor_size: Size, position: Point) -> SpriteFrame {
        let offset_y = self
            .offset_y
            .unwrap_or(actor_size.height * row as f32);
        let height = self.height.unwrap_or(actor_size.height);
        let margin_width = self.margin_width.unwrap_or(0.0);
        let margin_height = self.margin_height.unwrap_or(0.0);

        SpriteFrame {
            source: Rect::new(self.offset_x, offset_y, self.width, height),
            dest: Rect::new(
                position.x + margin_width,
                position.y + margin_height,
                self.width,
                height,
            ),
        }
    }
}

/// Source crop and destination rectangle for one draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteFrame {
    pub source: Rect,
    pub dest: Rect,
}

/// Per-species table of frame crops, indexed by row then column.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CropTable {
    rows: Vec<Vec<FrameCrop>>,
}

impl CropTable {
    pub fn new(rows: Vec<Vec<FrameCrop>>) -> Self {
        Self { rows }
    }

    /// Looks up the crop for `(row, column)`; `None` when the table has no
    /// such entry.
    pub fn entry(&self, row: u32, column: u32) -> Option<&FrameCrop> {
        self.rows.get(row as usize)?.get(column as usize)
    }

    /// Number of frames declared for `row`.
    pub fn row_len(&self, row: u32) -> usize {
        self.rows.get(row as usize).map_or(0, Vec::len)
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTOR: Size = Size::new(60.0, 60.0);

    #[test]
    fn resolve_defaults_vertical_crop_to_row() {
        let crop = FrameCrop::new(1, 50.0, 50.0);
        let frame = crop.resolve(1, ACTOR, Point::new(10.0, 20.0));

        assert_eq!(frame.source, Rect::new(50.0, 60.0, 50.0, 60.0));
        assert_eq!(frame.dest, Rect::new(10.0, 20.0, 50.0, 60.0));
    }

    #[test]
    fn margins_shift_destination_only() {
        let crop = FrameCrop::new(4, 310.0, 130.0)
            .with_vertical(180.0, 80.0)
            .with_margin(-45.0, -25.0);
        let frame = crop.resolve(3, ACTOR, Point::new(100.0, 100.0));

        assert_eq!(frame.source, Rect::new(310.0, 180.0, 130.0, 80.0));
        assert_eq!(frame.dest, Rect::new(55.0, 75.0, 130.0, 80.0));
    }

    #[test]
    fn missing_entries_are_none() {
        let table = CropTable::new(vec![vec![FrameCrop::new(0, 0.0, 60.0)], vec![]]);

        assert!(table.entry(0, 0).is_some());
        assert!(table.entry(0, 1).is_none());
        assert!(table.entry(1, 0).is_none());
        assert!(table.entry(7, 0).is_none());
        assert_eq!(table.row_len(1), 0);
    }
}
