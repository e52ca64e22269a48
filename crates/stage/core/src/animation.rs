//! Animation clips and the column cycle they step through.
use std::time::Duration;

/// Frame range of one behavior inside the crop table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationClip {
    /// Crop-table row selected while this clip plays.
    pub row: u32,
    /// Time between two column advances.
    pub frame_ms: u64,
    pub min_column: u32,
    pub max_column: u32,
    /// Looping clips wrap forever; one-shot clips finish on `max_column`.
    pub repeat: bool,
}

impl AnimationClip {
    pub const fn looping(row: u32, frame_ms: u64, min_column: u32, max_column: u32) -> Self {
        Self {
            row,
            frame_ms,
            min_column,
            max_column,
            repeat: true,
        }
    }

    pub const fn once(row: u32, frame_ms: u64, min_column: u32, max_column: u32) -> Self {
        Self {
            row,
            frame_ms,
            min_column,
            max_column,
            repeat: false,
        }
    }

    pub const fn frame_duration(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    /// Fresh cycle positioned on the first column.
    pub const fn cycle(&self) -> FrameCycle {
        FrameCycle::new(self.min_column, self.max_column)
    }

    /// True when a one-shot clip has reached its final column.
    pub const fn finished_at(&self, column: u32) -> bool {
        !self.repeat && column >= self.max_column
    }
}

/// Wrapping column counter: `min, min+1, ..., max, min, ...`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameCycle {
    min: u32,
    max: u32,
    current: u32,
}

impl FrameCycle {
    pub const fn new(min: u32, max: u32) -> Self {
        Self {
            min,
            max,
            current: min,
        }
    }

    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Steps to the next column, wrapping from `max` back to `min`.
    pub fn advance(&mut self) -> u32 {
        self.current = if self.current < self.max {
            self.current + 1
        } else {
            self.min
        };
        self.current
    }

    pub fn restart(&mut self) {
        self.current = self.min;
    }
}
