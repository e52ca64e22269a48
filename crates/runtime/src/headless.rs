//! Headless collaborators.
//!
//! [`HeadlessSurface`] counts draw calls instead of rasterizing and
//! [`ImmediateImageLoader`] resolves every sheet without I/O. Used by the
//! demo binary and by tests.
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use async_trait::async_trait;
use stage_core::Rect;

use crate::api::{DrawingSurface, ImageHandle, ImageLoadError, ImageLoader};

/// Counters shared between a [`HeadlessSurface`] and its observers.
#[derive(Debug, Default)]
pub struct SurfaceStats {
    clears: AtomicU64,
    draws: AtomicU64,
    width: AtomicU32,
    height: AtomicU32,
    cursor_hidden: AtomicBool,
}

impl SurfaceStats {
    pub fn clears(&self) -> u64 {
        self.clears.load(Ordering::Relaxed)
    }

    pub fn draws(&self) -> u64 {
        self.draws.load(Ordering::Relaxed)
    }

    pub fn size(&self) -> (u32, u32) {
        (
            self.width.load(Ordering::Relaxed),
            self.height.load(Ordering::Relaxed),
        )
    }

    pub fn cursor_hidden(&self) -> bool {
        self.cursor_hidden.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Default)]
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    stats: Arc<SurfaceStats>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> Arc<SurfaceStats> {
        Arc::clone(&self.stats)
    }
}

impl DrawingSurface for HeadlessSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.stats.width.store(width, Ordering::Relaxed);
        self.stats.height.store(height, Ordering::Relaxed);
    }

    fn clear(&mut self) {
        self.stats.clears.fetch_add(1, Ordering::Relaxed);
    }

    fn draw_sprite(&mut self, _image: ImageHandle, _source: Rect, _dest: Rect) {
        self.stats.draws.fetch_add(1, Ordering::Relaxed);
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.stats.cursor_hidden.store(!visible, Ordering::Relaxed);
    }
}

/// Resolves every source at once with a fresh handle.
///
/// Sources registered through [`failing`](Self::failing) are rejected
/// instead.
#[derive(Debug, Default)]
pub struct ImmediateImageLoader {
    next: AtomicU64,
    loads: Arc<AtomicU64>,
    failing: HashSet<String>,
}

impl ImmediateImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing(mut self, source: impl Into<String>) -> Self {
        self.failing.insert(source.into());
        self
    }

    /// Shared count of `load` calls, readable after the loader moved into
    /// the stage.
    pub fn load_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.loads)
    }
}

#[async_trait]
impl ImageLoader for ImmediateImageLoader {
    async fn load(&self, source: &str) -> Result<ImageHandle, ImageLoadError> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        if self.failing.contains(source) {
            return Err(ImageLoadError::new(source, "rejected by headless loader"));
        }
        Ok(ImageHandle(self.next.fetch_add(1, Ordering::Relaxed)))
    }
}
