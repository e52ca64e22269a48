//! Collaborators supplied by the presentation shell.
//!
//! The runtime never touches pixels or files itself: it clears and draws
//! through a [`DrawingSurface`] and obtains sprite sheets from an
//! [`ImageLoader`]. Both are trait objects so shells (canvas, terminal,
//! headless test doubles) plug in without generics leaking into the API.
use std::fmt;

use async_trait::async_trait;
use stage_core::Rect;

use super::errors::ImageLoadError;

/// Opaque handle to a decoded sprite sheet, minted by the [`ImageLoader`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u64);

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "img#{}", self.0)
    }
}

/// Drawing target owned by the stage worker.
///
/// The size reported after [`resize`](Self::resize) is authoritative: it
/// sets the walking bounds and the placement area.
pub trait DrawingSurface: Send {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Called on mount and on every later resize. Surfaces whose size is
    /// owned elsewhere may keep their own dimensions.
    fn resize(&mut self, width: u32, height: u32);

    /// Clears the whole visible surface.
    fn clear(&mut self);

    fn draw_sprite(&mut self, image: ImageHandle, source: Rect, dest: Rect);

    /// Shows or hides the pointer cursor over the surface.
    fn set_cursor_visible(&mut self, _visible: bool) {}
}

/// Asynchronous sprite-sheet source.
///
/// Each distinct source identifier is requested once; the stage caches the
/// resulting handle for every actor that shares the sheet.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, source: &str) -> Result<ImageHandle, ImageLoadError>;
}
