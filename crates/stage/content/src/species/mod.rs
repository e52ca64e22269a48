//! Built-in species shipped with the stage.
//!
//! Sprite-sheet coordinates are hand-measured against the sheets named in
//! `sprite_source`.

mod acidus;
mod poring;

pub use acidus::acidus;
pub use poring::poring;
