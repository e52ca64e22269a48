//! Species content and catalog loaders.
//!
//! This crate houses the built-in species (see [`species`]) and, behind the
//! `loaders` feature, reads additional species catalogs from RON files.
//! Content is consumed by the runtime when spawning actors and never
//! appears in stage state except through `Arc<SpeciesSpec>` references.

pub mod catalog;
pub mod species;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::SpeciesCatalog;
pub use species::{acidus, poring};

#[cfg(feature = "loaders")]
pub use loaders::{LoadResult, SpeciesLoader};
