//! Name-indexed species registry.
use std::collections::HashMap;
use std::sync::Arc;

use stage_core::{SpeciesError, SpeciesSpec};

use crate::species;

/// Validated species, shared by reference with every actor spawned from them.
#[derive(Clone, Debug, Default)]
pub struct SpeciesCatalog {
    species: HashMap<String, Arc<SpeciesSpec>>,
}

impl SpeciesCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the built-in species.
    pub fn builtin() -> Result<Self, SpeciesError> {
        Self::from_specs([species::poring(), species::acidus()])
    }

    /// Catalog holding `specs`; the first invalid one fails the whole set.
    pub fn from_specs(specs: impl IntoIterator<Item = SpeciesSpec>) -> Result<Self, SpeciesError> {
        let mut catalog = Self::new();
        for spec in specs {
            catalog.insert(spec)?;
        }
        Ok(catalog)
    }

    /// Validates and registers `spec`, replacing any species with the same name.
    pub fn insert(&mut self, spec: SpeciesSpec) -> Result<Arc<SpeciesSpec>, SpeciesError> {
        spec.validate()?;
        let spec = Arc::new(spec);
        self.species.insert(spec.name.clone(), Arc::clone(&spec));
        Ok(spec)
    }

    pub fn get(&self, name: &str) -> Option<Arc<SpeciesSpec>> {
        self.species.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.species.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Registers every species from a RON catalog file.
    #[cfg(feature = "loaders")]
    pub fn extend_from_file(&mut self, path: &std::path::Path) -> crate::LoadResult<usize> {
        let loaded = crate::SpeciesLoader::load(path)?;
        let count = loaded.len();
        for spec in loaded {
            self.insert(spec)?;
        }
        Ok(count)
    }
}
