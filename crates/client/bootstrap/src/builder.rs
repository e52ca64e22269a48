//! Builds the species catalog and stage used by shells.
use std::sync::Arc;

use anyhow::{Context, Result};
use runtime::{DrawingSurface, HeadlessSurface, ImageLoader, ImmediateImageLoader, Stage};
use stage_content::SpeciesCatalog;
use stage_core::SpeciesSpec;

use crate::config::ClientConfig;

/// Builder that assembles the catalog, the resolved species and a mounted
/// stage for a shell.
///
/// Without explicit collaborators the stage runs headless.
pub struct StageBootstrap {
    config: ClientConfig,
    surface: Option<Box<dyn DrawingSurface>>,
    loader: Option<Arc<dyn ImageLoader>>,
}

impl StageBootstrap {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            surface: None,
            loader: None,
        }
    }

    /// Provide the shell's drawing surface.
    pub fn surface(mut self, surface: impl DrawingSurface + 'static) -> Self {
        self.surface = Some(Box::new(surface));
        self
    }

    /// Provide the shell's image loader.
    pub fn image_loader(mut self, loader: impl ImageLoader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    pub async fn build(self) -> Result<StageSetup> {
        let catalog = load_catalog(&self.config)?;
        let player = resolve(&catalog, &self.config.species.player)?;
        let population = resolve(&catalog, &self.config.species.population)?;

        let mut builder = Stage::builder().config(self.config.stage.clone());
        builder = match self.surface {
            Some(surface) => builder.boxed_surface(surface),
            None => builder.surface(HeadlessSurface::new()),
        };
        builder = match self.loader {
            Some(loader) => builder.shared_image_loader(loader),
            None => builder.image_loader(ImmediateImageLoader::new()),
        };
        let stage = builder.build().await.context("failed to build stage")?;

        let surface = self.config.surface;
        stage
            .mount(surface.width, surface.height)
            .await
            .context("failed to mount stage")?;
        tracing::info!(
            width = surface.width,
            height = surface.height,
            species = catalog.len(),
            "stage mounted"
        );

        Ok(StageSetup {
            config: self.config,
            catalog,
            player,
            population,
            stage,
        })
    }
}

pub struct StageSetup {
    pub config: ClientConfig,
    pub catalog: SpeciesCatalog,
    pub player: Arc<SpeciesSpec>,
    pub population: Arc<SpeciesSpec>,
    pub stage: Stage,
}

fn load_catalog(config: &ClientConfig) -> Result<SpeciesCatalog> {
    let mut catalog = SpeciesCatalog::builtin().context("built-in species are invalid")?;
    if let Some(path) = &config.species.catalog_file {
        let added = catalog
            .extend_from_file(path)
            .with_context(|| format!("failed to load species catalog {}", path.display()))?;
        tracing::info!("Loaded {} species from {}", added, path.display());
    }
    Ok(catalog)
}

fn resolve(catalog: &SpeciesCatalog, name: &str) -> Result<Arc<SpeciesSpec>> {
    catalog.get(name).with_context(|| {
        let mut known: Vec<_> = catalog.names().collect();
        known.sort_unstable();
        format!("unknown species `{name}` (known: {})", known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn default_config_builds_a_mounted_headless_stage() {
        let mut config = ClientConfig::default();
        config.surface.width = 320;
        config.surface.height = 200;

        let setup = StageBootstrap::new(config).build().await.unwrap();
        assert_eq!(setup.player.name, "acidus");
        assert_eq!(setup.population.name, "poring");
        assert!(setup.stage.handle().population().await.unwrap().is_empty());
        setup.stage.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_species_is_reported() {
        let mut config = ClientConfig::default();
        config.species.player = "dragon".into();

        let error = StageBootstrap::new(config).build().await.err().unwrap();
        let message = format!("{error:#}");
        assert!(message.contains("dragon"), "{message}");
        assert!(message.contains("acidus, poring"), "{message}");
    }

    #[tokio::test]
    async fn unreadable_catalog_file_fails_the_build() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not ron at all").unwrap();

        let mut config = ClientConfig::default();
        config.species.catalog_file = Some(file.path().to_path_buf());
        assert!(StageBootstrap::new(config).build().await.is_err());
    }
}
