//! Shell configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use stage_core::StageConfig;

/// Configuration required to bootstrap a stage shell.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub stage: StageConfig,
    pub surface: SurfaceConfig,
    pub species: SpeciesConfig,
    /// How long the headless demo drives its scripted pointer.
    pub demo_secs: u64,
    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    pub const DEFAULT_DEMO_SECS: u64 = 15;

    pub fn new(stage: StageConfig) -> Self {
        Self {
            stage,
            surface: SurfaceConfig::default(),
            species: SpeciesConfig::default(),
            demo_secs: Self::DEFAULT_DEMO_SECS,
            log_dir: None,
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `STAGE_POPULATION` - Initial population size (default: 30)
    /// - `STAGE_REFRESH_HZ` - Built-in refresh rate (default: 60)
    /// - `STAGE_STRIKE_RADIUS` - Attack radius in pixels (default: 80)
    /// - `STAGE_WIDTH` / `STAGE_HEIGHT` - Surface size (default: 1280x720)
    /// - `STAGE_SPECIES_FILE` - Extra RON species catalog (optional)
    /// - `STAGE_PLAYER_SPECIES` - Player species name (default: acidus)
    /// - `STAGE_POPULATION_SPECIES` - Population species name (default: poring)
    /// - `STAGE_DEMO_SECS` - Headless demo duration (default: 15)
    /// - `STAGE_LOG_DIR` - Directory for a log file (optional)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary key lookup.
    pub fn from_lookup(read: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(population) = parse::<usize>(read("STAGE_POPULATION")) {
            config.stage.initial_population = population;
        }
        if let Some(hz) = parse::<f64>(read("STAGE_REFRESH_HZ")).filter(|hz| hz.is_finite() && *hz > 0.0) {
            config.stage.refresh_hz = hz;
        }
        if let Some(radius) = parse::<f32>(read("STAGE_STRIKE_RADIUS")).filter(|r| *r >= 0.0) {
            config.stage.strike_radius = radius;
        }

        // Surface size
        if let Some(width) = parse::<u32>(read("STAGE_WIDTH")) {
            config.surface.width = width.max(1);
        }
        if let Some(height) = parse::<u32>(read("STAGE_HEIGHT")) {
            config.surface.height = height.max(1);
        }

        // Species selection
        config.species.catalog_file = read("STAGE_SPECIES_FILE").map(PathBuf::from);
        if let Some(name) = read("STAGE_PLAYER_SPECIES") {
            config.species.player = name;
        }
        if let Some(name) = read("STAGE_POPULATION_SPECIES") {
            config.species.population = name;
        }

        if let Some(secs) = parse::<u64>(read("STAGE_DEMO_SECS")) {
            config.demo_secs = secs;
        }
        config.log_dir = read("STAGE_LOG_DIR").map(PathBuf::from);

        config
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(StageConfig::default())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Which species play which role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeciesConfig {
    pub catalog_file: Option<PathBuf>,
    pub player: String,
    pub population: String,
}

impl Default for SpeciesConfig {
    fn default() -> Self {
        Self {
            catalog_file: None,
            player: "acidus".to_owned(),
            population: "poring".to_owned(),
        }
    }
}

fn parse<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}
