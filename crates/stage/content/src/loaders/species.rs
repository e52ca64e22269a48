//! Species catalog loader.
//!
//! Loads species definitions from RON files.

use std::path::Path;

use stage_core::SpeciesSpec;

use crate::loaders::{LoadResult, read_file};

/// Loader for species catalogs stored as RON.
pub struct SpeciesLoader;

impl SpeciesLoader {
    /// Load a species catalog from a RON file.
    ///
    /// RON format: `Vec<SpeciesSpec>`. Every entry is validated; the first
    /// invalid species fails the whole load.
    pub fn load(path: &Path) -> LoadResult<Vec<SpeciesSpec>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load species catalog {}: {}", path.display(), e))
    }

    /// Parse a species catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<SpeciesSpec>> {
        let species: Vec<SpeciesSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse species catalog RON: {}", e))?;

        for spec in &species {
            spec.validate()?;
        }

        Ok(species)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CATALOG: &str = r#"[
        (
            name: "drops",
            sprite_source: "sprites/drops.png",
            size: (width: 40.0, height: 40.0),
            speed: (x: 3.0, y: 3.0),
            muzzle: None,
            clips: (
                stand: (row: 0, frame_ms: 200, min_column: 0, max_column: 1, repeat: true),
                walk: Some((row: 1, frame_ms: 120, min_column: 0, max_column: 1, repeat: true)),
                die: Some((row: 2, frame_ms: 150, min_column: 0, max_column: 0, repeat: false)),
                attack: None,
            ),
            crops: [
                [
                    (order: 0, offset_x: 0.0, offset_y: None, width: 40.0, height: None, margin_width: None, margin_height: None),
                    (order: 1, offset_x: 40.0, offset_y: None, width: 40.0, height: None, margin_width: None, margin_height: None),
                ],
                [
                    (order: 0, offset_x: 0.0, offset_y: None, width: 40.0, height: None, margin_width: None, margin_height: None),
                    (order: 1, offset_x: 40.0, offset_y: None, width: 40.0, height: None, margin_width: None, margin_height: None),
                ],
                [
                    (order: 0, offset_x: 0.0, offset_y: Some(80.0), width: 48.0, height: Some(44.0), margin_width: Some(-4.0), margin_height: Some(-4.0)),
                ],
            ],
        ),
    ]"#;

    #[test]
    fn loads_catalog_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let species = SpeciesLoader::load(file.path()).unwrap();

        assert_eq!(species.len(), 1);
        let drops = &species[0];
        assert_eq!(drops.name, "drops");
        assert_eq!(drops.crops.rows(), 3);
        assert_eq!(drops.crops.entry(2, 0).unwrap().offset_y, Some(80.0));
    }

    #[test]
    fn rejects_species_with_uncropped_clip() {
        let broken = CATALOG.replace("attack: None", "attack: Some((row: 5, frame_ms: 80, min_column: 0, max_column: 2, repeat: false))");
        let error = SpeciesLoader::parse(&broken).unwrap_err();
        assert!(error.to_string().contains("empty crop row 5"), "{error}");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SpeciesLoader::load(&dir.path().join("absent.ron")).is_err());
    }

    #[test]
    fn shipped_catalog_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/species.ron");
        let species = SpeciesLoader::load(&path).unwrap();
        assert!(species.iter().any(|spec| spec.name == "drops"));
    }
}
