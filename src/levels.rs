//! Level table
//!
//! Each level is a start tile, a target tile and a grid of `'1'`/`'0'` rows.
//! Positions are in tile units, so `(1.5, 1.5)` is the centre of the tile at
//! column 1, row 1.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigSourceError, HapticError, Result};
use crate::sim::grid::{self, Level, TileGrid};

/// Static description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub start_pos: Vec2,
    pub target_pos: Vec2,
    pub map: Vec<String>,
}

impl LevelDescriptor {
    pub fn new(start: (f32, f32), target: (f32, f32), map: &[&str]) -> Self {
        Self {
            start_pos: Vec2::new(start.0, start.1),
            target_pos: Vec2::new(target.0, target.1),
            map: map.iter().map(|row| row.to_string()).collect(),
        }
    }

    /// Build fresh geometry for this level. `index` is only used for errors.
    pub fn build(&self, index: usize, tile_size: f32) -> Result<Level> {
        let grid = TileGrid::parse(&self.map).map_err(|e| HapticError::invalid_level(index, e))?;
        grid::load(&grid, tile_size, self.start_pos, self.target_pos)
            .map_err(|e| HapticError::invalid_level(index, e))
    }
}

/// Check every level up front so a bad map fails at startup, not mid-session
pub fn validate_all(levels: &[LevelDescriptor], tile_size: f32) -> Result<()> {
    if levels.is_empty() {
        return Err(HapticError::NoLevels);
    }
    for (index, level) in levels.iter().enumerate() {
        level.build(index, tile_size)?;
    }
    Ok(())
}

/// Read a JSON array of level descriptors
pub fn load_file(path: &Path) -> Result<Vec<LevelDescriptor>> {
    let wrap = |source: ConfigSourceError| HapticError::LevelFile {
        path: path.to_path_buf(),
        source,
    };
    let json = fs::read_to_string(path).map_err(|e| wrap(e.into()))?;
    let levels: Vec<LevelDescriptor> = serde_json::from_str(&json).map_err(|e| wrap(e.into()))?;
    log::info!("Loaded {} levels from {}", levels.len(), path.display());
    Ok(levels)
}

/// The five stock mazes, easiest first
pub fn builtin() -> Vec<LevelDescriptor> {
    vec![
        // S-curve
        LevelDescriptor::new(
            (1.5, 1.5),
            (18.5, 13.5),
            &[
                "11111111111111111111",
                "10000000000001111111",
                "11111111111100000001",
                "11111111111101111111",
                "11111111111100000001",
                "10000000000001111111",
                "10111111111111111111",
                "10000000000000000001",
                "11111111111111110111",
                "11111111111111110111",
                "10000000000000000111",
                "10111111111111111111",
                "10111111111111111111",
                "10000000000000000001",
                "11111111111111111111",
            ],
        ),
        // Branching maze
        LevelDescriptor::new(
            (1.5, 1.5),
            (18.5, 13.5),
            &[
                "11111111111111111111",
                "10001000000001000001",
                "10111011111101011101",
                "10000010000000000001",
                "10111110111111110111",
                "10100000100000010001",
                "10101110101111110101",
                "10001000100000000101",
                "11101011111111111101",
                "10001000000000100001",
                "10111111101111101111",
                "10000000101000000001",
                "10111110101011111101",
                "10000010000010000001",
                "11111111111111111111",
            ],
        ),
        // Long corridor
        LevelDescriptor::new(
            (1.5, 7.5),
            (18.5, 7.5),
            &[
                "11111111111111111111",
                "11111111111111111111",
                "11111111111111111111",
                "11110000000000000111",
                "11110111111111110111",
                "11110111111111110111",
                "11110111111111110111",
                "10000111111111110001",
                "11110111111111110111",
                "11110111111111110111",
                "11110111111111110111",
                "11110000000000000111",
                "11111111111111111111",
                "11111111111111111111",
                "11111111111111111111",
            ],
        ),
        // Spiral trap
        LevelDescriptor::new(
            (1.5, 1.5),
            (10.5, 7.5),
            &[
                "11111111111111111111",
                "10000000000000000001",
                "10111111111111111101",
                "10000000000000000101",
                "10101111111111110101",
                "10100000001111010101",
                "10101011100001010101",
                "10101010000001010101",
                "10101011111111010101",
                "10101000000000010101",
                "10101111111111110101",
                "10100000000000000101",
                "10111111111111111101",
                "10000000000000000001",
                "11111111111111111111",
            ],
        ),
        // Final maze
        LevelDescriptor::new(
            (1.5, 1.5),
            (18.5, 13.5),
            &[
                "11111111111111111111",
                "10001000001000000001",
                "11101011101011101101",
                "10001010001010001001",
                "10111010111010101011",
                "10000010000010101001",
                "11111011111011101101",
                "10001000100000101001",
                "10111011101110101101",
                "10001010001000101001",
                "11101010111011101101",
                "10001010100010001001",
                "10111010111010111011",
                "10000000100000000001",
                "11111111111111111111",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAP_HEIGHT_TILES, MAP_WIDTH_TILES, TILE_SIZE};
    use crate::sim::grid::GridError;

    #[test]
    fn test_builtin_levels_are_valid() {
        let levels = builtin();
        assert_eq!(levels.len(), 5);
        validate_all(&levels, TILE_SIZE).unwrap();
        for level in &levels {
            assert_eq!(level.map.len(), MAP_HEIGHT_TILES);
            assert!(level.map.iter().all(|r| r.len() == MAP_WIDTH_TILES));
        }
    }

    #[test]
    fn test_first_level_geometry() {
        let level = builtin()[0].build(0, TILE_SIZE).unwrap();
        assert_eq!(level.agent.center(), Vec2::new(60.0, 60.0));
        assert_eq!(level.target_pos, Vec2::new(740.0, 540.0));
        assert_eq!(level.grid.width(), 20);
        assert_eq!(level.grid.height(), 15);
    }

    #[test]
    fn test_ragged_map_is_rejected_with_index() {
        let mut levels = builtin();
        levels[3].map[5].push('1');
        let err = validate_all(&levels, TILE_SIZE).unwrap_err();
        match err {
            HapticError::InvalidLevelData { level, source } => {
                assert_eq!(level, 3);
                assert!(matches!(source, GridError::Ragged { row: 5, len: 21, expected: 20 }));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_empty_table_is_rejected() {
        assert!(matches!(validate_all(&[], TILE_SIZE), Err(HapticError::NoLevels)));
    }

    #[test]
    fn test_json_level_file() {
        let json = r#"[
            { "start_pos": [1.5, 1.5], "target_pos": [2.5, 1.5], "map": ["1111", "1001", "1111"] }
        ]"#;
        let path = std::env::temp_dir().join(format!("haptic-maze-levels-{}.json", std::process::id()));
        fs::write(&path, json).unwrap();
        let levels = load_file(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(levels, vec![LevelDescriptor::new((1.5, 1.5), (2.5, 1.5), &["1111", "1001", "1111"])]);
        validate_all(&levels, TILE_SIZE).unwrap();
    }

    #[test]
    fn test_malformed_level_file() {
        let path = std::env::temp_dir().join(format!("haptic-maze-bad-levels-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let err = load_file(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, HapticError::LevelFile { .. }));
    }
}
