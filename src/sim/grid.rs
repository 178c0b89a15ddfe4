//! Grid world: tile grid parsing and level geometry
//!
//! A level is authored as rows of `'1'` (wall) and `'0'` (floor). Loading
//! turns every wall tile into a square `Rect` and places the agent and target
//! from positions given in tile units (so `1.5` is the middle of column 1).

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rect::Rect;
use crate::consts::{PLAYER_RADIUS, TARGET_HALF_SIZE};

/// Why a tile grid or its start/target positions were rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("tile grid is empty")]
    Empty,
    #[error("row {row} has {len} tiles, expected {expected}")]
    Ragged { row: usize, len: usize, expected: usize },
    #[error("unknown tile symbol {symbol:?} at row {row}, column {col}")]
    BadSymbol { row: usize, col: usize, symbol: char },
    #[error("{what} position ({x}, {y}) is outside the grid")]
    OutOfBounds { what: &'static str, x: f32, y: f32 },
    #[error("{what} position ({x}, {y}) is inside a wall")]
    InsideWall { what: &'static str, x: f32, y: f32 },
}

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Wall,
    Floor,
}

impl Tile {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '1' => Some(Tile::Wall),
            '0' => Some(Tile::Floor),
            _ => None,
        }
    }
}

/// Rectangular, immutable tile grid (row-major)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Parse rows of wall/floor symbols. Every row must have the same length.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let len = line.chars().count();
            if len != width {
                return Err(GridError::Ragged {
                    row,
                    len,
                    expected: width,
                });
            }
            for (col, symbol) in line.chars().enumerate() {
                let tile =
                    Tile::from_symbol(symbol).ok_or(GridError::BadSymbol { row, col, symbol })?;
                tiles.push(tile);
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            tiles,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, col: usize, row: usize) -> Option<Tile> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.tiles.get(row * self.width + col).copied()
    }

    /// Out-of-bounds cells count as walls
    pub fn is_wall(&self, col: i64, row: i64) -> bool {
        if col < 0 || row < 0 {
            return true;
        }
        self.get(col as usize, row as usize) != Some(Tile::Floor)
    }

    /// Cell containing a position given in tile units
    pub fn cell_at(&self, tile_pos: Vec2) -> Option<(usize, usize)> {
        if tile_pos.x < 0.0 || tile_pos.y < 0.0 {
            return None;
        }
        let (col, row) = (tile_pos.x.floor() as usize, tile_pos.y.floor() as usize);
        (col < self.width && row < self.height).then_some((col, row))
    }

    /// Wall cells in row-major order
    pub fn wall_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| **tile == Tile::Wall)
            .map(|(i, _)| (i % self.width, i / self.width))
    }
}

/// Geometry for one playable level
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub grid: TileGrid,
    pub tile_size: f32,
    pub walls: Vec<Rect>,
    pub agent: Rect,
    pub target_pos: Vec2,
    pub target_rect: Rect,
}

/// Build wall rectangles, agent and target for a grid.
///
/// `start` and `target` are in tile units. Fresh geometry is returned on every
/// call, so reloading a level is just calling this again.
pub fn load(grid: &TileGrid, tile_size: f32, start: Vec2, target: Vec2) -> Result<Level, GridError> {
    check_walkable(grid, "start", start)?;
    check_walkable(grid, "target", target)?;

    let walls: Vec<Rect> = grid
        .wall_cells()
        .map(|(col, row)| {
            Rect::new(
                col as f32 * tile_size,
                row as f32 * tile_size,
                tile_size,
                tile_size,
            )
        })
        .collect();

    let start_px = crate::tile_to_pixels(start, tile_size);
    let target_px = crate::tile_to_pixels(target, tile_size);
    let agent = Rect::from_center(start_px, Vec2::splat(PLAYER_RADIUS));
    let target_rect = Rect::from_center(target_px, Vec2::splat(TARGET_HALF_SIZE));

    // Spawning inside a wall leaves the resolver with no valid push-out
    if walls.iter().any(|w| w.intersects(&agent)) {
        return Err(GridError::InsideWall {
            what: "start",
            x: start.x,
            y: start.y,
        });
    }

    Ok(Level {
        grid: grid.clone(),
        tile_size,
        walls,
        agent,
        target_pos: target_px,
        target_rect,
    })
}

fn check_walkable(grid: &TileGrid, what: &'static str, pos: Vec2) -> Result<(), GridError> {
    let (col, row) = grid.cell_at(pos).ok_or(GridError::OutOfBounds {
        what,
        x: pos.x,
        y: pos.y,
    })?;
    if grid.get(col, row) == Some(Tile::Wall) {
        return Err(GridError::InsideWall {
            what,
            x: pos.x,
            y: pos.y,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: [&str; 4] = ["1111", "1001", "1001", "1111"];

    #[test]
    fn test_parse_dimensions_and_walls() {
        let grid = TileGrid::parse(&ROWS).unwrap();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.get(1, 1), Some(Tile::Floor));
        assert_eq!(grid.get(0, 1), Some(Tile::Wall));
        assert_eq!(grid.get(4, 0), None);
        assert!(grid.is_wall(-1, 0));
        assert_eq!(grid.wall_cells().count(), 12);
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        let err = TileGrid::parse(&["111", "1011", "111"]).unwrap_err();
        assert_eq!(
            err,
            GridError::Ragged {
                row: 1,
                len: 4,
                expected: 3
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_symbols_and_empty() {
        assert!(matches!(
            TileGrid::parse(&["1x1"]),
            Err(GridError::BadSymbol { symbol: 'x', col: 1, .. })
        ));
        assert_eq!(TileGrid::parse::<&str>(&[]), Err(GridError::Empty));
        assert_eq!(TileGrid::parse(&[""]), Err(GridError::Empty));
    }

    #[test]
    fn test_load_places_walls_agent_and_target() {
        let grid = TileGrid::parse(&ROWS).unwrap();
        let level = load(&grid, 40.0, Vec2::new(1.5, 1.5), Vec2::new(2.5, 2.5)).unwrap();

        assert_eq!(level.walls.len(), 12);
        assert_eq!(level.walls[0], Rect::new(0.0, 0.0, 40.0, 40.0));
        // Second row starts with the wall at column 0
        assert!(level.walls.contains(&Rect::new(0.0, 40.0, 40.0, 40.0)));
        assert!(level.walls.contains(&Rect::new(120.0, 120.0, 40.0, 40.0)));

        assert_eq!(level.agent.center(), Vec2::new(60.0, 60.0));
        assert_eq!(level.agent.size(), Vec2::splat(16.0));
        assert_eq!(level.target_pos, Vec2::new(100.0, 100.0));
        assert_eq!(level.target_rect, Rect::new(90.0, 90.0, 20.0, 20.0));
    }

    #[test]
    fn test_load_rejects_bad_start_and_target() {
        let grid = TileGrid::parse(&ROWS).unwrap();
        assert!(matches!(
            load(&grid, 40.0, Vec2::new(0.5, 0.5), Vec2::new(2.5, 2.5)),
            Err(GridError::InsideWall { what: "start", .. })
        ));
        assert!(matches!(
            load(&grid, 40.0, Vec2::new(1.5, 1.5), Vec2::new(9.5, 2.5)),
            Err(GridError::OutOfBounds { what: "target", .. })
        ));
        assert!(matches!(
            load(&grid, 40.0, Vec2::new(1.5, -0.5), Vec2::new(2.5, 2.5)),
            Err(GridError::OutOfBounds { what: "start", .. })
        ));
        // On a floor tile but the agent box pokes into the neighbouring wall
        assert!(matches!(
            load(&grid, 40.0, Vec2::new(1.05, 1.5), Vec2::new(2.5, 2.5)),
            Err(GridError::InsideWall { what: "start", .. })
        ));
    }

    #[test]
    fn test_load_is_idempotent() {
        let grid = TileGrid::parse(&ROWS).unwrap();
        let a = load(&grid, 40.0, Vec2::new(1.5, 1.5), Vec2::new(2.5, 2.5)).unwrap();
        let b = load(&grid, 40.0, Vec2::new(1.5, 1.5), Vec2::new(2.5, 2.5)).unwrap();
        assert_eq!(a, b);
    }
}
