//! Collision resolution for the agent against wall tiles
//!
//! Movement is resolved one axis at a time: apply the x impulse, clamp
//! against every overlapping wall, then do the same for y. Decoupling the
//! axes lets the agent slide along a wall when pushing diagonally into it.
//!
//! When several walls overlap on the same axis the last one in iteration
//! order sets the clamp. Walls produced from a tile grid share an edge per
//! column/row so this only matters for hand-built wall sets.

use glam::Vec2;

use super::rect::Rect;

/// Move `agent` by `(dx, dy)` and push it out of any wall it ran into.
///
/// Pure: the caller owns the agent and writes the result back.
pub fn move_agent(agent: Rect, walls: &[Rect], delta: Vec2) -> Rect {
    let mut moved = agent;

    moved.x += delta.x;
    for wall in walls {
        if moved.intersects(wall) {
            if delta.x > 0.0 {
                moved.set_right(wall.left());
            } else if delta.x < 0.0 {
                moved.set_left(wall.right());
            }
        }
    }

    moved.y += delta.y;
    for wall in walls {
        if moved.intersects(wall) {
            if delta.y > 0.0 {
                moved.set_bottom(wall.top());
            } else if delta.y < 0.0 {
                moved.set_top(wall.bottom());
            }
        }
    }

    moved
}

/// Whether `agent` overlaps any wall
pub fn overlaps_any(agent: &Rect, walls: &[Rect]) -> bool {
    walls.iter().any(|w| agent.intersects(w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::{TileGrid, load};
    use proptest::prelude::*;

    fn wall(x: f32, y: f32) -> Rect {
        Rect::new(x, y, 40.0, 40.0)
    }

    #[test]
    fn test_free_movement() {
        let agent = Rect::new(52.0, 52.0, 16.0, 16.0);
        let moved = move_agent(agent, &[wall(200.0, 200.0)], Vec2::new(5.0, -5.0));
        assert_eq!(moved, Rect::new(57.0, 47.0, 16.0, 16.0));
    }

    #[test]
    fn test_clamp_right_into_wall() {
        let agent = Rect::new(62.0, 52.0, 16.0, 16.0);
        let moved = move_agent(agent, &[wall(80.0, 40.0)], Vec2::new(5.0, 0.0));
        assert_eq!(moved.right(), 80.0);
        assert_eq!(moved.y, 52.0);
    }

    #[test]
    fn test_clamp_left_up_and_down() {
        let walls = [wall(0.0, 40.0), wall(40.0, 0.0), wall(40.0, 80.0)];

        let moved = move_agent(Rect::new(42.0, 52.0, 16.0, 16.0), &walls, Vec2::new(-5.0, 0.0));
        assert_eq!(moved.left(), 40.0);

        let moved = move_agent(Rect::new(52.0, 42.0, 16.0, 16.0), &walls, Vec2::new(0.0, -5.0));
        assert_eq!(moved.top(), 40.0);

        let moved = move_agent(Rect::new(52.0, 62.0, 16.0, 16.0), &walls, Vec2::new(0.0, 5.0));
        assert_eq!(moved.bottom(), 80.0);
    }

    #[test]
    fn test_diagonal_slides_along_wall() {
        // Wall to the right; pushing right+down keeps the y motion
        let agent = Rect::new(62.0, 52.0, 16.0, 16.0);
        let moved = move_agent(agent, &[wall(80.0, 40.0)], Vec2::new(5.0, 5.0));
        assert_eq!(moved.right(), 80.0);
        assert_eq!(moved.y, 57.0);
        assert!(!overlaps_any(&moved, &[wall(80.0, 40.0)]));
    }

    #[test]
    fn test_last_wall_wins_on_tie() {
        // Two walls with different left edges both overlapped after the move
        let walls = [Rect::new(70.0, 40.0, 40.0, 40.0), Rect::new(66.0, 40.0, 40.0, 40.0)];
        let agent = Rect::new(52.0, 52.0, 16.0, 16.0);
        let moved = move_agent(agent, &walls, Vec2::new(5.0, 0.0));
        assert_eq!(moved.right(), 66.0);
    }

    #[test]
    fn test_zero_velocity_is_identity() {
        let agent = Rect::new(52.0, 52.0, 16.0, 16.0);
        assert_eq!(move_agent(agent, &[wall(0.0, 0.0)], Vec2::ZERO), agent);
    }

    fn grid_rows() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(prop::collection::vec(prop::bool::weighted(0.4), 6), 6).prop_map(
            |rows| {
                rows.into_iter()
                    .map(|row| row.into_iter().map(|w| if w { '1' } else { '0' }).collect())
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_agent_never_ends_inside_grid_walls(
            rows in grid_rows(),
            start_col in 0usize..6,
            start_row in 0usize..6,
            steps in prop::collection::vec((-1.0f32..=1.0, -1.0f32..=1.0), 1..40),
        ) {
            let grid = TileGrid::parse(&rows).unwrap();
            let start = Vec2::new(start_col as f32 + 0.5, start_row as f32 + 0.5);
            prop_assume!(grid.get(start_col, start_row) == Some(crate::sim::grid::Tile::Floor));

            let level = load(&grid, 40.0, start, start).unwrap();
            let mut agent = level.agent;
            for (x, y) in steps {
                agent = move_agent(agent, &level.walls, Vec2::new(x, y) * crate::consts::USER_SPEED);
                prop_assert!(!overlaps_any(&agent, &level.walls));
            }
        }
    }
}
