//! Input sources
//!
//! Whatever produces the 2D control vector (stick, keys, script, autopilot)
//! sits behind `InputSource`. The driver applies the dead zone before the
//! vector reaches the sim.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::settings::AutopilotSettings;
use crate::sim::{Session, SessionPhase, TileGrid};

/// One poll of the input device
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    /// Components in [-1, 1]
    pub axis: Vec2,
    /// User asked to quit (window closed, quit key)
    pub quit: bool,
}

impl InputFrame {
    pub fn axis(x: f32, y: f32) -> Self {
        Self {
            axis: Vec2::new(x, y),
            quit: false,
        }
    }

    pub fn quit() -> Self {
        Self {
            axis: Vec2::ZERO,
            quit: true,
        }
    }
}

/// Zero each component whose magnitude is below `dead_zone`, clamp the rest
pub fn apply_dead_zone(axis: Vec2, dead_zone: f32) -> Vec2 {
    let filter = |v: f32| if v.abs() < dead_zone { 0.0 } else { v.clamp(-1.0, 1.0) };
    Vec2::new(filter(axis.x), filter(axis.y))
}

/// Source of one input vector per tick
pub trait InputSource {
    /// Called once per frame; the session is read-only context
    fn poll(&mut self, session: &Session) -> InputFrame;
}

/// Replays a fixed list of vectors, then holds still (or quits)
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    steps: VecDeque<Vec2>,
    quit_when_done: bool,
}

impl ScriptedInput {
    pub fn new(steps: impl IntoIterator<Item = Vec2>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            quit_when_done: false,
        }
    }

    /// Request quit on the first poll after the script runs out
    pub fn then_quit(mut self) -> Self {
        self.quit_when_done = true;
        self
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _session: &Session) -> InputFrame {
        match self.steps.pop_front() {
            Some(axis) => InputFrame { axis, quit: false },
            None if self.quit_when_done => InputFrame::quit(),
            None => InputFrame::default(),
        }
    }
}

/// Waypoints closer than this (pixels) count as reached
const WAYPOINT_REACHED: f32 = 1.0;

/// Steers the agent along a shortest tile path to the target.
///
/// Stands in for a participant when no controller is attached. Every so
/// often it hesitates (lets go of the stick or briefly reverses), which is
/// what the jerk classifier is meant to pick up.
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    hesitation: f32,
    path: Vec<Vec2>,
    next_waypoint: usize,
    planned_for: Option<usize>,
    hesitation_left: u32,
    hesitation_axis: Vec2,
    last_axis: Vec2,
}

impl Autopilot {
    pub fn new(settings: &AutopilotSettings) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            hesitation: settings.hesitation.clamp(0.0, 1.0),
            path: Vec::new(),
            next_waypoint: 0,
            planned_for: None,
            hesitation_left: 0,
            hesitation_axis: Vec2::ZERO,
            last_axis: Vec2::ZERO,
        }
    }

    fn plan(&mut self, session: &Session) {
        let level = &session.level;
        let size = level.tile_size;
        let cell = |p: Vec2| level.grid.cell_at(p / size);

        self.path = match (cell(session.agent_pos()), cell(level.target_pos)) {
            (Some(from), Some(to)) => find_path(&level.grid, from, to)
                .unwrap_or_default()
                .into_iter()
                .map(|(col, row)| Vec2::new(col as f32 + 0.5, row as f32 + 0.5) * size)
                .collect(),
            _ => Vec::new(),
        };
        if self.path.is_empty() {
            log::warn!(
                "Autopilot found no path on level {}; steering straight at the target",
                session.level_index() + 1
            );
        }
        self.next_waypoint = 0;
        self.planned_for = Some(session.level_index());
        self.hesitation_left = 0;
        log::debug!("Autopilot planned {} waypoints", self.path.len());
    }

    fn steer(&mut self, session: &Session) -> Vec2 {
        let pos = session.agent_pos();
        while let Some(wp) = self.path.get(self.next_waypoint) {
            if pos.distance(*wp) > WAYPOINT_REACHED {
                break;
            }
            self.next_waypoint += 1;
        }
        let goal = self
            .path
            .get(self.next_waypoint)
            .copied()
            .unwrap_or(session.level.target_pos);

        ((goal - pos) / session.config.user_speed).clamp(Vec2::NEG_ONE, Vec2::ONE)
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self, session: &Session) -> InputFrame {
        if session.phase != SessionPhase::Running {
            return InputFrame::default();
        }
        if self.planned_for != Some(session.level_index()) {
            self.plan(session);
        }

        if self.hesitation_left > 0 {
            self.hesitation_left -= 1;
            self.last_axis = self.hesitation_axis;
            return InputFrame::axis(self.hesitation_axis.x, self.hesitation_axis.y);
        }

        if self.hesitation > 0.0 && self.rng.random_bool(self.hesitation as f64) {
            self.hesitation_left = self.rng.random_range(3..12);
            self.hesitation_axis = if self.rng.random_bool(0.5) {
                -self.last_axis
            } else {
                Vec2::ZERO
            };
        }

        let axis = self.steer(session);
        self.last_axis = axis;
        InputFrame::axis(axis.x, axis.y)
    }
}

/// Shortest 4-connected floor path from `from` to `to`, excluding `from`
pub fn find_path(
    grid: &TileGrid,
    from: (usize, usize),
    to: (usize, usize),
) -> Option<Vec<(usize, usize)>> {
    let width = grid.width();
    let index = |(col, row): (usize, usize)| row * width + col;
    let mut parent: Vec<Option<usize>> = vec![None; width * grid.height()];
    let mut seen = vec![false; width * grid.height()];
    let mut queue = VecDeque::new();

    *seen.get_mut(index(from))? = true;
    queue.push_back(from);

    while let Some(cell) = queue.pop_front() {
        if cell == to {
            let mut path = Vec::new();
            let mut current = index(cell);
            while current != index(from) {
                path.push((current % width, current / width));
                current = parent[current]?;
            }
            path.reverse();
            return Some(path);
        }

        let (col, row) = (cell.0 as i64, cell.1 as i64);
        for (dc, dr) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let (nc, nr) = (col + dc, row + dr);
            if grid.is_wall(nc, nr) {
                continue;
            }
            let next = (nc as usize, nr as usize);
            let i = index(next);
            if !seen[i] {
                seen[i] = true;
                parent[i] = Some(index(cell));
                queue.push_back(next);
            }
        }
    }
    None
}
