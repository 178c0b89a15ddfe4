//! Session state: everything the frame loop carries from one tick to the next
//!
//! One `Session` is created at startup and owned by the driver. It holds the
//! level table, the active level's geometry, the kinematic history and the
//! phase of the level state machine.

use glam::Vec2;

use super::grid::Level;
use crate::error::Result;
use crate::haptics::{HapticCommand, HapticState, KinematicHistory};
use crate::levels::{self, LevelDescriptor};

/// Phase of the level state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Agent is moving through the current level
    Running,
    /// Target reached; input ignored until `resume_at` (tick number)
    LevelClear { resume_at: u64 },
    /// Every level done; waits for quit
    Complete,
}

/// Tunables the state machine needs each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub tile_size: f32,
    /// Pixels per tick at full input deflection
    pub user_speed: f32,
    /// Distance at which proximity reaches zero
    pub max_dist: f32,
    pub jerk_threshold: f32,
    /// Length of the level-complete dwell in ticks
    pub dwell_ticks: u64,
    pub reset_history_on_level_load: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        crate::settings::Settings::default().session_config()
    }
}

/// Values shown on the researcher's debug panel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Readout {
    pub proximity: u8,
    pub haptic_state: HapticState,
    pub jerk: f32,
    pub command: HapticCommand,
}

/// Session context owned by the frame driver
#[derive(Debug, Clone)]
pub struct Session {
    pub config: SessionConfig,
    levels: Vec<LevelDescriptor>,
    level_index: usize,
    /// Geometry of the active level
    pub level: Level,
    /// Input history for the jerk classifier
    pub history: KinematicHistory,
    pub phase: SessionPhase,
    /// Ticks processed so far
    pub time_ticks: u64,
    pub readout: Readout,
}

impl Session {
    /// Validate every level and start on the first one
    pub fn new(levels: Vec<LevelDescriptor>, config: SessionConfig) -> Result<Self> {
        levels::validate_all(&levels, config.tile_size)?;
        let level = levels[0].build(0, config.tile_size)?;
        log::info!("Session started with {} levels", levels.len());

        let mut session = Self {
            config,
            levels,
            level_index: 0,
            level,
            history: KinematicHistory::default(),
            phase: SessionPhase::Running,
            time_ticks: 0,
            readout: Readout::default(),
        };
        session.readout.proximity = session.current_proximity();
        session.readout.command = HapticCommand::new(HapticState::Steady, session.readout.proximity);
        Ok(session)
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn is_last_level(&self) -> bool {
        self.level_index + 1 >= self.levels.len()
    }

    /// Agent center in pixels
    pub fn agent_pos(&self) -> Vec2 {
        self.level.agent.center()
    }

    pub fn current_proximity(&self) -> u8 {
        crate::haptics::proximity(self.agent_pos(), self.level.target_pos, self.config.max_dist)
    }

    /// Swap in the next level's geometry (history handling per config)
    pub(super) fn load_level(&mut self, index: usize) -> Result<()> {
        let descriptor = &self.levels[index];
        self.level = descriptor.build(index, self.config.tile_size)?;
        self.level_index = index;
        if self.config.reset_history_on_level_load {
            self.history.reset();
        }
        log::info!("Loaded level {} / {}", index + 1, self.levels.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HapticError;

    #[test]
    fn test_new_session_starts_running_on_first_level() {
        let session = Session::new(levels::builtin(), SessionConfig::default()).unwrap();
        assert_eq!(session.phase, SessionPhase::Running);
        assert_eq!(session.level_index(), 0);
        assert_eq!(session.level_count(), 5);
        assert_eq!(session.agent_pos(), Vec2::new(60.0, 60.0));
        assert_eq!(session.readout.proximity, 7);
        assert!(!session.is_last_level());
    }

    #[test]
    fn test_new_session_rejects_bad_levels() {
        let bad = vec![LevelDescriptor::new((0.5, 0.5), (1.5, 1.5), &["111", "101", "111"])];
        assert!(matches!(
            Session::new(bad, SessionConfig::default()),
            Err(HapticError::InvalidLevelData { level: 0, .. })
        ));
        assert!(matches!(
            Session::new(Vec::new(), SessionConfig::default()),
            Err(HapticError::NoLevels)
        ));
    }

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.tile_size, 40.0);
        assert_eq!(config.user_speed, 5.0);
        assert_eq!(config.dwell_ticks, 120);
        assert!((config.max_dist - 1000.0).abs() < 1e-3);
    }
}
