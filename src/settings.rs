//! Testbed settings
//!
//! Read from an optional JSON file; any field left out keeps its default.
//! Command-line flags are applied on top in `main`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigSourceError, HapticError, Result};
use crate::sim::SessionConfig;

/// Serial link to the haptic actuator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Try to open the port at all (false = software-only)
    pub enabled: bool,
    /// Port name, e.g. `COM4` or `/dev/ttyUSB0`
    pub port: String,
    pub baud_rate: u32,
    /// Upper bound on a blocking write (ms)
    pub write_timeout_ms: u64,
    /// Pause after opening while the board resets (ms)
    pub boot_delay_ms: u64,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            port: "COM4".to_string(),
            baud_rate: 115_200,
            write_timeout_ms: 100,
            boot_delay_ms: 2000,
        }
    }
}

/// Input generator used when no physical controller is wired in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotSettings {
    /// RNG seed for reproducible runs
    pub seed: u64,
    /// Chance per tick of starting a hesitation burst (0.0 - 1.0)
    pub hesitation: f32,
}

impl Default for AutopilotSettings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            hesitation: 0.01,
        }
    }
}

/// Testbed settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub device: DeviceSettings,

    // === Loop ===
    /// Control loop rate (Hz)
    pub frame_rate: u32,
    /// Level-complete message duration (seconds)
    pub level_clear_dwell_secs: f32,

    // === Classifier ===
    pub jerk_threshold: f32,
    /// Input components below this magnitude are zeroed
    pub dead_zone: f32,
    /// Start each level with an empty kinematic history
    pub reset_history_on_level_load: bool,

    // === Levels ===
    /// JSON level table; built-in levels when unset
    pub levels_file: Option<PathBuf>,

    pub autopilot: AutopilotSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device: DeviceSettings::default(),

            frame_rate: FRAME_RATE,
            level_clear_dwell_secs: LEVEL_CLEAR_DWELL_SECS,

            jerk_threshold: JERK_THRESHOLD,
            dead_zone: DEAD_ZONE,
            reset_history_on_level_load: false,

            levels_file: None,

            autopilot: AutopilotSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let wrap = |source: ConfigSourceError| HapticError::Settings {
            path: path.to_path_buf(),
            source,
        };
        let json = fs::read_to_string(path).map_err(|e| wrap(e.into()))?;
        let settings = serde_json::from_str(&json).map_err(|e| wrap(e.into()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let wrap = |source: ConfigSourceError| HapticError::Settings {
            path: path.to_path_buf(),
            source,
        };
        let json = serde_json::to_string_pretty(self).map_err(|e| wrap(e.into()))?;
        fs::write(path, json).map_err(|e| wrap(e.into()))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Frame rate, never zero
    pub fn effective_frame_rate(&self) -> u32 {
        self.frame_rate.max(1)
    }

    /// Dwell period expressed in frames
    pub fn dwell_ticks(&self) -> u64 {
        crate::secs_to_ticks(self.level_clear_dwell_secs, self.effective_frame_rate())
    }

    /// Parameters the session state machine needs
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            tile_size: TILE_SIZE,
            user_speed: USER_SPEED,
            max_dist: crate::max_game_dist(),
            jerk_threshold: self.jerk_threshold,
            dwell_ticks: self.dwell_ticks(),
            reset_history_on_level_load: self.reset_history_on_level_load,
        }
    }
}
