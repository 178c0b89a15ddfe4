//! Haptic commands and their serial wire format
//!
//! One ASCII line per command: `STATE,INTENSITY\n`, e.g. `STEADY,180`.
//! The actuator holds the last state it received.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{COMPLETE_PULSE_INTENSITY, WIN_BUZZ_INTENSITY};

/// Vibration pattern sent to the actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HapticState {
    /// Continuous vibration ("focused")
    #[default]
    Steady,
    /// Pulsed vibration ("uncertain")
    Pulse,
    /// Motor off
    Off,
}

impl HapticState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HapticState::Steady => "STEADY",
            HapticState::Pulse => "PULSE",
            HapticState::Off => "OFF",
        }
    }
}

impl fmt::Display for HapticState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("missing ',' separator in {0:?}")]
    MissingSeparator(String),
    #[error("unknown haptic state {0:?}")]
    UnknownState(String),
    #[error("intensity {0:?} is not an integer in 0..=255")]
    BadIntensity(String),
}

impl FromStr for HapticState {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STEADY" => Ok(HapticState::Steady),
            "PULSE" => Ok(HapticState::Pulse),
            "OFF" => Ok(HapticState::Off),
            other => Err(ParseCommandError::UnknownState(other.to_string())),
        }
    }
}

/// A single (state, intensity) pair, consumed once by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HapticCommand {
    pub state: HapticState,
    pub intensity: u8,
}

impl HapticCommand {
    pub const fn new(state: HapticState, intensity: u8) -> Self {
        Self { state, intensity }
    }

    /// Solid full-strength buzz when a level is cleared
    pub const fn win_buzz() -> Self {
        Self::new(HapticState::Steady, WIN_BUZZ_INTENSITY)
    }

    /// Repeating pulse once every level is done
    pub const fn celebration() -> Self {
        Self::new(HapticState::Pulse, COMPLETE_PULSE_INTENSITY)
    }

    /// Terminal command sent before the channel is released
    pub const fn off() -> Self {
        Self::new(HapticState::Off, 0)
    }

    /// Newline-terminated ASCII line as written to the device
    pub fn to_line(&self) -> String {
        format!("{self}\n")
    }
}

impl fmt::Display for HapticCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.state, self.intensity)
    }
}

impl FromStr for HapticCommand {
    type Err = ParseCommandError;

    /// Accepts a line with or without the trailing newline
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim_end_matches(['\r', '\n']);
        let (state, intensity) = line
            .split_once(',')
            .ok_or_else(|| ParseCommandError::MissingSeparator(line.to_string()))?;
        let state: HapticState = state.parse()?;
        let intensity = intensity
            .parse::<u8>()
            .map_err(|_| ParseCommandError::BadIntensity(intensity.to_string()))?;
        Ok(Self { state, intensity })
    }
}
