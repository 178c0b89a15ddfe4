//! Error taxonomy for the testbed
//!
//! Only level and configuration errors are fatal. Device errors are caught at
//! the transport boundary and downgraded to log lines.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::sim::grid::GridError;

pub type Result<T> = std::result::Result<T, HapticError>;

#[derive(Debug, Error)]
pub enum HapticError {
    /// Serial port could not be opened; the session runs software-only.
    #[error("haptic device unavailable on {port}: {source}")]
    DeviceUnavailable {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// Channel is open but a write failed (unplugged, buffer full, timeout).
    #[error("haptic write failed: {0}")]
    TransportWriteFailure(#[source] io::Error),

    /// Malformed grid or start/target outside the walkable area.
    #[error("invalid level data for level {level}: {source}")]
    InvalidLevelData {
        level: usize,
        #[source]
        source: GridError,
    },

    /// Level table is empty
    #[error("no levels to play")]
    NoLevels,

    #[error("failed to read level file {path}: {source}")]
    LevelFile {
        path: PathBuf,
        #[source]
        source: ConfigSourceError,
    },

    #[error("failed to read settings file {path}: {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: ConfigSourceError,
    },
}

/// Underlying cause of a config-file failure
#[derive(Debug, Error)]
pub enum ConfigSourceError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl HapticError {
    pub fn invalid_level(level: usize, source: GridError) -> Self {
        Self::InvalidLevelData { level, source }
    }

    /// Whether the session can keep running after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            HapticError::DeviceUnavailable { .. } | HapticError::TransportWriteFailure(_)
        )
    }
}
