//! Deterministic simulation module
//!
//! All maze logic lives here. This module must stay pure and deterministic:
//! - One call to `tick` per frame, no wall-clock reads
//! - Stable iteration order (walls in row-major tile order)
//! - No rendering, input device or serial dependencies

pub mod collision;
pub mod grid;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{move_agent, overlaps_any};
pub use grid::{GridError, Level, Tile, TileGrid};
pub use rect::Rect;
pub use state::{Readout, Session, SessionConfig, SessionPhase};
pub use tick::{SessionEvent, TickInput, TickOutcome, tick};
