//! Haptic feedback pipeline
//!
//! Per tick: proximity to the goal sets the intensity, input jerk picks the
//! vibration pattern, and the transport ships the pair to the actuator.

pub mod classifier;
pub mod command;
pub mod proximity;
pub mod transport;

pub use classifier::{Classification, KinematicHistory, classify};
pub use command::{HapticCommand, HapticState, ParseCommandError};
pub use proximity::proximity;
pub use transport::{CaptureChannel, HapticTransport, TransportStats};
