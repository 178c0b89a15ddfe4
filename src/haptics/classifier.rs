//! Cognitive-load classifier
//!
//! Jerk of the raw input vector (not of the agent's world position) is used
//! as a proxy for hesitation: a steady hand produces smooth input, an
//! uncertain one reverses and corrects.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::command::HapticState;

/// Previous tick's input sample and input velocity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KinematicHistory {
    pub last_input: Vec2,
    pub last_velocity: Vec2,
}

impl KinematicHistory {
    /// Store this tick's sample as the history for the next one
    pub fn record(&mut self, input: Vec2, velocity: Vec2) {
        self.last_input = input;
        self.last_velocity = velocity;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Output of one classification step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub state: HapticState,
    pub jerk: f32,
    pub velocity: Vec2,
}

/// Classify the current input sample against the stored history.
///
/// Stateless; the caller persists `(current, result.velocity)` afterwards.
pub fn classify(current: Vec2, history: &KinematicHistory, threshold: f32) -> Classification {
    let velocity = current - history.last_input;
    let accel = velocity - history.last_velocity;
    let jerk = accel.length();

    let state = if jerk > threshold {
        HapticState::Pulse
    } else {
        HapticState::Steady
    };

    Classification {
        state,
        jerk,
        velocity,
    }
}
