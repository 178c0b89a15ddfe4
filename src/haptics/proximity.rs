//! Proximity module: distance to the target mapped onto 0..=255
//!
//! The curve is quadratic so intensity rises sharply in the last stretch
//! before the goal.

use glam::Vec2;

/// Map the distance between `user` and `target` to a vibration intensity.
///
/// `max_dist` is the play-field diagonal; anything at or beyond it is 0 and
/// standing on the target is 255.
pub fn proximity(user: Vec2, target: Vec2, max_dist: f32) -> u8 {
    if max_dist <= 0.0 {
        return if user == target { u8::MAX } else { 0 };
    }
    let normalized = (1.0 - user.distance(target) / max_dist).clamp(0.0, 1.0);
    (normalized * normalized * 255.0).round().clamp(0.0, 255.0) as u8
}
