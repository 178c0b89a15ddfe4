//! Axis-aligned rectangle geometry for walls, the agent and the target
//!
//! Screen coordinates: x grows right, y grows down. Edges follow the usual
//! sprite-rect convention: `left = x`, `right = x + w`, `top = y`,
//! `bottom = y + h`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle centered on `center` extending `half` in each direction
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self::new(center.x - half.x, center.y - half.y, half.x * 2.0, half.y * 2.0)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Move so the left edge sits at `left` (size unchanged)
    #[inline]
    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    #[inline]
    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    #[inline]
    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    #[inline]
    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Copy shifted by `delta`
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.w, self.h)
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_center() {
        let r = Rect::from_center(Vec2::new(60.0, 60.0), Vec2::splat(8.0));
        assert_eq!(r, Rect::new(52.0, 52.0, 16.0, 16.0));
        assert_eq!(r.center(), Vec2::new(60.0, 60.0));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 40.0, 40.0);
        let b = Rect::new(40.0, 0.0, 40.0, 40.0);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));

        let c = Rect::new(39.5, 10.0, 16.0, 16.0);
        assert!(a.intersects(&c));
    }

    #[test]
    fn test_edge_setters_keep_size() {
        let mut r = Rect::new(10.0, 10.0, 16.0, 16.0);
        r.set_right(40.0);
        assert_eq!(r.left(), 24.0);
        assert_eq!(r.size(), Vec2::splat(16.0));
        r.set_bottom(80.0);
        assert_eq!(r.top(), 64.0);
        r.set_left(80.0);
        r.set_top(0.0);
        assert_eq!((r.x, r.y), (80.0, 0.0));
    }
}
