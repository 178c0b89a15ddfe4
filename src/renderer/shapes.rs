//! Drawable primitives for the researcher view
//!
//! The session is turned into a flat list of rectangles, lines, circles and
//! text once per frame. Whatever draws them (window, terminal, log) only has
//! to understand these four shapes.

use glam::Vec2;

use crate::consts::{PLAYER_RADIUS, TARGET_HALF_SIZE, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::sim::{Rect, Session, SessionPhase};

/// Colors for maze elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const WALL: [f32; 4] = [0.39, 0.39, 1.0, 1.0];
    pub const USER: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const TARGET: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const TEXT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

/// Text size classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Debug,
    Title,
}

/// One drawable primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: [f32; 4],
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: [f32; 4],
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: [f32; 4],
    },
    /// `anchor` is the top-left corner, or the centre when `centered`
    Text {
        text: String,
        anchor: Vec2,
        centered: bool,
        size: FontSize,
        color: [f32; 4],
    },
}

/// Everything to draw this frame, back to front
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub clear_color: [f32; 4],
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    fn new() -> Self {
        Self {
            clear_color: colors::BACKGROUND,
            commands: Vec::new(),
        }
    }

    /// Text lines in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Line height of the debug panel
const DEBUG_LINE_HEIGHT: f32 = 30.0;
/// Half-length of each crosshair arm
const CROSSHAIR_HALF: f32 = TARGET_HALF_SIZE;

/// Build the frame for the session's current phase
pub fn build_frame(session: &Session) -> Frame {
    match session.phase {
        SessionPhase::Running => play_frame(session),
        SessionPhase::LevelClear { .. } => {
            let mut frame = Frame::new();
            frame.commands.push(centered_text(
                format!("Level {} Complete!", session.level_index() + 1),
                Vec2::new(WINDOW_WIDTH / 2.0, WINDOW_HEIGHT / 2.0),
                FontSize::Title,
                colors::USER,
            ));
            frame
        }
        SessionPhase::Complete => {
            let mut frame = Frame::new();
            frame.commands.push(centered_text(
                "Congratulations!".to_string(),
                Vec2::new(WINDOW_WIDTH / 2.0, WINDOW_HEIGHT / 2.0 - 30.0),
                FontSize::Title,
                colors::USER,
            ));
            frame.commands.push(centered_text(
                "You have completed all levels!".to_string(),
                Vec2::new(WINDOW_WIDTH / 2.0, WINDOW_HEIGHT / 2.0 + 30.0),
                FontSize::Debug,
                colors::TEXT,
            ));
            frame
        }
    }
}

/// Five-line panel: level, proximity, classifier state, jerk, raw command
pub fn debug_lines(session: &Session) -> [String; 5] {
    let readout = &session.readout;
    [
        format!("Level: {} / {}", session.level_index() + 1, session.level_count()),
        format!("Proximity: {}", readout.proximity),
        format!("AI State: {}", readout.haptic_state),
        format!("Jerk: {:.2}", readout.jerk),
        format!("Haptic Command: {}", readout.command),
    ]
}

fn play_frame(session: &Session) -> Frame {
    let level = &session.level;
    let mut frame = Frame::new();
    frame.commands.reserve(level.walls.len() + 8);

    for wall in &level.walls {
        frame.commands.push(DrawCommand::FillRect {
            rect: *wall,
            color: colors::WALL,
        });
    }

    // Target crosshair
    let t = level.target_pos;
    let arm = Vec2::splat(CROSSHAIR_HALF);
    let flip = Vec2::new(CROSSHAIR_HALF, -CROSSHAIR_HALF);
    for (from, to) in [(t - arm, t + arm), (t - flip, t + flip)] {
        frame.commands.push(DrawCommand::Line {
            from,
            to,
            width: 3.0,
            color: colors::TARGET,
        });
    }

    frame.commands.push(DrawCommand::FillCircle {
        center: session.agent_pos(),
        radius: PLAYER_RADIUS,
        color: colors::USER,
    });

    for (i, text) in debug_lines(session).into_iter().enumerate() {
        frame.commands.push(DrawCommand::Text {
            text,
            anchor: Vec2::new(10.0, 10.0 + i as f32 * DEBUG_LINE_HEIGHT),
            centered: false,
            size: FontSize::Debug,
            color: colors::TEXT,
        });
    }

    frame
}

fn centered_text(text: String, anchor: Vec2, size: FontSize, color: [f32; 4]) -> DrawCommand {
    DrawCommand::Text {
        text,
        anchor,
        centered: true,
        size,
        color,
    }
}
