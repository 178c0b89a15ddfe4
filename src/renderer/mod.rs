//! Rendering seam
//!
//! The sim produces a `Frame` of primitives each tick; a `Renderer` presents
//! it. The binary ships a log-backed renderer for headless rigs; a windowed
//! front end only has to implement the trait.

pub mod shapes;

pub use shapes::{DrawCommand, FontSize, Frame, build_frame, colors, debug_lines};

/// Consumer of per-tick frames
pub trait Renderer {
    fn present(&mut self, frame: &Frame);
}

/// Discards every frame
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn present(&mut self, _frame: &Frame) {}
}

/// Writes the frame's text through `log`.
///
/// Text changes (phase messages) are logged at info; the debug panel is
/// logged at debug every `every` frames so a 60 Hz loop doesn't flood the
/// output.
#[derive(Debug)]
pub struct LogRenderer {
    every: u64,
    frames: u64,
    last_banner: Option<String>,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
            last_banner: None,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    fn present(&mut self, frame: &Frame) {
        self.frames += 1;

        let centered: Vec<&str> = frame
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text {
                    text, centered: true, ..
                } => Some(text.as_str()),
                _ => None,
            })
            .collect();

        if !centered.is_empty() {
            let banner = centered.join(" ");
            if self.last_banner.as_deref() != Some(banner.as_str()) {
                log::info!("{banner}");
                self.last_banner = Some(banner);
            }
            return;
        }

        self.last_banner = None;
        if self.frames % self.every == 0 {
            log::debug!("{}", frame.texts().collect::<Vec<_>>().join(" | "));
        }
    }
}
