//! Frame driver: the fixed-rate control loop
//!
//! Each frame: poll input, tick the session, ship haptic commands, hand the
//! frame to the renderer, then sleep until the next frame boundary. The
//! transport is shut down on every way out of the loop, including panics
//! (via `HapticTransport`'s `Drop`).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::haptics::{HapticTransport, TransportStats};
use crate::input::{InputSource, apply_dead_zone};
use crate::renderer::{Renderer, build_frame};
use crate::settings::Settings;
use crate::sim::{Session, SessionEvent, SessionPhase, TickInput, tick};

/// Frames we can fall behind before the pacer stops trying to catch up
const MAX_FRAME_LAG: u32 = 8;

/// Result of a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Quit,
}

/// What happened during a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub levels_cleared: usize,
    pub completed: bool,
    pub transport: TransportStats,
}

/// Owns the session and every collaborator for the lifetime of a run
pub struct FrameDriver<I, R> {
    session: Session,
    transport: HapticTransport,
    input: I,
    renderer: R,
    quit: Arc<AtomicBool>,
    frame_period: Duration,
    dead_zone: f32,
    max_frames: Option<u64>,
    summary: RunSummary,
}

impl<I: InputSource, R: Renderer> FrameDriver<I, R> {
    pub fn new(
        session: Session,
        transport: HapticTransport,
        input: I,
        renderer: R,
        settings: &Settings,
    ) -> Self {
        Self {
            session,
            transport,
            input,
            renderer,
            quit: Arc::new(AtomicBool::new(false)),
            frame_period: Duration::from_secs_f64(1.0 / settings.effective_frame_rate() as f64),
            dead_zone: settings.dead_zone,
            max_frames: None,
            summary: RunSummary::default(),
        }
    }

    /// Stop after this many frames (headless runs)
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Flag that ends the loop at the next frame boundary when set
    pub fn quit_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.quit)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transport(&self) -> &HapticTransport {
        &self.transport
    }

    /// Run one frame without pacing
    pub fn step(&mut self) -> Step {
        if self.quit.load(Ordering::SeqCst) {
            return Step::Quit;
        }
        if self.max_frames.is_some_and(|max| self.summary.frames >= max) {
            log::info!("Frame limit reached");
            return Step::Quit;
        }

        let frame = self.input.poll(&self.session);
        if frame.quit {
            log::info!("Quit requested by input");
            return Step::Quit;
        }

        let input = TickInput {
            axis: apply_dead_zone(frame.axis, self.dead_zone),
        };
        let outcome = tick(&mut self.session, &input);
        for command in &outcome.commands {
            self.transport.send(*command);
        }

        match outcome.event {
            Some(SessionEvent::LevelCleared { .. }) => self.summary.levels_cleared += 1,
            Some(SessionEvent::Completed) => self.summary.completed = true,
            Some(SessionEvent::LevelStarted { .. }) | None => {}
        }

        self.renderer.present(&build_frame(&self.session));
        self.summary.frames += 1;
        Step::Continue
    }

    /// Loop at the configured rate until quit, then shut down
    pub fn run(mut self) -> RunSummary {
        log::info!(
            "Frame loop starting at {:.0} Hz (haptics: {})",
            1.0 / self.frame_period.as_secs_f64(),
            if self.transport.is_attached() {
                self.transport.label()
            } else {
                "software-only"
            }
        );

        let mut next_frame = Instant::now();
        while self.step() == Step::Continue {
            next_frame += self.frame_period;
            let now = Instant::now();
            if next_frame > now {
                thread::sleep(next_frame - now);
            } else if now - next_frame > self.frame_period * MAX_FRAME_LAG {
                log::debug!("Frame loop fell behind; resetting pacer");
                next_frame = now;
            }
        }

        self.shutdown()
    }

    /// Turn the actuator off, release the channel and report
    pub fn shutdown(&mut self) -> RunSummary {
        log::info!("Shutting down...");
        self.transport.shutdown();
        self.summary.transport = self.transport.stats();
        self.summary.completed |= self.session.phase == SessionPhase::Complete;
        log::info!(
            "Ran {} frames, cleared {} of {} levels",
            self.summary.frames,
            self.summary.levels_cleared,
            self.session.level_count()
        );
        self.summary
    }
}
