//! Fixed-rate session tick
//!
//! Advances the level state machine by one frame and returns the haptic
//! commands to ship this frame. Never blocks and never fails: the
//! level-complete pause is a tick deadline, not a sleep.

use glam::Vec2;

use super::collision::move_agent;
use super::state::{Session, SessionPhase};
use crate::haptics::{HapticCommand, classify};

/// Input for a single tick (already dead-zone filtered)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Stick/keys vector, components in [-1, 1]
    pub axis: Vec2,
}

impl TickInput {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            axis: Vec2::new(x, y),
        }
    }
}

/// State machine transitions, for logging and the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Target reached on this level (0-based)
    LevelCleared { level: usize },
    /// Dwell over, next level loaded
    LevelStarted { level: usize },
    /// Dwell over on the last level
    Completed,
}

/// What one tick produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// Commands in send order; the device keeps the last one
    pub commands: Vec<HapticCommand>,
    pub event: Option<SessionEvent>,
}

/// Advance the session by one frame
pub fn tick(session: &mut Session, input: &TickInput) -> TickOutcome {
    session.time_ticks += 1;

    match session.phase {
        SessionPhase::Running => tick_running(session, input),
        SessionPhase::LevelClear { resume_at } => {
            if session.time_ticks >= resume_at {
                advance_level(session)
            } else {
                TickOutcome::default()
            }
        }
        SessionPhase::Complete => {
            let command = HapticCommand::celebration();
            session.readout.command = command;
            TickOutcome {
                commands: vec![command],
                event: None,
            }
        }
    }
}

fn tick_running(session: &mut Session, input: &TickInput) -> TickOutcome {
    let axis = input.axis.clamp(Vec2::NEG_ONE, Vec2::ONE);

    // Movement and collision
    let delta = axis * session.config.user_speed;
    session.level.agent = move_agent(session.level.agent, &session.level.walls, delta);

    // Haptic signal
    let proximity = session.current_proximity();
    let classification = classify(axis, &session.history, session.config.jerk_threshold);
    session.history.record(axis, classification.velocity);

    let command = HapticCommand::new(classification.state, proximity);
    session.readout.proximity = proximity;
    session.readout.haptic_state = classification.state;
    session.readout.jerk = classification.jerk;
    session.readout.command = command;

    let mut outcome = TickOutcome {
        commands: vec![command],
        event: None,
    };

    // Win check
    if session.level.agent.intersects(&session.level.target_rect) {
        let level = session.level_index();
        session.phase = SessionPhase::LevelClear {
            resume_at: session.time_ticks + session.config.dwell_ticks,
        };
        outcome.commands.push(HapticCommand::win_buzz());
        outcome.event = Some(SessionEvent::LevelCleared { level });
        log::info!("Level {} complete after {} ticks", level + 1, session.time_ticks);
    }

    outcome
}

fn advance_level(session: &mut Session) -> TickOutcome {
    if session.is_last_level() {
        session.phase = SessionPhase::Complete;
        log::info!("All {} levels complete", session.level_count());
        return TickOutcome {
            commands: Vec::new(),
            event: Some(SessionEvent::Completed),
        };
    }

    let next = session.level_index() + 1;
    match session.load_level(next) {
        Ok(()) => {
            session.phase = SessionPhase::Running;
            TickOutcome {
                commands: Vec::new(),
                event: Some(SessionEvent::LevelStarted { level: next }),
            }
        }
        Err(e) => {
            // Levels are validated at startup, so this means the table changed under us
            log::error!("{e}; ending session");
            session.phase = SessionPhase::Complete;
            TickOutcome {
                commands: Vec::new(),
                event: Some(SessionEvent::Completed),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haptics::HapticState;
    use crate::levels::{self, LevelDescriptor};
    use crate::sim::state::SessionConfig;

    /// Two 1x2 corridors: walk right 5 ticks to win
    fn corridor_levels() -> Vec<LevelDescriptor> {
        let map = ["1111", "1001", "1111"];
        vec![
            LevelDescriptor::new((1.5, 1.5), (2.5, 1.5), &map),
            LevelDescriptor::new((1.5, 1.5), (2.5, 1.5), &map),
        ]
    }

    fn config(dwell_ticks: u64, reset_history: bool) -> SessionConfig {
        SessionConfig {
            dwell_ticks,
            reset_history_on_level_load: reset_history,
            ..SessionConfig::default()
        }
    }

    /// Walk right until the level clears, returning that tick's outcome
    fn walk_to_clear(session: &mut Session) -> TickOutcome {
        for _ in 0..100 {
            let outcome = tick(session, &TickInput::new(1.0, 0.0));
            if outcome.event.is_some() {
                return outcome;
            }
        }
        panic!("level never cleared");
    }

    #[test]
    fn test_first_tick_on_builtin_level() {
        let mut session = Session::new(levels::builtin(), SessionConfig::default()).unwrap();
        let outcome = tick(&mut session, &TickInput::default());
        assert_eq!(outcome.commands, vec![HapticCommand::new(HapticState::Steady, 7)]);
        assert_eq!(outcome.event, None);
        assert_eq!(session.readout.jerk, 0.0);
        assert_eq!(session.agent_pos(), Vec2::new(60.0, 60.0));
    }

    #[test]
    fn test_running_moves_agent_and_blocks_at_walls() {
        let mut session = Session::new(levels::builtin(), SessionConfig::default()).unwrap();
        tick(&mut session, &TickInput::new(1.0, 0.0));
        assert_eq!(session.agent_pos(), Vec2::new(65.0, 60.0));

        // Row 0 is solid wall; pushing up stops at its bottom edge
        for _ in 0..10 {
            tick(&mut session, &TickInput::new(0.0, -1.0));
        }
        assert_eq!(session.level.agent.top(), 40.0);
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        let mut session = Session::new(levels::builtin(), SessionConfig::default()).unwrap();
        tick(&mut session, &TickInput::new(3.0, 0.0));
        assert_eq!(session.agent_pos(), Vec2::new(65.0, 60.0));
    }

    #[test]
    fn test_reaching_target_clears_level_with_win_buzz() {
        let mut session = Session::new(corridor_levels(), config(3, false)).unwrap();
        let outcome = walk_to_clear(&mut session);

        assert_eq!(outcome.event, Some(SessionEvent::LevelCleared { level: 0 }));
        assert_eq!(outcome.commands.last(), Some(&HapticCommand::win_buzz()));
        assert_eq!(outcome.commands.len(), 2);
        assert!(matches!(session.phase, SessionPhase::LevelClear { .. }));
    }

    #[test]
    fn test_dwell_ignores_input_then_loads_next_level() {
        let mut session = Session::new(corridor_levels(), config(3, false)).unwrap();
        walk_to_clear(&mut session);
        let agent = session.level.agent;
        let history = session.history;

        for _ in 0..2 {
            let outcome = tick(&mut session, &TickInput::new(-1.0, 1.0));
            assert_eq!(outcome, TickOutcome::default());
            assert_eq!(session.level.agent, agent);
            assert_eq!(session.history, history);
        }

        let outcome = tick(&mut session, &TickInput::new(-1.0, 1.0));
        assert_eq!(outcome.event, Some(SessionEvent::LevelStarted { level: 1 }));
        assert_eq!(session.phase, SessionPhase::Running);
        assert_eq!(session.level_index(), 1);

        let fresh = corridor_levels()[1].build(1, 40.0).unwrap();
        assert_eq!(session.level, fresh);
    }

    #[test]
    fn test_last_level_completes_and_celebrates() {
        let mut session = Session::new(corridor_levels(), config(1, false)).unwrap();
        walk_to_clear(&mut session);
        tick(&mut session, &TickInput::default());
        assert!(session.is_last_level());
        walk_to_clear(&mut session);

        let outcome = tick(&mut session, &TickInput::default());
        assert_eq!(outcome.event, Some(SessionEvent::Completed));
        assert_eq!(session.phase, SessionPhase::Complete);

        for _ in 0..3 {
            let outcome = tick(&mut session, &TickInput::new(1.0, 1.0));
            assert_eq!(outcome.commands, vec![HapticCommand::celebration()]);
            assert_eq!(outcome.event, None);
        }
        assert_eq!(session.level_index(), 1);
    }

    #[test]
    fn test_zero_dwell_advances_on_next_tick() {
        let mut session = Session::new(corridor_levels(), config(0, false)).unwrap();
        walk_to_clear(&mut session);
        let outcome = tick(&mut session, &TickInput::default());
        assert_eq!(outcome.event, Some(SessionEvent::LevelStarted { level: 1 }));
    }

    #[test]
    fn test_history_carries_across_levels_by_default() {
        let mut session = Session::new(corridor_levels(), config(0, false)).unwrap();
        walk_to_clear(&mut session);
        tick(&mut session, &TickInput::default());

        // Last sample of level 1 was (1, 0); releasing the stick reads as a jolt
        tick(&mut session, &TickInput::default());
        assert!((session.readout.jerk - 1.0).abs() < 1e-6);
        assert_eq!(session.readout.haptic_state, HapticState::Pulse);
    }

    #[test]
    fn test_history_reset_on_level_load_when_configured() {
        let mut session = Session::new(corridor_levels(), config(0, true)).unwrap();
        walk_to_clear(&mut session);
        tick(&mut session, &TickInput::default());

        tick(&mut session, &TickInput::default());
        assert_eq!(session.readout.jerk, 0.0);
        assert_eq!(session.readout.haptic_state, HapticState::Steady);
    }

    #[test]
    fn test_input_reversal_pulses() {
        let mut session = Session::new(levels::builtin(), SessionConfig::default()).unwrap();
        // Settle at constant velocity first
        tick(&mut session, &TickInput::new(1.0, 0.0));
        tick(&mut session, &TickInput::new(1.0, 0.0));
        let outcome = tick(&mut session, &TickInput::new(-1.0, 0.0));
        assert!((session.readout.jerk - 2.0).abs() < 1e-6);
        assert_eq!(outcome.commands[0].state, HapticState::Pulse);
    }
}
