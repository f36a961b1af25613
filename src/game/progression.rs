use std::time::Duration;

use super::config::LevelConfig;

/// How long movement stays frozen between reaching the threshold and leaving
/// the level
pub const LEVEL_UP_DELAY: Duration = Duration::from_secs(2);

/// Lifecycle of one level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Paused,
    /// Threshold met; movement frozen while the delay runs down
    ThresholdReached { frozen_for: Duration },
    /// Terminal: the shell should load the next level
    Advancing,
    /// Terminal: the last level was cleared
    Completed,
    /// Terminal: the snake crashed
    GameOver,
}

/// Inputs to [`Phase::transition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    TogglePause,
    Collided,
    ThresholdMet,
    /// Simulation time passed
    Elapsed(Duration),
}

/// Notifications for the shell that hosts the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    AdvanceToLevel(LevelConfig),
    GameCompleted { final_score: u32 },
    ReturnToMenu,
}

impl Phase {
    /// The single transition function; unlisted pairs leave the phase as is
    pub fn transition(self, event: PhaseEvent, is_final_level: bool) -> Phase {
        match (self, event) {
            (Phase::Playing, PhaseEvent::TogglePause) => Phase::Paused,
            (Phase::Paused, PhaseEvent::TogglePause) => Phase::Playing,
            (Phase::Playing, PhaseEvent::Collided) => Phase::GameOver,
            (Phase::Playing, PhaseEvent::ThresholdMet) => Phase::ThresholdReached {
                frozen_for: Duration::ZERO,
            },
            (Phase::ThresholdReached { frozen_for }, PhaseEvent::Elapsed(step)) => {
                let frozen_for = frozen_for + step;
                if frozen_for < LEVEL_UP_DELAY {
                    Phase::ThresholdReached { frozen_for }
                } else if is_final_level {
                    Phase::Completed
                } else {
                    Phase::Advancing
                }
            }
            (phase, _) => phase,
        }
    }

    /// No further gameplay happens in this phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Advancing | Phase::Completed | Phase::GameOver)
    }
}
