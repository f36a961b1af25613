use super::config::LevelConfig;
use super::grid::{Grid, Position};
use super::progression::Phase;
use super::snake::Snake;

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left a walled grid
    Wall,
    /// Snake hit a pillar
    Obstacle,
    /// Snake hit itself
    SelfCollision,
}

/// Complete state of one level, owned by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// `None` once no free cell is left
    pub food: Option<Position>,
    pub grid: Grid,
    pub config: LevelConfig,
    pub score: u32,
    pub steps: u32,
    pub phase: Phase,
}

impl GameState {
    /// Fresh level state; food is placed by the engine
    pub fn new(config: LevelConfig, snake: Snake, score: u32) -> Self {
        Self {
            snake,
            food: None,
            grid: config.grid(),
            config,
            score,
            steps: 0,
            phase: Phase::Playing,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn is_leveling_up(&self) -> bool {
        matches!(self.phase, Phase::ThresholdReached { .. })
    }

    /// A score that skipped past the threshold still ends the level
    pub fn has_reached_threshold(&self) -> bool {
        self.score >= self.config.score_threshold
    }
}
