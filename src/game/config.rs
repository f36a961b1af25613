use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::grid::{Grid, Position};
use crate::error::ConfigError;

/// Immutable parameters of one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Level ordinal, starting at 1
    pub level: u32,
    /// X-extent of the grid
    pub rows: usize,
    /// Y-extent of the grid
    pub columns: usize,
    /// Out-of-bounds kills when true, wraps when false
    pub walled: bool,
    /// Static pillar cells
    #[serde(default)]
    pub obstacles: Vec<Position>,
    /// Score at which the level ends
    pub score_threshold: u32,
    /// Points awarded per food eaten
    pub points_per_food: u32,
    /// Time between simulation ticks
    #[serde(rename = "tick_interval_ms", with = "millis")]
    pub tick_interval: Duration,
    /// Reaching the threshold completes the game instead of advancing
    #[serde(default)]
    pub is_final_level: bool,
}

impl LevelConfig {
    /// Build the grid for this level
    pub fn grid(&self) -> Grid {
        Grid::new(
            self.rows,
            self.columns,
            self.walled,
            self.obstacles.iter().copied(),
        )
    }

    /// Open sandbox level, handy for tests and quick play
    pub fn sandbox(rows: usize, columns: usize) -> Self {
        Self {
            level: 1,
            rows,
            columns,
            walled: false,
            obstacles: Vec::new(),
            score_threshold: 200,
            points_per_food: 10,
            tick_interval: Duration::from_millis(200),
            is_final_level: true,
        }
    }

    pub fn with_walls(mut self, walled: bool) -> Self {
        self.walled = walled;
        self
    }

    pub fn with_obstacles(mut self, obstacles: impl IntoIterator<Item = Position>) -> Self {
        self.obstacles = obstacles.into_iter().collect();
        self
    }

    pub fn with_threshold(mut self, score_threshold: u32) -> Self {
        self.score_threshold = score_threshold;
        self
    }

    /// Check the level can actually be played
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |reason: &str| Err(ConfigError::invalid(self.level, reason));

        if self.rows == 0 || self.columns == 0 {
            return fail("grid must have at least one row and one column");
        }
        if self.points_per_food == 0 {
            return fail("points_per_food must be positive");
        }
        if self.score_threshold == 0 {
            return fail("score_threshold must be positive");
        }
        if self.tick_interval.is_zero() {
            return fail("tick interval must be positive");
        }

        let grid = self.grid();
        if let Some(pos) = self.obstacles.iter().find(|pos| !grid.in_bounds(**pos)) {
            return Err(ConfigError::invalid(
                self.level,
                format!("obstacle ({}, {}) lies outside the grid", pos.x, pos.y),
            ));
        }
        if grid.is_obstacle(grid.center()) {
            return fail("spawn cell at the grid center is an obstacle");
        }

        Ok(())
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
