//! The level ladder: five hand-tuned levels played in order.
//!
//! Score carries over between levels of one session, so every threshold is
//! reached from the previous level's threshold in whole food increments.
//! A game may also start on any level at score 0, so each threshold must be
//! a whole number of foods from zero as well.

use std::path::Path;
use std::time::Duration;

use super::config::LevelConfig;
use super::grid::Position;
use crate::error::ConfigError;

const ROWS: usize = 35;
const COLUMNS: usize = 25;

/// Ordered, validated set of levels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ladder {
    levels: Vec<LevelConfig>,
}

impl Ladder {
    /// Validate and wrap a list of levels
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, ConfigError> {
        validate_ladder(&levels)?;
        Ok(Self { levels })
    }

    /// Load a JSON array of levels
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let levels: Vec<LevelConfig> = serde_json::from_str(&json)?;
        Self::new(levels)
    }

    pub fn first(&self) -> &LevelConfig {
        &self.levels[0]
    }

    pub fn get(&self, level: u32) -> Option<&LevelConfig> {
        self.levels.iter().find(|config| config.level == level)
    }

    /// Level that follows `level`, if any
    pub fn next_after(&self, level: u32) -> Option<&LevelConfig> {
        self.get(level + 1)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for Ladder {
    fn default() -> Self {
        Self {
            levels: builtin_levels(),
        }
    }
}

fn validate_ladder(levels: &[LevelConfig]) -> Result<(), ConfigError> {
    if levels.is_empty() {
        return Err(ConfigError::EmptyLadder);
    }

    let mut previous_threshold = 0;
    for (index, config) in levels.iter().enumerate() {
        config.validate()?;

        let expected = index as u32 + 1;
        if config.level != expected {
            return Err(ConfigError::invalid(
                config.level,
                format!("expected level {expected} at position {index}"),
            ));
        }

        let is_last = index + 1 == levels.len();
        if config.is_final_level != is_last {
            return Err(ConfigError::invalid(
                config.level,
                "exactly the last level must be marked final",
            ));
        }

        if config.score_threshold <= previous_threshold {
            return Err(ConfigError::invalid(
                config.level,
                "threshold must exceed the previous level's threshold",
            ));
        }
        if (config.score_threshold - previous_threshold) % config.points_per_food != 0 {
            return Err(ConfigError::invalid(
                config.level,
                "threshold is not reachable in whole food increments",
            ));
        }
        if config.score_threshold % config.points_per_food != 0 {
            return Err(ConfigError::invalid(
                config.level,
                "threshold is not reachable from a fresh start",
            ));
        }
        previous_threshold = config.score_threshold;
    }

    Ok(())
}

fn builtin_levels() -> Vec<LevelConfig> {
    let level = |level, walled, score_threshold, points_per_food, tick_ms, obstacles| {
        LevelConfig {
            level,
            rows: ROWS,
            columns: COLUMNS,
            walled,
            obstacles,
            score_threshold,
            points_per_food,
            tick_interval: Duration::from_millis(tick_ms),
            is_final_level: level == 5,
        }
    };

    vec![
        level(1, false, 700, 10, 200, corner_pillars()),
        level(2, true, 1900, 10, 200, twin_bars()),
        level(3, false, 3500, 10, 150, cross_bars()),
        level(4, true, 5500, 10, 150, corner_pillars()),
        level(5, true, 8000, 25, 150, cross_bars()),
    ]
}

/// Four 2x2 blocks near the corners
fn corner_pillars() -> Vec<Position> {
    let mut cells = Vec::new();
    for (ox, oy) in [(5, 4), (28, 4), (5, 19), (28, 19)] {
        for dx in 0..2 {
            for dy in 0..2 {
                cells.push(Position::new(ox + dx, oy + dy));
            }
        }
    }
    cells
}

/// Two long horizontal bars above and below the center
fn twin_bars() -> Vec<Position> {
    [6, 18]
        .into_iter()
        .flat_map(|y| (8..=26).map(move |x| Position::new(x, y)))
        .collect()
}

/// Short bars on each arm of a plus, leaving the center open
fn cross_bars() -> Vec<Position> {
    let horizontal = (7..=12)
        .chain(22..=27)
        .map(|x| Position::new(x, 12));
    let vertical = (2..=6).chain(18..=22).map(|y| Position::new(17, y));
    horizontal.chain(vertical).collect()
}
