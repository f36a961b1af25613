use std::time::Duration;

use crate::game::StepInfo;

/// Per-run statistics shown in the header
pub struct GameMetrics {
    /// Simulated play time in the current level, pauses excluded
    pub elapsed_time: Duration,
    pub food_eaten: u32,
    pub levels_cleared: u32,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            elapsed_time: Duration::ZERO,
            food_eaten: 0,
            levels_cleared: 0,
            games_played: 0,
        }
    }

    /// Count one processed tick of `interval` length
    pub fn on_tick(&mut self, info: &StepInfo, interval: Duration) {
        self.elapsed_time += interval;
        if info.ate_food {
            self.food_eaten += 1;
        }
    }

    pub fn on_game_start(&mut self) {
        self.elapsed_time = Duration::ZERO;
        self.food_eaten = 0;
        self.levels_cleared = 0;
        self.games_played += 1;
    }

    pub fn on_level_cleared(&mut self) {
        self.levels_cleared += 1;
        self.elapsed_time = Duration::ZERO;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
