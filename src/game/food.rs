use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::grid::{Grid, Position};
use super::snake::Snake;

/// Draws per free-cell estimate before falling back to a full scan
const DRAWS_PER_CELL: usize = 4;

/// Seed derived from the wall clock, for use once per process start
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0)
}

/// Places food on free cells using a seeded random source
pub struct FoodSpawner {
    rng: StdRng,
}

impl FoodSpawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick a cell that is not a pillar, not a snake cell and not a wall.
    ///
    /// Rejection sampling is capped; once the cap is hit every free cell is
    /// enumerated and one is chosen uniformly. `None` means the board has no
    /// free cell left.
    pub fn spawn(&mut self, grid: &Grid, snake: &Snake) -> Option<Position> {
        let is_free = |pos: Position| {
            !grid.hits_wall(pos) && !grid.is_obstacle(pos) && !snake.occupies(pos)
        };

        let max_draws = grid.area() * DRAWS_PER_CELL;
        for _ in 0..max_draws {
            let x = self.rng.gen_range(0..grid.rows()) as i32;
            let y = self.rng.gen_range(0..grid.columns()) as i32;
            let pos = Position::new(x, y);

            if is_free(pos) {
                return Some(pos);
            }
        }

        let free: Vec<Position> = grid.cells().filter(|&pos| is_free(pos)).collect();
        let picked = free.choose(&mut self.rng).copied();
        if let Some(pos) = picked {
            tracing::debug!(x = pos.x, y = pos.y, free = free.len(), "food placed by scan");
        }
        picked
    }
}
