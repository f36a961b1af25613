use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// Playing field of one level.
///
/// `rows` is the x-extent and `columns` the y-extent. Obstacles are static
/// for the lifetime of the level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    walled: bool,
    obstacles: HashSet<Position>,
}

impl Grid {
    pub fn new(
        rows: usize,
        columns: usize,
        walled: bool,
        obstacles: impl IntoIterator<Item = Position>,
    ) -> Self {
        Self {
            rows,
            columns,
            walled,
            obstacles: obstacles.into_iter().collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn is_walled(&self) -> bool {
        self.walled
    }

    /// Total number of cells, obstacles included
    pub fn area(&self) -> usize {
        self.rows * self.columns
    }

    pub fn center(&self) -> Position {
        Position::new((self.rows / 2) as i32, (self.columns / 2) as i32)
    }

    /// Check if a position is within the grid bounds
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.rows as i32 && pos.y >= 0 && pos.y < self.columns as i32
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    /// True when stepping onto `pos` means hitting the boundary wall
    pub fn hits_wall(&self, pos: Position) -> bool {
        self.walled && !self.in_bounds(pos)
    }

    /// Snap each out-of-range axis to the opposite edge.
    ///
    /// Positions more than one cell outside the grid are still snapped to the
    /// edge, never wrapped modulo the extent.
    pub fn wrap(&self, pos: Position) -> Position {
        let max_x = self.rows as i32 - 1;
        let max_y = self.columns as i32 - 1;

        let x = if pos.x > max_x {
            0
        } else if pos.x < 0 {
            max_x
        } else {
            pos.x
        };
        let y = if pos.y > max_y {
            0
        } else if pos.y < 0 {
            max_y
        } else {
            pos.y
        };

        Position::new(x, y)
    }

    /// Iterate every in-bounds cell, column-major by y then x
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.columns as i32)
            .flat_map(move |y| (0..self.rows as i32).map(move |x| Position::new(x, y)))
    }
}
