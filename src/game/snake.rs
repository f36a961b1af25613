use super::action::Direction;
use super::grid::Position;

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a single-cell snake
    pub fn new(head: Position, direction: Direction) -> Self {
        Self {
            body: vec![head],
            direction,
        }
    }

    /// Create a snake from explicit segments, head first.
    ///
    /// Returns `None` for an empty body.
    pub fn from_body(body: Vec<Position>, direction: Direction) -> Option<Self> {
        if body.is_empty() {
            return None;
        }
        Some(Self { body, direction })
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    /// True iff `pos` equals any body cell, head included
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Prepend `new_head`, dropping the tail unless growing.
    ///
    /// Does not validate `new_head`; collisions are resolved by the engine
    /// before this is called.
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }

    /// Change direction unless the turn stays on the current axis.
    ///
    /// Returns true when the direction changed.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if self.direction.is_same_axis(direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false once constructed
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// True when no two segments share a cell
    pub fn has_unique_cells(&self) -> bool {
        self.body
            .iter()
            .enumerate()
            .all(|(i, cell)| !self.body[i + 1..].contains(cell))
    }
}
