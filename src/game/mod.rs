//! Core game logic module for Snake
//!
//! This module contains the tick-driven simulation without any I/O or
//! rendering dependencies. Score persistence is reached only through the
//! [`ScoreBridge`](crate::score::ScoreBridge) handed to the engine.

pub mod action;
pub mod config;
pub mod engine;
pub mod food;
pub mod grid;
pub mod levels;
pub mod progression;
pub mod snake;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::LevelConfig;
pub use engine::{GameEngine, StepInfo, StepResult};
pub use food::{FoodSpawner, clock_seed};
pub use grid::{Grid, Position};
pub use levels::Ladder;
pub use progression::{LEVEL_UP_DELAY, Phase, PhaseEvent, Signal};
pub use snake::Snake;
pub use state::{CollisionType, GameState};
