//! Super Snake - a terminal Snake with a level ladder and persistent scores
//!
//! This library provides:
//! - The deterministic tick-driven simulation (game module)
//! - Score persistence and session identity behind narrow traits (score module)
//! - Key decoding (input module) and TUI rendering (render module)
//! - The interactive shell that drives levels in order (modes module)

pub mod error;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod score;
