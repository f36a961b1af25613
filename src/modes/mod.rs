pub mod human;

pub use human::{HumanMode, LEADERBOARD_SIZE, Screen};
