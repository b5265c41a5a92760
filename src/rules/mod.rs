//! Game rules: win-condition evaluation.

pub mod win;

pub use win::{evaluate_winner, win_announcement};
