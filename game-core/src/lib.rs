//! Board state and move rules for a single shared game of Lights Out.

use thiserror::Error;

pub mod board;
pub mod engine;

pub use board::{Board, Grid, BOARD_HEIGHT, BOARD_WIDTH};
pub use engine::Engine;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("cell at col {col}, row {row} is outside the board")]
    OutOfRange { row: i64, col: i64 },
}
