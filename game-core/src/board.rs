use serde::{Deserialize, Serialize};

use crate::GameError;

pub const BOARD_HEIGHT: usize = 5;
pub const BOARD_WIDTH: usize = 5;

pub type Grid = [[u8; BOARD_WIDTH]; BOARD_HEIGHT];

/// The shared Lights Out grid plus its derived winner flag.
///
/// Serializes as `{"board": [[0, 1, ...], ...], "winner": false}`, row-major.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "RawBoard")]
pub struct Board {
    #[serde(rename = "board")]
    cells: Grid,
    winner: bool,
}

/// Wire shape as received, before the cell and winner invariants are applied.
#[derive(Deserialize)]
struct RawBoard {
    board: Grid,
    winner: bool,
}

impl From<RawBoard> for Board {
    fn from(raw: RawBoard) -> Self {
        let mut board = Board::from_cells(raw.board);
        // A claimed win only stands if the scan agrees; an unwon dark board
        // is what a reset can legitimately produce.
        board.winner = raw.winner && board.check_winner();
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::cleared()
    }
}

impl Board {
    /// All lights off. The winner flag stays false until a scan says otherwise.
    pub fn cleared() -> Self {
        Self {
            cells: [[0; BOARD_WIDTH]; BOARD_HEIGHT],
            winner: false,
        }
    }

    /// Wraps an existing grid, clamping each cell into {0, 1}. The winner
    /// flag starts false.
    pub fn from_cells(mut cells: Grid) -> Self {
        cells.iter_mut().flatten().for_each(|cell| *cell = (*cell).min(1));
        Self {
            cells,
            winner: false,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Result<u8, GameError> {
        check_bounds(row, col)?;
        Ok(self.cells[row][col])
    }

    /// Stores `value` clamped into {0, 1}.
    pub fn set(&mut self, row: usize, col: usize, value: i64) -> Result<(), GameError> {
        check_bounds(row, col)?;
        self.cells[row][col] = value.clamp(0, 1) as u8;
        Ok(())
    }

    pub fn flip(&mut self, row: usize, col: usize) -> Result<(), GameError> {
        check_bounds(row, col)?;
        self.cells[row][col] ^= 1;
        Ok(())
    }

    pub fn contains(row: isize, col: isize) -> bool {
        (0..BOARD_HEIGHT as isize).contains(&row) && (0..BOARD_WIDTH as isize).contains(&col)
    }

    pub fn is_winner(&self) -> bool {
        self.winner
    }

    /// Full scan: true iff no cell is lit.
    pub fn check_winner(&self) -> bool {
        self.cells.iter().flatten().all(|&cell| cell == 0)
    }

    pub fn refresh_winner(&mut self) -> bool {
        self.winner = self.check_winner();
        self.winner
    }

    pub fn rows(&self) -> &Grid {
        &self.cells
    }

    pub fn lit_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&cell| cell == 1).count()
    }
}

fn check_bounds(row: usize, col: usize) -> Result<(), GameError> {
    if row < BOARD_HEIGHT && col < BOARD_WIDTH {
        Ok(())
    } else {
        Err(GameError::OutOfRange {
            row: row as i64,
            col: col as i64,
        })
    }
}
