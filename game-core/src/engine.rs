use rand::Rng;

use crate::board::{Board, Grid};
use crate::GameError;

/// Column/row offsets toggled around a selected cell, center excluded.
const NEIGHBOR_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Applies the Lights Out rules to the single board it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engine {
    board: Board,
}

impl Engine {
    /// Starts a new game with a freshly randomized board.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut engine = Self {
            board: Board::cleared(),
        };
        engine.reset(rng);
        engine
    }

    pub fn from_board(board: Board) -> Self {
        Self { board }
    }

    /// Plays a move at (`col`, `row`): toggles the orthogonal neighbors that
    /// lie on the grid, then the cell itself, then rescans for a win.
    ///
    /// An off-grid selection is rejected before anything is touched.
    pub fn select_cell(&mut self, col: usize, row: usize) -> Result<&Board, GameError> {
        self.board.get(row, col)?;

        for (dc, dr) in NEIGHBOR_OFFSETS {
            let (c, r) = (col as isize + dc, row as isize + dr);
            if !Board::contains(r, c) {
                continue;
            }
            self.board.flip(r as usize, c as usize)?;
        }
        self.board.flip(row, col)?;
        self.board.refresh_winner();

        Ok(&self.board)
    }

    /// Redraws every cell uniformly from {0, 1}. The winner flag is forced
    /// false even if the draw happens to be all zeros.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &Board {
        let cells: Grid =
            std::array::from_fn(|_| std::array::from_fn(|_| u8::from(rng.gen_bool(0.5))));
        self.board = Board::from_cells(cells);
        &self.board
    }

    pub fn state(&self) -> &Board {
        &self.board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn lit(cells: &[(usize, usize)]) -> Board {
        let mut board = Board::cleared();
        for &(row, col) in cells {
            board.set(row, col, 1).unwrap();
        }
        board
    }

    #[test]
    fn corner_move_skips_off_grid_neighbors() {
        let mut engine = Engine::from_board(Board::cleared());

        let board = engine.select_cell(0, 0).unwrap().clone();

        // (col, row) = (0,0), (1,0), (0,1)
        assert_eq!(board.rows(), lit(&[(0, 0), (0, 1), (1, 0)]).rows());
        assert_eq!(board.lit_count(), 3);
        assert!(!board.is_winner());
    }

    #[test]
    fn opposite_corner_and_edge_moves() {
        let mut engine = Engine::from_board(Board::cleared());
        engine.select_cell(4, 4).unwrap();
        assert_eq!(engine.state().rows(), lit(&[(4, 4), (3, 4), (4, 3)]).rows());

        let mut engine = Engine::from_board(Board::cleared());
        engine.select_cell(2, 0).unwrap();
        assert_eq!(
            engine.state().rows(),
            lit(&[(0, 1), (0, 2), (0, 3), (1, 2)]).rows()
        );
    }

    #[test]
    fn center_move_toggles_plus_shape() {
        let mut engine = Engine::from_board(lit(&[(1, 2)]));

        engine.select_cell(2, 2).unwrap();

        // (1,2) was lit and gets toggled off.
        assert_eq!(
            engine.state().rows(),
            lit(&[(2, 1), (2, 2), (2, 3), (3, 2)]).rows()
        );
    }

    #[test]
    fn column_and_row_are_not_swapped() {
        let mut engine = Engine::from_board(Board::cleared());

        engine.select_cell(3, 0).unwrap();

        assert_eq!(engine.state().get(0, 3).unwrap(), 1);
        assert_eq!(engine.state().get(1, 3).unwrap(), 1);
        assert_eq!(engine.state().get(3, 0).unwrap(), 0);
    }

    #[test]
    fn winning_move_sets_winner() {
        let mut engine = Engine::from_board(lit(&[(0, 0), (0, 1), (1, 0)]));

        let board = engine.select_cell(0, 0).unwrap();

        assert!(board.is_winner());
        assert_eq!(board.lit_count(), 0);
    }

    #[test]
    fn repeated_move_undoes_itself() {
        let start = lit(&[(2, 2), (4, 0)]);
        let mut engine = Engine::from_board(start.clone());

        engine.select_cell(1, 3).unwrap();
        engine.select_cell(1, 3).unwrap();

        assert_eq!(engine.state().rows(), start.rows());
    }

    #[test]
    fn invalid_move_leaves_board_untouched() {
        let start = lit(&[(0, 4), (4, 4)]);
        let mut engine = Engine::from_board(start.clone());

        let err = engine.select_cell(BOARD_WIDTH, 0).unwrap_err();
        assert_eq!(err, GameError::OutOfRange { row: 0, col: 5 });
        assert!(engine.select_cell(0, BOARD_HEIGHT).is_err());

        assert_eq!(engine.state(), &start);
    }

    #[test]
    fn reset_always_reports_no_winner() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut engine = Engine::from_board(Board::cleared());

        for _ in 0..64 {
            let board = engine.reset(&mut rng);
            assert!(!board.is_winner());
            assert!(board.rows().iter().flatten().all(|&cell| cell <= 1));
        }
    }

    #[test]
    fn reset_reports_no_winner_even_for_dark_draw() {
        // A constant u64::MAX stream makes every gen_bool(0.5) false.
        let mut rng = rand::rngs::mock::StepRng::new(u64::MAX, 0);
        let mut engine = Engine::from_board(lit(&[(1, 1)]));

        let board = engine.reset(&mut rng);

        assert_eq!(board.lit_count(), 0);
        assert!(board.check_winner());
        assert!(!board.is_winner());
    }

    #[test]
    fn seeded_reset_is_reproducible() {
        let a = Engine::new(&mut ChaCha8Rng::seed_from_u64(42));
        let b = Engine::new(&mut ChaCha8Rng::seed_from_u64(42));

        assert_eq!(a, b);
        assert!(!a.state().is_winner());
    }
}
