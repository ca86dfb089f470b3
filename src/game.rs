//! Game record: the current board, the side to move and the moves so far.

use thiserror::Error;

use crate::board::{Board, GameOutcome, Move, MoveError, Side};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error("game is over")]
    Finished,
}

/// A game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    side: Side,
    history: Vec<(Side, Move)>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Standard start, black to move.
    pub fn new() -> Self {
        Self::from_position(Board::new(), Side::Black)
    }

    pub fn from_position(board: Board, side: Side) -> Self {
        Self {
            board,
            side,
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Side {
        self.side
    }

    pub fn history(&self) -> &[(Side, Move)] {
        &self.history
    }

    /// Placements available to the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.board.legal_moves(self.side)
    }

    /// The side to move has no placement but the game goes on.
    pub fn must_pass(&self) -> bool {
        !self.board.has_legal_move(self.side) && !self.is_over()
    }

    pub fn is_over(&self) -> bool {
        self.board.is_terminal()
    }

    pub fn outcome(&self) -> GameOutcome {
        self.board.winner()
    }

    /// Stone counts as (black, white).
    pub fn score(&self) -> (usize, usize) {
        (self.board.count(Side::Black), self.board.count(Side::White))
    }

    /// Play `mv` for the side to move and hand the turn over.
    ///
    /// A pass is accepted only when it is forced.
    pub fn play(&mut self, mv: Move) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::Finished);
        }
        self.board = self.board.play(mv, self.side)?;
        self.history.push((self.side, mv));
        self.side = self.side.opponent();
        Ok(())
    }

    /// Reset to the standard start.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
