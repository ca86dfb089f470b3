//! Static positional evaluation.

use crate::board::{Board, GameOutcome, Side};
use crate::constants::{BOARD_WEIGHTS, WIN_SCORE};

/// Weighted positional sum from Black's point of view.
///
/// Each black stone adds its cell weight, each white stone subtracts it.
pub fn positional_score(board: &Board) -> i32 {
    let mut score = 0;
    for (row, weights) in BOARD_WEIGHTS.iter().enumerate() {
        for (col, &w) in weights.iter().enumerate() {
            if let Some(side) = board.get(row, col) {
                score += w * side.sign();
            }
        }
    }
    score
}

/// Score `board` as goodness for `side`.
///
/// Finished games are scored by result: `WIN_SCORE` plus the disc margin for
/// a win, its negation for a loss, 0 for a draw. Otherwise the positional
/// weight table is used.
pub fn evaluate(board: &Board, side: Side) -> f64 {
    match board.winner() {
        GameOutcome::Running => (positional_score(board) * side.sign()) as f64,
        GameOutcome::Draw => 0.0,
        GameOutcome::Win(winner) => {
            let margin = board.count(winner).abs_diff(board.count(winner.opponent())) as f64;
            let score = WIN_SCORE + margin;
            if winner == side { score } else { -score }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Move;

    #[test]
    fn test_initial_position_is_balanced() {
        let board = Board::new();
        assert_eq!(positional_score(&board), 0);
        assert_eq!(evaluate(&board, Side::Black), 0.0);
        assert_eq!(evaluate(&board, Side::White), 0.0);
    }

    #[test]
    fn test_evaluate_is_antisymmetric() {
        let board = Board::new().play(Move::at(2, 3), Side::Black).unwrap();
        // d3 (weight 4) and d4 (weight 0) black, e5 white.
        assert_eq!(positional_score(&board), 4);
        assert_eq!(evaluate(&board, Side::Black), 4.0);
        assert_eq!(evaluate(&board, Side::White), -4.0);
    }

    #[test]
    fn test_corner_outweighs_x_square() {
        let board = Board::from_rows(&[
            "X.......",
            ".O......",
            "..OX....",
            "........",
            "........",
            "........",
            "........",
            "........",
        ])
        .unwrap();
        assert!(!board.is_terminal());
        // 99 + 4 for black, -24 + 7 for white.
        assert_eq!(positional_score(&board), 99 + 4 + 24 - 7);
    }

    #[test]
    fn test_terminal_override() {
        let mut board = Board::empty();
        board.set(0, 0, Some(Side::White));
        board.set(0, 7, Some(Side::White));
        board.set(4, 4, Some(Side::Black));
        assert!(board.is_terminal());
        assert_eq!(evaluate(&board, Side::White), WIN_SCORE + 1.0);
        assert_eq!(evaluate(&board, Side::Black), -(WIN_SCORE + 1.0));
    }
}
