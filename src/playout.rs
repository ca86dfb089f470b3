//! Monte Carlo playouts (random game simulation).
//!
//! A playout plays uniformly random legal moves, passing when forced, until
//! the game ends, the ply cap is hit, or the deadline passes. The final board
//! is then scored by the static evaluator.

use std::time::Instant;

use crate::board::{Board, Move, Side};
use crate::eval::evaluate;

/// Pick a uniformly random legal move, or `Move::Pass` if there is none.
pub fn choose_random_move(board: &Board, side: Side, rng: &mut fastrand::Rng) -> Move {
    let moves = board.legal_moves(side);
    if moves.is_empty() {
        Move::Pass
    } else {
        moves[rng.usize(..moves.len())]
    }
}

/// Play random moves from `board` with `side` to move and return the board
/// reached.
///
/// Stops at a terminal position, after `max_depth` plies (a forced pass
/// counts as a ply), or once `deadline` has passed. A truncated playout
/// simply returns the board it got to.
pub fn mcplayout(
    board: &Board,
    side: Side,
    max_depth: usize,
    deadline: Option<Instant>,
    rng: &mut fastrand::Rng,
) -> Board {
    let mut board = *board;
    let mut side = side;

    for _ in 0..max_depth {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }

        let moves = board.legal_moves(side);
        if moves.is_empty() {
            if !board.has_legal_move(side.opponent()) {
                break;
            }
            side = side.opponent();
            continue;
        }

        let mv = moves[rng.usize(..moves.len())];
        board = board.apply_legal(mv, side);
        side = side.opponent();
    }

    board
}

/// Run a playout and score its final board for `root_side`.
pub fn rollout(
    board: &Board,
    side: Side,
    root_side: Side,
    max_depth: usize,
    deadline: Option<Instant>,
    rng: &mut fastrand::Rng,
) -> f64 {
    let end = mcplayout(board, side, max_depth, deadline, rng);
    evaluate(&end, root_side)
}
