//! Depth-limited minimax search with alpha-beta pruning.
//!
//! Searches directly over boards, generating successors on demand from the
//! rules engine (a forced pass is a single successor). Leaves are scored with
//! the static evaluator from the root side's point of view; the root side
//! maximises and the opponent minimises.

use std::time::{Duration, Instant};

use log::debug;

use crate::board::{Board, Move, Side};
use crate::eval::evaluate;

/// Outcome of a minimax search.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimaxResult {
    pub best_move: Move,
    pub score: f64,
    pub depth: usize,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Alpha-beta searcher with a node counter.
pub struct Minimax {
    depth: usize,
    nodes: u64,
}

impl Minimax {
    pub fn new(depth: usize) -> Self {
        Self {
            depth: depth.max(1),
            nodes: 0,
        }
    }

    /// Value of `board` with `side` to move, searched `depth` plies deep.
    ///
    /// Scores are goodness for `root_side`. Returns the evaluator's score at
    /// depth 0 and at finished games.
    pub fn alpha_beta(
        &mut self,
        board: &Board,
        side: Side,
        depth: usize,
        mut alpha: f64,
        mut beta: f64,
        root_side: Side,
    ) -> f64 {
        self.nodes += 1;
        if depth == 0 || board.is_terminal() {
            return evaluate(board, root_side);
        }

        let successors = board.successors(side);
        if side == root_side {
            let mut value = f64::NEG_INFINITY;
            for (_, next) in &successors {
                let score =
                    self.alpha_beta(next, side.opponent(), depth - 1, alpha, beta, root_side);
                value = value.max(score);
                alpha = alpha.max(value);
                if value >= beta {
                    break;
                }
            }
            value
        } else {
            let mut value = f64::INFINITY;
            for (_, next) in &successors {
                let score =
                    self.alpha_beta(next, side.opponent(), depth - 1, alpha, beta, root_side);
                value = value.min(score);
                beta = beta.min(value);
                if value <= alpha {
                    break;
                }
            }
            value
        }
    }

    /// Best move for `side` at the configured depth.
    ///
    /// Ties keep the first move in row-major order. Returns `Move::Pass` when
    /// `side` has no placement.
    pub fn best_move(&mut self, board: &Board, side: Side) -> MinimaxResult {
        let start = Instant::now();
        self.nodes = 0;

        let mut best_move = Move::Pass;
        let mut best_score = f64::NEG_INFINITY;

        if board.is_terminal() {
            best_score = evaluate(board, side);
        } else {
            let mut alpha = f64::NEG_INFINITY;
            for (mv, next) in board.successors(side) {
                let score = self.alpha_beta(
                    &next,
                    side.opponent(),
                    self.depth - 1,
                    alpha,
                    f64::INFINITY,
                    side,
                );
                if score > best_score {
                    best_score = score;
                    best_move = mv;
                }
                alpha = alpha.max(score);
            }
        }

        let result = MinimaxResult {
            best_move,
            score: best_score,
            depth: self.depth,
            nodes: self.nodes,
            elapsed: start.elapsed(),
        };
        debug!(
            "minimax: depth {} nodes {} {:?} -> {} ({:.1})",
            result.depth, result.nodes, result.elapsed, result.best_move, result.score
        );
        result
    }
}
