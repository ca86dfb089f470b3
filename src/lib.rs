//! Reversi-MCTS: an Othello/Reversi move-selection engine.
//!
//! This crate picks moves for 8x8 Othello positions with Monte Carlo Tree
//! Search (UCT selection, random playouts, static positional evaluation) and
//! offers a fixed-depth alpha-beta searcher over the same rules as an
//! alternative.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, evaluation weights and search defaults
//! - [`board`] - Game rules (legal moves, flips, terminal detection)
//! - [`eval`] - Static positional evaluator
//! - [`tree`] - Arena-allocated search tree
//! - [`config`] - Search configuration
//! - [`playout`] - Random game simulation for leaf evaluation
//! - [`mcts`] - Monte Carlo Tree Search
//! - [`minimax`] - Alpha-beta search
//! - [`player`] - Per-move entry points with tree reuse, clock policy
//! - [`game`] - Game record with turn handling
//! - [`console`] - Text protocol front end
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use reversi_mcts::board::{Board, Side};
//! use reversi_mcts::config::SearchConfig;
//! use reversi_mcts::player::{MctsPlayer, MoveSelector};
//!
//! let board = Board::new();
//! let mut engine = MctsPlayer::new(SearchConfig::default().with_simulations(200));
//! let mv = engine.select_move(&board, Side::Black, Duration::from_secs(10));
//! assert!(board.legal_moves(Side::Black).contains(&mv));
//! println!("Best move: {mv}");
//! ```

pub mod board;
pub mod config;
pub mod console;
pub mod constants;
pub mod eval;
pub mod game;
pub mod mcts;
pub mod minimax;
pub mod player;
pub mod playout;
pub mod tree;
