//! Integration tests for reversi-mcts
//!
//! These exercise the public API end to end: the rules engine over whole
//! random games, the search tree mechanics, both searchers and the per-move
//! entry point with its retained tree.

use std::time::Duration;

use reversi_mcts::board::{Board, GameOutcome, Move, Side, parse_coord};
use reversi_mcts::config::{FinalSelection, Rollout, SearchConfig};
use reversi_mcts::constants::N;
use reversi_mcts::eval::evaluate;
use reversi_mcts::game::Game;
use reversi_mcts::mcts::Mcts;
use reversi_mcts::minimax::Minimax;
use reversi_mcts::player::{MctsPlayer, MoveSelector, RandomPlayer, play_game};
use reversi_mcts::tree::Tree;

const PLENTY: Duration = Duration::from_secs(600);

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

/// Play a sequence of coordinates from the start, alternating sides and
/// passing automatically when the side to move has to.
fn setup_game(moves: &[&str]) -> Game {
    let mut game = Game::new();
    for mv in moves {
        if game.must_pass() {
            game.play(Move::Pass).unwrap();
        }
        game.play(parse_coord(mv).unwrap()).unwrap();
    }
    game
}

/// Play a seeded random game to the end and hand every position (with the
/// side to move) to `visit`.
fn random_game(seed: u64, mut visit: impl FnMut(&Board, Side)) -> Game {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut game = Game::new();
    loop {
        visit(game.board(), game.side_to_move());
        if game.is_over() {
            return game;
        }
        let moves = game.legal_moves();
        let mv = if moves.is_empty() {
            Move::Pass
        } else {
            moves[rng.usize(..moves.len())]
        };
        game.play(mv).unwrap();
    }
}

fn opening_moves() -> Vec<Move> {
    ["d3", "c4", "f5", "e6"]
        .iter()
        .map(|s| parse_coord(s).unwrap())
        .collect()
}

// =============================================================================
// Coordinates
// =============================================================================

#[test]
fn test_parse_coord_corners() {
    assert_eq!(parse_coord("a1").unwrap(), Move::at(0, 0));
    assert_eq!(parse_coord("h1").unwrap(), Move::at(0, N - 1));
    assert_eq!(parse_coord("a8").unwrap(), Move::at(N - 1, 0));
    assert_eq!(parse_coord("h8").unwrap(), Move::at(N - 1, N - 1));
    assert_eq!(parse_coord("pass").unwrap(), Move::Pass);
    assert!(parse_coord("i1").is_err());
    assert!(parse_coord("a9").is_err());
    assert!(parse_coord("").is_err());
}

#[test]
fn test_coord_display_roundtrip() {
    for row in 0..N {
        for col in 0..N {
            let mv = Move::at(row, col);
            assert_eq!(parse_coord(&mv.to_string()).unwrap(), mv);
        }
    }
    assert_eq!(Move::Pass.to_string(), "pass");
}

// =============================================================================
// Rules
// =============================================================================

#[test]
fn test_opening_position() {
    let board = Board::new();
    assert_eq!(board.count(Side::Black), 2);
    assert_eq!(board.count(Side::White), 2);
    assert_eq!(board.legal_moves(Side::Black), opening_moves());
    assert!(!board.is_terminal());
}

#[test]
fn test_first_move_flips_one_stone() {
    let game = setup_game(&["d3"]);
    assert_eq!(game.score(), (4, 1));
    assert_eq!(game.side_to_move(), Side::White);
}

#[test]
fn test_every_legal_move_flips_and_adds_one_stone() {
    for seed in 0..8 {
        random_game(seed, |board, side| {
            for mv in board.legal_moves(side) {
                let Some(pt) = mv.point() else {
                    panic!("legal_moves returned a pass");
                };
                let flips = board.flips(pt, side);
                assert!(!flips.is_empty(), "{mv} flips nothing");

                let after = board.play(mv, side).unwrap();
                assert_eq!(after.stones(), board.stones() + 1);
                assert_eq!(after.count(side), board.count(side) + 1 + flips.len());
                assert_eq!(
                    after.count(side.opponent()),
                    board.count(side.opponent()) - flips.len()
                );
            }
        });
    }
}

#[test]
fn test_terminal_iff_both_sides_stuck() {
    for seed in 0..8 {
        let game = random_game(seed, |board, _| {
            let stuck = !board.has_legal_move(Side::Black) && !board.has_legal_move(Side::White);
            assert_eq!(board.is_terminal(), stuck);
        });
        assert!(game.is_over());

        let (black, white) = game.score();
        let expected = match black.cmp(&white) {
            std::cmp::Ordering::Greater => GameOutcome::Win(Side::Black),
            std::cmp::Ordering::Less => GameOutcome::Win(Side::White),
            std::cmp::Ordering::Equal => GameOutcome::Draw,
        };
        assert_eq!(game.outcome(), expected);
    }
}

#[test]
fn test_pass_only_when_forced() {
    let board = Board::new();
    assert!(!board.is_legal(Move::Pass, Side::Black));
    assert!(board.play(Move::Pass, Side::Black).is_err());
    assert_eq!(board.successors(Side::Black).len(), 4);
}

#[test]
fn test_terminal_evaluation_dominates_position() {
    let full = Board::from_rows(&[
        "XXXXXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
        "OOOOOOOO",
        "OOOOOOOO",
        "OOOOOOOO",
        "OOOOOOOX",
    ])
    .unwrap();
    assert!(full.is_terminal());
    assert!(evaluate(&full, Side::Black) > 500.0);
    assert!(evaluate(&full, Side::White) < -500.0);
}

// =============================================================================
// Search tree
// =============================================================================

#[test]
fn test_unvisited_child_selected_first() {
    let mut tree = Tree::new(Board::new(), Side::Black);
    let root = tree.root();
    tree.expand_all(root);
    let children = tree.get(root).children.clone();
    assert_eq!(children.len(), 4);

    for &child in &children[..3] {
        tree.backpropagate(child, root, 1000.0);
    }
    assert_eq!(tree.select_child(root, 1.4), Some(children[3]));
}

#[test]
fn test_one_simulation_updates_path() {
    let mut tree = Tree::new(Board::new(), Side::Black);
    let mut mcts = Mcts::new(SearchConfig::for_testing(1));
    let result = mcts.search(&mut tree, None);

    let root = tree.get(tree.root());
    assert_eq!(result.stats.simulations, 1);
    assert_eq!(root.n, 1);
    assert_eq!(root.children.len(), 1);

    let child = tree.get(root.children[0]);
    assert_eq!(child.n, 1);
    assert_eq!(child.q, root.q);
    assert_eq!(child.q, evaluate(&child.board, Side::Black));
    assert_eq!(result.node, Some(root.children[0]));
}

#[test]
fn test_reroot_keeps_subtree_statistics() {
    let mut tree = Tree::new(Board::new(), Side::Black);
    let mut mcts = Mcts::new(SearchConfig::for_testing(300));
    let result = mcts.search(&mut tree, None);
    let chosen = result.node.unwrap();

    let (n, q, board) = {
        let node = tree.get(chosen);
        (node.n, node.q, node.board)
    };
    tree.reroot(chosen);

    let root = tree.get(tree.root());
    assert_eq!((root.n, root.q, root.board), (n, q, board));
    assert!(root.parent.is_none());
    for &child in &root.children {
        assert_eq!(tree.get(child).parent, tree.root());
    }
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_select_move_from_opening() {
    let config = SearchConfig::default()
        .with_simulations(500)
        .with_seed(11);
    let mut player = MctsPlayer::new(config);
    let mv = player.select_move(&Board::new(), Side::Black, PLENTY);
    assert!(opening_moves().contains(&mv), "{mv}");
}

#[test]
fn test_static_search_is_deterministic() {
    let run = || {
        let mut player = MctsPlayer::new(SearchConfig::for_testing(400));
        let board = *setup_game(&["d3", "c5"]).board();
        let mv = player.select_move(&board, Side::Black, PLENTY);
        (mv, player.last_stats().unwrap().simulations)
    };
    assert_eq!(run(), run());
}

#[test]
fn test_seeded_random_rollouts_are_deterministic() {
    let config = SearchConfig::for_testing(300)
        .with_rollout(Rollout::Random)
        .with_seed(42);
    let first = Mcts::new(config.clone()).search(&mut Tree::new(Board::new(), Side::Black), None);
    let second = Mcts::new(config).search(&mut Tree::new(Board::new(), Side::Black), None);
    assert_eq!(first.mv, second.mv);
    assert_eq!(first.stats.nodes, second.stats.nodes);
}

#[test]
fn test_final_selection_rules_pick_children() {
    for rule in [
        FinalSelection::Uct,
        FinalSelection::MostVisited,
        FinalSelection::BestMean,
    ] {
        let config = SearchConfig::for_testing(200).with_final_selection(rule);
        let mut tree = Tree::new(Board::new(), Side::Black);
        let result = Mcts::new(config).search(&mut tree, None);
        assert!(opening_moves().contains(&result.mv), "{rule:?}");
    }
}

#[test]
fn test_minimax_takes_corner() {
    let board = Board::from_rows(&[
        "........",
        ".O......",
        "..OX....",
        "...XO...",
        "...OX...",
        "........",
        "........",
        "........",
    ])
    .unwrap();
    assert!(board.is_legal(Move::at(0, 0), Side::Black));

    let result = Minimax::new(1).best_move(&board, Side::Black);
    assert_eq!(result.best_move, Move::at(0, 0));
    assert!(result.nodes > 0);
}

#[test]
fn test_minimax_with_no_moves_passes() {
    let board = Board::from_rows(&[
        "XXXXXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
        "XXXXXXXO",
        "XXXXXXO.",
        "XXXXXX..",
    ])
    .unwrap();
    let result = Minimax::new(3).best_move(&board, Side::White);
    assert_eq!(result.best_move, Move::Pass);
}

// =============================================================================
// Full games
// =============================================================================

#[test]
fn test_mcts_against_random_completes() {
    let mut black = MctsPlayer::new(SearchConfig::for_testing(30));
    let mut white = RandomPlayer::new(Some(3));
    let game = play_game(&mut black, &mut white, PLENTY, |_| {}).unwrap();

    assert!(game.is_over());
    let (b, w) = game.score();
    assert_eq!(b + w, game.board().stones());
    assert!(game.history().len() >= (b + w - 4));
}
