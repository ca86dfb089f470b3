//! Monte Carlo Tree Search (MCTS) with UCT selection.
//!
//! Each simulation runs four steps:
//! - Selection: descend with UCT while nodes are fully expanded
//! - Expansion: turn one untried action into a child
//! - Simulation: random playout (or a direct static evaluation)
//! - Backpropagation: add the reward to every node up to the search root
//!
//! Rewards are always scored for the side to move at the search root and are
//! added unchanged at every level. The search stops at the simulation cap or
//! when the time budget runs out, checked once per simulation and inside each
//! playout.

use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::board::Move;
use crate::config::{FinalSelection, Rollout, SearchConfig};
use crate::eval::evaluate;
use crate::playout::rollout;
use crate::tree::{NodeId, Tree};

/// Summary of one search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStats {
    /// Completed simulations
    pub simulations: usize,
    /// Nodes in the tree afterwards
    pub nodes: usize,
    /// Wall-clock time spent
    pub elapsed: Duration,
}

/// Outcome of one search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Chosen child of the root, `None` at a terminal root
    pub node: Option<NodeId>,
    /// Move leading to `node`, or `Move::Pass`
    pub mv: Move,
    pub stats: SearchStats,
}

/// MCTS driver. Owns the configuration and the playout RNG, so a seeded
/// engine stays reproducible across consecutive searches.
pub struct Mcts {
    config: SearchConfig,
    rng: fastrand::Rng,
}

impl Default for Mcts {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Mcts {
    pub fn new(config: SearchConfig) -> Self {
        let rng = config.rng();
        Self { config, rng }
    }

    /// Run simulations from the tree's root until the simulation cap or the
    /// time budget is reached, then pick the final move.
    ///
    /// The effective budget is the smaller of `budget` and the configured
    /// `move_time`. With no budget at all only the simulation cap applies.
    /// Even with a zero budget a legal move is returned whenever one exists.
    pub fn search(&mut self, tree: &mut Tree, budget: Option<Duration>) -> SearchResult {
        let start = Instant::now();
        let limit = match (budget, self.config.move_time) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        let deadline = limit.map(|l| start + l);

        let root = tree.root();
        tree.populate_untried(root);
        let root_side = tree.get(root).side;

        let mut simulations = 0;
        while simulations < self.config.max_simulations {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                break;
            }

            let leaf = tree_policy(tree, root, self.config.exploration);

            let node = tree.get(leaf);
            let reward = match self.config.rollout {
                Rollout::Random => rollout(
                    &node.board,
                    node.side,
                    root_side,
                    self.config.rollout_depth,
                    deadline,
                    &mut self.rng,
                ),
                Rollout::Static => evaluate(&node.board, root_side),
            };

            tree.backpropagate(leaf, root, reward);
            simulations += 1;
        }

        // Out of time before the first expansion: still offer a real move.
        if tree.get(root).children.is_empty() {
            tree.expand(root);
        }

        let best = best_child(tree, root, self.config.final_selection, self.config.exploration);
        let mv = best.and_then(|id| tree.get(id).mv).unwrap_or(Move::Pass);

        let stats = SearchStats {
            simulations,
            nodes: tree.len(),
            elapsed: start.elapsed(),
        };
        debug!(
            "mcts: {} simulations, {} nodes, {:?}, root N={} -> {}",
            stats.simulations,
            stats.nodes,
            stats.elapsed,
            tree.get(root).n,
            mv
        );
        dump_children(tree, root, self.config.exploration);

        SearchResult {
            node: best,
            mv,
            stats,
        }
    }
}

/// Selection and expansion: walk down from `root` and return the node to
/// simulate from.
///
/// A node with untried actions is expanded and its new child returned. A
/// fully expanded node hands over to its best UCT child. Descent stops at
/// terminal nodes and at fully expanded nodes without children.
pub fn tree_policy(tree: &mut Tree, root: NodeId, c: f64) -> NodeId {
    let mut current = root;

    while !tree.get(current).terminal {
        if !tree.get(current).is_fully_expanded() {
            if let Some(child) = tree.expand(current) {
                return child;
            }
        }
        match tree.select_child(current, c) {
            Some(child) => current = child,
            None => break,
        }
    }

    current
}

/// Pick the final child of `id` under `rule`. Ties go to the first child.
pub fn best_child(tree: &Tree, id: NodeId, rule: FinalSelection, c: f64) -> Option<NodeId> {
    let key = |child: NodeId| -> f64 {
        let node = tree.get(child);
        match rule {
            FinalSelection::Uct => tree.value_for_selection(child, c),
            FinalSelection::MostVisited => node.n as f64,
            FinalSelection::BestMean => node.mean().unwrap_or(f64::NEG_INFINITY),
        }
    };

    let mut best = None;
    let mut best_value = f64::NEG_INFINITY;
    for &child in &tree.get(id).children {
        let value = key(child);
        if best.is_none() || value > best_value {
            best = Some(child);
            best_value = value;
        }
    }
    best
}

/// Log the statistics of every child of `id`.
pub fn dump_children(tree: &Tree, id: NodeId, c: f64) {
    if !log::log_enabled!(log::Level::Trace) {
        return;
    }
    for &child in &tree.get(id).children {
        let node = tree.get(child);
        trace!(
            "move {} N={} Q={:.1} mean={:.2} uct={:.2}",
            node.mv.unwrap_or(Move::Pass),
            node.n,
            node.q,
            node.mean().unwrap_or(0.0),
            tree.value_for_selection(child, c)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Side};

    fn stats_of(tree: &Tree) -> Vec<(Option<Move>, u32, f64)> {
        (0..tree.len())
            .map(|i| {
                let node = tree.get(NodeId(i as u32));
                (node.mv, node.n, node.q)
            })
            .collect()
    }

    #[test]
    fn test_single_cycle_backpropagates_same_reward() {
        // White must pass here, so the root has exactly one child.
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
        let mut tree = Tree::new(board, Side::White);
        let mut mcts = Mcts::new(SearchConfig::default().with_simulations(1).with_seed(5));

        let result = mcts.search(&mut tree, None);
        assert_eq!(result.mv, Move::Pass);
        assert_eq!(result.stats.simulations, 1);

        let root = tree.get(tree.root());
        let child = tree.get(root.children[0]);
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.n, 1);
        assert_eq!(child.n, 1);
        assert_eq!(root.q, child.q);
    }

    #[test]
    fn test_search_returns_opening_move() {
        let mut tree = Tree::new(Board::new(), Side::Black);
        let mut mcts = Mcts::new(SearchConfig::for_testing(200));
        let result = mcts.search(&mut tree, None);

        let legal = Board::new().legal_moves(Side::Black);
        assert!(legal.contains(&result.mv), "got {}", result.mv);
        assert_eq!(result.stats.simulations, 200);
        assert_eq!(tree.get(tree.root()).n, 200);

        let children_n: u32 = tree
            .get(tree.root())
            .children
            .iter()
            .map(|&c| tree.get(c).n)
            .sum();
        assert_eq!(children_n, 200);
    }

    #[test]
    fn test_zero_budget_still_returns_legal_move() {
        let mut tree = Tree::new(Board::new(), Side::Black);
        let mut mcts = Mcts::new(SearchConfig::default().with_seed(1));
        let result = mcts.search(&mut tree, Some(Duration::ZERO));

        assert_eq!(result.stats.simulations, 0);
        assert!(Board::new().is_legal(result.mv, Side::Black));
        assert!(!result.mv.is_pass());
    }

    #[test]
    fn test_terminal_root_passes() {
        let mut board = Board::empty();
        board.set(2, 2, Some(Side::Black));
        let mut tree = Tree::new(board, Side::Black);
        let result = Mcts::new(SearchConfig::for_testing(10)).search(&mut tree, None);
        assert_eq!(result.mv, Move::Pass);
        assert!(result.node.is_none());
        // Every simulation lands on the terminal root itself.
        assert_eq!(tree.get(tree.root()).n, 10);
    }

    #[test]
    fn test_static_search_is_deterministic() {
        let run = || {
            let mut tree = Tree::new(Board::new(), Side::Black);
            let result = Mcts::new(SearchConfig::for_testing(300)).search(&mut tree, None);
            (result.mv, stats_of(&tree))
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_seeded_random_search_is_deterministic() {
        let run = || {
            let mut tree = Tree::new(Board::new(), Side::Black);
            let config = SearchConfig::default().with_simulations(100).with_seed(11);
            let result = Mcts::new(config).search(&mut tree, None);
            (result.mv, stats_of(&tree))
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_zero_rollout_depth_scores_leaf_directly() {
        let run = |config: SearchConfig| {
            let mut tree = Tree::new(Board::new(), Side::Black);
            let result = Mcts::new(config).search(&mut tree, None);
            (result.mv, stats_of(&tree))
        };
        let truncated = SearchConfig::for_testing(150)
            .with_rollout(Rollout::Random)
            .with_rollout_depth(0)
            .with_seed(3);
        assert_eq!(run(truncated), run(SearchConfig::for_testing(150)));
    }

    #[test]
    fn test_final_selection_rules() {
        let mut tree = Tree::new(Board::new(), Side::Black);
        let root = tree.root();
        tree.expand_all(root);
        let children = tree.get(root).children.clone();

        tree.get_mut(root).n = 10;
        let stats = [(5, 5.0), (3, 9.0), (1, -1.0), (1, 3.0)];
        for (&id, &(n, q)) in children.iter().zip(&stats) {
            tree.get_mut(id).n = n;
            tree.get_mut(id).q = q;
        }

        assert_eq!(
            best_child(&tree, root, FinalSelection::MostVisited, 1.0),
            Some(children[0])
        );
        assert_eq!(
            best_child(&tree, root, FinalSelection::BestMean, 1.0),
            Some(children[1])
        );
        // With exploration the rarely visited but decent child wins.
        assert_eq!(
            best_child(&tree, root, FinalSelection::Uct, 1.4),
            Some(children[3])
        );
    }

    #[test]
    fn test_tree_policy_expands_before_descending() {
        let mut tree = Tree::new(Board::new(), Side::Black);
        let root = tree.root();
        tree.populate_untried(root);

        let mut seen = Vec::new();
        for _ in 0..4 {
            let leaf = tree_policy(&mut tree, root, 1.0);
            assert_eq!(tree.get(leaf).parent, root);
            seen.push(leaf);
            tree.backpropagate(leaf, root, 0.0);
        }
        seen.dedup();
        assert_eq!(seen.len(), 4);

        let deeper = tree_policy(&mut tree, root, 1.0);
        assert_ne!(tree.get(deeper).parent, root);
    }
}
