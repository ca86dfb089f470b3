//! Search tree with arena allocation.
//!
//! Nodes live in a contiguous `Vec` owned by [`Tree`] and refer to each other
//! by [`NodeId`] index. A node stores its parent's index and its children's
//! indices, so there is no ownership cycle. Dropping part of the tree is done
//! in bulk by [`Tree::reroot`], which copies the kept subtree into a fresh
//! arena.

use crate::board::{Board, Move, Side};

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Position at this node
    pub board: Board,
    /// Side to move at this node
    pub side: Side,
    /// Move that led here from the parent (`None` for a fresh root)
    pub mv: Option<Move>,
    /// Parent node index (NONE for root)
    pub parent: NodeId,
    /// Successors not yet turned into children. `None` until populated.
    pub untried: Option<Vec<(Move, Board)>>,
    /// Expanded children, in expansion order
    pub children: Vec<NodeId>,
    /// Visit count
    pub n: u32,
    /// Sum of rewards backpropagated through this node
    pub q: f64,
    /// Neither side can move from here
    pub terminal: bool,
}

impl Node {
    /// A root node. Its untried actions are left unset.
    pub fn new_root(board: Board, side: Side) -> Self {
        Self {
            board,
            side,
            mv: None,
            parent: NodeId::NONE,
            untried: None,
            children: Vec::new(),
            n: 0,
            q: 0.0,
            terminal: board.is_terminal(),
        }
    }

    /// A child node with its untried actions already populated.
    pub fn new_child(parent: NodeId, mv: Move, board: Board, side: Side) -> Self {
        let mut node = Self::new_root(board, side);
        node.parent = parent;
        node.mv = Some(mv);
        node.untried = Some(untried_actions(&node.board, side, node.terminal));
        node
    }

    /// True when there is nothing left to expand.
    ///
    /// An unpopulated list counts as empty, as does a pass position whose
    /// single pass pseudo-move has been consumed.
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.as_ref().is_none_or(|u| u.is_empty())
    }

    /// Mean reward, `None` while unvisited.
    pub fn mean(&self) -> Option<f64> {
        (self.n > 0).then(|| self.q / self.n as f64)
    }
}

fn untried_actions(board: &Board, side: Side, terminal: bool) -> Vec<(Move, Board)> {
    if terminal {
        Vec::new()
    } else {
        board.successors(side)
    }
}

/// UCT value of a node whose parent has `parent_visits` visits.
///
/// Unvisited nodes score +infinity so they are always tried first.
pub fn uct_value(node: &Node, parent_visits: u32, c: f64) -> f64 {
    if node.n == 0 {
        return f64::INFINITY;
    }
    let n = node.n as f64;
    let ln_parent = (parent_visits.max(1) as f64).ln();
    node.q / n + c * (ln_parent / n).sqrt()
}

/// Search tree with arena-based node storage.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    /// Create a tree holding a single root for `board` with `side` to move.
    pub fn new(board: Board, side: Side) -> Self {
        Self {
            nodes: vec![Node::new_root(board, side)],
            root: NodeId(0),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn allocate(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// UCT value of `id` against its parent's visit count.
    ///
    /// A node without a parent has no exploration term.
    pub fn value_for_selection(&self, id: NodeId, c: f64) -> f64 {
        let node = self.get(id);
        if node.parent.is_none() {
            return node.mean().unwrap_or(f64::INFINITY);
        }
        uct_value(node, self.get(node.parent).n, c)
    }

    /// Fill in the untried actions of `id` if they were never populated.
    pub fn populate_untried(&mut self, id: NodeId) {
        let node = self.get_mut(id);
        if node.untried.is_none() && node.children.is_empty() {
            node.untried = Some(untried_actions(&node.board, node.side, node.terminal));
        }
    }

    /// Pop one untried action of `id` and add it as a child.
    ///
    /// Returns the new child, or `None` if `id` is fully expanded.
    pub fn expand(&mut self, id: NodeId) -> Option<NodeId> {
        let node = self.get_mut(id);
        let (mv, board) = node.untried.as_mut()?.pop()?;
        let side = node.side.opponent();

        let child = self.allocate(Node::new_child(id, mv, board, side));
        self.get_mut(id).children.push(child);
        Some(child)
    }

    /// Populate and expand every successor of `id`.
    pub fn expand_all(&mut self, id: NodeId) {
        self.populate_untried(id);
        while self.expand(id).is_some() {}
    }

    /// Child of `id` with the highest UCT value.
    ///
    /// Ties go to the first child in the list.
    pub fn select_child(&self, id: NodeId, c: f64) -> Option<NodeId> {
        let node = self.get(id);
        let mut best = None;
        let mut best_value = f64::NEG_INFINITY;

        for &child in &node.children {
            let value = uct_value(self.get(child), node.n, c);
            if best.is_none() || value > best_value {
                best = Some(child);
                best_value = value;
            }
        }
        best
    }

    /// Add `reward` to every node from `leaf` up to and including `root`.
    pub fn backpropagate(&mut self, leaf: NodeId, root: NodeId, reward: f64) {
        let mut current = leaf;
        loop {
            let node = self.get_mut(current);
            node.n += 1;
            node.q += reward;

            if current == root || node.parent.is_none() {
                break;
            }
            current = node.parent;
        }
    }

    /// Child of `id` holding exactly this position and side to move.
    pub fn find_child(&self, id: NodeId, board: &Board, side: Side) -> Option<NodeId> {
        self.get(id)
            .children
            .iter()
            .copied()
            .find(|&c| self.get(c).board == *board && self.get(c).side == side)
    }

    /// Make `id` the root, discarding everything outside its subtree.
    ///
    /// The kept subtree is copied into a new arena with its statistics
    /// unchanged; the new root has no parent.
    pub fn reroot(&mut self, id: NodeId) {
        let mut remap = vec![NodeId::NONE; self.nodes.len()];
        let mut order = vec![id];
        remap[id.0 as usize] = NodeId(0);

        let mut head = 0;
        while head < order.len() {
            let old = order[head];
            head += 1;
            for &child in &self.get(old).children {
                remap[child.0 as usize] = NodeId(order.len() as u32);
                order.push(child);
            }
        }

        let nodes = order
            .iter()
            .map(|&old| {
                let mut node = self.get(old).clone();
                node.parent = if old == id {
                    NodeId::NONE
                } else {
                    remap[node.parent.0 as usize]
                };
                for child in &mut node.children {
                    *child = remap[child.0 as usize];
                }
                node
            })
            .collect();

        self.nodes = nodes;
        self.root = NodeId(0);
    }
}
