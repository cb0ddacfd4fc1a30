//! Arena-allocated search tree with a transposition table.
//!
//! Nodes live in a `Vec<Node>` and refer to each other by [`NodeId`]. A
//! parent owns its children through the child list, and each child keeps a
//! plain index back to its parent. The table maps every registered
//! [`GameState`] to its node so a later search can resume from it.

use std::collections::{HashMap, HashSet};

use crate::checkers::{GameState, Move};
use crate::constants::{PRIOR_PLAYS, PRIOR_WINS};

/// Handle of a node inside a [`Tree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// A node in the MCTS search tree.
///
/// Win values are stored from the searching agent's point of view, for both
/// the direct (`plays`, `wins`) and the AMAF (`amaf_plays`, `amaf_wins`)
/// statistics.
#[derive(Clone, Debug)]
pub struct Node {
    /// Position at this node
    pub state: GameState,
    /// Move that led here from the parent
    pub mv: Option<Move>,
    /// Number of visits
    pub plays: u32,
    /// Accumulated result (1 win, 0.5 draw, 0 loss)
    pub wins: f64,
    /// AMAF visits
    pub amaf_plays: u32,
    /// AMAF accumulated result
    pub amaf_wins: f64,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    /// Moves that already have a child
    pub moves_expanded: HashSet<Move>,
    /// Branches below this node not yet fully resolved
    pub moves_unfinished: usize,
}

impl Node {
    /// Create a detached node for `state`, reached by `mv`, with `branching`
    /// unresolved branches.
    pub fn new(state: GameState, mv: Option<Move>, branching: usize) -> Self {
        Self {
            state,
            mv,
            plays: PRIOR_PLAYS,
            wins: PRIOR_WINS,
            amaf_plays: PRIOR_PLAYS,
            amaf_wins: PRIOR_WINS,
            children: Vec::new(),
            parent: None,
            moves_expanded: HashSet::new(),
            moves_unfinished: branching,
        }
    }

    #[inline]
    pub fn wins_plays(&self) -> (f64, u32) {
        (self.wins, self.plays)
    }

    #[inline]
    pub fn amaf_wins_plays(&self) -> (f64, u32) {
        (self.amaf_wins, self.amaf_plays)
    }

    /// Weight given to the AMAF estimate over the direct one.
    ///
    /// Close to 1 while `plays` is small relative to `amaf_plays`, and
    /// shrinking toward 0 as the node gathers direct visits.
    pub fn beta(&self, b: f64) -> f64 {
        let plays = self.plays as f64;
        let amaf = self.amaf_plays as f64;
        let denom = plays + amaf + 4.0 * plays * amaf * b * b;
        if denom == 0.0 { 0.0 } else { amaf / denom }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Search tree plus transposition table.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    table: HashMap<GameState, NodeId>,
}

impl Tree {
    /// Create a tree holding a single root for `state`.
    pub fn new(state: GameState, branching: usize) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            table: HashMap::new(),
        };
        tree.reset(state, branching);
        tree
    }

    /// Discard every node and start over from a fresh root.
    pub fn reset(&mut self, state: GameState, branching: usize) {
        self.nodes.clear();
        self.table.clear();
        self.table.insert(state.clone(), NodeId::ROOT);
        self.nodes.push(Node::new(state, None, branching));
    }

    /// Get a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Get a mutable node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    #[inline]
    pub fn root(&self) -> &Node {
        self.get(NodeId::ROOT)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node registered for `state`, if any.
    pub fn lookup(&self, state: &GameState) -> Option<NodeId> {
        self.table.get(state).copied()
    }

    /// Attach `child` under `parent` and register its state.
    ///
    /// The child's move is recorded as expanded on the parent. A state that
    /// was already registered now maps to the new node.
    pub fn add_child(&mut self, parent: NodeId, mut child: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        child.parent = Some(parent);
        if let Some(mv) = &child.mv {
            self.nodes[parent.0].moves_expanded.insert(mv.clone());
        }
        self.nodes[parent.0].children.push(id);
        self.table.insert(child.state.clone(), id);
        self.nodes.push(child);
        id
    }

    /// Report that the state at `id` is terminal.
    ///
    /// Every ancestor, up to and including the root, loses one unresolved
    /// branch (never going below zero). A terminal root has nothing left to
    /// search and is marked resolved outright.
    pub fn propagate_completion(&mut self, id: NodeId) {
        if self.nodes[id.0].parent.is_none() {
            self.nodes[id.0].moves_unfinished = 0;
            return;
        }
        let path: Vec<NodeId> = self.ancestors(id).skip(1).collect();
        for parent in path {
            let node = &mut self.nodes[parent.0];
            node.moves_unfinished = node.moves_unfinished.saturating_sub(1);
        }
    }

    /// Make `id` the root, dropping everything outside its subtree.
    ///
    /// The surviving nodes are renumbered breadth-first (the new root gets
    /// [`NodeId::ROOT`]) and the table is rebuilt from them.
    pub fn reroot(&mut self, id: NodeId) {
        if id == NodeId::ROOT {
            self.nodes[0].parent = None;
            return;
        }

        let mut order = vec![id.0];
        let mut head = 0;
        while head < order.len() {
            let children = &self.nodes[order[head]].children;
            order.extend(children.iter().map(|c| c.0));
            head += 1;
        }

        let remap: HashMap<usize, usize> = order
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, new))
            .collect();

        let mut old: Vec<Option<Node>> = std::mem::take(&mut self.nodes)
            .into_iter()
            .map(Some)
            .collect();

        self.nodes = order
            .iter()
            .filter_map(|&o| old[o].take())
            .map(|mut node| {
                node.parent = node
                    .parent
                    .and_then(|p| remap.get(&p.0))
                    .map(|&n| NodeId(n));
                for child in &mut node.children {
                    *child = NodeId(remap[&child.0]);
                }
                node
            })
            .collect();

        self.table = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.state.clone(), NodeId(i)))
            .collect();
    }

    /// Iterate over `id` and its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |cur| self.nodes[cur.0].parent)
    }
}
