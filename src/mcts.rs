//! Monte Carlo Tree Search agent with AMAF (RAVE) statistics.
//!
//! This module implements MCTS with:
//! - UCB1 selection blended with All-Moves-As-First estimates
//! - One child expanded per iteration, chosen at random among untried moves
//! - Random (optionally evaluator-biased) playouts for value estimation
//! - Tree reuse across moves through a transposition table
//!
//! Each call to [`MonteCarloAgent::play`] searches until the time budget runs
//! out or every branch from the root has been resolved, then returns the most
//! visited move.

use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::board::Color;
use crate::checkers::{Checkers, GameState, Move, legal_moves, update_board};
use crate::constants::{
    DEFAULT_AMAF_BIAS, DEFAULT_EXPLORATION, DEFAULT_KING_BONUS, DEFAULT_ROLLOUT_EPSILON,
    DEFAULT_SIM_TIME,
};
use crate::playout::{Actions, RolloutPolicy, simulate};
use crate::tree::{Node, NodeId, Tree};
use crate::{CheckersError, Result};

/// Search parameters.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Wall-clock budget per move
    pub sim_time: Duration,
    /// UCB exploration constant `c`
    pub exploration: f64,
    /// AMAF bias `b`
    pub amaf_bias: f64,
    /// King value for the rollout evaluator
    pub king_bonus: i32,
    /// Probability of a greedy rollout move
    pub rollout_epsilon: f64,
    /// Blend AMAF estimates into selection; plain UCB1 when false
    pub use_amaf: bool,
    /// Fixed RNG seed
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            sim_time: Duration::from_secs_f64(DEFAULT_SIM_TIME),
            exploration: DEFAULT_EXPLORATION,
            amaf_bias: DEFAULT_AMAF_BIAS,
            king_bonus: DEFAULT_KING_BONUS,
            rollout_epsilon: DEFAULT_ROLLOUT_EPSILON,
            use_amaf: true,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn with_sim_time(mut self, sim_time: Duration) -> Self {
        self.sim_time = sim_time;
        self
    }

    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    pub fn with_amaf_bias(mut self, b: f64) -> Self {
        self.amaf_bias = b;
        self
    }

    pub fn with_king_bonus(mut self, king_bonus: i32) -> Self {
        self.king_bonus = king_bonus;
        self
    }

    pub fn with_rollout_epsilon(mut self, epsilon: f64) -> Self {
        self.rollout_epsilon = epsilon;
        self
    }

    pub fn with_amaf(mut self, use_amaf: bool) -> Self {
        self.use_amaf = use_amaf;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rollout_policy(&self) -> RolloutPolicy {
        RolloutPolicy {
            epsilon: self.rollout_epsilon,
            king_bonus: self.king_bonus,
        }
    }
}

/// An MCTS player for one color.
///
/// The agent owns the rules engine of the game it plays (and therefore the
/// real shift counter), plus the search tree kept between moves.
pub struct MonteCarloAgent {
    color: Color,
    checkers: Checkers,
    config: SearchConfig,
    tree: Option<Tree>,
    rng: fastrand::Rng,
}

impl MonteCarloAgent {
    pub fn new(color: Color, checkers: Checkers, config: SearchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self {
            color,
            checkers,
            config,
            tree: None,
            rng,
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn checkers(&self) -> &Checkers {
        &self.checkers
    }

    /// Mutable access to the engine, e.g. to record the opponent's moves.
    #[inline]
    pub fn checkers_mut(&mut self) -> &mut Checkers {
        &mut self.checkers
    }

    /// The tree left by the last search, if any.
    #[inline]
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    /// Choose a move for `state` and count it toward the shift counter.
    ///
    /// # Errors
    /// Returns [`CheckersError::NoLegalMoves`] if the side to move cannot move.
    pub fn play(&mut self, state: &GameState) -> Result<Move> {
        let mv = self.monte_carlo_search(state)?;
        self.checkers.update_shift_count(&mv);
        Ok(mv)
    }

    /// Run a time-budgeted search from `state` and return the best move.
    pub fn monte_carlo_search(&mut self, state: &GameState) -> Result<Move> {
        let legal = legal_moves(state);
        match legal.len() {
            0 => return Err(CheckersError::NoLegalMoves),
            1 => return Ok(legal[0].clone()),
            _ => {}
        }

        let (mut tree, reused) = self.acquire_root(state, legal.len());
        let policy = self.config.rollout_policy();

        let mut sims = 0;
        let start = Instant::now();
        while start.elapsed() < self.config.sim_time && tree.root().moves_unfinished > 0 {
            let picked = self.tree_policy(&mut tree);
            let picked_state = &tree.get(picked).state;
            let player = picked_state.to_move;
            let (result, actions) =
                simulate(picked_state, &self.checkers, self.color, &policy, &mut self.rng);
            back_prop(&mut tree, picked, result, &actions, player);
            sims += 1;
        }

        debug!(
            "{} searched {sims} simulations in {:.2?} (root reused: {reused}, plays: {}, nodes: {}, resolved: {})",
            self.color,
            start.elapsed(),
            tree.root().plays,
            tree.len(),
            tree.root().moves_unfinished == 0,
        );
        dump_children(&tree);

        let mv = match best_action(&tree, NodeId::ROOT, &mut self.rng) {
            Some(mv) => mv,
            None => {
                debug!("no child searched, playing a random legal move");
                legal[self.rng.usize(..legal.len())].clone()
            }
        };
        self.tree = Some(tree);
        Ok(mv)
    }

    /// Root for a search from `state`: the stored node for `state` if the
    /// previous tree has one, otherwise a fresh tree.
    fn acquire_root(&mut self, state: &GameState, branching: usize) -> (Tree, bool) {
        if let Some(mut tree) = self.tree.take() {
            if let Some(id) = tree.lookup(state) {
                tree.reroot(id);
                return (tree, true);
            }
            tree.reset(state.clone(), branching);
            return (tree, false);
        }
        (Tree::new(state.clone(), branching), false)
    }

    /// Descend from the root to the node to simulate from.
    ///
    /// Returns a terminal node (after reporting its completion), a freshly
    /// expanded child, or the current node once the root is fully resolved.
    fn tree_policy(&mut self, tree: &mut Tree) -> NodeId {
        let mut cur = NodeId::ROOT;

        while tree.root().moves_unfinished > 0 {
            let node = tree.get(cur);
            let legal = legal_moves(&node.state);

            if self.checkers.end_game(&node.state).is_some() {
                tree.propagate_completion(cur);
                return cur;
            }

            if node.children.len() < legal.len() {
                let unexpanded: Vec<&Move> = legal
                    .iter()
                    .filter(|mv| !node.moves_expanded.contains(*mv))
                    .collect();
                assert!(!unexpanded.is_empty(), "node has no unexpanded move left");
                let mv = unexpanded[self.rng.usize(..unexpanded.len())].clone();

                let next = update_board(&node.state, &mv);
                let branching = legal_moves(&next).len();
                return tree.add_child(cur, Node::new(next, Some(mv), branching));
            }

            cur = self.best_child(tree, cur);
        }

        cur
    }

    /// Child of `id` with the highest selection value.
    ///
    /// Counters are stored from the agent's side, so they are inverted when
    /// the opponent is the one choosing among the children. Ties keep the
    /// first child.
    fn best_child(&self, tree: &Tree, id: NodeId) -> NodeId {
        let node = tree.get(id);
        let enemy_turn = node.state.to_move != self.color;
        let (_, parent_plays) = node.wins_plays();
        let beta = node.beta(self.config.amaf_bias);
        let log_parent = (parent_plays as f64).ln();

        let mut best = None;
        let mut best_value = f64::NEG_INFINITY;
        for &child_id in &node.children {
            let child = tree.get(child_id);
            let (mut wins, plays) = child.wins_plays();
            let (mut a_wins, a_plays) = child.amaf_wins_plays();
            let plays = plays as f64;
            let a_plays = a_plays as f64;

            if enemy_turn {
                wins = plays - wins;
                a_wins = a_plays - a_wins;
            }

            let explore = self.config.exploration * (2.0 * log_parent / plays).sqrt();
            let value = if self.config.use_amaf && a_plays > 0.0 {
                (1.0 - beta) * (wins / plays) + beta * (a_wins / a_plays) + explore
            } else {
                wins / plays + explore
            };

            if best.is_none() || value > best_value {
                best = Some(child_id);
                best_value = value;
            }
        }

        best.unwrap_or(id)
    }
}

/// Propagate a playout result from `leaf` up to the root.
///
/// At depth `t` above the leaf (0 at the leaf) a node gets one visit and
/// `delta` wins. Its AMAF counters get one visit and `delta` wins for every
/// move of `player` from index `t` on that is the first of its kind since `t`.
pub fn back_prop(tree: &mut Tree, leaf: NodeId, delta: f64, actions: &Actions, player: Color) {
    let moves = actions.get(player);
    let path: Vec<NodeId> = tree.ancestors(leaf).collect();

    for (t, id) in path.into_iter().enumerate() {
        let node = tree.get_mut(id);
        node.plays += 1;
        node.wins += delta;

        for u in t..moves.len() {
            if !moves[t..u].contains(&moves[u]) {
                node.amaf_plays += 1;
                node.amaf_wins += delta;
            }
        }
    }
}

/// Children of `id` tied for the most plays, then the most wins.
pub fn best_candidates(tree: &Tree, id: NodeId) -> Vec<NodeId> {
    let mut most_plays = 0;
    let mut best_wins = f64::NEG_INFINITY;
    let mut best = Vec::new();

    for &child_id in &tree.get(id).children {
        let (wins, plays) = tree.get(child_id).wins_plays();
        if best.is_empty() || plays > most_plays {
            most_plays = plays;
            best_wins = wins;
            best = vec![child_id];
        } else if plays == most_plays {
            if wins > best_wins {
                best_wins = wins;
                best = vec![child_id];
            } else if wins == best_wins {
                best.push(child_id);
            }
        }
    }

    best
}

/// Move of the most visited child of `id`, breaking ties by wins and then at
/// random. `None` if `id` has no children.
pub fn best_action(tree: &Tree, id: NodeId, rng: &mut fastrand::Rng) -> Option<Move> {
    let candidates = best_candidates(tree, id);
    if candidates.is_empty() {
        return None;
    }
    let pick = candidates[rng.usize(..candidates.len())];
    tree.get(pick).mv.clone()
}

/// Log the statistics of the root's children.
pub fn dump_children(tree: &Tree) {
    for &id in &tree.root().children {
        let child = tree.get(id);
        if let Some(mv) = &child.mv {
            trace!(
                "move {mv} plays={} wins={:.1} amaf={}/{:.1} unfinished={}",
                child.plays, child.wins, child.amaf_plays, child.amaf_wins, child.moves_unfinished
            );
        }
    }
}
