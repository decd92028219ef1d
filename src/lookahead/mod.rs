mod result;
mod traversal;


pub use result::LookaheadResult;

use crate::card::*;
use crate::gadget::*;
use crate::interface::*;
use crate::node::*;
use crate::regret::*;
use crate::terminal_equity::*;
use ndarray::prelude::*;
use ndarray::AsArray;
use std::collections::BTreeMap;

/// Order in which the nodes are visited in one CFR iteration.
///
/// Both orders visit a node's parent before its forward pass and its children before its backward
/// pass, so they produce identical results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraversalOrder {
    /// Depth-first recursion: forward pass, children, backward pass.
    Recursive,

    /// Forward passes over the pre-order node list, then backward passes in reverse order.
    #[default]
    Flattened,
}

/// How a hand whose averaged strategy column sums to zero (or is not finite) is normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DegenerateStrategy {
    /// Always fold. Falls back to [`DegenerateStrategy::Uniform`] when folding is illegal at the
    /// root.
    #[default]
    AlwaysFold,

    /// Uniform distribution over the legal actions.
    Uniform,

    /// Leave the column as accumulated.
    Unnormalized,
}

/// A struct containing the solver configuration.
///
/// # Examples
/// ```
/// use lookahead_solver::*;
///
/// let config = LookaheadConfig {
///     skip_iters: 200,
///     iters: 500,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookaheadConfig {
    /// Number of warmup iterations excluded from the averages.
    pub skip_iters: usize,

    /// Total number of iterations. Must be greater than `skip_iters`.
    pub iters: usize,

    /// Floor of the cumulative regrets. Must be greater than `0.0`.
    pub regret_epsilon: f32,

    /// Traversal order of one iteration.
    pub traversal: TraversalOrder,

    /// Normalization policy of degenerate hands in the average strategy.
    pub degenerate_strategy: DegenerateStrategy,
}

impl Default for LookaheadConfig {
    #[inline]
    fn default() -> Self {
        Self {
            skip_iters: 500,
            iters: 1000,
            regret_epsilon: REGRET_EPSILON,
            traversal: TraversalOrder::default(),
            degenerate_strategy: DegenerateStrategy::default(),
        }
    }
}

impl LookaheadConfig {
    /// Checks the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.iters < self.skip_iters {
            return Err(format!(
                "Number of iterations ({}) is less than skipped iterations ({})",
                self.iters, self.skip_iters
            ));
        }

        if self.iters == self.skip_iters {
            return Err(format!(
                "At least one iteration must be averaged: iters = skip_iters = {}",
                self.iters
            ));
        }

        if !(self.regret_epsilon > 0.0 && self.regret_epsilon.is_finite()) {
            return Err(format!(
                "Regret epsilon must be positive: {}",
                self.regret_epsilon
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum State {
    #[default]
    Ready,
    Solved,
}

/// A depth-limited CFR solver over a public tree.
///
/// Internally, the player acting at the root is always player `0` and the opponent is player `1`;
/// results are reported in terms of the true players.
///
/// # Examples
/// ```
/// use lookahead_solver::*;
///
/// let tree_config = TreeConfig {
///     board: board_from_str("Kh").unwrap(),
///     ..Default::default()
/// };
/// let tree = build_limit_tree(&tree_config).unwrap();
/// let config = LookaheadConfig {
///     skip_iters: 50,
///     iters: 100,
///     ..Default::default()
/// };
/// let mut lookahead = Lookahead::new(tree, LeducEvaluator::new(), config).unwrap();
///
/// let range: Vec<f32> = vec![1.0, 1.0, 1.0, 0.0, 1.0, 1.0];
/// lookahead.resolve_first_node(&range, &range);
///
/// let result = lookahead.get_results();
/// assert_eq!(result.strategy.dim(), (2, 6));
/// assert!(result.root_cfvs.is_some());
/// ```
pub struct Lookahead<E: HandEvaluator> {
    state: State,
    tree: PublicTree,
    evaluator: E,
    config: LookaheadConfig,
    num_hands: usize,
    players_swap: bool,
    reconstruction: bool,
    flat_nodes: Vec<usize>,
    terminal_equities: BTreeMap<Vec<Card>, TerminalEquity>,

    // accumulators
    average_strategy: Array2<f32>,
    average_cfvs: Array2<f32>,
    average_children_cfvs: Array2<f32>,
}

impl<E: HandEvaluator> Lookahead<E> {
    /// Creates a new solver for the given tree.
    pub fn new(tree: PublicTree, evaluator: E, config: LookaheadConfig) -> Result<Self, String> {
        config.validate()?;
        tree.validate()?;

        let num_hands = evaluator.num_hands();
        if num_hands == 0 {
            return Err("Hand evaluator has no private hands".to_string());
        }

        for index in 0..tree.len() {
            let board = tree.node(index).board();
            if board.len() > evaluator.final_board_size() {
                return Err(format!(
                    "Node {index}: board has {} cards, but the final round has {}",
                    board.len(),
                    evaluator.final_board_size()
                ));
            }
            if let Some(&card) = board.iter().find(|&&c| c as usize >= evaluator.deck_size()) {
                return Err(format!("Node {index}: invalid board card {card}"));
            }
        }

        let players_swap = tree.root().current_player() == P2;
        let flat_nodes = tree.preorder();

        Ok(Self {
            state: State::default(),
            tree,
            evaluator,
            config,
            num_hands,
            players_swap,
            reconstruction: false,
            flat_nodes,
            terminal_equities: BTreeMap::new(),
            average_strategy: Array2::zeros((0, 0)),
            average_cfvs: Array2::zeros((0, 0)),
            average_children_cfvs: Array2::zeros((0, 0)),
        })
    }

    /// Solves the tree from the ranges of both players.
    ///
    /// `player_range` belongs to the player acting at the root.
    ///
    /// # Panics
    /// Panics if a range does not cover every private hand or has no positive mass.
    pub fn resolve_first_node<'a, 'b>(
        &mut self,
        player_range: impl AsArray<'a, f32>,
        opponent_range: impl AsArray<'b, f32>,
    ) {
        let player_range: ArrayView1<f32> = player_range.into();
        let opponent_range: ArrayView1<f32> = opponent_range.into();
        self.check_range(&player_range, "player range");
        self.check_range(&opponent_range, "opponent range");

        self.reconstruction = false;
        self.begin_solve();
        let root = self.tree.node_mut(0);
        root.ranges.row_mut(P1).assign(&player_range);
        root.ranges.row_mut(P2).assign(&opponent_range);
        self.compute(None);
    }

    /// Re-solves the tree from the player's range and the opponent's counterfactual values
    /// guaranteed by a previous solve, reconstructing the opponent's range with [`CfrdGadget`].
    ///
    /// # Panics
    /// Panics if `player_range` is invalid or `opponent_cfvs` does not cover every private hand.
    pub fn resolve<'a, 'b>(
        &mut self,
        player_range: impl AsArray<'a, f32>,
        opponent_cfvs: impl AsArray<'b, f32>,
    ) {
        let opponent_cfvs: ArrayView1<f32> = opponent_cfvs.into();
        let gadget = CfrdGadget::new(
            &self.evaluator,
            self.tree.root().board(),
            opponent_cfvs,
        );
        self.resolve_with(player_range, gadget);
    }

    /// Re-solves the tree, reconstructing the opponent's range with the given rule on every
    /// iteration.
    ///
    /// # Panics
    /// Panics if `player_range` is invalid.
    pub fn resolve_with<'a, R: RangeReconstruction>(
        &mut self,
        player_range: impl AsArray<'a, f32>,
        mut reconstruction: R,
    ) {
        let player_range: ArrayView1<f32> = player_range.into();
        self.check_range(&player_range, "player range");

        self.reconstruction = true;
        self.begin_solve();
        self.tree
            .node_mut(0)
            .ranges
            .row_mut(P1)
            .assign(&player_range);
        let reconstruction: &mut dyn RangeReconstruction = &mut reconstruction;
        self.compute(Some(reconstruction));
    }

    /// Returns the public tree, including the numeric state of the last iteration.
    #[inline]
    pub fn tree(&self) -> &PublicTree {
        &self.tree
    }

    /// Returns the hand evaluator.
    #[inline]
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &LookaheadConfig {
        &self.config
    }

    /// Returns the cached terminal equity of the given board, if any.
    #[inline]
    pub fn terminal_equity(&self, board: &[Card]) -> Option<&TerminalEquity> {
        let mut board = board.to_vec();
        board.sort_unstable();
        self.terminal_equities.get(&board)
    }

    /// Returns whether a solve has completed.
    #[inline]
    pub fn is_solved(&self) -> bool {
        self.state == State::Solved
    }

    /// Returns whether the last solve reconstructed the opponent's range.
    #[inline]
    pub fn is_resolving(&self) -> bool {
        self.reconstruction
    }

    fn check_range(&self, range: &ArrayView1<f32>, name: &str) {
        assert_eq!(
            range.len(),
            self.num_hands,
            "{name} must cover every private hand"
        );
        assert!(
            range.iter().all(|&p| p >= 0.0 && p.is_finite()),
            "{name} must be non-negative and finite"
        );
        assert!(range.sum() > 0.0, "{name} must have positive mass");
    }

    /// Clears the per-node state and the accumulators, and fills the terminal-equity cache.
    fn begin_solve(&mut self) {
        self.state = State::Ready;
        self.tree.reset_state(self.num_hands);
        self.average_strategy = Array2::zeros((0, 0));
        self.average_cfvs = Array2::zeros((0, 0));
        self.average_children_cfvs = Array2::zeros((0, 0));

        for board in self.tree.terminal_boards() {
            if !self.terminal_equities.contains_key(&board) {
                log::debug!("computing terminal equity for board {:?}", board);
                let equity = TerminalEquity::new(&self.evaluator, &board);
                self.terminal_equities.insert(board, equity);
            }
        }
    }
}
