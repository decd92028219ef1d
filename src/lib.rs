//! A depth-limited CFR lookahead solver for continual re-solving in imperfect-information poker.
//!
//! # Examples
//! ```
//! use lookahead_solver::*;
//!
//! // build the public tree of the last betting round of Leduc hold'em
//! let tree_config = TreeConfig {
//!     board: board_from_str("Qh").unwrap(),
//!     first_player: P1,
//!     starting_pot: 3.0,
//!     bet_size: 4.0,
//!     max_bets: 2,
//! };
//! let tree = build_limit_tree(&tree_config).unwrap();
//!
//! // configure the solver
//! let config = LookaheadConfig {
//!     skip_iters: 200,
//!     iters: 400,
//!     ..Default::default()
//! };
//! let mut lookahead = Lookahead::new(tree, LeducEvaluator::new(), config).unwrap();
//!
//! // solve from the ranges of both players (the queen of hearts is on the board)
//! let range: Vec<f32> = vec![0.2, 0.0, 0.2, 0.2, 0.2, 0.2];
//! lookahead.resolve_first_node(&range, &range);
//! let result = lookahead.get_results();
//!
//! // the average strategy at the root: [check, bet] x hands
//! let queen = card_from_str("Qs").unwrap() as usize;
//! let check = result.strategy[[0, queen]];
//! let bet = result.strategy[[1, queen]];
//! assert!((check + bet - 1.0).abs() < 1e-5);
//!
//! // average value of the opponent
//! let opponent_cfvs = result.root_cfvs.unwrap();
//! let opponent_ev = compute_average(opponent_cfvs.as_slice().unwrap(), &range);
//! println!("Opponent EV: {:.3}", opponent_ev);
//!
//! // re-solve from the values the opponent is guaranteed
//! lookahead.resolve(&range, &opponent_cfvs);
//! let result = lookahead.get_results();
//! assert!(result.root_cfvs.is_none());
//! println!("Achieved opponent CFVs: {}", result.achieved_cfvs);
//! ```
//!
//! # Implementation details
//! - **Algorithm**: The solver uses CFR with regret-matching+ (regrets are floored at a small
//!   positive value). Averages are taken over the iterations after a warmup period.
//! - **Re-solving**: The opponent's range is reconstructed on every iteration by the CFR-D
//!   gadget, or by any other [`RangeReconstruction`] rule.
//! - **Precision**: 32-bit floating-point numbers are used in most places.
//! - **Player indices**: The player acting at the root is always handled as the first player
//!   internally. Results are reported in terms of the true players.
//!
//! # Crate features
//! - `rayon`: Uses [rayon] crate for parallelization of the terminal equity computation.
//!   Enabled by default.
//!
//! [rayon]: https://github.com/rayon-rs/rayon

mod action_tree;
mod card;
mod gadget;
mod hand;
mod interface;
mod lookahead;
mod node;
mod regret;
mod sliceop;
mod terminal_equity;
mod utility;

pub use action_tree::*;
pub use card::*;
pub use gadget::*;
pub use hand::*;
pub use interface::*;
pub use lookahead::*;
pub use node::*;
pub use regret::*;
pub use terminal_equity::*;
pub use utility::*;
