use super::*;
use crate::sliceop::*;

/// A struct containing the averaged output of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct LookaheadResult {
    /// Average strategy of the player acting at the root: `[actions x hands]`.
    pub strategy: Array2<f32>,

    /// Average counterfactual values of the opponent at the root.
    pub achieved_cfvs: Array1<f32>,

    /// Average counterfactual values of the opponent at the root (`None` when re-solving).
    pub root_cfvs: Option<Array1<f32>>,

    /// Average counterfactual values of both players at the root, indexed by the true player
    /// (`None` when re-solving).
    pub root_cfvs_both_players: Option<Array2<f32>>,

    /// Average counterfactual values of the opponent at each child of the root, per unit of
    /// probability that the child is reached: `[actions x hands]`. Rows of unreachable actions are
    /// zero.
    pub children_cfvs: Array2<f32>,

    /// Probability mass of the player's root range sent to each action by the average strategy.
    pub action_mass: Array1<f32>,
}

impl<E: HandEvaluator> Lookahead<E> {
    /// Returns the results of the last solve.
    ///
    /// # Panics
    /// Panics if no solve has completed.
    pub fn get_results(&self) -> LookaheadResult {
        assert!(self.is_solved(), "Lookahead has not been solved");

        let strategy = self.average_strategy.clone();
        let achieved_cfvs = self.average_cfvs.row(P2).to_owned();
        assert!(!strategy.is_empty(), "average strategy is empty");
        assert!(!achieved_cfvs.is_empty(), "achieved CFVs are empty");

        let (root_cfvs, root_cfvs_both_players) = if self.reconstruction {
            (None, None)
        } else {
            let mut both_players = self.average_cfvs.clone();
            if self.players_swap {
                both_players.invert_axis(Axis(0));
            }
            (Some(achieved_cfvs.clone()), Some(both_players))
        };

        let player_range = self.tree.root().ranges.row(P1);
        let action_mass = strategy.dot(&player_range);

        let num_hands = self.num_hands;
        let num_averaged = (self.config.iters - self.config.skip_iters) as f32;
        let mut children_cfvs = Array2::zeros((strategy.nrows(), num_hands));
        for (action, mut row) in children_cfvs.rows_mut().into_iter().enumerate() {
            let mut values = self.average_children_cfvs.row(action).to_vec();
            let mut scale = vec![action_mass[action]; num_hands];
            mul_slice_scalar(&mut scale, num_averaged);
            div_slice(&mut values, &scale, 0.0);
            row.assign(&ArrayView1::from(&values));
        }
        assert!(!children_cfvs.is_empty(), "children CFVs are empty");

        LookaheadResult {
            strategy,
            achieved_cfvs,
            root_cfvs,
            root_cfvs_both_players,
            children_cfvs,
            action_mass,
        }
    }
}
