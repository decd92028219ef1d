use crate::card::*;
use crate::interface::*;
use crate::sliceop::*;
use ndarray::prelude::*;

/// Regret floor of the gadget.
const GADGET_REGRET_EPSILON: f32 = 1e-8;

/// The CFR-D gadget that reconstructs the opponent's range when re-solving.
///
/// For every hand, the opponent chooses between entering the subgame ("play", worth the
/// counterfactual value achieved in the last iteration) and taking the value guaranteed by the
/// previous solve ("terminate", worth the fixed target value). The choice is learned by
/// regret-matching+ and the probability of playing becomes the opponent's range. Hands that are
/// impossible on the board get zero mass.
#[derive(Debug, Clone)]
pub struct CfrdGadget {
    target_values: Vec<f32>,
    range_mask: Vec<f32>,
    play_strategy: Vec<f32>,
    terminate_strategy: Vec<f32>,
    play_regrets: Vec<f32>,
    terminate_regrets: Vec<f32>,
}

impl CfrdGadget {
    /// Creates a new gadget for the given board and the opponent's target counterfactual values.
    ///
    /// # Panics
    /// Panics if the length of `opponent_cfvs` differs from the number of private hands.
    pub fn new<E: HandEvaluator + ?Sized>(
        evaluator: &E,
        board: &[Card],
        opponent_cfvs: ArrayView1<f32>,
    ) -> Self {
        let num_hands = evaluator.num_hands();
        assert_eq!(
            opponent_cfvs.len(),
            num_hands,
            "opponent CFVs must cover every private hand"
        );

        Self {
            target_values: opponent_cfvs.to_vec(),
            range_mask: evaluator.possible_hands_mask(board).to_vec(),
            play_strategy: vec![0.0; num_hands],
            terminate_strategy: vec![1.0; num_hands],
            play_regrets: vec![0.0; num_hands],
            terminate_regrets: vec![0.0; num_hands],
        }
    }

    /// Returns the target counterfactual values.
    #[inline]
    pub fn target_values(&self) -> &[f32] {
        &self.target_values
    }

    /// Returns the current probability of terminating for each hand.
    #[inline]
    pub fn terminate_strategy(&self) -> &[f32] {
        &self.terminate_strategy
    }
}

impl RangeReconstruction for CfrdGadget {
    fn compute_opponent_range(&mut self, current_opponent_cfvs: ArrayView1<f32>) -> Array1<f32> {
        let play_values = current_opponent_cfvs.to_vec();

        // value of the gadget node under the current strategy
        let mut total_values = play_values.clone();
        mul_slice(&mut total_values, &self.play_strategy);
        let mut terminate_total = self.target_values.clone();
        mul_slice(&mut terminate_total, &self.terminate_strategy);
        add_slice(&mut total_values, &terminate_total);

        // cumulative regrets (CFR+)
        add_slice(&mut self.play_regrets, &play_values);
        sub_slice(&mut self.play_regrets, &total_values);
        add_slice(&mut self.terminate_regrets, &self.target_values);
        sub_slice(&mut self.terminate_regrets, &total_values);
        floor_slice(&mut self.play_regrets, GADGET_REGRET_EPSILON);
        floor_slice(&mut self.terminate_regrets, GADGET_REGRET_EPSILON);

        // regret matching
        let mut regret_sum = self.play_regrets.clone();
        add_slice(&mut regret_sum, &self.terminate_regrets);
        self.play_strategy.copy_from_slice(&self.play_regrets);
        self.terminate_strategy
            .copy_from_slice(&self.terminate_regrets);
        div_slice(&mut self.play_strategy, &regret_sum, 0.0);
        div_slice(&mut self.terminate_strategy, &regret_sum, 0.0);

        mul_slice(&mut self.play_strategy, &self.range_mask);
        mul_slice(&mut self.terminate_strategy, &self.range_mask);

        Array1::from(self.play_strategy.clone())
    }
}
