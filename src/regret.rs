use crate::node::*;
use ndarray::prelude::*;

/// Default floor of the cumulative regrets.
pub const REGRET_EPSILON: f32 = 1e-9;

/// Returns the initial regrets `[actions x hands]`: every entry is the floor value, except the
/// fold row which is zero when folding is illegal.
pub fn initial_regrets(
    num_actions: usize,
    num_hands: usize,
    fold_mask: bool,
    regret_epsilon: f32,
) -> Array2<f32> {
    let mut regrets = Array2::from_elem((num_actions, num_hands), regret_epsilon);
    if !fold_mask {
        regrets.row_mut(FOLD).fill(0.0);
    }
    regrets
}

/// Computes the strategy by regret-matching algorithm and writes it into `strategy`.
///
/// Each column of `regrets` is divided by its sum. The regrets must be floored beforehand so that
/// no column sums to zero.
#[inline]
pub fn compute_current_strategy(regrets: &Array2<f32>, strategy: &mut Array2<f32>) {
    strategy.assign(regrets);
    *strategy /= &regrets.sum_axis(Axis(0));
}

/// Adds the instantaneous regrets to the cumulative regrets.
///
/// Entries falling below `regret_epsilon` are clamped up to it, and the fold row is reset to zero
/// when folding is illegal.
pub fn update_regrets(
    regrets: &mut Array2<f32>,
    current_regrets: &Array2<f32>,
    fold_mask: bool,
    regret_epsilon: f32,
) {
    *regrets += current_regrets;
    regrets.mapv_inplace(|r| if r >= regret_epsilon { r } else { regret_epsilon });
    if !fold_mask {
        regrets.row_mut(FOLD).fill(0.0);
    }
}
