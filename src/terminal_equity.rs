use crate::card::*;
use crate::interface::*;
use crate::utility::*;
use ndarray::prelude::*;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Evaluates player equities at terminal nodes of the public tree.
///
/// Owns two `num_hands x num_hands` matrices for one board:
/// - the call matrix `C` such that for player ranges `x` and `y`, `x'Cy` is the equity of the
///   first player when no player folds;
/// - the fold matrix `F` such that `x'Fy` is the equity of the player who did not fold.
///
/// Entries involving a hand that shares a card with the board, or two hands that share a card
/// with each other, are zero.
#[derive(Debug, Clone)]
pub struct TerminalEquity {
    board: Vec<Card>,
    call_matrix: Array2<f32>,
    fold_matrix: Array2<f32>,
}

/// Returns the `0.0`/`1.0` matrix of hand pairs that can be dealt together on the board.
fn blocking_matrix<E: HandEvaluator + ?Sized>(evaluator: &E, board: &[Card]) -> Array2<f32> {
    let num_hands = evaluator.num_hands();
    let possible = evaluator.possible_hands_mask(board);
    Array2::from_shape_fn((num_hands, num_hands), |(i, j)| {
        let cards_j = evaluator.hand_cards(j);
        let disjoint = evaluator
            .hand_cards(i)
            .iter()
            .all(|card| !cards_j.contains(card));
        possible[i] * possible[j] * disjoint as u8 as f32
    })
}

/// Constructs the showdown matrix for a board of the final betting round.
fn last_round_call_matrix<E: HandEvaluator + ?Sized>(evaluator: &E, board: &[Card]) -> Array2<f32> {
    let num_hands = evaluator.num_hands();
    let strength = evaluator.batch_eval(board);
    let mut call_matrix = Array2::from_shape_fn((num_hands, num_hands), |(i, j)| {
        match (strength[i], strength[j]) {
            (Some(si), Some(sj)) if si > sj => 1.0,
            (Some(si), Some(sj)) if si < sj => -1.0,
            _ => 0.0,
        }
    });
    call_matrix *= &blocking_matrix(evaluator, board);
    call_matrix
}

impl TerminalEquity {
    /// Creates the evaluator for the given board.
    ///
    /// For boards of the final betting round, the call matrix is the plain showdown matrix. For
    /// earlier boards, it is the average over all possible board completions.
    ///
    /// # Panics
    /// Panics if the board holds more cards than the final betting round.
    pub fn new<E: HandEvaluator + ?Sized>(evaluator: &E, board: &[Card]) -> Self {
        let mut board = board.to_vec();
        board.sort_unstable();
        let call_matrix = Self::compute_call_matrix(evaluator, &board);
        let fold_matrix = blocking_matrix(evaluator, &board);
        Self {
            board,
            call_matrix,
            fold_matrix,
        }
    }

    /// Creates the evaluator directly from the given matrices.
    ///
    /// # Panics
    /// Panics if the matrices are not square matrices of the same size.
    pub fn from_matrices(call_matrix: Array2<f32>, fold_matrix: Array2<f32>) -> Self {
        assert!(call_matrix.is_square(), "call matrix must be square");
        assert_eq!(call_matrix.dim(), fold_matrix.dim());
        Self {
            board: Vec::new(),
            call_matrix,
            fold_matrix,
        }
    }

    /// Recomputes both matrices for a new board.
    #[inline]
    pub fn set_board<E: HandEvaluator + ?Sized>(&mut self, evaluator: &E, board: &[Card]) {
        *self = Self::new(evaluator, board);
    }

    /// Returns the (sorted) board of this evaluator.
    #[inline]
    pub fn board(&self) -> &[Card] {
        &self.board
    }

    /// Returns the call matrix.
    #[inline]
    pub fn call_matrix(&self) -> &Array2<f32> {
        &self.call_matrix
    }

    /// Returns the fold matrix.
    #[inline]
    pub fn fold_matrix(&self) -> &Array2<f32> {
        &self.fold_matrix
    }

    /// Returns the number of private hands.
    #[inline]
    pub fn num_hands(&self) -> usize {
        self.call_matrix.nrows()
    }

    fn compute_call_matrix<E: HandEvaluator + ?Sized>(evaluator: &E, board: &[Card]) -> Array2<f32> {
        let final_board_size = evaluator.final_board_size();
        assert!(
            board.len() <= final_board_size,
            "board has {} cards, but the final round has {}",
            board.len(),
            final_board_size
        );

        if board.len() == final_board_size {
            return last_round_call_matrix(evaluator, board);
        }

        let num_to_come = final_board_size - board.len();
        let deck = (0..evaluator.deck_size() as Card)
            .filter(|card| !board.contains(card))
            .collect::<Vec<_>>();
        let completions = card_combinations(&deck, num_to_come);

        log::debug!(
            "averaging call matrix for board {:?} over {} completions",
            board,
            completions.len()
        );

        let matrices = into_par_iter(0..completions.len())
            .map(|i| {
                let mut full_board = board.to_vec();
                full_board.extend_from_slice(&completions[i]);
                full_board.sort_unstable();
                last_round_call_matrix(evaluator, &full_board)
            })
            .collect::<Vec<_>>();

        let num_hands = evaluator.num_hands();
        let mut call_matrix = Array2::zeros((num_hands, num_hands));
        for matrix in &matrices {
            call_matrix += matrix;
        }

        // each pair of compatible hands sees the same number of completions
        let hand_size = evaluator.hand_cards(0).len();
        let num_free = deck.len().saturating_sub(2 * hand_size);
        let num_completions = binomial(num_free, num_to_come).max(1);
        call_matrix /= num_completions as f32;
        call_matrix
    }

    /// Computes the counterfactual values of both players at a terminal fold node.
    ///
    /// The player who did not fold receives `ranges[folding_player] . F`, and the folding player
    /// receives the negation of `ranges[non_folding_player] . F`. The values are per unit of pot.
    pub fn tree_node_fold_value(
        &self,
        ranges: &Array2<f32>,
        result: &mut Array2<f32>,
        folding_player: usize,
    ) {
        let other_player = folding_player ^ 1;
        let gain = ranges.row(folding_player).dot(&self.fold_matrix);
        let loss = ranges.row(other_player).dot(&self.fold_matrix);
        result.row_mut(other_player).assign(&gain);
        result.row_mut(folding_player).assign(&-loss);
    }

    /// Computes the counterfactual values of both players at a terminal showdown node.
    ///
    /// The first player receives `C . ranges[1]'` and the second player receives
    /// `-(C' . ranges[0]')`. The values are per unit of pot.
    pub fn tree_node_call_value(&self, ranges: &Array2<f32>, result: &mut Array2<f32>) {
        let first = self.call_matrix.dot(&ranges.row(1));
        let second = ranges.row(0).dot(&self.call_matrix);
        result.row_mut(0).assign(&first);
        result.row_mut(1).assign(&-second);
    }
}
