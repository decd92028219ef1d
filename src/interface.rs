use crate::card::*;
use ndarray::prelude::*;

/// The trait representing a hand evaluator.
///
/// The evaluator defines the private-hand space of the game: every hand is addressed by an index
/// in `0..num_hands()`, and every vector or matrix over hands in this crate uses that index.
pub trait HandEvaluator: Send + Sync {
    /// Returns the number of private hands (the size of the hand space).
    fn num_hands(&self) -> usize;

    /// Returns the number of cards in the deck.
    fn deck_size(&self) -> usize;

    /// Returns the number of board cards visible in the final betting round.
    fn final_board_size(&self) -> usize;

    /// Returns the cards making up the given private hand.
    fn hand_cards(&self, hand: usize) -> &[Card];

    /// Evaluates the strength of the given cards (private hand followed by the board).
    ///
    /// A higher value means a stronger hand. Returns `None` when the cards cannot be held at the
    /// same time (e.g., a card appears twice).
    fn evaluate(&self, cards: &[Card]) -> Option<u16>;

    /// Evaluates every private hand against the given board.
    ///
    /// Hands sharing a card with the board are reported as `None`.
    fn batch_eval(&self, board: &[Card]) -> Vec<Option<u16>> {
        let mut cards = Vec::with_capacity(8);
        (0..self.num_hands())
            .map(|hand| {
                cards.clear();
                cards.extend_from_slice(self.hand_cards(hand));
                cards.extend_from_slice(board);
                self.evaluate(&cards)
            })
            .collect()
    }

    /// Returns whether the given hand can be held on the given board.
    #[inline]
    fn is_hand_possible(&self, hand: usize, board: &[Card]) -> bool {
        self.hand_cards(hand).iter().all(|card| !board.contains(card))
    }

    /// Returns the `0.0`/`1.0` mask of hands that can be held on the given board.
    fn possible_hands_mask(&self, board: &[Card]) -> Array1<f32> {
        (0..self.num_hands())
            .map(|hand| self.is_hand_possible(hand, board) as u8 as f32)
            .collect()
    }
}

/// The trait representing the rule that reconstructs the opponent's range when re-solving.
///
/// At the start of every iteration, the engine passes the opponent's counterfactual values
/// achieved at the root in the previous iteration and overwrites the opponent's root range with
/// the returned vector.
pub trait RangeReconstruction {
    /// Computes the opponent's range for the next iteration.
    fn compute_opponent_range(&mut self, current_opponent_cfvs: ArrayView1<f32>) -> Array1<f32>;
}
