use crate::card::*;
use crate::interface::*;

const NUM_RANKS: usize = 3;

/// Hand evaluator of Leduc hold'em.
///
/// Each player holds one private card, and one board card is dealt before the second (final)
/// betting round. The private hand index is the card ID itself.
#[derive(Debug, Clone)]
pub struct LeducEvaluator {
    hands: [[Card; 1]; LEDUC_DECK_SIZE],
}

impl Default for LeducEvaluator {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl LeducEvaluator {
    /// Creates a new evaluator.
    #[inline]
    pub fn new() -> Self {
        let mut hands = [[0; 1]; LEDUC_DECK_SIZE];
        for (card, hand) in hands.iter_mut().enumerate() {
            hand[0] = card as Card;
        }
        Self { hands }
    }

    /// Computes the raw strength value: pairs are tagged above bit 8, unpaired hands compare the
    /// set of ranks as a bit pattern (high card first, then kicker).
    fn evaluate_internal(cards: &[Card]) -> u16 {
        let mut rankset = 0u16;
        let mut rank_count = [0u8; NUM_RANKS];

        for &card in cards {
            let rank = card_rank(card) as usize;
            rankset |= 1 << rank;
            rank_count[rank] += 1;
        }

        match rank_count.iter().position(|&count| count >= 2) {
            // pair
            Some(rank) => (1 << 8) | (1 << rank),
            // high card
            None => rankset,
        }
    }
}

impl HandEvaluator for LeducEvaluator {
    #[inline]
    fn num_hands(&self) -> usize {
        LEDUC_DECK_SIZE
    }

    #[inline]
    fn deck_size(&self) -> usize {
        LEDUC_DECK_SIZE
    }

    #[inline]
    fn final_board_size(&self) -> usize {
        1
    }

    #[inline]
    fn hand_cards(&self, hand: usize) -> &[Card] {
        &self.hands[hand]
    }

    fn evaluate(&self, cards: &[Card]) -> Option<u16> {
        if cards.is_empty() || cards.iter().any(|&card| card as usize >= LEDUC_DECK_SIZE) {
            return None;
        }

        let mut mask = 0u8;
        for &card in cards {
            let bit = 1 << card;
            if mask & bit != 0 {
                return None;
            }
            mask |= bit;
        }

        Some(Self::evaluate_internal(cards))
    }
}
