use crate::card::*;
use std::ops::Range;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Returns a parallel iterator over the range when the `rayon` feature is enabled, or the range
/// itself otherwise.
#[cfg(feature = "rayon")]
#[inline]
pub(crate) fn into_par_iter(range: Range<usize>) -> rayon::range::Iter<usize> {
    range.into_par_iter()
}

#[cfg(not(feature = "rayon"))]
#[inline]
pub(crate) fn into_par_iter(range: Range<usize>) -> Range<usize> {
    range
}

/// Computes the average with given weights.
///
/// # Examples
/// ```
/// use lookahead_solver::compute_average;
///
/// let values = [1.0f32, 2.0, 3.0];
/// let weights = [0.5f32, 0.0, 0.5];
/// assert!((compute_average(&values, &weights) - 2.0).abs() < 1e-12);
/// ```
#[inline]
pub fn compute_average<T: Copy + Into<f64>, U: Copy + Into<f64>>(
    slice: &[T],
    weights: &[U],
) -> f64 {
    let mut weight_sum = 0.0;
    let mut product_sum = 0.0;
    for (&v, &w) in slice.iter().zip(weights.iter()) {
        weight_sum += w.into();
        product_sum += v.into() * w.into();
    }
    product_sum / weight_sum
}

/// Returns the binomial coefficient `n` choose `k`.
#[inline]
pub(crate) fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

/// Enumerates all `k`-subsets of `cards`, each in ascending order of position in `cards`.
pub(crate) fn card_combinations(cards: &[Card], k: usize) -> Vec<Vec<Card>> {
    let mut result = Vec::with_capacity(binomial(cards.len(), k));
    let mut current = Vec::with_capacity(k);
    card_combinations_recursive(&mut result, &mut current, cards, k);
    result
}

fn card_combinations_recursive(
    result: &mut Vec<Vec<Card>>,
    current: &mut Vec<Card>,
    cards: &[Card],
    k: usize,
) {
    if current.len() == k {
        result.push(current.clone());
        return;
    }

    let remaining = k - current.len();
    for i in 0..cards.len() {
        if cards.len() - i < remaining {
            break;
        }
        current.push(cards[i]);
        card_combinations_recursive(result, current, &cards[i + 1..], k);
        current.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binomial_small_values() {
        assert_eq!(binomial(4, 1), 4);
        assert_eq!(binomial(5, 2), 10);
        assert_eq!(binomial(6, 0), 1);
        assert_eq!(binomial(2, 3), 0);
    }

    #[test]
    fn combinations_are_complete() {
        let combos = card_combinations(&[0, 1, 2, 3], 2);
        assert_eq!(combos.len(), 6);
        assert_eq!(combos[0], vec![0, 1]);
        assert_eq!(combos[5], vec![2, 3]);
        assert_eq!(card_combinations(&[0, 1, 2], 0), vec![Vec::<Card>::new()]);
    }
}
