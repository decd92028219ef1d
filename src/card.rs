use once_cell::sync::Lazy;
use regex::Regex;

/// A type representing a card, defined as an alias of `u8`.
///
/// The correspondence between the card IDs and the Leduc cards is as follows:
/// - card ID = 2 * rank + suit
/// - rank: Q => `0`, K => `1`, A => `2`
/// - suit: spade => `0`, heart => `1`
///
/// Examples:
/// - `Qs` => `0`
/// - `Kh` => `3`
/// - `Ah` => `5`
pub type Card = u8;

/// Number of cards in the Leduc deck.
pub const LEDUC_DECK_SIZE: usize = 6;

static BOARD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\s*[QKAqka][sh])*\s*$").unwrap());

/// Attempts to convert a rank character to a rank index.
///
/// `'A'` => `2`, `'K'` => `1`, `'Q'` => `0`.
#[inline]
fn char_to_rank(c: char) -> Result<u8, String> {
    match c {
        'A' | 'a' => Ok(2),
        'K' | 'k' => Ok(1),
        'Q' | 'q' => Ok(0),
        _ => Err(format!("Expected rank character: {c}")),
    }
}

/// Attempts to conver a suit character to a suit index.
#[inline]
fn char_to_suit(c: char) -> Result<u8, String> {
    match c {
        's' => Ok(0),
        'h' => Ok(1),
        _ => Err(format!("Expected suit character: {c}")),
    }
}

#[inline]
fn rank_to_char(rank: u8) -> Result<char, String> {
    match rank {
        2 => Ok('A'),
        1 => Ok('K'),
        0 => Ok('Q'),
        _ => Err(format!("Invalid input: {rank}")),
    }
}

#[inline]
fn suit_to_char(suit: u8) -> Result<char, String> {
    match suit {
        0 => Ok('s'),
        1 => Ok('h'),
        _ => Err(format!("Invalid input: {suit}")),
    }
}

#[inline]
fn check_card(card: Card) -> Result<(), String> {
    if (card as usize) < LEDUC_DECK_SIZE {
        Ok(())
    } else {
        Err(format!("Invalid card: {card}"))
    }
}

/// Returns the rank index of the given card.
#[inline]
pub fn card_rank(card: Card) -> u8 {
    card >> 1
}

/// Attempts to convert a card into a string.
///
/// # Examples
/// ```
/// use lookahead_solver::card_to_string;
///
/// assert_eq!(card_to_string(0), Ok("Qs".to_string()));
/// assert_eq!(card_to_string(3), Ok("Kh".to_string()));
/// assert_eq!(card_to_string(5), Ok("Ah".to_string()));
/// assert!(card_to_string(6).is_err());
/// ```
#[inline]
pub fn card_to_string(card: Card) -> Result<String, String> {
    check_card(card)?;
    Ok(format!(
        "{}{}",
        rank_to_char(card_rank(card))?,
        suit_to_char(card & 1)?
    ))
}

/// Attempts to read the next card from a char iterator.
#[inline]
pub fn card_from_chars<T: Iterator<Item = char>>(chars: &mut T) -> Result<Card, String> {
    let rank_char = chars.next().ok_or_else(|| "Unexpected end".to_string())?;
    let suit_char = chars.next().ok_or_else(|| "Unexpected end".to_string())?;

    let rank = char_to_rank(rank_char)?;
    let suit = char_to_suit(suit_char)?;

    Ok((rank << 1) | suit)
}

/// Attempts to convert a string into a card.
///
/// # Examples
/// ```
/// use lookahead_solver::card_from_str;
///
/// assert_eq!(card_from_str("Qs"), Ok(0));
/// assert_eq!(card_from_str("Kh"), Ok(3));
/// assert_eq!(card_from_str("As"), Ok(4));
/// assert!(card_from_str("Ts").is_err());
/// ```
#[inline]
pub fn card_from_str(s: &str) -> Result<Card, String> {
    let mut chars = s.chars();
    let result = card_from_chars(&mut chars)?;

    if chars.next().is_some() {
        return Err("Expected exactly two characters".to_string());
    }

    Ok(result)
}

/// Attempts to convert an optionally space-separated string into a sorted board.
///
/// The empty string is the board before any card is dealt.
///
/// # Examples
/// ```
/// use lookahead_solver::board_from_str;
///
/// assert_eq!(board_from_str(""), Ok(vec![]));
/// assert_eq!(board_from_str("Kh"), Ok(vec![3]));
/// assert_eq!(board_from_str("Ah Qs"), Ok(vec![0, 5]));
/// assert!(board_from_str("KhKh").is_err());
/// assert!(board_from_str("K").is_err());
/// ```
pub fn board_from_str(s: &str) -> Result<Vec<Card>, String> {
    if !BOARD_REGEX.is_match(s) {
        return Err(format!("Invalid board: {s}"));
    }

    let mut result = Vec::new();
    let mut chars = s.chars().filter(|c| !c.is_whitespace());
    while let Some(rank_char) = chars.next() {
        let mut card_chars = std::iter::once(rank_char).chain(chars.by_ref().take(1));
        result.push(card_from_chars(&mut card_chars)?);
    }

    result.sort_unstable();

    if result.windows(2).any(|w| w[0] == w[1]) {
        return Err("Cards must be unique".to_string());
    }

    Ok(result)
}
