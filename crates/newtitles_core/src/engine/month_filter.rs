//! Month-windowed filter and call-number ordering.
//!
//! # Responsibility
//! - Select books acquired in the month before the reference month.
//! - Order them by call number with locale-style collation.
//!
//! # Invariants
//! - The displayed reference month is one month ahead of the matched month.
//! - Ordering is total and stable: equal call numbers keep catalog order.

use crate::model::book::Book;
use crate::model::month::YearMonth;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Acquisition month matched for a displayed reference month.
pub fn target_month(reference: YearMonth) -> YearMonth {
    reference.previous()
}

/// Books acquired in `target_month(reference)`, sorted by call number.
///
/// Undated books never match. An empty catalog yields an empty listing.
pub fn filter_and_sort(books: &[Book], reference: YearMonth) -> Vec<&Book> {
    let target = target_month(reference);
    let mut listing = books
        .iter()
        .filter(|book| book.acquired_in(target))
        .collect::<Vec<_>>();
    // sort_by_cached_key is stable, so identical call numbers keep source order.
    listing.sort_by_cached_key(|book| CollationKey::new(&book.callno));
    listing
}


/// Compares call numbers the way the listing orders them.
///
/// The primary level orders whitespace, then punctuation and symbols, then
/// digits, then letters, ignoring case and accents. Accents break ties next,
/// then case (lowercase first). Canonically equivalent texts compare equal.
pub fn compare_callno(left: &str, right: &str) -> Ordering {
    CollationKey::new(left).cmp(&CollationKey::new(right))
}

/// Punctuation and symbols in ascending primary order.
const SYMBOL_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Primary {
    Space,
    Symbol(u32),
    Digit(u32),
    Letter(char),
}

impl Primary {
    fn of(ch: char) -> Self {
        if ch.is_whitespace() {
            return Self::Space;
        }
        if let Some(digit) = ch.to_digit(10) {
            return Self::Digit(digit);
        }
        if ch.is_alphanumeric() {
            return Self::Letter(ch);
        }
        let weight = SYMBOL_ORDER
            .chars()
            .position(|symbol| symbol == ch)
            .map(|index| index as u32)
            .unwrap_or(SYMBOL_ORDER.len() as u32 + u32::from(ch));
        Self::Symbol(weight)
    }
}

/// Every level is derived from the NFD form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct CollationKey {
    primary: Vec<Primary>,
    accents: Vec<Vec<char>>,
    uppercase: Vec<bool>,
}

impl CollationKey {
    fn new(value: &str) -> Self {
        let mut key = Self {
            primary: Vec::new(),
            accents: Vec::new(),
            uppercase: Vec::new(),
        };
        for ch in value.nfd() {
            if is_combining_mark(ch) {
                match key.accents.last_mut() {
                    Some(marks) => marks.push(ch),
                    None => key.accents.push(vec![ch]),
                }
                continue;
            }
            let upper = ch.is_uppercase();
            for lower in ch.to_lowercase() {
                key.primary.push(Primary::of(lower));
                key.accents.push(Vec::new());
                key.uppercase.push(upper);
            }
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::{compare_callno, target_month};
    use crate::model::month::YearMonth;
    use std::cmp::Ordering;

    #[test]
    fn target_is_previous_month_across_year_boundary() {
        let january = YearMonth::new(2024, 1).unwrap();
        assert_eq!(target_month(january), YearMonth::new(2023, 12).unwrap());
    }

    #[test]
    fn letters_compare_case_insensitively_first() {
        assert_eq!(compare_callno("b100", "C100"), Ordering::Less);
        assert_eq!(compare_callno("DS70", "ds71"), Ordering::Less);
    }

    #[test]
    fn lowercase_sorts_before_uppercase_on_tie() {
        assert_eq!(compare_callno("ds70", "DS70"), Ordering::Less);
        assert_eq!(compare_callno("DS70", "DS70"), Ordering::Equal);
    }

    #[test]
    fn accents_are_secondary() {
        assert_eq!(compare_callno("e2", "é1"), Ordering::Greater);
        assert_eq!(compare_callno("e1", "é1"), Ordering::Less);
    }

    #[test]
    fn composed_and_decomposed_forms_compare_equal() {
        assert_eq!(compare_callno("e\u{301}1", "\u{e9}1"), Ordering::Equal);
        assert_eq!(compare_callno("E\u{301}1", "\u{c9}1"), Ordering::Equal);
        assert_eq!(compare_callno("\u{e9}1", "\u{c9}1"), Ordering::Less);
    }

    #[test]
    fn punctuation_sorts_before_digits() {
        assert_eq!(compare_callno("DS70:5", "DS705"), Ordering::Less);
        assert_eq!(compare_callno("DS70_1", "DS70.5"), Ordering::Less);
        assert_eq!(compare_callno("DS70[1]", "DS701"), Ordering::Less);
        assert_eq!(compare_callno("DS70 5", "DS70_1"), Ordering::Less);
    }

    #[test]
    fn digits_sort_before_letters() {
        assert_eq!(compare_callno("DS709", "DS70a"), Ordering::Less);
    }
}
