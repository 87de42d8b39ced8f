//! Locale-aware string comparison for title ordering.
//!
//! Approximates the root-locale collation a browser's `localeCompare` uses,
//! in three levels followed by a code point tie-break:
//!
//! 1. base letters: diacritics stripped, case folded, with
//!    punctuation/whitespace < digits < letters
//! 2. accents: unaccented before accented
//! 3. case: lowercase before uppercase

use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Character class ordering at the primary level
fn class(c: char) -> u8 {
    if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    }
}

fn primary(s: &str) -> impl Iterator<Item = (u8, char)> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| (class(c), c))
}

fn secondary(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn tertiary(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(char::is_uppercase)
}

/// Compare two strings the way a human-facing sorted list expects
pub fn compare(a: &str, b: &str) -> Ordering {
    primary(a)
        .cmp(primary(b))
        .then_with(|| secondary(a).cmp(secondary(b)))
        .then_with(|| tertiary(a).cmp(tertiary(b)))
        .then_with(|| a.cmp(b))
}
