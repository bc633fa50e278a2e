//! House number parsing and normalization.
//!
//! Raw values come from two sources with different habits: the reference
//! data uses `-` joined tokens such as `25-27`, the observed data carries
//! suffixes such as `42a` or `42/1`. Normalization reduces both to plain
//! integer strings so that the sides can be compared as sets.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::ranges::Ranges;

fn leading_digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]+)").expect("static regex"))
}

// ---------------------------------------------------------------------------
// HouseNumber
// ---------------------------------------------------------------------------

/// A house number split into its leading number and the rest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct HouseNumber {
    pub number: u64,
    pub suffix: String,
}

impl HouseNumber {
    pub fn parse(raw: &str) -> Self {
        let (number, suffix) = split_house_number(raw);
        Self { number, suffix }
    }
}

impl fmt::Display for HouseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.suffix)
    }
}

/// Split `"42ab"` into `(42, "ab")`. Without leading digits the number is 0
/// and the whole input is the suffix. A digit run too long for `u64` gives
/// `u64::MAX` with the whole input as the suffix, so it sorts last.
pub fn split_house_number(raw: &str) -> (u64, String) {
    match leading_digits().find(raw) {
        Some(m) => match m.as_str().parse() {
            Ok(number) => (number, raw[m.end()..].to_string()),
            Err(_) => (u64::MAX, raw.to_string()),
        },
        None => (0, raw.to_string()),
    }
}

/// Sort by numeric value first, suffix second.
pub fn sort_numerically(numbers: &mut [String]) {
    numbers.sort_by_cached_key(|n| split_house_number(n));
}

/// Deduplicate and sort numerically.
pub fn sorted_unique<I, S>(numbers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let set: BTreeSet<String> = numbers.into_iter().map(Into::into).collect();
    let mut out: Vec<String> = set.into_iter().collect();
    sort_numerically(&mut out);
    out
}

/// Split numbers into `(odd, even)` keeping the input order in each half.
pub fn split_even_odd(numbers: &[String]) -> (Vec<String>, Vec<String>) {
    numbers
        .iter()
        .cloned()
        .partition(|n| split_house_number(n).0 % 2 == 1)
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The piece does not start with a digit.
    NoLeadingDigits,
    /// The leading digits do not fit into a house number.
    Overflow,
    /// The number is outside the street's configured ranges.
    OutsideRanges,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLeadingDigits => write!(f, "no_leading_digits"),
            Self::Overflow => write!(f, "overflow"),
            Self::OutsideRanges => write!(f, "outside_ranges"),
        }
    }
}

/// A piece of a raw house number that normalization discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedToken {
    pub street: String,
    pub token: String,
    pub reason: DropReason,
}

/// Normalize a raw house number field into integer strings.
///
/// The field is split on `-`, each piece is reduced to its leading digit
/// run as written (`"042a"` gives `"042"`) and pieces without digits are
/// skipped. With `ranges`, numbers outside of
/// them are skipped as well. The output is neither deduplicated nor sorted.
pub fn normalize(raw: &str, ranges: Option<&Ranges>) -> Vec<String> {
    normalize_pieces(raw, ranges, |_, _| {})
}

/// Like [`normalize`], recording every skipped piece into `dropped`.
pub fn normalize_with_diagnostics(
    raw: &str,
    street: &str,
    ranges: Option<&Ranges>,
    dropped: &mut Vec<DroppedToken>,
) -> Vec<String> {
    normalize_pieces(raw, ranges, |token, reason| {
        dropped.push(DroppedToken {
            street: street.to_string(),
            token: token.to_string(),
            reason,
        })
    })
}

fn normalize_pieces<F>(raw: &str, ranges: Option<&Ranges>, mut on_drop: F) -> Vec<String>
where
    F: FnMut(&str, DropReason),
{
    let mut out = Vec::new();
    for piece in raw.split('-') {
        let Some(m) = leading_digits().find(piece) else {
            on_drop(piece, DropReason::NoLeadingDigits);
            continue;
        };
        let Ok(number) = m.as_str().parse::<u64>() else {
            on_drop(piece, DropReason::Overflow);
            continue;
        };
        if let Some(ranges) = ranges {
            if !ranges.contains(number) {
                on_drop(piece, DropReason::OutsideRanges);
                continue;
            }
        }
        out.push(m.as_str().to_string());
    }
    out
}
