use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Interpolation
// ---------------------------------------------------------------------------

/// How a range treats numbers whose parity differs from its start.
///
/// Serialized as the configuration strings `""` and `"all"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Interpolation {
    /// Only numbers with the same parity as `start` are members.
    #[default]
    None,
    /// Every integer between `start` and `end` is a member.
    All,
}

impl Interpolation {
    /// Parse the configuration form. Returns `None` for unknown values.
    pub fn from_config_str(value: &str) -> Option<Self> {
        match value {
            "" => Some(Self::None),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub fn as_config_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::All => "all",
        }
    }
}

impl TryFrom<String> for Interpolation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_config_str(&value)
            .ok_or_else(|| format!("unknown interpolation '{value}', expected \"\" or \"all\""))
    }
}

impl From<Interpolation> for String {
    fn from(value: Interpolation) -> Self {
        value.as_config_str().to_string()
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_config_str())
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// Inclusive house number interval with a parity constraint.
///
/// Equality compares the interpolation mode too: `Range::new(1, 3)` and
/// `Range::with_interpolation(1, 3, Interpolation::All)` are different ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: u64,
    pub end: u64,
    #[serde(default)]
    pub interpolation: Interpolation,
}

impl Range {
    pub fn new(start: u64, end: u64) -> Self {
        Self::with_interpolation(start, end, Interpolation::None)
    }

    pub fn with_interpolation(start: u64, end: u64, interpolation: Interpolation) -> Self {
        Self {
            start,
            end,
            interpolation,
        }
    }

    #[inline]
    pub fn contains(&self, number: u64) -> bool {
        if number < self.start || number > self.end {
            return false;
        }
        match self.interpolation {
            Interpolation::All => true,
            Interpolation::None => number % 2 == self.start % 2,
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.interpolation {
            Interpolation::None => write!(f, "{}-{}", self.start, self.end),
            Interpolation::All => write!(f, "{}-{} (all)", self.start, self.end),
        }
    }
}

// ---------------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------------

/// Ordered set of ranges; a number is a member if any range contains it.
///
/// An empty set contains nothing. Callers that want "no filtering" for a
/// street hold no `Ranges` at all rather than an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranges {
    items: Vec<Range>,
}

impl Ranges {
    pub fn new(items: Vec<Range>) -> Self {
        Self { items }
    }

    pub fn contains(&self, number: u64) -> bool {
        self.items.iter().any(|range| range.contains(number))
    }

    pub fn items(&self) -> &[Range] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Range> for Ranges {
    fn from_iter<I: IntoIterator<Item = Range>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn range_parity() {
        let range = Range::new(1, 5);
        assert!(range.contains(1));
        assert!(range.contains(3));
        assert!(range.contains(5));
        assert!(!range.contains(2));
        assert!(!range.contains(7));
    }

    #[test]
    fn range_interpolation_all() {
        let range = Range::with_interpolation(1, 3, Interpolation::All);
        assert!(range.contains(1));
        assert!(range.contains(2));
        assert!(range.contains(3));
        assert!(!range.contains(4));
    }

    #[test]
    fn range_equality_includes_interpolation() {
        assert_eq!(Range::new(1, 3), Range::new(1, 3));
        assert_ne!(Range::new(1, 3), Range::with_interpolation(1, 3, Interpolation::All));
        assert_ne!(Range::new(1, 3), Range::new(1, 5));
    }

    #[test]
    fn ranges_is_union() {
        let ranges = Ranges::new(vec![Range::new(0, 0), Range::new(1, 1)]);
        assert!(ranges.contains(0));
        assert!(ranges.contains(1));
        assert!(!ranges.contains(2));
    }

    #[test]
    fn empty_ranges_contain_nothing() {
        let ranges = Ranges::default();
        assert!(ranges.is_empty());
        assert!(!ranges.contains(0));
        assert!(!ranges.contains(1));
    }

    #[test]
    fn interpolation_config_strings() {
        assert_eq!(Interpolation::from_config_str(""), Some(Interpolation::None));
        assert_eq!(Interpolation::from_config_str("all"), Some(Interpolation::All));
        assert_eq!(Interpolation::from_config_str("odd"), None);
        assert_eq!(String::from(Interpolation::All), "all");
        assert!(Interpolation::try_from("odd".to_string()).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Range::new(2, 10).to_string(), "2-10");
        assert_eq!(
            Range::with_interpolation(1, 9, Interpolation::All).to_string(),
            "1-9 (all)"
        );
    }

    proptest! {
        #[test]
        fn parity_range_membership(start in 0u64..500, len in 0u64..500, n in 0u64..1500) {
            let range = Range::new(start, start + len);
            let expected = n >= start && n <= start + len && n % 2 == start % 2;
            prop_assert_eq!(range.contains(n), expected);
        }

        #[test]
        fn interpolated_range_membership(start in 0u64..500, len in 0u64..500, n in 0u64..1500) {
            let range = Range::with_interpolation(start, start + len, Interpolation::All);
            prop_assert_eq!(range.contains(n), n >= start && n <= start + len);
        }

        #[test]
        fn ranges_order_does_not_matter(a in 0u64..50, b in 0u64..50, n in 0u64..120) {
            let first = Range::new(a, a + 20);
            let second = Range::with_interpolation(b, b + 10, Interpolation::All);
            let forward = Ranges::new(vec![first, second]);
            let backward = Ranges::new(vec![second, first]);
            prop_assert_eq!(forward.contains(n), backward.contains(n));
            prop_assert_eq!(forward.contains(n), first.contains(n) || second.contains(n));
        }
    }
}
