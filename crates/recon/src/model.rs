use std::collections::BTreeMap;

use serde::Serialize;
use streetcheck_core::{Coverage, DroppedToken};

// ---------------------------------------------------------------------------
// Raw rows
// ---------------------------------------------------------------------------

/// One row of the observed (map data) TSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedRow {
    pub id: String,
    pub street: String,
    pub housenumber: String,
    pub postcode: String,
    pub housename: String,
    pub conscriptionnumber: String,
    /// Free-form trailing columns, kept as-is.
    pub tail: Vec<String>,
}

impl ObservedRow {
    /// The value compared against the reference: the house number, or the
    /// conscription number when the house number is empty.
    pub fn house_number_token(&self) -> Option<&str> {
        [self.housenumber.as_str(), self.conscriptionnumber.as_str()]
            .into_iter()
            .find(|v| !v.trim().is_empty())
    }
}

/// One row of the reference TSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRow {
    pub county: String,
    pub settlement: String,
    pub street: String,
    pub housenumber: String,
}

// ---------------------------------------------------------------------------
// Reference index
// ---------------------------------------------------------------------------

/// Key = (county, settlement, street).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReferenceKey {
    pub county: String,
    pub settlement: String,
    pub street: String,
}

/// Reference house numbers grouped by (county, settlement, street).
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    streets: BTreeMap<ReferenceKey, Vec<String>>,
}

impl ReferenceIndex {
    pub fn from_rows(rows: impl IntoIterator<Item = ReferenceRow>) -> Self {
        let mut streets: BTreeMap<ReferenceKey, Vec<String>> = BTreeMap::new();
        for row in rows {
            let key = ReferenceKey {
                county: row.county,
                settlement: row.settlement,
                street: row.street,
            };
            streets.entry(key).or_default().push(row.housenumber);
        }
        Self { streets }
    }

    pub fn house_numbers(&self, county: &str, settlement: &str, street: &str) -> &[String] {
        let key = ReferenceKey {
            county: county.to_string(),
            settlement: settlement.to_string(),
            street: street.to_string(),
        };
        self.streets.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Street names present in any of `settlements` of `county`, in key order.
    pub fn streets<'a>(
        &'a self,
        county: &'a str,
        settlements: &'a [String],
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.streets
            .keys()
            .filter(move |k| k.county == county && settlements.contains(&k.settlement))
            .map(|k| k.street.as_str())
    }

    pub fn len(&self) -> usize {
        self.streets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streets.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Finder input / output
// ---------------------------------------------------------------------------

/// A street with its raw house number tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetEntry {
    pub name: String,
    pub house_numbers: Vec<String>,
}

impl StreetEntry {
    pub fn new(name: impl Into<String>, house_numbers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            house_numbers,
        }
    }
}

/// Pre-loaded data for one relation: observed streets keyed by their own
/// names, reference streets keyed by reference names.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub observed: Vec<StreetEntry>,
    pub reference: Vec<StreetEntry>,
}

/// A street and a numerically sorted list of its house numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreetNumbers {
    pub street: String,
    /// Simplified street name, stable across runs.
    pub slug: String,
    pub numbers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FinderResult {
    /// Streets with numbers only in the reference, most missing first.
    pub suspicious: Vec<StreetNumbers>,
    /// Streets with numbers present on both sides, in encounter order.
    pub done: Vec<StreetNumbers>,
    /// Streets with numbers only in the observed data, most first.
    pub additional: Vec<StreetNumbers>,
    /// Tokens skipped during normalization; empty unless requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<DroppedToken>,
}

impl FinderResult {
    /// Number of house numbers only in the reference.
    pub fn todo_count(&self) -> usize {
        self.suspicious.iter().map(|s| s.numbers.len()).sum()
    }

    /// Number of house numbers present on both sides.
    pub fn done_count(&self) -> usize {
        self.done.iter().map(|s| s.numbers.len()).sum()
    }

    pub fn additional_count(&self) -> usize {
        self.additional.iter().map(|s| s.numbers.len()).sum()
    }

    pub fn coverage(&self) -> Coverage {
        Coverage::new(self.done_count(), self.todo_count())
    }
}

/// Street-level comparison, after alias resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreetDiff {
    /// Reference streets nobody observed.
    pub missing: Vec<String>,
    /// Observed streets unknown to the reference, minus `street-filters`.
    pub additional: Vec<String>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub observed_streets: usize,
    pub reference_streets: usize,
    pub suspicious_streets: usize,
    pub todo_count: usize,
    pub done_count: usize,
    pub additional_count: usize,
    pub missing_streets: usize,
    pub additional_streets: usize,
    /// Coverage percentage, locale formatted, or "N/A".
    pub percent: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub result: FinderResult,
    pub streets: StreetDiff,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub relation: String,
    pub osmrelation: Option<u64>,
    pub engine_version: String,
    pub run_at: String,
}
