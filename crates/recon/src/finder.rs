//! Three-way house number classification per street.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use streetcheck_config::RelationConfig;
use streetcheck_core::housenumber::sorted_unique;
use streetcheck_core::{
    normalize, normalize_with_diagnostics, street, DroppedToken, Locale, Ranges,
};

use crate::model::{FinderResult, ReconInput, StreetEntry, StreetNumbers};

/// Explicit per-run context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinderOptions {
    /// Language used for user-facing numbers such as the coverage percentage.
    #[serde(default)]
    pub locale: Locale,
    /// Record tokens that normalization skipped into the result.
    #[serde(default)]
    pub collect_diagnostics: bool,
}

/// Classify the house numbers of every observed street.
///
/// Observed streets are resolved to their reference name through the
/// relation's `refstreets`; both sides are normalized with the street's
/// ranges, if any. Entries repeating a street name on either side are
/// merged. Streets without observed data are not visited, see
/// [`crate::streets::street_diff`] for those.
pub fn find(
    relation: &RelationConfig,
    input: &ReconInput,
    options: &FinderOptions,
) -> FinderResult {
    let street_ranges = relation.street_ranges();
    let reference: HashMap<&str, Vec<&String>> =
        merge_entries(&input.reference).into_iter().collect();

    let mut result = FinderResult::default();

    for (osm_name, osm_tokens) in merge_entries(&input.observed) {
        let ref_name = relation.ref_street_name(osm_name);
        let ranges = street_ranges.get(osm_name);
        let ref_tokens = reference
            .get(ref_name)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let dropped = options.collect_diagnostics.then_some(&mut result.dropped);
        let (ref_numbers, osm_numbers) =
            normalize_street(osm_name, ref_tokens, &osm_tokens, ranges, dropped);

        let only_ref = sorted_unique(ref_numbers.difference(&osm_numbers).cloned());
        let both = sorted_unique(ref_numbers.intersection(&osm_numbers).cloned());
        let only_osm = sorted_unique(osm_numbers.difference(&ref_numbers).cloned());

        log::debug!(
            "street '{}' (ref '{}'): {} only in reference, {} in both, {} only observed",
            osm_name,
            ref_name,
            only_ref.len(),
            both.len(),
            only_osm.len()
        );

        push_non_empty(&mut result.suspicious, osm_name, only_ref);
        push_non_empty(&mut result.done, osm_name, both);
        push_non_empty(&mut result.additional, osm_name, only_osm);
    }

    // Stable: ties keep encounter order.
    result.suspicious.sort_by(|a, b| b.numbers.len().cmp(&a.numbers.len()));
    result.additional.sort_by(|a, b| b.numbers.len().cmp(&a.numbers.len()));
    result
}

/// Tokens of every entry per street name, in first-seen street order.
fn merge_entries(entries: &[StreetEntry]) -> Vec<(&str, Vec<&String>)> {
    let mut merged: Vec<(&str, Vec<&String>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        let slot = *index.entry(entry.name.as_str()).or_insert_with(|| {
            merged.push((entry.name.as_str(), Vec::new()));
            merged.len() - 1
        });
        merged[slot].1.extend(&entry.house_numbers);
    }
    merged
}

fn normalize_street(
    street_name: &str,
    ref_tokens: &[&String],
    osm_tokens: &[&String],
    ranges: Option<&Ranges>,
    dropped: Option<&mut Vec<DroppedToken>>,
) -> (BTreeSet<String>, BTreeSet<String>) {
    match dropped {
        Some(dropped) => {
            let mut side = |tokens: &[&String]| -> BTreeSet<String> {
                tokens
                    .iter()
                    .flat_map(|t| normalize_with_diagnostics(t, street_name, ranges, dropped))
                    .collect()
            };
            let ref_numbers = side(ref_tokens);
            let osm_numbers = side(osm_tokens);
            (ref_numbers, osm_numbers)
        }
        None => {
            let side = |tokens: &[&String]| -> BTreeSet<String> {
                tokens.iter().flat_map(|t| normalize(t, ranges)).collect()
            };
            (side(ref_tokens), side(osm_tokens))
        }
    }
}

fn push_non_empty(list: &mut Vec<StreetNumbers>, street_name: &str, numbers: Vec<String>) {
    if numbers.is_empty() {
        return;
    }
    list.push(StreetNumbers {
        street: street_name.to_string(),
        slug: street::simplify(street_name),
        numbers,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use streetcheck_core::DropReason;

    fn entry(name: &str, numbers: &[&str]) -> StreetEntry {
        StreetEntry::new(name, numbers.iter().map(|n| n.to_string()).collect())
    }

    fn numbers(list: &[StreetNumbers], street: &str) -> Vec<String> {
        list.iter()
            .find(|s| s.street == street)
            .map(|s| s.numbers.clone())
            .unwrap_or_default()
    }

    #[test]
    fn three_way_split() {
        let input = ReconInput {
            observed: vec![entry("Main utca", &["1", "10", "5"])],
            reference: vec![entry("Main utca", &["1", "2", "10", "12"])],
        };
        let result = find(&RelationConfig::default(), &input, &FinderOptions::default());
        assert_eq!(numbers(&result.suspicious, "Main utca"), vec!["2", "12"]);
        assert_eq!(numbers(&result.done, "Main utca"), vec!["1", "10"]);
        assert_eq!(numbers(&result.additional, "Main utca"), vec!["5"]);
        assert_eq!(result.suspicious[0].slug, "main_utca");
        assert!(result.dropped.is_empty());
    }

    #[test]
    fn alias_resolves_reference_name() {
        let relation = RelationConfig::from_yaml("refstreets:\n  OSM utca: Ref utca\n").unwrap();
        let input = ReconInput {
            observed: vec![entry("OSM utca", &["1"])],
            reference: vec![entry("Ref utca", &["1", "3"])],
        };
        let result = find(&relation, &input, &FinderOptions::default());
        assert_eq!(numbers(&result.suspicious, "OSM utca"), vec!["3"]);
        assert_eq!(numbers(&result.done, "OSM utca"), vec!["1"]);
    }

    #[test]
    fn ranges_restrict_both_sides() {
        let relation = RelationConfig::from_yaml(
            "filters:\n  Main utca:\n    ranges:\n      - {start: \"1\", end: \"9\"}\n",
        )
        .unwrap();
        let input = ReconInput {
            observed: vec![entry("Main utca", &["3", "4"])],
            reference: vec![entry("Main utca", &["1-3", "2", "11"])],
        };
        let result = find(&relation, &input, &FinderOptions::default());
        assert_eq!(numbers(&result.suspicious, "Main utca"), vec!["1"]);
        assert_eq!(numbers(&result.done, "Main utca"), vec!["3"]);
        assert!(result.additional.is_empty());
    }

    #[test]
    fn suspicious_sorted_by_missing_count() {
        let input = ReconInput {
            observed: vec![
                entry("A utca", &["1"]),
                entry("B utca", &["1"]),
                entry("C utca", &["1"]),
            ],
            reference: vec![
                entry("A utca", &["1", "2"]),
                entry("B utca", &["1", "2", "3", "4"]),
                entry("C utca", &["1", "5"]),
            ],
        };
        let result = find(&RelationConfig::default(), &input, &FinderOptions::default());
        let order: Vec<&str> = result.suspicious.iter().map(|s| s.street.as_str()).collect();
        assert_eq!(order, vec!["B utca", "A utca", "C utca"]);
        assert_eq!(result.todo_count(), 5);
        assert_eq!(result.done_count(), 3);
    }

    #[test]
    fn street_without_reference_is_all_additional() {
        let input = ReconInput {
            observed: vec![entry("Új utca", &["7", "7a"])],
            reference: vec![],
        };
        let result = find(&RelationConfig::default(), &input, &FinderOptions::default());
        assert!(result.suspicious.is_empty());
        assert!(result.done.is_empty());
        assert_eq!(numbers(&result.additional, "Új utca"), vec!["7"]);
        assert_eq!(result.coverage().percent(Locale::En), "N/A");
    }

    #[test]
    fn repeated_street_entries_are_merged() {
        let input = ReconInput {
            observed: vec![entry("A utca", &["1"]), entry("A utca", &["2"])],
            reference: vec![entry("A utca", &["1", "2"]), entry("A utca", &["3"])],
        };
        let result = find(&RelationConfig::default(), &input, &FinderOptions::default());
        assert_eq!(result.done.len(), 1);
        assert_eq!(numbers(&result.done, "A utca"), vec!["1", "2"]);
        assert_eq!(result.suspicious.len(), 1);
        assert_eq!(numbers(&result.suspicious, "A utca"), vec!["3"]);
        assert!(result.additional.is_empty());
    }

    #[test]
    fn diagnostics_only_when_requested() {
        let input = ReconInput {
            observed: vec![entry("A utca", &["1", "x"])],
            reference: vec![entry("A utca", &["1", "-"])],
        };
        let quiet = find(&RelationConfig::default(), &input, &FinderOptions::default());
        assert!(quiet.dropped.is_empty());

        let options = FinderOptions {
            collect_diagnostics: true,
            ..FinderOptions::default()
        };
        let loud = find(&RelationConfig::default(), &input, &options);
        assert_eq!(loud.dropped.len(), 3);
        assert!(loud.dropped.iter().all(|d| d.reason == DropReason::NoLeadingDigits));
        assert_eq!(loud.dropped[2].token, "x");
        assert_eq!(quiet.done, loud.done);
    }

    #[test]
    fn idempotent() {
        let input = ReconInput {
            observed: vec![entry("B utca", &["1", "3"]), entry("A utca", &["2"])],
            reference: vec![
                entry("A utca", &["2", "4", "6"]),
                entry("B utca", &["1", "5", "7", "9"]),
            ],
        };
        let options = FinderOptions::default();
        let first = find(&RelationConfig::default(), &input, &options);
        let second = find(&RelationConfig::default(), &input, &options);
        assert_eq!(first, second);
    }
}
