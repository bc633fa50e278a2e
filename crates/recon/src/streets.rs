use std::collections::HashSet;

use streetcheck_config::RelationConfig;
use streetcheck_core::street::sort_streets;

use crate::model::{ReconInput, StreetDiff};

/// Compare street names of both sides after alias resolution.
pub fn street_diff(relation: &RelationConfig, input: &ReconInput) -> StreetDiff {
    let observed_ref_names: HashSet<&str> = input
        .observed
        .iter()
        .map(|s| relation.ref_street_name(&s.name))
        .collect();
    let reference_names: HashSet<&str> = input.reference.iter().map(|s| s.name.as_str()).collect();

    let mut missing: Vec<String> = reference_names
        .iter()
        .filter(|name| !observed_ref_names.contains(*name))
        .map(|name| name.to_string())
        .collect();

    let mut additional: Vec<String> = input
        .observed
        .iter()
        .filter(|s| !reference_names.contains(relation.ref_street_name(&s.name)))
        .filter(|s| !relation.is_street_filtered(&s.name))
        .map(|s| s.name.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    sort_streets(&mut missing);
    sort_streets(&mut additional);
    StreetDiff {
        missing,
        additional,
    }
}
