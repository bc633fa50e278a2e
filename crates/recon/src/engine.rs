use std::io::Read;

use streetcheck_config::RelationConfig;

use crate::error::ReconError;
use crate::finder::{find, FinderOptions};
use crate::input::{group_observed, read_observed_tsv, read_reference_tsv, reference_entries};
use crate::model::{ReconInput, ReconMeta, ReconReport, ReferenceIndex};
use crate::streets::street_diff;
use crate::summary::compute_summary;

/// Run reconciliation for one relation. Returns the finder result, the
/// street diff and a summary.
pub fn run(
    name: &str,
    relation: &RelationConfig,
    input: &ReconInput,
    options: &FinderOptions,
) -> ReconReport {
    let result = find(relation, input, options);
    let streets = street_diff(relation, input);
    let summary = compute_summary(input, &result, &streets, options.locale);

    log::debug!(
        "relation '{name}': {} todo, {} done, {} missing street(s), coverage {}",
        summary.todo_count,
        summary.done_count,
        summary.missing_streets,
        summary.percent
    );

    ReconReport {
        meta: ReconMeta {
            relation: name.to_string(),
            osmrelation: relation.osmrelation,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        result,
        streets,
    }
}

/// Build a relation's input from the observed and reference TSV sources.
pub fn load_input<O: Read, R: Read>(
    relation: &RelationConfig,
    observed: O,
    reference: R,
) -> Result<ReconInput, ReconError> {
    let observed_rows = read_observed_tsv(observed)?;
    let index = ReferenceIndex::from_rows(read_reference_tsv(reference)?);
    Ok(ReconInput {
        observed: group_observed(&observed_rows),
        reference: reference_entries(relation, &index),
    })
}
