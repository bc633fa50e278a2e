use streetcheck_core::Locale;

use crate::model::{FinderResult, ReconInput, ReconSummary, StreetDiff};

/// Compute summary statistics from a finder result and street diff.
pub fn compute_summary(
    input: &ReconInput,
    result: &FinderResult,
    streets: &StreetDiff,
    locale: Locale,
) -> ReconSummary {
    ReconSummary {
        observed_streets: input.observed.len(),
        reference_streets: input.reference.len(),
        suspicious_streets: result.suspicious.len(),
        todo_count: result.todo_count(),
        done_count: result.done_count(),
        additional_count: result.additional_count(),
        missing_streets: streets.missing.len(),
        additional_streets: streets.additional.len(),
        percent: result.coverage().percent(locale),
    }
}
