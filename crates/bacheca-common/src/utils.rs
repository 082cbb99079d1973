//! Shared utility functions

use std::collections::HashSet;

/// Parse a comma-delimited identifier list as submitted by a form.
///
/// Splits on comma, trims each entry, drops empties and non-integers, and
/// deduplicates while preserving first-seen order. A dropped entry shows up
/// downstream as a cardinality shortfall when the resolver compares the
/// resolved row count against the requested id count.
pub fn parse_id_list(raw: &str) -> Vec<i64> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<i64>().ok())
        .filter(|id| seen.insert(*id))
        .collect()
}
