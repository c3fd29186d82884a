use std::cmp::Ordering;

use super::types::SummaryRecord;

/// Sorts records for display by `pipeline + group`.
///
/// The key is a plain concatenation, so `("ab", "")` and `("a", "b")`
/// share the key `"ab"`. Such ties fall back to comparing the pipeline
/// name and then the group, which keeps the order identical across runs.
pub fn sort_records(mut records: Vec<SummaryRecord>) -> Vec<SummaryRecord> {
    records.sort_by(compare_records);
    records
}

fn compare_records(a: &SummaryRecord, b: &SummaryRecord) -> Ordering {
    display_key(a)
        .cmp(&display_key(b))
        .then_with(|| a.pipeline.cmp(&b.pipeline))
        .then_with(|| a.group.cmp(&b.group))
}

fn display_key(record: &SummaryRecord) -> String {
    format!("{}{}", record.pipeline, record.group)
}
