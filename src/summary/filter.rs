use super::types::{MembershipRule, SummaryRecord};

/// Group name in a rule that selects the ungrouped record of a pipeline.
const ALL_GROUP: &str = "all";

/// Keeps the records selected by at least one rule, preserving order.
///
/// With no rules every record is kept. Records whose pipeline is not
/// named by any rule are dropped.
pub fn filter_records(records: Vec<SummaryRecord>, rules: &[MembershipRule]) -> Vec<SummaryRecord> {
    if rules.is_empty() {
        return records;
    }

    records
        .into_iter()
        .filter(|record| rules.iter().any(|rule| rule_selects(rule, record)))
        .collect()
}

fn rule_selects(rule: &MembershipRule, record: &SummaryRecord) -> bool {
    if rule.pipeline != record.pipeline {
        return false;
    }

    if rule.groups.is_empty() {
        return true;
    }

    rule.groups
        .iter()
        .any(|group| (group == ALL_GROUP && record.group.is_empty()) || *group == record.group)
}
