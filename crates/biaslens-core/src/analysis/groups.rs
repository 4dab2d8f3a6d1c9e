use super::{Aggregate, GroupStat};
use crate::model::AnalysisResult;
use std::collections::HashMap;

/// Group key for labels without a usable prefix
pub const OTHER_GROUP: &str = "Other";

/// Top groups keyed by [`label_prefix`]
pub struct GroupAggregator {
    pub limit: usize,
}

impl GroupAggregator {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Aggregate for GroupAggregator {
    type Output = Vec<GroupStat>;

    fn aggregate(&self, records: &[AnalysisResult]) -> Vec<GroupStat> {
        top_groups_by_label_prefix(records, label_prefix, self.limit)
    }
}

/// Text before the first `-`, trimmed, e.g. `"TCS - SDE"` -> `"TCS"`.
///
/// Labels without a `-` or with an empty prefix fall into [`OTHER_GROUP`].
pub fn label_prefix(label: &str) -> String {
    match label.split_once('-') {
        Some((prefix, _)) if !prefix.trim().is_empty() => prefix.trim().to_string(),
        _ => OTHER_GROUP.to_string(),
    }
}

/// Group records by `key_fn(source_label)` and return the largest groups.
///
/// Sorted by total descending; ties keep first-encountered order.
pub fn top_groups_by_label_prefix<F>(
    records: &[AnalysisResult],
    key_fn: F,
    limit: usize,
) -> Vec<GroupStat>
where
    F: Fn(&str) -> String,
{
    let mut groups: Vec<GroupStat> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let key = key_fn(&record.source_label);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(GroupStat {
                key,
                total: 0,
                biased_count: 0,
                clean_count: 0,
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.total += 1;
        if record.bias_detected() {
            group.biased_count += 1;
        } else {
            group.clean_count += 1;
        }
    }

    // sort_by is stable, so equal totals stay in first-seen order
    groups.sort_by(|a, b| b.total.cmp(&a.total));
    groups.truncate(limit);

    tracing::debug!("Grouped {} records into {} groups", records.len(), groups.len());
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, Outcome};

    fn record(label: &str, biased: bool) -> AnalysisResult {
        let mut record = AnalysisResult::pending(label, label, "t", 0);
        record
            .resolve(Outcome::Completed(Classification::new(biased, 80, vec![])))
            .unwrap();
        record
    }

    #[test]
    fn test_label_prefix() {
        assert_eq!(label_prefix("TCS - SDE"), "TCS");
        assert_eq!(label_prefix("Infosys-HR-2024"), "Infosys");
        assert_eq!(label_prefix("  Wipro   -  Intern"), "Wipro");
        assert_eq!(label_prefix("no separator"), OTHER_GROUP);
        assert_eq!(label_prefix(" - orphan"), OTHER_GROUP);
        assert_eq!(label_prefix(""), OTHER_GROUP);
    }

    #[test]
    fn test_groups_by_company() {
        let records = vec![
            record("Infosys - HR", false),
            record("TCS - SDE", true),
            record("TCS - Analyst", false),
        ];

        let groups = top_groups_by_label_prefix(&records, label_prefix, 10);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "TCS");
        assert_eq!(groups[0].total, 2);
        assert_eq!(groups[0].biased_count, 1);
        assert_eq!(groups[0].clean_count, 1);
        assert_eq!(groups[1].key, "Infosys");
        assert_eq!(groups[1].total, 1);
    }

    #[test]
    fn test_ties_keep_first_seen_order_and_limit_applies() {
        let records = vec![
            record("Zoho - A", false),
            record("Accenture - B", false),
            record("misc", true),
            record("Zoho - C", true),
            record("Accenture - D", true),
        ];

        let groups = top_groups_by_label_prefix(&records, label_prefix, 2);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Zoho", "Accenture"]);

        let all = GroupAggregator::new(10).aggregate(&records);
        assert_eq!(all.last().unwrap().key, OTHER_GROUP);
    }

    #[test]
    fn test_custom_key_function() {
        let records = vec![record("tcs - sde", false), record("TCS - Analyst", false)];
        let groups = top_groups_by_label_prefix(&records, |l| label_prefix(l).to_uppercase(), 5);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].total, 2);
    }

    #[test]
    fn test_zero_limit() {
        assert!(top_groups_by_label_prefix(&[record("A - b", false)], label_prefix, 0).is_empty());
    }
}
