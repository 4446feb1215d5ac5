use std::collections::HashMap;

use crate::analysis::{GroupSummary, MergedRecord, TestResult};

/// Left join of group summaries against test results on (population, timepoint).
///
/// Each test result fans out to every response row sharing its key. Summary
/// rows without a match keep null test fields; no summary row is dropped.
pub fn merge(groups: &[GroupSummary], tests: &[TestResult]) -> Vec<MergedRecord> {
    let mut index: HashMap<(&str, i64), &TestResult> = HashMap::with_capacity(tests.len());
    for t in tests {
        index.entry((t.population.as_str(), t.timepoint)).or_insert(t);
    }

    groups
        .iter()
        .map(|g| {
            let hit = index
                .get(&(g.key.population.as_str(), g.key.timepoint))
                .copied();
            MergedRecord {
                population: g.key.population.clone(),
                response: g.key.response,
                timepoint: g.key.timepoint,
                n: g.n,
                stats: g.stats,
                raw_p_value: hit.and_then(|t| t.raw_p_value),
                fdr_adj_p_value: hit.and_then(|t| t.fdr_adj_p_value),
                neg_log10_fdr_adj_p_value: hit.map(|t| t.neg_log10_fdr_adj_p_value),
            }
        })
        .collect()
}
