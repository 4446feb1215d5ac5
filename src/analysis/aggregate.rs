use std::collections::BTreeMap;

use tracing::debug;

use crate::analysis::{GroupKey, GroupSummary, Observation, SummaryStatistics};
use crate::math::stats::{mean, quantile_sorted, round_to, sort_values};

const DECIMALS: i32 = 3;
const WHISKER_SPAN: f64 = 1.5;

/// Groups observations by (population, response, timepoint) and summarizes each.
///
/// Missing percentages are ignored; a group with no finite value emits nothing.
/// Output is ordered by group key.
pub fn aggregate(observations: &[Observation]) -> Vec<GroupSummary> {
    let mut groups: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
    for obs in observations {
        let values = groups
            .entry(GroupKey {
                population: obs.population.clone(),
                response: obs.response,
                timepoint: obs.timepoint,
            })
            .or_default();
        if let Some(v) = obs.value() {
            values.push(v);
        }
    }

    let mut out = Vec::with_capacity(groups.len());
    for (key, mut values) in groups {
        if values.is_empty() {
            debug!(
                population = %key.population,
                response = %key.response,
                timepoint = key.timepoint,
                "group has no observed percentages"
            );
            continue;
        }
        sort_values(&mut values);
        out.push(GroupSummary {
            n: values.len(),
            stats: summarize_sorted(&values),
            key,
        });
    }
    out
}

/// Box plot statistics of a non-empty ascending slice.
///
/// IQR and whiskers come from the unrounded quartiles; all values are rounded once here.
pub fn summarize_sorted(sorted: &[f64]) -> SummaryStatistics {
    let q1 = quantile_sorted(sorted, 0.25);
    let median = quantile_sorted(sorted, 0.5);
    let q3 = quantile_sorted(sorted, 0.75);
    let iqr = q3 - q1;
    SummaryStatistics {
        avg: round_to(mean(sorted), DECIMALS),
        q1: round_to(q1, DECIMALS),
        median: round_to(median, DECIMALS),
        q3: round_to(q3, DECIMALS),
        iqr: round_to(iqr, DECIMALS),
        lower_whisker: round_to(q1 - WHISKER_SPAN * iqr, DECIMALS),
        upper_whisker: round_to(q3 + WHISKER_SPAN * iqr, DECIMALS),
    }
}
