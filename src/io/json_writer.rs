use crate::analysis::MergedRecord;
use crate::ctx::Ctx;
use crate::schema::v1::{BoxplotStatsRow, BoxplotStatsV1, CohortFilterV1, TimepointResult};
use crate::source::CohortFilter;

pub fn build_row(r: &MergedRecord) -> BoxplotStatsRow {
    BoxplotStatsRow {
        population: r.population.clone(),
        response: r.response.as_str().to_string(),
        timepoint: r.timepoint,
        n: r.n as u64,
        avg_percentage: r.stats.avg,
        q1: r.stats.q1,
        median: r.stats.median,
        q3: r.stats.q3,
        iqr: r.stats.iqr,
        lower_whisker: r.stats.lower_whisker,
        upper_whisker: r.stats.upper_whisker,
        raw_p_value: r.raw_p_value,
        fdr_adj_p_value: r.fdr_adj_p_value,
        neg_log10_fdr_adj_p_value: r.neg_log10_fdr_adj_p_value,
    }
}

pub fn build_timepoint_result(ctx: &Ctx) -> TimepointResult {
    TimepointResult {
        timepoint: ctx.filter.timepoint,
        groups: ctx.groups.len() as u64,
        tested: ctx.tests.len() as u64,
        defined_p_values: ctx.defined_p_values() as u64,
        rows: ctx.merged.iter().map(build_row).collect(),
    }
}

pub fn build_report(
    tool_version: &str,
    test: &str,
    filter: &CohortFilter,
    mut results: Vec<TimepointResult>,
) -> BoxplotStatsV1 {
    results.sort_by_key(|r| r.timepoint);
    let mut report = BoxplotStatsV1::empty(
        tool_version,
        test,
        CohortFilterV1 {
            sample_type: filter.sample_type.clone(),
            condition: filter.condition.clone(),
            treatment: filter.treatment.clone(),
        },
    );
    report.results = results;
    report
}
