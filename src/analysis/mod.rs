//! Responder vs non-responder statistics engine.
//!
//! Every stage is a pure function from one input batch to one output batch:
//! grouped summaries ([`aggregate`]), per-group test p-values ([`significance`]),
//! batch-wide FDR correction ([`fdr`]) and the left join of the two ([`merge`]).

use std::fmt;

pub mod aggregate;
pub mod fdr;
pub mod merge;
pub mod significance;

pub use significance::TestChoice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Response {
    Yes,
    No,
}

impl Response {
    pub fn as_str(&self) -> &'static str {
        match self {
            Response::Yes => "yes",
            Response::No => "no",
        }
    }

    /// `yes` / `no`, case-insensitive. Anything else is an undefined response.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" => Some(Response::Yes),
            "no" => Some(Response::No),
            _ => None,
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-sample frequency of one cell population.
#[derive(Debug, Clone, PartialEq)]
pub struct CellFrequencyRecord {
    pub sample: String,
    pub population: String,
    pub count: u64,
    pub total_count: u64,
    pub percentage: f64,
    pub response: Option<Response>,
    pub timepoint: i64,
}

/// One percentage observation as handed to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub population: String,
    pub response: Response,
    pub timepoint: i64,
    pub percentage: Option<f64>,
}

impl Observation {
    /// The percentage if present and finite.
    pub fn value(&self) -> Option<f64> {
        self.percentage.filter(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub population: String,
    pub response: Response,
    pub timepoint: i64,
}

/// Testing key. Ordered by timepoint first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TestKey {
    pub timepoint: i64,
    pub population: String,
}

/// Box plot statistics, each already rounded to 3 decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStatistics {
    pub avg: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub key: GroupKey,
    pub n: usize,
    pub stats: SummaryStatistics,
}

/// Uncorrected outcome of one (population, timepoint) test.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTestResult {
    pub key: TestKey,
    pub n_yes: usize,
    pub n_no: usize,
    pub raw_p_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    pub population: String,
    pub timepoint: i64,
    pub raw_p_value: Option<f64>,
    pub fdr_adj_p_value: Option<f64>,
    pub neg_log10_fdr_adj_p_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub population: String,
    pub response: Response,
    pub timepoint: i64,
    pub n: usize,
    pub stats: SummaryStatistics,
    pub raw_p_value: Option<f64>,
    pub fdr_adj_p_value: Option<f64>,
    pub neg_log10_fdr_adj_p_value: Option<f64>,
}

/// Full engine run over the two independently fetched input batches.
///
/// `boxplot_input` feeds the summaries and `testing_input` the tests; the test
/// statistics are never derived from the rounded summaries.
pub fn boxplot_stats(
    boxplot_input: &[Observation],
    testing_input: &[Observation],
    choice: TestChoice,
) -> Vec<MergedRecord> {
    let groups = aggregate::aggregate(boxplot_input);
    let raw = significance::run_tests(testing_input, choice);
    let corrected = fdr::correct(raw);
    merge::merge(&groups, &corrected)
}
