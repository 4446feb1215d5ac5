use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortFilterV1 {
    pub sample_type: String,
    pub condition: String,
    pub treatment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxplotStatsRow {
    pub population: String,
    pub response: String,
    pub timepoint: i64,
    pub n: u64,
    pub avg_percentage: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub raw_p_value: Option<f64>,
    pub fdr_adj_p_value: Option<f64>,
    pub neg_log10_fdr_adj_p_value: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimepointResult {
    pub timepoint: i64,
    pub groups: u64,
    pub tested: u64,
    pub defined_p_values: u64,
    pub rows: Vec<BoxplotStatsRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxplotStatsV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub test: String,
    pub filter: CohortFilterV1,
    pub results: Vec<TimepointResult>,
}

impl BoxplotStatsV1 {
    pub fn empty(tool_version: &str, test: &str, filter: CohortFilterV1) -> Self {
        Self {
            tool: "kira-cellfreq".to_string(),
            version: tool_version.to_string(),
            schema_version: "v1".to_string(),
            test: test.to_string(),
            filter,
            results: Vec::new(),
        }
    }
}
