use std::path::PathBuf;
use std::sync::Arc;

use crate::analysis::{GroupSummary, MergedRecord, Observation, RawTestResult, TestChoice, TestResult};
use crate::source::{CohortFilter, DataSource};

pub type SharedSource = Arc<dyn DataSource + Send + Sync>;

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub json_path: PathBuf,
    pub tsv_path: PathBuf,
}

impl OutputPaths {
    pub fn new(out_dir: PathBuf, timepoint: i64) -> Self {
        Self {
            json_path: out_dir.join("boxplot_stats.json"),
            tsv_path: out_dir.join(format!("boxplot_stats_t{}.tsv", timepoint)),
            out_dir,
        }
    }
}

/// State of one box plot request: a single cohort filter and test choice.
pub struct Ctx {
    pub source: SharedSource,
    pub filter: CohortFilter,
    pub test: TestChoice,
    pub write_json: bool,
    pub write_tsv: bool,
    pub output: OutputPaths,
    pub boxplot_input: Vec<Observation>,
    pub testing_input: Vec<Observation>,
    pub groups: Vec<GroupSummary>,
    pub raw_tests: Vec<RawTestResult>,
    pub tests: Vec<TestResult>,
    pub merged: Vec<MergedRecord>,
    pub warnings: Vec<String>,
}

impl Ctx {
    pub fn new(
        source: SharedSource,
        filter: CohortFilter,
        test: TestChoice,
        out_dir: PathBuf,
        write_json: bool,
        write_tsv: bool,
    ) -> Self {
        let output = OutputPaths::new(out_dir, filter.timepoint);
        Self {
            source,
            filter,
            test,
            write_json,
            write_tsv,
            output,
            boxplot_input: Vec::new(),
            testing_input: Vec::new(),
            groups: Vec::new(),
            raw_tests: Vec::new(),
            tests: Vec::new(),
            merged: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn defined_p_values(&self) -> usize {
        self.tests.iter().filter(|t| t.raw_p_value.is_some()).count()
    }
}
