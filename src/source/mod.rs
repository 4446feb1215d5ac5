//! Data source boundary.
//!
//! The engine only ever sees what a [`DataSource`] hands it. Each call is an
//! independent pull; nothing is cached between calls.

use crate::analysis::{CellFrequencyRecord, Observation};
use crate::error::SourceError;
use crate::subset::SubsetCounts;

pub mod cell_counts;

pub use cell_counts::{CellCountTable, SampleRow, POPULATIONS};

pub const DEFAULT_SAMPLE_TYPE: &str = "PBMC";
pub const DEFAULT_CONDITION: &str = "melanoma";
pub const DEFAULT_TREATMENT: &str = "miraclib";

/// Equality predicates restricting a pull to one cohort and timepoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortFilter {
    pub sample_type: String,
    pub condition: String,
    pub treatment: String,
    pub timepoint: i64,
}

impl CohortFilter {
    pub fn new(timepoint: i64) -> Self {
        Self {
            sample_type: DEFAULT_SAMPLE_TYPE.to_string(),
            condition: DEFAULT_CONDITION.to_string(),
            treatment: DEFAULT_TREATMENT.to_string(),
            timepoint,
        }
    }

    pub fn with_timepoint(&self, timepoint: i64) -> Self {
        Self {
            timepoint,
            ..self.clone()
        }
    }

    pub fn matches(&self, row: &SampleRow) -> bool {
        row.sample_type == self.sample_type
            && row.condition == self.condition
            && row.treatment == self.treatment
            && row.timepoint == self.timepoint
    }
}

pub trait DataSource {
    /// Observations feeding the box plot summaries.
    fn boxplot_input(&self, filter: &CohortFilter) -> Result<Vec<Observation>, SourceError>;

    /// Unrounded observations feeding the significance tests.
    fn testing_input(&self, filter: &CohortFilter) -> Result<Vec<Observation>, SourceError>;

    fn relative_frequencies(&self) -> Result<Vec<CellFrequencyRecord>, SourceError>;

    fn subset_counts(&self, filter: &CohortFilter) -> Result<SubsetCounts, SourceError>;
}
