//! Grouped sample and subject counts for one cohort filter.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::source::{CohortFilter, SampleRow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSampleCount {
    pub project: String,
    pub sample_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectCountByResponse {
    pub response: Option<String>,
    pub subject_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectCountBySex {
    pub sex: Option<String>,
    pub subject_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubsetCounts {
    pub samples_per_project: Vec<ProjectSampleCount>,
    pub subjects_by_response: Vec<SubjectCountByResponse>,
    pub subjects_by_sex: Vec<SubjectCountBySex>,
}

/// Samples per project, distinct subjects per response and per sex.
///
/// All three tables share `filter`. Keys sort ascending with `None` first.
pub fn count_subsets<'a>(
    rows: impl Iterator<Item = &'a SampleRow>,
    filter: &CohortFilter,
) -> SubsetCounts {
    let mut per_project: BTreeMap<&str, u64> = BTreeMap::new();
    let mut by_response: BTreeMap<Option<&'static str>, BTreeSet<&str>> = BTreeMap::new();
    let mut by_sex: BTreeMap<Option<&str>, BTreeSet<&str>> = BTreeMap::new();

    for row in rows.filter(|r| filter.matches(r)) {
        *per_project.entry(row.project.as_str()).or_default() += 1;
        by_response
            .entry(row.response.map(|r| r.as_str()))
            .or_default()
            .insert(row.subject.as_str());
        by_sex
            .entry(row.sex.as_deref())
            .or_default()
            .insert(row.subject.as_str());
    }

    SubsetCounts {
        samples_per_project: per_project
            .into_iter()
            .map(|(project, sample_count)| ProjectSampleCount {
                project: project.to_string(),
                sample_count,
            })
            .collect(),
        subjects_by_response: by_response
            .into_iter()
            .map(|(response, subjects)| SubjectCountByResponse {
                response: response.map(str::to_string),
                subject_count: subjects.len() as u64,
            })
            .collect(),
        subjects_by_sex: by_sex
            .into_iter()
            .map(|(sex, subjects)| SubjectCountBySex {
                sex: sex.map(str::to_string),
                subject_count: subjects.len() as u64,
            })
            .collect(),
    }
}
