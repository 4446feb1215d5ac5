use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::analysis::{CellFrequencyRecord, Observation, Response};
use crate::error::SourceError;
use crate::source::{CohortFilter, DataSource};
use crate::subset::{self, SubsetCounts};

pub const POPULATIONS: [&str; 5] = ["b_cell", "cd8_t_cell", "cd4_t_cell", "nk_cell", "monocyte"];

const META_COLUMNS: [&str; 9] = [
    "project",
    "subject",
    "condition",
    "sex",
    "treatment",
    "response",
    "sample",
    "sample_type",
    "time_from_treatment_start",
];

/// One sample joined with its subject metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub project: String,
    pub subject: String,
    pub condition: String,
    pub sex: Option<String>,
    pub treatment: String,
    pub response: Option<Response>,
    pub sample: String,
    pub sample_type: String,
    pub timepoint: i64,
    pub counts: [u64; 5],
}

impl SampleRow {
    pub fn total_count(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Cell-count table loaded from a comma or tab delimited file.
#[derive(Debug, Clone)]
pub struct CellCountTable {
    rows: Vec<SampleRow>,
}

impl CellCountTable {
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let content = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse(&content)?;
        if table.rows.is_empty() {
            return Err(SourceError::EmptyTable {
                path: path.to_path_buf(),
            });
        }
        info!(path = %path.display(), samples = table.rows.len(), "cell count table loaded");
        Ok(table)
    }

    pub fn parse(content: &str) -> Result<Self, SourceError> {
        let mut lines = content
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty() && !l.trim_start().starts_with('#'));

        let Some((_, header)) = lines.next() else {
            return Err(SourceError::EmptyTable {
                path: PathBuf::from("<input>"),
            });
        };
        let header = header.strip_prefix('\u{feff}').unwrap_or(header);
        let delim = if header.contains('\t') { '\t' } else { ',' };
        let columns: HashMap<&str, usize> = header
            .split(delim)
            .enumerate()
            .map(|(i, c)| (c.trim(), i))
            .collect();
        let col = |name: &str| -> Result<usize, SourceError> {
            columns
                .get(name)
                .copied()
                .ok_or_else(|| SourceError::MissingColumn {
                    column: name.to_string(),
                })
        };
        let mut meta = [0usize; 9];
        for (slot, name) in meta.iter_mut().zip(META_COLUMNS) {
            *slot = col(name)?;
        }
        let mut pop_cols = [0usize; 5];
        for (slot, name) in pop_cols.iter_mut().zip(POPULATIONS) {
            *slot = col(name)?;
        }
        let width = header.split(delim).count();

        let mut rows = Vec::new();
        for (idx, line) in lines {
            let line_no = idx + 1;
            let fields: Vec<&str> = line.split(delim).map(str::trim).collect();
            if fields.len() != width {
                return Err(SourceError::Malformed {
                    line: line_no,
                    reason: format!("expected {} fields, found {}", width, fields.len()),
                });
            }
            let timepoint = fields[meta[8]]
                .parse::<i64>()
                .map_err(|_| SourceError::Malformed {
                    line: line_no,
                    reason: format!("invalid timepoint '{}'", fields[meta[8]]),
                })?;
            let mut counts = [0u64; 5];
            for (c, (&i, name)) in counts.iter_mut().zip(pop_cols.iter().zip(POPULATIONS)) {
                *c = fields[i].parse::<u64>().map_err(|_| SourceError::Malformed {
                    line: line_no,
                    reason: format!("invalid {} count '{}'", name, fields[i]),
                })?;
            }
            rows.push(SampleRow {
                project: fields[meta[0]].to_string(),
                subject: fields[meta[1]].to_string(),
                condition: fields[meta[2]].to_string(),
                sex: non_empty(fields[meta[3]]),
                treatment: fields[meta[4]].to_string(),
                response: Response::parse(fields[meta[5]]),
                sample: fields[meta[6]].to_string(),
                sample_type: fields[meta[7]].to_string(),
                timepoint,
                counts,
            });
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[SampleRow] {
        &self.rows
    }

    pub fn subject_count(&self) -> usize {
        let mut subjects: Vec<&str> = self.rows.iter().map(|r| r.subject.as_str()).collect();
        subjects.sort_unstable();
        subjects.dedup();
        subjects.len()
    }

    fn cohort_observations(&self, filter: &CohortFilter) -> Vec<Observation> {
        let mut out = Vec::new();
        for row in self.rows.iter().filter(|r| filter.matches(r)) {
            let Some(response) = row.response else {
                continue;
            };
            let total = row.total_count();
            for (name, &count) in POPULATIONS.iter().zip(row.counts.iter()) {
                out.push(Observation {
                    population: name.to_string(),
                    response,
                    timepoint: row.timepoint,
                    percentage: percentage(count, total),
                });
            }
        }
        out
    }
}

impl DataSource for CellCountTable {
    fn boxplot_input(&self, filter: &CohortFilter) -> Result<Vec<Observation>, SourceError> {
        Ok(self.cohort_observations(filter))
    }

    fn testing_input(&self, filter: &CohortFilter) -> Result<Vec<Observation>, SourceError> {
        Ok(self.cohort_observations(filter))
    }

    fn relative_frequencies(&self) -> Result<Vec<CellFrequencyRecord>, SourceError> {
        let mut out = Vec::with_capacity(self.rows.len() * POPULATIONS.len());
        for row in &self.rows {
            let total = row.total_count();
            for (name, &count) in POPULATIONS.iter().zip(row.counts.iter()) {
                let Some(pct) = percentage(count, total) else {
                    continue;
                };
                out.push(CellFrequencyRecord {
                    sample: row.sample.clone(),
                    population: name.to_string(),
                    count,
                    total_count: total,
                    percentage: pct,
                    response: row.response,
                    timepoint: row.timepoint,
                });
            }
        }
        Ok(out)
    }

    fn subset_counts(&self, filter: &CohortFilter) -> Result<SubsetCounts, SourceError> {
        Ok(subset::count_subsets(self.rows.iter(), filter))
    }
}

fn percentage(count: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(100.0 * count as f64 / total as f64)
}

fn non_empty(raw: &str) -> Option<String> {
    match raw {
        "" | "NA" | "null" => None,
        other => Some(other.to_string()),
    }
}
