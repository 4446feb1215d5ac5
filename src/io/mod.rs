use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

pub mod frequency_writer;
pub mod json_writer;
pub mod summary;
pub mod tsv_writer;

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

/// `NA` for an absent value.
pub(crate) fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.6e}", v),
        None => "NA".to_string(),
    }
}
