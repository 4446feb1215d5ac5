use std::io::Write;

use anyhow::Result;

use crate::analysis::CellFrequencyRecord;

pub fn write_frequencies<W: Write>(w: &mut W, records: &[CellFrequencyRecord]) -> Result<()> {
    writeln!(
        w,
        "sample\tpopulation\tcount\ttotal_count\tpercentage\tresponse\ttimepoint"
    )?;
    for r in records {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{:.6}\t{}\t{}",
            r.sample,
            r.population,
            r.count,
            r.total_count,
            r.percentage,
            r.response.map(|v| v.as_str()).unwrap_or("NA"),
            r.timepoint
        )?;
    }
    Ok(())
}
