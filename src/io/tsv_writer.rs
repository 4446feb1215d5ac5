use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::MergedRecord;
use crate::io::fmt_opt;

pub const HEADER: &str = "population\tresponse\ttimepoint\tavg_percentage\tq1\tmedian\tq3\tiqr\tlower_whisker\tupper_whisker\traw_p_value\tfdr_adj_p_value\tneg_log10_fdr_adj_p_value";

pub fn write_tsv(path: &Path, rows: &[MergedRecord]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    write_rows(&mut w, rows)?;
    w.flush()?;
    Ok(())
}

pub fn write_rows<W: Write>(w: &mut W, rows: &[MergedRecord]) -> Result<()> {
    writeln!(w, "{}", HEADER)?;
    for r in rows {
        let s = &r.stats;
        writeln!(
            w,
            "{}\t{}\t{}\t{:.3}\t{:.3}\t{:.3}\t{:.3}\t{:.3}\t{:.3}\t{:.3}\t{}\t{}\t{}",
            r.population,
            r.response,
            r.timepoint,
            s.avg,
            s.q1,
            s.median,
            s.q3,
            s.iqr,
            s.lower_whisker,
            s.upper_whisker,
            fmt_opt(r.raw_p_value),
            fmt_opt(r.fdr_adj_p_value),
            fmt_opt(r.neg_log10_fdr_adj_p_value),
        )?;
    }
    Ok(())
}
