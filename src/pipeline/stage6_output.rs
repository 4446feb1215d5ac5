use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::io::tsv_writer;
use crate::pipeline::Stage;

/// Per-timepoint TSV. The JSON report spans every requested timepoint and is
/// written by the caller once all runs finish.
pub struct Stage6Output;

impl Stage6Output {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage6Output {
    fn name(&self) -> &'static str {
        "stage6_output"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if ctx.write_tsv {
            tsv_writer::write_tsv(&ctx.output.tsv_path, &ctx.merged)?;
            info!(path = %ctx.output.tsv_path.display(), "tsv_written");
        }
        info!("stage6_output_ready");
        Ok(())
    }
}
