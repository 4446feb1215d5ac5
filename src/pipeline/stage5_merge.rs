use anyhow::{Result, bail};
use tracing::info;

use crate::analysis::merge::merge;
use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage5Merge;

impl Stage5Merge {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Merge {
    fn name(&self) -> &'static str {
        "stage5_merge"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        ctx.merged = merge(&ctx.groups, &ctx.tests);
        if ctx.merged.len() != ctx.groups.len() {
            bail!(
                "merge produced {} rows for {} groups",
                ctx.merged.len(),
                ctx.groups.len()
            );
        }
        let unmatched = ctx
            .merged
            .iter()
            .filter(|m| m.neg_log10_fdr_adj_p_value.is_none())
            .count();
        info!(merged_rows = ctx.merged.len(), unmatched, "merge_ready");
        Ok(())
    }
}
