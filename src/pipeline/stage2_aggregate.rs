use anyhow::Result;
use tracing::info;

use crate::analysis::aggregate::aggregate;
use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage2Aggregate;

impl Stage2Aggregate {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Aggregate {
    fn name(&self) -> &'static str {
        "stage2_aggregate"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        ctx.groups = aggregate(&ctx.boxplot_input);
        info!(groups = ctx.groups.len(), "aggregation_ready");
        Ok(())
    }
}
