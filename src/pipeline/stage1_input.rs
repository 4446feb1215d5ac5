use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::error::StatsError;
use crate::pipeline::Stage;

pub struct Stage1Input;

impl Stage1Input {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Input {
    fn name(&self) -> &'static str {
        "stage1_input"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        // Two independent pulls: tests must see the unrounded percentages.
        ctx.boxplot_input = ctx
            .source
            .boxplot_input(&ctx.filter)
            .map_err(StatsError::Source)
            .context("failed to fetch box plot input")?;
        ctx.testing_input = ctx
            .source
            .testing_input(&ctx.filter)
            .map_err(StatsError::Source)
            .context("failed to fetch testing input")?;

        if ctx.boxplot_input.is_empty() {
            ctx.warnings.push(format!(
                "no observations for timepoint {} ({}/{}/{})",
                ctx.filter.timepoint,
                ctx.filter.sample_type,
                ctx.filter.condition,
                ctx.filter.treatment
            ));
        }

        info!(
            boxplot_obs = ctx.boxplot_input.len(),
            testing_obs = ctx.testing_input.len(),
            "input_ready"
        );
        Ok(())
    }
}
