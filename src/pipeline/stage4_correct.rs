use anyhow::Result;
use tracing::info;

use crate::analysis::fdr::correct;
use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage4Correct;

impl Stage4Correct {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Correct {
    fn name(&self) -> &'static str {
        "stage4_correct"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let raw = std::mem::take(&mut ctx.raw_tests);
        ctx.tests = correct(raw);
        info!(
            results = ctx.tests.len(),
            defined_p_values = ctx.defined_p_values(),
            "fdr_correction_ready"
        );
        Ok(())
    }
}
