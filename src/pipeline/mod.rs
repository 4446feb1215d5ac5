use anyhow::Result;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use crate::analysis::TestChoice;
use crate::ctx::{Ctx, SharedSource};
use crate::source::CohortFilter;

#[cfg(feature = "mt")]
use rayon::prelude::*;

pub mod stage0_scaffold;
pub mod stage1_input;
pub mod stage2_aggregate;
pub mod stage4_correct;
pub mod stage5_merge;
pub mod stage6_output;

pub trait Stage {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut Ctx) -> Result<()>;
}

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Input through merge, without writing anything.
    pub fn analysis() -> Self {
        Self::new(vec![
            Box::new(stage1_input::Stage1Input::new()),
            Box::new(stage2_aggregate::Stage2Aggregate::new()),
            Box::new(stage3_test::Stage3Test::new()),
            Box::new(stage4_correct::Stage4Correct::new()),
            Box::new(stage5_merge::Stage5Merge::new()),
        ])
    }

    pub fn full() -> Self {
        Self::new(vec![
            Box::new(stage0_scaffold::Stage0Scaffold::new()),
            Box::new(stage1_input::Stage1Input::new()),
            Box::new(stage2_aggregate::Stage2Aggregate::new()),
            Box::new(stage3_test::Stage3Test::new()),
            Box::new(stage4_correct::Stage4Correct::new()),
            Box::new(stage5_merge::Stage5Merge::new()),
            Box::new(stage6_output::Stage6Output::new()),
        ])
    }

    pub fn run(&self, ctx: &mut Ctx) -> Result<()> {
        info!(
            timepoint = ctx.filter.timepoint,
            test = %ctx.test,
            "request started"
        );
        for stage in &self.stages {
            let start = Instant::now();
            info!(stage = stage.name(), "stage started");
            if let Err(err) = stage.run(ctx) {
                let elapsed_ms = start.elapsed().as_millis();
                warn!(
                    stage = stage.name(),
                    elapsed_ms = elapsed_ms as u64,
                    "stage failed"
                );
                return Err(err);
            }
            let elapsed_ms = start.elapsed().as_millis();
            info!(
                stage = stage.name(),
                elapsed_ms = elapsed_ms as u64,
                "stage finished"
            );
        }
        Ok(())
    }
}

/// One pipeline run per timepoint, each on its own `Ctx`.
///
/// With neither output requested the analysis-only pipeline runs and nothing
/// touches `out_dir`.
/// Runs share nothing but the read-only source, so with the `mt` feature they
/// are evaluated concurrently. Results come back in `timepoints` order.
pub fn run_timepoints(
    source: &SharedSource,
    base: &CohortFilter,
    test: TestChoice,
    timepoints: &[i64],
    out_dir: &Path,
    write_json: bool,
    write_tsv: bool,
    threads: usize,
) -> Result<Vec<Ctx>> {
    let run_one = |timepoint: i64| -> Result<Ctx> {
        let mut ctx = Ctx::new(
            source.clone(),
            base.with_timepoint(timepoint),
            test,
            out_dir.to_path_buf(),
            write_json,
            write_tsv,
        );
        let pipeline = if write_json || write_tsv {
            Pipeline::full()
        } else {
            Pipeline::analysis()
        };
        pipeline.run(&mut ctx)?;
        Ok(ctx)
    };

    #[cfg(feature = "mt")]
    {
        if timepoints.len() > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| anyhow::anyhow!("failed to build thread pool: {}", e))?;
            return pool.install(|| timepoints.par_iter().map(|&tp| run_one(tp)).collect());
        }
    }

    #[cfg(not(feature = "mt"))]
    let _ = threads;

    timepoints.iter().map(|&tp| run_one(tp)).collect()
}
