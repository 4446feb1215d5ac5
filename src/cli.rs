use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::analysis::TestChoice;
use crate::source::{CohortFilter, DEFAULT_CONDITION, DEFAULT_SAMPLE_TYPE, DEFAULT_TREATMENT};

#[derive(Debug, Parser)]
#[command(
    name = "kira-cellfreq",
    version,
    about = "Responder vs non-responder immune cell frequency statistics"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Boxplot(BoxplotArgs),
    Frequency(FrequencyArgs),
    Subset(SubsetArgs),
    Validate(ValidateArgs),
}

#[derive(Debug, Clone, Args)]
pub struct CohortArgs {
    #[arg(long, default_value = DEFAULT_SAMPLE_TYPE)]
    pub sample_type: String,

    #[arg(long, default_value = DEFAULT_CONDITION)]
    pub condition: String,

    #[arg(long, default_value = DEFAULT_TREATMENT)]
    pub treatment: String,
}

impl CohortArgs {
    pub fn filter(&self, timepoint: i64) -> CohortFilter {
        CohortFilter {
            sample_type: self.sample_type.clone(),
            condition: self.condition.clone(),
            treatment: self.treatment.clone(),
            timepoint,
        }
    }
}

#[derive(Debug, Args)]
pub struct BoxplotArgs {
    #[arg(long, help = "Cell count table (.csv or .tsv)")]
    pub input: PathBuf,

    #[arg(
        long,
        required = true,
        num_args = 1..,
        allow_negative_numbers = true,
        help = "Days from treatment start (repeatable)"
    )]
    pub timepoint: Vec<i64>,

    #[arg(long, help = "Significance test: mannwhitney|t-test")]
    pub test: TestChoice,

    #[command(flatten)]
    pub cohort: CohortArgs,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub tsv: bool,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = auto)")]
    pub threads: usize,
}

#[derive(Debug, Args)]
pub struct FrequencyArgs {
    #[arg(long, help = "Cell count table (.csv or .tsv)")]
    pub input: PathBuf,

    #[arg(long, help = "Write relative_cell_frequency.tsv here instead of stdout")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SubsetArgs {
    #[arg(long, help = "Cell count table (.csv or .tsv)")]
    pub input: PathBuf,

    #[arg(long)]
    pub treatment: String,

    #[arg(long)]
    pub condition: String,

    #[arg(long)]
    pub sample_type: String,

    #[arg(long, allow_negative_numbers = true)]
    pub timepoint: i64,

    #[arg(long, help = "Write subset_counts.json here in addition to stdout")]
    pub out: Option<PathBuf>,
}

impl SubsetArgs {
    pub fn filter(&self) -> CohortFilter {
        CohortFilter {
            sample_type: self.sample_type.clone(),
            condition: self.condition.clone(),
            treatment: self.treatment.clone(),
            timepoint: self.timepoint,
        }
    }
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long, help = "Cell count table (.csv or .tsv)")]
    pub input: PathBuf,
}
