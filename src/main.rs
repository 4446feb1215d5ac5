use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kira_cellfreq::cli::{BoxplotArgs, Cli, Commands, FrequencyArgs, SubsetArgs, ValidateArgs};
use kira_cellfreq::ctx::{Ctx, SharedSource};
use kira_cellfreq::io;
use kira_cellfreq::io::json_writer::{build_report, build_timepoint_result};
use kira_cellfreq::pipeline::run_timepoints;
use kira_cellfreq::source::{CellCountTable, DataSource};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Boxplot(args) => handle_boxplot(args)?,
        Commands::Frequency(args) => handle_frequency(args)?,
        Commands::Subset(args) => handle_subset(args)?,
        Commands::Validate(args) => handle_validate(args)?,
    }

    Ok(())
}

fn handle_boxplot(args: BoxplotArgs) -> Result<()> {
    let table = CellCountTable::from_path(&args.input)?;
    let source: SharedSource = Arc::new(table);

    let mut timepoints = args.timepoint.clone();
    timepoints.sort_unstable();
    timepoints.dedup();

    let base = args.cohort.filter(timepoints[0]);
    let ctxs = run_timepoints(
        &source,
        &base,
        args.test,
        &timepoints,
        &args.out,
        args.json,
        args.tsv,
        args.threads,
    )?;

    for ctx in &ctxs {
        print_summary(ctx);
    }

    if args.json {
        let results = ctxs.iter().map(build_timepoint_result).collect();
        let report = build_report(
            env!("CARGO_PKG_VERSION"),
            args.test.as_str(),
            &base,
            results,
        );
        let path = &ctxs[0].output.json_path;
        io::write_json(path, &report)?;
        tracing::info!(path = %path.display(), "json report written");
    }
    Ok(())
}

fn handle_frequency(args: FrequencyArgs) -> Result<()> {
    let table = CellCountTable::from_path(&args.input)?;
    let records = table.relative_frequencies()?;
    match args.out {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            let path = dir.join("relative_cell_frequency.tsv");
            let file = std::fs::File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut w = std::io::BufWriter::new(file);
            io::frequency_writer::write_frequencies(&mut w, &records)?;
            tracing::info!(path = %path.display(), rows = records.len(), "frequency table written");
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            io::frequency_writer::write_frequencies(&mut w, &records)?;
        }
    }
    Ok(())
}

fn handle_subset(args: SubsetArgs) -> Result<()> {
    let table = CellCountTable::from_path(&args.input)?;
    let counts = table.subset_counts(&args.filter())?;
    println!("{}", serde_json::to_string_pretty(&counts)?);
    if let Some(dir) = &args.out {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        io::write_json(&dir.join("subset_counts.json"), &counts)?;
    }
    Ok(())
}

fn handle_validate(args: ValidateArgs) -> Result<()> {
    let table = CellCountTable::from_path(&args.input)?;
    let undefined_response = table
        .rows()
        .iter()
        .filter(|r| r.response.is_none())
        .count();
    println!("kira-cellfreq validate ok");
    println!("samples: {}", table.rows().len());
    println!("subjects: {}", table.subject_count());
    println!("undefined response: {}", undefined_response);
    Ok(())
}

fn print_summary(ctx: &Ctx) {
    print!("{}", io::summary::format_summary(ctx));
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
}
