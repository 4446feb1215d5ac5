use clap::Parser;
use kira_cellfreq::analysis::TestChoice;
use kira_cellfreq::cli::{Cli, Commands};

#[test]
fn boxplot_cohort_defaults() {
    let cli = Cli::parse_from([
        "kira-cellfreq",
        "boxplot",
        "--input",
        "cell-count.csv",
        "--timepoint",
        "0",
        "--test",
        "t-test",
        "--out",
        "out",
    ]);
    match cli.command {
        Commands::Boxplot(args) => {
            assert_eq!(args.test, TestChoice::WelchT);
            assert_eq!(args.timepoint, vec![0]);
            let filter = args.cohort.filter(0);
            assert_eq!(filter.sample_type, "PBMC");
            assert_eq!(filter.condition, "melanoma");
            assert_eq!(filter.treatment, "miraclib");
            assert_eq!(args.threads, 0);
        }
        _ => panic!("expected boxplot command"),
    }
}

#[test]
fn repeated_timepoints_are_collected() {
    let cli = Cli::parse_from([
        "kira-cellfreq",
        "boxplot",
        "--input",
        "cell-count.csv",
        "--timepoint",
        "0",
        "--timepoint",
        "14",
        "--test",
        "mannwhitney",
        "--out",
        "out",
    ]);
    match cli.command {
        Commands::Boxplot(args) => {
            assert_eq!(args.timepoint, vec![0, 14]);
            assert_eq!(args.test, TestChoice::MannWhitney);
        }
        _ => panic!("expected boxplot command"),
    }
}

#[test]
fn unknown_test_variant_is_rejected() {
    let res = Cli::try_parse_from([
        "kira-cellfreq",
        "boxplot",
        "--input",
        "cell-count.csv",
        "--timepoint",
        "0",
        "--test",
        "welch",
        "--out",
        "out",
    ]);
    let err = res.unwrap_err().to_string();
    assert!(err.contains("unknown test variant 'welch'"), "{}", err);
}

#[test]
fn test_variant_has_no_default() {
    let res = Cli::try_parse_from([
        "kira-cellfreq",
        "boxplot",
        "--input",
        "cell-count.csv",
        "--timepoint",
        "0",
        "--out",
        "out",
    ]);
    assert!(res.is_err());
}
