mod common;

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

use kira_cellfreq::io::tsv_writer::HEADER;

fn run_boxplot(input: &Path, out: &Path, timepoints: &[&str], test: &str) {
    let mut cmd = Command::cargo_bin("kira-cellfreq").unwrap();
    cmd.args(["boxplot", "--input", input.to_str().unwrap()]);
    for tp in timepoints {
        cmd.args(["--timepoint", tp]);
    }
    cmd.args([
        "--test",
        test,
        "--out",
        out.to_str().unwrap(),
        "--json",
        "--tsv",
    ]);
    cmd.assert().success();
}

#[test]
fn tsv_header_order_is_exact() {
    let tmp = TempDir::new().unwrap();
    let input = common::write_cell_counts(tmp.path());
    let out = tmp.path().join("out");
    run_boxplot(&input, &out, &["0"], "mannwhitney");

    let content = fs::read_to_string(out.join("boxplot_stats_t0.tsv")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], HEADER);
    assert_eq!(
        lines[0],
        "population\tresponse\ttimepoint\tavg_percentage\tq1\tmedian\tq3\tiqr\tlower_whisker\tupper_whisker\traw_p_value\tfdr_adj_p_value\tneg_log10_fdr_adj_p_value"
    );
    assert_eq!(lines.len(), 11);
}

#[test]
fn json_report_fields_exist() {
    let tmp = TempDir::new().unwrap();
    let input = common::write_cell_counts(tmp.path());
    let out = tmp.path().join("out");
    run_boxplot(&input, &out, &["0"], "t-test");

    let v: Value =
        serde_json::from_slice(&fs::read(out.join("boxplot_stats.json")).unwrap()).unwrap();
    assert_eq!(v["tool"], "kira-cellfreq");
    assert_eq!(v["schema_version"], "v1");
    assert_eq!(v["test"], "t-test");
    assert_eq!(v["filter"]["sample_type"], "PBMC");
    let rows = v["results"][0]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 10);
    let row = &rows[0];
    for field in [
        "population",
        "response",
        "timepoint",
        "n",
        "avg_percentage",
        "q1",
        "median",
        "q3",
        "iqr",
        "lower_whisker",
        "upper_whisker",
        "raw_p_value",
        "fdr_adj_p_value",
        "neg_log10_fdr_adj_p_value",
    ] {
        assert!(row.get(field).is_some(), "missing {}", field);
    }
    assert_eq!(row["population"], "b_cell");
    assert_eq!(row["response"], "yes");
    // s1 and s3
    assert_eq!(row["n"], 2);
}

#[test]
fn timepoint_without_non_responders_has_null_p_values() {
    let tmp = TempDir::new().unwrap();
    let input = common::write_cell_counts(tmp.path());
    let out = tmp.path().join("out");
    run_boxplot(&input, &out, &["7", "0"], "mannwhitney");

    let v: Value =
        serde_json::from_slice(&fs::read(out.join("boxplot_stats.json")).unwrap()).unwrap();
    let results = v["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["timepoint"], 0);
    assert_eq!(results[1]["timepoint"], 7);
    assert_eq!(results[1]["defined_p_values"], 0);
    for row in results[1]["rows"].as_array().unwrap() {
        assert_eq!(row["response"], "yes");
        assert!(row["raw_p_value"].is_null());
        assert!(row["fdr_adj_p_value"].is_null());
        assert_eq!(row["neg_log10_fdr_adj_p_value"], 0.0);
        assert!(row["median"].is_number());
    }
    assert!(out.join("boxplot_stats_t7.tsv").exists());
}

#[test]
fn unknown_test_variant_fails() {
    let tmp = TempDir::new().unwrap();
    let input = common::write_cell_counts(tmp.path());
    let mut cmd = Command::cargo_bin("kira-cellfreq").unwrap();
    cmd.args([
        "boxplot",
        "--input",
        input.to_str().unwrap(),
        "--timepoint",
        "0",
        "--test",
        "anova",
        "--out",
        tmp.path().join("out").to_str().unwrap(),
    ]);
    cmd.assert().failure();
}

#[test]
fn outputs_are_deterministic() {
    let tmp = TempDir::new().unwrap();
    let input = common::write_cell_counts(tmp.path());
    let out1 = tmp.path().join("out1");
    let out2 = tmp.path().join("out2");
    run_boxplot(&input, &out1, &["0", "7"], "mannwhitney");
    run_boxplot(&input, &out2, &["0", "7"], "mannwhitney");

    for name in ["boxplot_stats.json", "boxplot_stats_t0.tsv", "boxplot_stats_t7.tsv"] {
        let a = fs::read(out1.join(name)).unwrap();
        let b = fs::read(out2.join(name)).unwrap();
        assert_eq!(a, b, "mismatch in {}", name);
    }
}

#[test]
fn frequency_table_lists_every_population() {
    let tmp = TempDir::new().unwrap();
    let input = common::write_cell_counts(tmp.path());
    let mut cmd = Command::cargo_bin("kira-cellfreq").unwrap();
    cmd.args(["frequency", "--input", input.to_str().unwrap()]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "sample\tpopulation\tcount\ttotal_count\tpercentage\tresponse\ttimepoint"
    );
    assert_eq!(lines.len(), 1 + 9 * 5);
    assert_eq!(lines[1], "s1\tb_cell\t100\t1000\t10.000000\tyes\t0");
}

#[test]
fn subset_command_prints_json() {
    let tmp = TempDir::new().unwrap();
    let input = common::write_cell_counts(tmp.path());
    let mut cmd = Command::cargo_bin("kira-cellfreq").unwrap();
    cmd.args([
        "subset",
        "--input",
        input.to_str().unwrap(),
        "--treatment",
        "miraclib",
        "--condition",
        "melanoma",
        "--sample-type",
        "PBMC",
        "--timepoint",
        "0",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let v: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(v["samples_per_project"].as_array().unwrap().len(), 2);
}
