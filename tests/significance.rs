use std::str::FromStr;

use kira_cellfreq::analysis::fdr::correct;
use kira_cellfreq::analysis::significance::{run_tests, MannWhitneyU, TwoSampleTest, WelchT};
use kira_cellfreq::analysis::{Observation, Response, TestChoice};
use kira_cellfreq::error::StatsError;

const YES: [f64; 3] = [12.0, 15.0, 18.0];
const NO: [f64; 3] = [20.0, 25.0, 30.0];

fn obs(population: &str, response: Response, timepoint: i64, pct: Option<f64>) -> Observation {
    Observation {
        population: population.to_string(),
        response,
        timepoint,
        percentage: pct,
    }
}

#[test]
fn both_variants_give_defined_p_values() {
    for choice in [TestChoice::MannWhitney, TestChoice::WelchT] {
        let p = choice.run(&YES, &NO).unwrap();
        assert!(p > 0.0 && p <= 1.0, "{} gave {}", choice, p);
        assert_eq!(choice.run(&YES, &NO), Some(p));
    }
}

#[test]
fn mann_whitney_exact_for_small_untied_arms() {
    let p = MannWhitneyU.run(&YES, &NO).unwrap();
    assert!((p - 0.1).abs() < 1e-12);
}

#[test]
fn mann_whitney_is_symmetric_in_arm_order() {
    let a = MannWhitneyU.run(&YES, &NO).unwrap();
    let b = MannWhitneyU.run(&NO, &YES).unwrap();
    assert!((a - b).abs() < 1e-12);
}

#[test]
fn mann_whitney_normal_approximation_with_ties() {
    let yes: Vec<f64> = (1..=10).map(f64::from).collect();
    let no: Vec<f64> = (6..=15).map(f64::from).collect();
    let p = MannWhitneyU.run(&yes, &no).unwrap();
    assert!((p - 0.005075392).abs() < 1e-6);
}

#[test]
fn mann_whitney_all_tied_is_not_significant() {
    let p = MannWhitneyU.run(&[5.0, 5.0], &[5.0, 5.0, 5.0]).unwrap();
    assert_eq!(p, 1.0);
}

#[test]
fn welch_t_matches_reference() {
    let p = WelchT.run(&YES, &NO).unwrap();
    assert!((p - 0.0528955).abs() < 1e-4);
}

#[test]
fn welch_t_zero_variance_is_undefined() {
    assert_eq!(WelchT.run(&[1.0, 1.0], &[2.0, 2.0]), None);
    assert_eq!(WelchT.run(&[3.0, 3.0], &[3.0, 3.0]), None);
}

#[test]
fn welch_t_single_observation_arm_is_undefined() {
    assert_eq!(WelchT.run(&[1.0], &[2.0, 3.0, 4.0]), None);
}

#[test]
fn test_choice_parses_known_variants_only() {
    assert_eq!(TestChoice::from_str("mannwhitney").unwrap(), TestChoice::MannWhitney);
    assert_eq!(TestChoice::from_str("t-test").unwrap(), TestChoice::WelchT);
    for bad in ["", "ttest", "MannWhitney", "welch"] {
        match TestChoice::from_str(bad) {
            Err(StatsError::UnknownTestVariant(v)) => assert_eq!(v, bad),
            other => panic!("expected UnknownTestVariant, got {:?}", other),
        }
    }
}

#[test]
fn one_result_per_population_timepoint() {
    let mut input = Vec::new();
    for tp in [0, 7] {
        for (&y, &n) in YES.iter().zip(NO.iter()) {
            input.push(obs("b_cell", Response::Yes, tp, Some(y)));
            input.push(obs("b_cell", Response::No, tp, Some(n)));
            input.push(obs("nk_cell", Response::Yes, tp, Some(n)));
            input.push(obs("nk_cell", Response::No, tp, Some(y)));
        }
    }
    let results = run_tests(&input, TestChoice::MannWhitney);
    assert_eq!(results.len(), 4);
    assert_eq!(results[0].key.timepoint, 0);
    assert_eq!(results[0].key.population, "b_cell");
    assert_eq!(results[3].key.timepoint, 7);
    assert_eq!(results[3].key.population, "nk_cell");
    assert!(results.iter().all(|r| r.raw_p_value.is_some()));
    assert!(results.iter().all(|r| r.n_yes == 3 && r.n_no == 3));
}

#[test]
fn empty_arm_keeps_row_without_p_value() {
    let input = vec![
        obs("monocyte", Response::Yes, 0, Some(10.0)),
        obs("monocyte", Response::Yes, 0, Some(11.0)),
        obs("monocyte", Response::No, 0, None),
        obs("b_cell", Response::Yes, 0, Some(1.0)),
        obs("b_cell", Response::No, 0, Some(2.0)),
    ];
    for choice in [TestChoice::MannWhitney, TestChoice::WelchT] {
        let results = run_tests(&input, choice);
        assert_eq!(results.len(), 2);
        let mono = results
            .iter()
            .find(|r| r.key.population == "monocyte")
            .unwrap();
        assert_eq!(mono.raw_p_value, None);
        assert_eq!(mono.n_yes, 2);
        assert_eq!(mono.n_no, 0);
    }
}

#[test]
fn degenerate_welch_group_leaves_siblings_tested() {
    let mut input = vec![
        // zero variance in both arms
        obs("monocyte", Response::Yes, 0, Some(10.0)),
        obs("monocyte", Response::Yes, 0, Some(10.0)),
        obs("monocyte", Response::No, 0, Some(10.0)),
        obs("monocyte", Response::No, 0, Some(10.0)),
        // single responder value
        obs("nk_cell", Response::Yes, 0, Some(5.0)),
        obs("nk_cell", Response::No, 0, Some(6.0)),
        obs("nk_cell", Response::No, 0, Some(7.0)),
    ];
    for (y, n) in YES.iter().zip(NO.iter()) {
        input.push(obs("b_cell", Response::Yes, 0, Some(*y)));
        input.push(obs("b_cell", Response::No, 0, Some(*n)));
    }

    let raw = run_tests(&input, TestChoice::WelchT);
    assert_eq!(raw.len(), 3);
    let tested = correct(raw);

    let by_pop = |name: &str| tested.iter().find(|t| t.population == name).unwrap();
    assert_eq!(by_pop("monocyte").raw_p_value, None);
    assert_eq!(by_pop("monocyte").fdr_adj_p_value, None);
    assert_eq!(by_pop("nk_cell").raw_p_value, None);
    assert_eq!(by_pop("nk_cell").fdr_adj_p_value, None);

    let b = by_pop("b_cell");
    let p = b.raw_p_value.unwrap();
    assert!((p - WelchT.run(&YES, &NO).unwrap()).abs() < 1e-15);
    // the only defined p-value, so n = 1
    assert_eq!(b.fdr_adj_p_value, Some(p));
}
