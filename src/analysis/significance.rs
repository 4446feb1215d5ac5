use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use statrs::distribution::{ContinuousCDF, Normal, StudentsT};
use tracing::debug;

use crate::analysis::{Observation, RawTestResult, Response, TestKey};
use crate::error::StatsError;
use crate::math::rank::average_ranks;
use crate::math::stats::{mean, sample_variance};

/// Exact Mann-Whitney distribution is used when one arm is this small and no ties exist.
const EXACT_MAX_ARM: usize = 8;

/// Two-sided comparison of the responder arm against the non-responder arm.
///
/// `None` means the statistic is undefined for these arms.
pub trait TwoSampleTest {
    fn run(&self, yes: &[f64], no: &[f64]) -> Option<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestChoice {
    MannWhitney,
    WelchT,
}

impl TestChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestChoice::MannWhitney => "mannwhitney",
            TestChoice::WelchT => "t-test",
        }
    }

    pub fn run(&self, yes: &[f64], no: &[f64]) -> Option<f64> {
        match self {
            TestChoice::MannWhitney => MannWhitneyU.run(yes, no),
            TestChoice::WelchT => WelchT.run(yes, no),
        }
    }
}

impl FromStr for TestChoice {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mannwhitney" => Ok(TestChoice::MannWhitney),
            "t-test" => Ok(TestChoice::WelchT),
            other => Err(StatsError::UnknownTestVariant(other.to_string())),
        }
    }
}

impl fmt::Display for TestChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mann-Whitney U, two-sided.
///
/// Exact null distribution when either arm has at most 8 values and there are
/// no ties, otherwise the normal approximation with tie and continuity correction.
#[derive(Debug, Clone, Copy, Default)]
pub struct MannWhitneyU;

impl TwoSampleTest for MannWhitneyU {
    fn run(&self, yes: &[f64], no: &[f64]) -> Option<f64> {
        let n1 = yes.len();
        let n2 = no.len();
        if n1 == 0 || n2 == 0 {
            return None;
        }
        let pooled: Vec<f64> = yes.iter().chain(no.iter()).copied().collect();
        let ranked = average_ranks(&pooled);
        let r1: f64 = ranked.ranks[..n1].iter().sum();
        let (n1f, n2f) = (n1 as f64, n2 as f64);
        let u1 = r1 - n1f * (n1f + 1.0) / 2.0;
        let u2 = n1f * n2f - u1;
        let u = u1.max(u2);

        if (n1 <= EXACT_MAX_ARM || n2 <= EXACT_MAX_ARM) && !ranked.has_ties {
            if let Some(p) = exact_two_sided(u, n1, n2) {
                return Some(p);
            }
        }
        asymptotic_two_sided(u, n1f, n2f, ranked.tie_term)
    }
}

fn asymptotic_two_sided(u: f64, n1: f64, n2: f64, tie_term: f64) -> Option<f64> {
    let n = n1 + n2;
    let mu = n1 * n2 / 2.0;
    let var = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if var <= 0.0 {
        // every pooled value tied
        return Some(1.0);
    }
    let z = (u - mu - 0.5) / var.sqrt();
    let normal = Normal::new(0.0, 1.0).ok()?;
    Some((2.0 * normal.sf(z)).clamp(0.0, 1.0))
}

fn exact_two_sided(u: f64, n1: usize, n2: usize) -> Option<f64> {
    let counts = u_statistic_counts(n1, n2)?;
    let total: i128 = counts.iter().sum();
    let start = u.round() as usize;
    let upper: i128 = counts.iter().skip(start).sum();
    Some((2.0 * upper as f64 / total as f64).clamp(0.0, 1.0))
}

/// Number of arrangements yielding each U = 0..=m*n under the null.
///
/// These are the coefficients of the Gaussian binomial `[m+n choose m]_q`,
/// built as the product of `(1 - q^(n+i)) / (1 - q^i)` for `i = 1..=m`.
/// `None` on overflow.
fn u_statistic_counts(m: usize, n: usize) -> Option<Vec<i128>> {
    let (m, n) = if m <= n { (m, n) } else { (n, m) };
    let max = m * n;
    let mut c = vec![0i128; max + 1];
    c[0] = 1;
    for i in 1..=m {
        let s = n + i;
        for k in (s..=max).rev() {
            c[k] = c[k].checked_sub(c[k - s])?;
        }
        for k in i..=max {
            c[k] = c[k].checked_add(c[k - i])?;
        }
    }
    Some(c)
}

/// Welch's unequal-variance t-test, two-sided.
#[derive(Debug, Clone, Copy, Default)]
pub struct WelchT;

impl TwoSampleTest for WelchT {
    fn run(&self, yes: &[f64], no: &[f64]) -> Option<f64> {
        if yes.is_empty() || no.is_empty() {
            return None;
        }
        let (n1, n2) = (yes.len() as f64, no.len() as f64);
        let a = sample_variance(yes) / n1;
        let b = sample_variance(no) / n2;
        let se2 = a + b;
        let t = (mean(yes) - mean(no)) / se2.sqrt();
        let df = se2 * se2 / (a * a / (n1 - 1.0) + b * b / (n2 - 1.0));
        if !t.is_finite() || !df.is_finite() || df <= 0.0 {
            return None;
        }
        let dist = StudentsT::new(0.0, 1.0, df).ok()?;
        Some((2.0 * dist.sf(t.abs())).clamp(0.0, 1.0))
    }
}

/// One raw p-value per (population, timepoint) present in `observations`.
///
/// Missing values are dropped per arm. A pair with an empty arm, or whose
/// statistic is undefined, keeps its row with `raw_p_value: None`.
pub fn run_tests(observations: &[Observation], choice: TestChoice) -> Vec<RawTestResult> {
    let mut arms: BTreeMap<TestKey, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for obs in observations {
        let entry = arms
            .entry(TestKey {
                timepoint: obs.timepoint,
                population: obs.population.clone(),
            })
            .or_default();
        if let Some(v) = obs.value() {
            match obs.response {
                Response::Yes => entry.0.push(v),
                Response::No => entry.1.push(v),
            }
        }
    }

    arms.into_iter()
        .map(|(key, (yes, no))| {
            let raw_p_value = if yes.is_empty() || no.is_empty() {
                debug!(
                    population = %key.population,
                    timepoint = key.timepoint,
                    n_yes = yes.len(),
                    n_no = no.len(),
                    "response arm empty, test skipped"
                );
                None
            } else {
                let p = choice.run(&yes, &no);
                if p.is_none() {
                    debug!(
                        population = %key.population,
                        timepoint = key.timepoint,
                        test = %choice,
                        "test statistic undefined"
                    );
                }
                p
            };
            RawTestResult {
                n_yes: yes.len(),
                n_no: no.len(),
                raw_p_value,
                key,
            }
        })
        .collect()
}
