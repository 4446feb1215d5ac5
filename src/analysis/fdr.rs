use crate::analysis::{RawTestResult, TestResult};

/// Benjamini-Hochberg adjustment over the defined entries of one batch.
///
/// Undefined entries stay undefined and do not count towards `n`.
/// Output is position-aligned with `raw`.
pub fn benjamini_hochberg(raw: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut order: Vec<usize> = (0..raw.len()).filter(|&i| raw[i].is_some()).collect();
    let n = order.len();
    let mut adjusted = vec![None; raw.len()];
    if n == 0 {
        return adjusted;
    }
    order.sort_by(|&a, &b| {
        let pa = raw[a].unwrap_or(f64::NAN);
        let pb = raw[b].unwrap_or(f64::NAN);
        pa.total_cmp(&pb).then(a.cmp(&b))
    });

    let mut running = f64::INFINITY;
    for (rank0, &idx) in order.iter().enumerate().rev() {
        let Some(p) = raw[idx] else { continue };
        let candidate = p * n as f64 / (rank0 + 1) as f64;
        running = running.min(candidate);
        adjusted[idx] = Some(running.min(1.0));
    }
    adjusted
}

/// `-log10(p)`, with an undefined p scored as p = 1.
///
/// p is floored at `f64::MIN_POSITIVE`, so an underflowed p of 0 still scores
/// finite.
pub fn neg_log10_score(adjusted: Option<f64>) -> f64 {
    let score = -adjusted.unwrap_or(1.0).max(f64::MIN_POSITIVE).log10();
    // -log10(1) is -0.0
    if score == 0.0 { 0.0 } else { score }
}

/// Corrects the complete batch produced by one tester invocation.
pub fn correct(raw: Vec<RawTestResult>) -> Vec<TestResult> {
    let p_values: Vec<Option<f64>> = raw.iter().map(|r| r.raw_p_value).collect();
    let adjusted = benjamini_hochberg(&p_values);
    raw.into_iter()
        .zip(adjusted)
        .map(|(r, adj)| TestResult {
            population: r.key.population,
            timepoint: r.key.timepoint,
            raw_p_value: r.raw_p_value,
            fdr_adj_p_value: adj,
            neg_log10_fdr_adj_p_value: neg_log10_score(adj),
        })
        .collect()
}
