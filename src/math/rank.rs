//! Mid-rank assignment for rank-based tests.

/// Ranks of the pooled sample, 1-based, ties receiving the average rank.
#[derive(Debug, Clone)]
pub struct PooledRanks {
    pub ranks: Vec<f64>,
    /// Sum of `t^3 - t` over tie groups of size `t`.
    pub tie_term: f64,
    pub has_ties: bool,
}

pub fn average_ranks(values: &[f64]) -> PooledRanks {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]).then(a.cmp(&b)));

    let mut ranks = vec![0.0; n];
    let mut tie_term = 0.0;
    let mut has_ties = false;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // positions i..j share ranks i+1..=j
        let avg = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg;
        }
        let t = (j - i) as f64;
        if t > 1.0 {
            has_ties = true;
            tie_term += t * t * t - t;
        }
        i = j;
    }

    PooledRanks {
        ranks,
        tie_term,
        has_ties,
    }
}
