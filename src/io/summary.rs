use crate::ctx::Ctx;

const ALPHA: f64 = 0.05;

pub fn format_summary(ctx: &Ctx) -> String {
    let version = env!("CARGO_PKG_VERSION");
    let mut out = String::new();
    out.push_str(&format!("kira-cellfreq v{}\n", version));
    out.push_str(&format!(
        "Cohort: {}/{}/{}, timepoint={}, test={}\n",
        ctx.filter.sample_type,
        ctx.filter.condition,
        ctx.filter.treatment,
        ctx.filter.timepoint,
        ctx.test
    ));
    out.push_str(&format!(
        "Groups: {}, tested: {}, defined p-values: {}\n",
        ctx.groups.len(),
        ctx.tests.len(),
        ctx.defined_p_values()
    ));

    let significant: Vec<&str> = ctx
        .tests
        .iter()
        .filter(|t| t.fdr_adj_p_value.is_some_and(|p| p < ALPHA))
        .map(|t| t.population.as_str())
        .collect();
    if significant.is_empty() {
        out.push_str("Significant (FDR < 0.05): none\n");
    } else {
        out.push_str(&format!(
            "Significant (FDR < 0.05): {}\n",
            significant.join(", ")
        ));
    }
    out
}
