/// Geometric mean of `values`, `None` when there are none.
///
/// Non-positive values are replaced by `zero` so that one bad coefficient lowers the mean
/// instead of collapsing it to zero.
pub fn geometric_mean(values: &[f64], zero: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let log_sum: f64 = values
        .iter()
        .map(|v| if *v > 0.0 { *v } else { zero })
        .map(f64::ln)
        .sum();
    Some((log_sum / values.len() as f64).exp())
}
