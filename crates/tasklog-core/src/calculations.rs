//! Series statistics used by the report stage.

/// Trailing moving average over `values`.
///
/// Entry `i` is the mean of `values[i + 1 - window ..= i]`, or `None` while
/// fewer than `window` values are available. A `window` of 0 yields all
/// `None`.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            (i + 1 >= window).then(|| {
                let sum: f64 = values[i + 1 - window..=i].iter().sum();
                sum / window as f64
            })
        })
        .collect()
}

/// Largest finite value, or `None` for an empty slice.
pub fn max_value(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
}

/// Smallest finite value, or `None` for an empty slice.
pub fn min_value(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.min(v))))
}
