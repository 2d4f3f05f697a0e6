//! Trailing-window mean and sample standard deviation.
//!
//! MEAN(n)[i]   = sum(x[i-j] for j in 0..n) / n
//! STDDEV(n)[i] = sqrt(sum((x[i-j] - MEAN(n)[i])^2 for j in 0..n) / (n - 1))
//!
//! Warmup: first (n-1) values are `None`. The sample deviation needs at least
//! two observations, so a period below 2 yields `None` everywhere.

pub fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            let window = &values[i + 1 - period..=i];
            Some(window.iter().sum::<f64>() / period as f64)
        })
        .collect()
}

pub fn rolling_sample_stddev(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period < 2 {
        return vec![None; values.len()];
    }

    rolling_mean(values, period)
        .into_iter()
        .enumerate()
        .map(|(i, mean)| {
            let mean = mean?;
            let window = &values[i + 1 - period..=i];
            let variance = window
                .iter()
                .map(|x| {
                    let diff = x - mean;
                    diff * diff
                })
                .sum::<f64>()
                / (period - 1) as f64;
            Some(variance.sqrt())
        })
        .collect()
}
