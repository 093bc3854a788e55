//! Small numeric helpers shared by the metric implementations.
//!
//! Every helper returns `None` when its input is too short to define the statistic,
//! so callers can turn that into insufficient data.

#[must_use]
#[expect(clippy::cast_precision_loss, reason = "Sample sizes are far below 2^52")]
pub const fn count_f64(n: usize) -> f64 {
    n as f64
}

#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    Some(values.iter().sum::<f64>() / count_f64(values.len()))
}

/// Population standard deviation.
#[must_use]
pub fn population_std(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / count_f64(values.len());
    Some(variance.sqrt())
}

/// Population standard deviation over the mean; `None` when the mean is zero.
#[must_use]
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    if m == 0.0 {
        return None;
    }

    Some(population_std(values)? / m)
}

/// Least-squares slope of `values` against their index.
#[must_use]
pub fn linear_slope(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let n = count_f64(values.len());
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = mean(values)?;

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = count_f64(i) - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }

    Some(num / den)
}

/// Percentile with linear interpolation between closest ranks. `q` is in [0, 1].
#[must_use]
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = q.clamp(0.0, 1.0) * count_f64(sorted.len() - 1);
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "rank is within the slice bounds")]
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let weight = rank - rank.floor();

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// `numerator / denominator`, or `None` for an empty denominator.
#[must_use]
pub fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        return None;
    }

    Some(count_f64(numerator) / count_f64(denominator))
}

/// Drops values further than three standard deviations from the mean.
#[must_use]
pub fn without_outliers(values: &[f64]) -> Vec<f64> {
    let (Some(m), Some(sd)) = (mean(values), population_std(values)) else {
        return Vec::new();
    };

    values.iter().copied().filter(|v| (v - m).abs() <= 3.0 * sd).collect()
}
