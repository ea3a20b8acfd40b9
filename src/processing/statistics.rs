use serde::Serialize;

/// Descriptive statistics for a numeric column.
///
/// Every field is `None` when the column has no present values; skewness
/// and kurtosis are additionally `None` when the variance is zero, since
/// the standardized moments are undefined there.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NumericSummary {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub q25: Option<f64>,
    pub q75: Option<f64>,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
}

impl NumericSummary {
    /// The all-null summary used for columns with no present values.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compute statistics over the present values of a column.
    pub fn compute(values: &[Option<f64>]) -> Self {
        let mut vals: Vec<f64> = values.iter().copied().flatten().collect();
        if vals.is_empty() {
            return Self::empty();
        }

        vals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let count = vals.len();
        let n = count as f64;

        let min = vals[0];
        let max = vals[count - 1];
        let mean = vals.iter().sum::<f64>() / n;

        let median = if count % 2 == 0 {
            (vals[count / 2 - 1] + vals[count / 2]) / 2.0
        } else {
            vals[count / 2]
        };

        // Population moments about the mean.
        let m2 = vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let m3 = vals.iter().map(|v| (v - mean).powi(3)).sum::<f64>() / n;
        let m4 = vals.iter().map(|v| (v - mean).powi(4)).sum::<f64>() / n;

        let (skewness, kurtosis) = if m2 > 0.0 {
            (Some(m3 / m2.powf(1.5)), Some(m4 / (m2 * m2) - 3.0))
        } else {
            (None, None)
        };

        NumericSummary {
            mean: Some(mean),
            median: Some(median),
            std: Some(m2.sqrt()),
            min: Some(min),
            max: Some(max),
            q25: Some(quantile(&vals, 0.25)),
            q75: Some(quantile(&vals, 0.75)),
            skewness,
            kurtosis,
        }
    }
}

/// Quantile of a sorted, non-empty slice with linear interpolation
/// between the two nearest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Pearson correlation over pairwise-complete observations: rows where
/// either value is missing are skipped. `None` with fewer than two
/// complete pairs or when either side has zero variance.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}
