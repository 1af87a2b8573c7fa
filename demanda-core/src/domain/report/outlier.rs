// demanda-core/src/domain/report/outlier.rs

use serde::Serialize;

/// Rolling mean/variance accumulated with Welford's online algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollingStats {
    pub mean: f64,
    pub variance: f64,
    pub count: usize,
}

impl RollingStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.mean = value;
            self.variance = 0.0;
        } else {
            let old_mean = self.mean;
            self.mean += (value - old_mean) / (self.count as f64);
            // Welford: M2_new = M2_old + (x - old_mean) * (x - new_mean)
            let prev_m2 = self.variance * (self.count - 1) as f64;
            let new_m2 = prev_m2 + (value - old_mean) * (value - self.mean);
            self.variance = new_m2 / self.count as f64;
        }
    }

    pub fn stddev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// A monetary value whose |z| against its column exceeds the threshold.
#[derive(Debug, Clone, Serialize)]
pub struct AmountOutlier {
    pub row: usize,
    pub field: String,
    pub value: f64,
    pub z_score: f64,
}

/// Two-pass detection: build the distribution first, then score every value
/// against it. Degenerate columns (fewer than 2 values, or near-zero
/// spread) report nothing.
pub fn detect_outliers(field: &str, samples: &[(usize, f64)], threshold: f64) -> Vec<AmountOutlier> {
    let mut stats = RollingStats::default();
    for (_, value) in samples {
        stats.push(*value);
    }
    if stats.count < 2 {
        return Vec::new();
    }
    let stddev = stats.stddev();
    if stddev <= 1e-9 {
        return Vec::new();
    }

    samples
        .iter()
        .filter_map(|&(row, value)| {
            let z_score = ((value - stats.mean) / stddev).abs();
            (z_score > threshold).then(|| AmountOutlier {
                row,
                field: field.to_string(),
                value,
                z_score,
            })
        })
        .collect()
}
