//! Descriptive statistics over numeric sequences.

use serde::{Deserialize, Serialize};

use crate::error::{CityBikeError, Result};

/// Summary of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
}

/// Running mean and variance (Welford's algorithm).
#[derive(Debug, Clone, Default)]
pub(crate) struct Moments {
    count: usize,
    mean: f64,
    m2: f64,
}

impl Moments {
    pub(crate) fn add(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub(crate) fn from_values(values: &[f64]) -> Self {
        let mut moments = Self::default();
        for &v in values.iter().filter(|v| v.is_finite()) {
            moments.add(v);
        }
        moments
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    pub(crate) fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation.
    pub(crate) fn std(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.m2 / self.count as f64).sqrt()
        }
    }
}

/// Finite values sorted ascending. NaN and infinities are dropped.
pub(crate) fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Percentile of an ascending, non-empty slice by linear interpolation
/// between closest ranks. `p` is clamped to [0, 100].
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let rank = (p.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let weight = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * weight
        }
    }
}

/// Arithmetic mean of the finite values, `None` when there are none.
pub fn mean(values: &[f64]) -> Option<f64> {
    let moments = Moments::from_values(values);
    (moments.count() > 0).then(|| moments.mean())
}

/// Compute count, mean, median, std, min, max and quartiles.
///
/// Fails with [`CityBikeError::EmptyInput`] when no finite value exists.
/// The input is not modified.
pub fn descriptive_stats(values: &[f64]) -> Result<DescriptiveStats> {
    let sorted = sorted_finite(values);
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Err(CityBikeError::EmptyInput(
            "descriptive statistics need at least one value".to_string(),
        ));
    };

    let moments = Moments::from_values(&sorted);
    Ok(DescriptiveStats {
        count: sorted.len(),
        mean: moments.mean(),
        median: percentile(&sorted, 50.0),
        std: moments.std(),
        min,
        max,
        p25: percentile(&sorted, 25.0),
        p75: percentile(&sorted, 75.0),
        p90: percentile(&sorted, 90.0),
    })
}
