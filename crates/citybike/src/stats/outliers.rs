//! Outlier detection by z-score and interquartile range.

use serde::{Deserialize, Serialize};

use super::descriptive::{percentile, sorted_finite, Moments};

/// Tukey fences of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Compute the fences `[q1 - m·iqr, q3 + m·iqr]`, `None` with no finite values.
pub fn iqr_bounds(values: &[f64], multiplier: f64) -> Option<IqrBounds> {
    let sorted = sorted_finite(values);
    if sorted.is_empty() {
        return None;
    }
    let q1 = percentile(&sorted, 25.0);
    let q3 = percentile(&sorted, 75.0);
    let iqr = q3 - q1;
    Some(IqrBounds {
        q1,
        q3,
        iqr,
        lower: q1 - multiplier * iqr,
        upper: q3 + multiplier * iqr,
    })
}

/// Indices whose |z| exceeds `threshold`. Empty when the std is zero.
pub fn zscore_outliers(values: &[f64], threshold: f64) -> Vec<usize> {
    let moments = Moments::from_values(values);
    let std = moments.std();
    if moments.count() == 0 || std == 0.0 {
        return Vec::new();
    }

    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite() && ((**v - moments.mean()) / std).abs() > threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Indices outside the Tukey fences.
pub fn iqr_outliers(values: &[f64], multiplier: f64) -> Vec<usize> {
    let Some(bounds) = iqr_bounds(values, multiplier) else {
        return Vec::new();
    };

    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite() && (**v < bounds.lower || **v > bounds.upper))
        .map(|(i, _)| i)
        .collect()
}

/// An outlier rule and its parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum OutlierMethod {
    ZScore { threshold: f64 },
    Iqr { multiplier: f64 },
}

impl OutlierMethod {
    pub const DEFAULT_ZSCORE_THRESHOLD: f64 = 3.0;
    pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

    pub fn zscore() -> Self {
        OutlierMethod::ZScore {
            threshold: Self::DEFAULT_ZSCORE_THRESHOLD,
        }
    }

    pub fn iqr() -> Self {
        OutlierMethod::Iqr {
            multiplier: Self::DEFAULT_IQR_MULTIPLIER,
        }
    }

    /// Parse a method name (`zscore`/`z-score`/`iqr`) with an optional
    /// parameter override.
    pub fn from_name(name: &str, parameter: Option<f64>) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "zscore" | "z-score" | "z_score" => Some(OutlierMethod::ZScore {
                threshold: parameter.unwrap_or(Self::DEFAULT_ZSCORE_THRESHOLD),
            }),
            "iqr" => Some(OutlierMethod::Iqr {
                multiplier: parameter.unwrap_or(Self::DEFAULT_IQR_MULTIPLIER),
            }),
            _ => None,
        }
    }

    /// Indices of outlying values.
    pub fn detect(&self, values: &[f64]) -> Vec<usize> {
        match *self {
            OutlierMethod::ZScore { threshold } => zscore_outliers(values, threshold),
            OutlierMethod::Iqr { multiplier } => iqr_outliers(values, multiplier),
        }
    }

    pub fn label(&self) -> String {
        match self {
            OutlierMethod::ZScore { threshold } => format!("z-score > {}", threshold),
            OutlierMethod::Iqr { multiplier } => format!("IQR x {}", multiplier),
        }
    }
}

impl Default for OutlierMethod {
    fn default() -> Self {
        Self::iqr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPIKE: [f64; 5] = [1.0, 1.0, 1.0, 1.0, 50.0];

    #[test]
    fn test_iqr_flags_spike() {
        assert_eq!(iqr_outliers(&SPIKE, 1.5), vec![4]);
        let bounds = iqr_bounds(&SPIKE, 1.5).unwrap();
        assert_eq!(bounds.iqr, 0.0);
        assert_eq!(bounds.upper, 1.0);
    }

    #[test]
    fn test_zscore_flags_spike() {
        // Population z of the spike is exactly 2.0 for five values.
        assert_eq!(zscore_outliers(&SPIKE, 1.5), vec![4]);
        assert!(zscore_outliers(&SPIKE, 3.0).is_empty());
    }

    #[test]
    fn test_zscore_zero_std_is_empty() {
        assert!(zscore_outliers(&[2.0, 2.0, 2.0], 0.5).is_empty());
        assert!(zscore_outliers(&[], 3.0).is_empty());
    }

    #[test]
    fn test_indices_refer_to_input_positions() {
        let values = [f64::NAN, 1.0, 1.0, 1.0, 1.0, 50.0];
        assert_eq!(iqr_outliers(&values, 1.5), vec![5]);
    }

    #[test]
    fn test_method_from_name() {
        assert_eq!(
            OutlierMethod::from_name("ZScore", Some(2.5)),
            Some(OutlierMethod::ZScore { threshold: 2.5 })
        );
        assert_eq!(OutlierMethod::from_name("iqr", None), Some(OutlierMethod::iqr()));
        assert_eq!(OutlierMethod::from_name("mad", None), None);
        assert_eq!(OutlierMethod::default().detect(&SPIKE), vec![4]);
    }
}
