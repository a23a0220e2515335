//! Statistics module: pure functions over numeric sequences.
//!
//! Nothing here mutates its input or holds state between calls.

mod descriptive;
mod geo;
mod outliers;

pub use descriptive::{descriptive_stats, mean, percentile, DescriptiveStats};
pub use geo::{haversine_distance, nearest_station, station_distance, EARTH_RADIUS_KM};
pub use outliers::{iqr_bounds, iqr_outliers, zscore_outliers, IqrBounds, OutlierMethod};
