//! Fare calculation as a pure function of a strategy tag and trip facts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CityBikeError;
use crate::model::BikeType;

/// Pricing strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingStrategy {
    /// Pay per minute.
    Casual,
    /// First 45 minutes free, then per minute.
    Member,
    /// Per minute with a rush-hour multiplier.
    PeakHour,
    /// Per kilometre, per minute when no distance was recorded.
    Distance,
}

/// Trip facts a fare depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FareInput {
    pub duration_minutes: f64,
    pub distance_km: f64,
    pub bike_type: BikeType,
    /// Hour of day the trip started, 0..=23.
    pub start_hour: u32,
}

/// Rate card of one strategy.
struct Tariff {
    minimum: f64,
    electric_surcharge: f64,
}

const PEAK_HOURS: [u32; 3] = [8, 17, 18];
const MEMBER_FREE_MINUTES: f64 = 45.0;

impl PricingStrategy {
    pub const ALL: [PricingStrategy; 4] = [
        PricingStrategy::Casual,
        PricingStrategy::Member,
        PricingStrategy::PeakHour,
        PricingStrategy::Distance,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PricingStrategy::Casual => "casual",
            PricingStrategy::Member => "member",
            PricingStrategy::PeakHour => "peak_hour",
            PricingStrategy::Distance => "distance",
        }
    }

    /// One-line description of the rate card.
    pub fn description(&self) -> &'static str {
        match self {
            PricingStrategy::Casual => "0.30/min, minimum 2.00",
            PricingStrategy::Member => "free for 45 min, then 0.18/min, minimum 1.00",
            PricingStrategy::PeakHour => "0.25/min, x1.5 at 8h, 17h and 18h, minimum 1.50",
            PricingStrategy::Distance => "0.80/km (0.15/min without distance), minimum 2.50",
        }
    }

    fn tariff(&self) -> Tariff {
        match self {
            PricingStrategy::Casual => Tariff {
                minimum: 2.00,
                electric_surcharge: 0.20,
            },
            PricingStrategy::Member => Tariff {
                minimum: 1.00,
                electric_surcharge: 0.10,
            },
            PricingStrategy::PeakHour => Tariff {
                minimum: 1.50,
                electric_surcharge: 0.15,
            },
            PricingStrategy::Distance => Tariff {
                minimum: 2.50,
                electric_surcharge: 0.25,
            },
        }
    }
}

impl fmt::Display for PricingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PricingStrategy {
    type Err = CityBikeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PricingStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == wanted)
            .ok_or_else(|| {
                let available: Vec<&str> = PricingStrategy::ALL.iter().map(|p| p.name()).collect();
                CityBikeError::Config(format!(
                    "unknown pricing strategy '{}', available: {}",
                    s,
                    available.join(", ")
                ))
            })
    }
}

/// Fare for one trip, rounded to cents.
pub fn fare(strategy: PricingStrategy, input: &FareInput) -> f64 {
    let tariff = strategy.tariff();
    let minutes = input.duration_minutes.max(0.0);

    let base = match strategy {
        PricingStrategy::Casual => minutes * 0.30,
        PricingStrategy::Member => {
            if minutes <= MEMBER_FREE_MINUTES {
                return 0.0;
            }
            (minutes - MEMBER_FREE_MINUTES) * 0.18
        }
        PricingStrategy::PeakHour => {
            let fare = minutes * 0.25;
            if PEAK_HOURS.contains(&input.start_hour) {
                fare * 1.5
            } else {
                fare
            }
        }
        PricingStrategy::Distance => {
            if input.distance_km <= 0.0 {
                minutes * 0.15
            } else {
                input.distance_km * 0.80
            }
        }
    };

    let surcharged = match input.bike_type {
        BikeType::Electric => base * (1.0 + tariff.electric_surcharge),
        BikeType::Classic => base,
    };

    round_cents(surcharged.max(tariff.minimum))
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(minutes: f64, km: f64, bike_type: BikeType, hour: u32) -> FareInput {
        FareInput {
            duration_minutes: minutes,
            distance_km: km,
            bike_type,
            start_hour: hour,
        }
    }

    #[test]
    fn test_casual() {
        assert_eq!(fare(PricingStrategy::Casual, &input(20.0, 3.0, BikeType::Classic, 12)), 6.0);
        assert_eq!(fare(PricingStrategy::Casual, &input(20.0, 3.0, BikeType::Electric, 12)), 7.2);
        assert_eq!(fare(PricingStrategy::Casual, &input(3.0, 0.5, BikeType::Classic, 12)), 2.0);
    }

    #[test]
    fn test_member_free_window() {
        assert_eq!(fare(PricingStrategy::Member, &input(45.0, 9.0, BikeType::Electric, 8)), 0.0);
        assert_eq!(fare(PricingStrategy::Member, &input(46.0, 9.0, BikeType::Classic, 8)), 1.0);
        assert_eq!(fare(PricingStrategy::Member, &input(65.0, 9.0, BikeType::Classic, 8)), 3.6);
    }

    #[test]
    fn test_peak_hour() {
        assert_eq!(fare(PricingStrategy::PeakHour, &input(20.0, 2.0, BikeType::Classic, 17)), 7.5);
        assert_eq!(fare(PricingStrategy::PeakHour, &input(20.0, 2.0, BikeType::Classic, 14)), 5.0);
        assert_eq!(fare(PricingStrategy::PeakHour, &input(2.0, 2.0, BikeType::Classic, 14)), 1.5);
    }

    #[test]
    fn test_distance_fallback() {
        assert_eq!(fare(PricingStrategy::Distance, &input(10.0, 5.0, BikeType::Classic, 9)), 4.0);
        assert_eq!(fare(PricingStrategy::Distance, &input(10.0, 5.0, BikeType::Electric, 9)), 5.0);
        assert_eq!(fare(PricingStrategy::Distance, &input(30.0, 0.0, BikeType::Classic, 9)), 4.5);
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("PEAK_HOUR".parse::<PricingStrategy>().unwrap(), PricingStrategy::PeakHour);
        let err = "surge".parse::<PricingStrategy>().unwrap_err();
        assert!(matches!(err, CityBikeError::Config(_)));
    }
}
