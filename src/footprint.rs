use crate::error::InputError;
use serde::Serialize;

/// Liters of water per unit of each activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FootprintFactors {
    pub shower_per_minute: f64,
    pub toilet_flush: f64,
    pub laundry_load: f64,
    pub bottled_water_production: f64,
}

pub const WATER_FOOTPRINT_FACTORS: FootprintFactors = FootprintFactors {
    shower_per_minute: 9.0,
    toilet_flush: 6.0,
    laundry_load: 75.0,
    bottled_water_production: 3.0,
};

/// Household average used as the comparison point next to the estimate.
pub const GLOBAL_AVERAGE_NOTE: &str =
    "For context, the global average is ~130 liters/person/day for household use.";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UsageInputs {
    pub shower_minutes_per_day: f64,
    pub toilet_flushes_per_day: u32,
    pub laundry_loads_per_week: u32,
    pub bottled_water_liters_per_week: f64,
}

impl Default for UsageInputs {
    fn default() -> Self {
        Self {
            shower_minutes_per_day: 10.0,
            toilet_flushes_per_day: 5,
            laundry_loads_per_week: 3,
            bottled_water_liters_per_week: 2.0,
        }
    }
}

impl UsageInputs {
    /// Checked constructor for values coming from the user.
    pub fn new(
        shower_minutes_per_day: f64,
        toilet_flushes_per_day: u32,
        laundry_loads_per_week: u32,
        bottled_water_liters_per_week: f64,
    ) -> Result<Self, InputError> {
        Ok(Self {
            shower_minutes_per_day: non_negative("shower minutes", shower_minutes_per_day)?,
            toilet_flushes_per_day,
            laundry_loads_per_week,
            bottled_water_liters_per_week: non_negative("bottled water liters", bottled_water_liters_per_week)?,
        })
    }
}

pub fn non_negative(field: &'static str, value: f64) -> Result<f64, InputError> {
    if !value.is_finite() {
        return Err(InputError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(InputError::Negative { field, value });
    }
    Ok(value)
}

/// Daily water footprint in liters, rounded to one decimal place.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct FootprintEstimate(f64);

impl FootprintEstimate {
    pub fn liters_per_day(self) -> f64 { self.0 }
}

impl std::fmt::Display for FootprintEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

pub fn estimate(inputs: &UsageInputs, factors: &FootprintFactors) -> FootprintEstimate {
    let shower = inputs.shower_minutes_per_day * factors.shower_per_minute;
    let flushes = f64::from(inputs.toilet_flushes_per_day) * factors.toilet_flush;
    let laundry = f64::from(inputs.laundry_loads_per_week) * factors.laundry_load / 7.0;
    let bottled = inputs.bottled_water_liters_per_week * factors.bottled_water_production / 7.0;
    FootprintEstimate(round_to_tenth(shower + flushes + laundry + bottled))
}

/// Correctly rounded to one decimal; exact binary ties go to even.
fn round_to_tenth(v: f64) -> f64 {
    format!("{:.1}", v).parse().unwrap_or(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(s: f64, f: u32, l: u32, b: f64) -> UsageInputs {
        UsageInputs::new(s, f, l, b).unwrap()
    }

    #[test]
    fn default_form_values_give_153() {
        let e = estimate(&UsageInputs::default(), &WATER_FOOTPRINT_FACTORS);
        assert_eq!(e.liters_per_day(), 153.0);
        assert_eq!(e.to_string(), "153.0");
    }

    #[test]
    fn all_zero_is_zero() {
        let e = estimate(&inputs(0.0, 0, 0, 0.0), &WATER_FOOTPRINT_FACTORS);
        assert_eq!(e.liters_per_day(), 0.0);
        assert_eq!(e.to_string(), "0.0");
    }

    #[test]
    fn weekly_terms_vanish_at_zero_whatever_the_factors() {
        let huge = FootprintFactors { laundry_load: 1.0e9, bottled_water_production: 1.0e9, ..WATER_FOOTPRINT_FACTORS };
        let e = estimate(&inputs(2.0, 3, 0, 0.0), &huge);
        assert_eq!(e.liters_per_day(), 36.0);
    }

    #[test]
    fn matches_weighted_sum_formula() {
        let cases = [(1.5, 2, 1, 0.5), (7.0, 12, 9, 14.0), (0.0, 0, 1, 0.0), (33.3, 1, 0, 3.3)];
        for (s, f, l, b) in cases {
            let sum = s * 9.0 + f as f64 * 6.0 + l as f64 * 75.0 / 7.0 + b * 3.0 / 7.0;
            let expected: f64 = format!("{:.1}", sum).parse().unwrap();
            let e = estimate(&inputs(s, f, l, b), &WATER_FOOTPRINT_FACTORS);
            assert_eq!(e.liters_per_day(), expected, "inputs {:?}", (s, f, l, b));
            assert_eq!(e, estimate(&inputs(s, f, l, b), &WATER_FOOTPRINT_FACTORS));
        }
    }

    #[test]
    fn one_laundry_load_is_daily_share() {
        let e = estimate(&inputs(0.0, 0, 1, 0.0), &WATER_FOOTPRINT_FACTORS);
        assert_eq!(e.liters_per_day(), 10.7);
    }

    #[test]
    fn exact_ties_round_to_even() {
        // 0.25 min * 9 = 2.25 exactly
        let e = estimate(&inputs(0.25, 0, 0, 0.0), &WATER_FOOTPRINT_FACTORS);
        assert_eq!(e.to_string(), "2.2");
        assert_eq!(e.liters_per_day(), 2.2);
        // 0.75 min * 9 = 6.75 exactly
        let e = estimate(&inputs(0.75, 0, 0, 0.0), &WATER_FOOTPRINT_FACTORS);
        assert_eq!(e.to_string(), "6.8");
    }

    #[test]
    fn rejects_negative_and_nan() {
        assert_eq!(
            UsageInputs::new(-1.0, 0, 0, 0.0),
            Err(InputError::Negative { field: "shower minutes", value: -1.0 })
        );
        assert!(matches!(UsageInputs::new(0.0, 0, 0, f64::NAN), Err(InputError::NotFinite { .. })));
        assert!(matches!(UsageInputs::new(0.0, 0, 0, f64::INFINITY), Err(InputError::NotFinite { .. })));
    }
}
