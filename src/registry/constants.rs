//! Physical constants shared by every generated kernel.
//!
//! Time lags are measured in days. Angular-frequency constants are
//! precomputed so the generated expressions stay readable and cheap.

pub const HOURS_PER_DAY: f64 = 24.0;
pub const DAYS_PER_DAY: f64 = 1.0;
pub const DAYS_PER_WEEK: f64 = 7.0;
pub const DAYS_PER_FORTNIGHT: f64 = 14.0;
pub const DAYS_PER_YEAR: f64 = 365.2425;
pub const DAYS_PER_DECADE: f64 = 10.0 * DAYS_PER_YEAR;

pub const HOURS_PER_YEAR: f64 = HOURS_PER_DAY * DAYS_PER_YEAR;

pub const PI_OVER_DAY: f64 = std::f64::consts::PI / DAYS_PER_DAY;
pub const TWO_PI_OVER_DAY: f64 = 2.0 * PI_OVER_DAY;
pub const FOUR_PI_OVER_DAY: f64 = 2.0 * TWO_PI_OVER_DAY;

pub const PI_OVER_YEAR: f64 = std::f64::consts::PI / DAYS_PER_YEAR;
pub const TWO_PI_OVER_YEAR: f64 = 2.0 * PI_OVER_YEAR;
pub const FOUR_PI_OVER_YEAR: f64 = 2.0 * TWO_PI_OVER_YEAR;

/// Name → value table, in the order the constants preamble is emitted.
pub const GLOBAL_CONSTANTS: &[(&str, f64)] = &[
    ("HOURS_PER_DAY", HOURS_PER_DAY),
    ("DAYS_PER_DAY", DAYS_PER_DAY),
    ("DAYS_PER_WEEK", DAYS_PER_WEEK),
    ("DAYS_PER_FORTNIGHT", DAYS_PER_FORTNIGHT),
    ("DAYS_PER_YEAR", DAYS_PER_YEAR),
    ("DAYS_PER_DECADE", DAYS_PER_DECADE),
    ("HOURS_PER_YEAR", HOURS_PER_YEAR),
    ("PI_OVER_DAY", PI_OVER_DAY),
    ("TWO_PI_OVER_DAY", TWO_PI_OVER_DAY),
    ("FOUR_PI_OVER_DAY", FOUR_PI_OVER_DAY),
    ("PI_OVER_YEAR", PI_OVER_YEAR),
    ("TWO_PI_OVER_YEAR", TWO_PI_OVER_YEAR),
    ("FOUR_PI_OVER_YEAR", FOUR_PI_OVER_YEAR),
];

/// Look up a constant by its emitted name.
pub fn value(name: &str) -> Option<f64> {
    GLOBAL_CONSTANTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| *v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_constant() {
        assert_eq!(value("DAYS_PER_FORTNIGHT"), Some(14.0));
        assert_eq!(value("NOT_A_CONSTANT"), None);
    }

    #[test]
    fn angular_frequencies_consistent() {
        assert!((TWO_PI_OVER_DAY - 2.0 * std::f64::consts::PI).abs() < 1e-12);
        assert!((FOUR_PI_OVER_YEAR - 2.0 * TWO_PI_OVER_YEAR).abs() < 1e-12);
    }
}
