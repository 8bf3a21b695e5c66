//! The three composable roles of the correlation model.
//!
//! Order is significant: parameter blocks are concatenated in part order, and
//! generated function names list the parts in this order.

use serde::{Deserialize, Serialize};

/// One role in the correlation model.
///
/// The daily cycle and its modulation combine by product; the annual cycle
/// (and the two fixed exponential-decay terms) add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationPart {
    Daily,
    DailyModulation,
    Annual,
}

impl CorrelationPart {
    /// All parts, in parameter-block concatenation order.
    pub const ALL: [CorrelationPart; 3] = [
        CorrelationPart::Daily,
        CorrelationPart::DailyModulation,
        CorrelationPart::Annual,
    ];

    /// Short name used in generated function names.
    pub fn short_name(self) -> &'static str {
        match self {
            CorrelationPart::Daily => "d",
            CorrelationPart::DailyModulation => "dm",
            CorrelationPart::Annual => "a",
        }
    }

    /// Prefix for the parameters a form introduces for this part.
    ///
    /// Prefixing per part is what makes parameter names unique across parts;
    /// the planner still validates this rather than assuming it.
    pub fn prefix(self) -> &'static str {
        match self {
            CorrelationPart::Daily => "daily_",
            CorrelationPart::DailyModulation => "dm_",
            CorrelationPart::Annual => "ann_",
        }
    }

    /// Name of the fundamental angular-frequency constant for this part.
    ///
    /// The daily cycle repeats once per day; the modulation envelope and the
    /// annual cycle repeat once per year.
    pub fn fundamental(self) -> &'static str {
        match self {
            CorrelationPart::Daily => "TWO_PI_OVER_DAY",
            CorrelationPart::DailyModulation => "TWO_PI_OVER_YEAR",
            CorrelationPart::Annual => "TWO_PI_OVER_YEAR",
        }
    }

    /// Name of the doubled angular-frequency constant (second harmonic).
    pub fn second_harmonic(self) -> &'static str {
        match self {
            CorrelationPart::Daily => "FOUR_PI_OVER_DAY",
            CorrelationPart::DailyModulation => "FOUR_PI_OVER_YEAR",
            CorrelationPart::Annual => "FOUR_PI_OVER_YEAR",
        }
    }

    /// Name of the half-frequency constant (`sin²` forms have half the
    /// argument frequency of the period they express).
    pub fn half_frequency(self) -> &'static str {
        match self {
            CorrelationPart::Daily => "PI_OVER_DAY",
            CorrelationPart::DailyModulation => "PI_OVER_YEAR",
            CorrelationPart::Annual => "PI_OVER_YEAR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_order_is_daily_modulation_annual() {
        assert_eq!(CorrelationPart::ALL[0], CorrelationPart::Daily);
        assert_eq!(CorrelationPart::ALL[1], CorrelationPart::DailyModulation);
        assert_eq!(CorrelationPart::ALL[2], CorrelationPart::Annual);
    }

    #[test]
    fn prefixes_are_distinct() {
        let prefixes: Vec<_> = CorrelationPart::ALL.iter().map(|p| p.prefix()).collect();
        assert_eq!(prefixes.len(), 3);
        assert!(prefixes.windows(2).all(|w| w[0] != w[1]));
    }
}
