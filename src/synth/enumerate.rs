//! Combination enumeration.
//!
//! Walks the Cartesian product of forms (daily outer, modulation middle,
//! annual inner) and yields only the combinations the registry's validity
//! predicate accepts. The order is deterministic and significant: it fixes
//! the order of kernels in the emitted module, and re-enumeration is
//! side-effect-free.

use serde::{Deserialize, Serialize};

use crate::registry::{CorrelationPart, PartForm, is_valid_combination};

/// One concrete choice of form per part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    pub daily: PartForm,
    pub modulation: PartForm,
    pub annual: PartForm,
}

impl Combination {
    /// `(part, form)` pairs in part order.
    pub fn forms(&self) -> [(CorrelationPart, PartForm); 3] {
        [
            (CorrelationPart::Daily, self.daily),
            (CorrelationPart::DailyModulation, self.modulation),
            (CorrelationPart::Annual, self.annual),
        ]
    }

    /// Deterministic stem for generated function names, e.g. `dc2_dme_ac`.
    ///
    /// Part short name and form short name concatenate per part; parts join
    /// with `_`. Distinct combinations always produce distinct stems because
    /// part short names are fixed and form short names are unique.
    pub fn function_stem(&self) -> String {
        self.forms()
            .iter()
            .map(|(part, form)| format!("{}{}", part.short_name(), form.short_name()))
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl std::fmt::Display for Combination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.function_stem())
    }
}

/// Lazily yield every valid combination, in product-iteration order.
pub fn valid_combinations() -> impl Iterator<Item = Combination> {
    PartForm::ALL.into_iter().flat_map(|daily| {
        PartForm::ALL.into_iter().flat_map(move |modulation| {
            PartForm::ALL.into_iter().filter_map(move |annual| {
                is_valid_combination(daily, modulation, annual).then_some(Combination {
                    daily,
                    modulation,
                    annual,
                })
            })
        })
    })
}
