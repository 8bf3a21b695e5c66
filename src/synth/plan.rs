//! Parameter planning: the globally ordered parameter vector for one
//! combination, and the index bookkeeping that keeps derivative accumulation
//! aligned with it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::registry::{TRAILING_PARAMETERS, compose};

use super::enumerate::Combination;

/// Global parameter ordering for one combination.
///
/// Built by concatenating each part's form parameters in part order, then the
/// four fixed trailing parameters. A form contributing zero parameters
/// occupies zero width at the correct offset; subsequent offsets are
/// unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterPlan {
    /// Ordered parameter names; position = index into the parameter vector.
    pub names: Vec<String>,
    /// Starting index of each part's block, in part order.
    pub offsets: [usize; 3],
    /// Total parameter count (form parameters + 4 trailing).
    pub n_total: usize,
}

impl ParameterPlan {
    /// Starting index of the residual-decay pair (`resid_coef`,
    /// `resid_timescale`): always `n_total - 4`.
    pub fn resid_offset(&self) -> usize {
        self.n_total - 4
    }

    /// Starting index of the error-correlation pair (`ec_coef`,
    /// `ec_timescale`): always `n_total - 2`.
    pub fn ec_offset(&self) -> usize {
        self.n_total - 2
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

/// Plan the parameter vector for a valid combination.
///
/// Fails with a naming-conflict error if the registry ever yields a duplicate
/// name across parts: positional binding downstream would silently overwrite,
/// so planning refuses instead.
pub fn plan_parameters(combo: &Combination) -> Result<ParameterPlan, AppError> {
    let mut names: Vec<String> = Vec::new();
    let mut offsets = [0usize; 3];

    for (slot, (part, form)) in combo.forms().into_iter().enumerate() {
        offsets[slot] = names.len();
        names.extend(form.parameters(part));
    }
    names.extend(TRAILING_PARAMETERS.iter().map(|p| p.to_string()));

    let mut seen: HashSet<&str> = HashSet::new();
    for name in &names {
        if !seen.insert(name.as_str()) {
            return Err(AppError::synthesis(format!(
                "Naming conflict in combination {}: parameter '{}' appears more than once.",
                combo.function_stem(),
                name
            )));
        }
    }

    let n_total = names.len();
    debug_assert_eq!(
        names,
        compose::full_parameter_list(combo.daily, combo.modulation, combo.annual)
    );

    Ok(ParameterPlan {
        names,
        offsets,
        n_total,
    })
}
