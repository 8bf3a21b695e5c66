//! Composition rules: how one combination of forms becomes a full model.
//!
//! The composition is fixed external behavior, preserved as given:
//!
//! - the daily cycle and its modulation multiply
//! - the annual cycle adds
//! - two exponential-decay terms (residual, error-correlation) add, each
//!   guarded to contribute exactly zero when its timescale ≤ 0
//!
//! Unit conventions: `resid_timescale` is exposed in fortnights and converted
//! to days (× `DAYS_PER_FORTNIGHT`) inside the model; `ec_timescale` is
//! exposed in hours and converted to days (÷ `HOURS_PER_DAY`).

use crate::expr::{Expr, exp, konst, neg, sym};

use super::form::PartForm;
use super::part::CorrelationPart;

/// The four fixed trailing parameters, appended after every combination's
/// form parameters, in this order.
pub const TRAILING_PARAMETERS: [&str; 4] =
    ["resid_coef", "resid_timescale", "ec_coef", "ec_timescale"];

/// Input arrays every kernel takes alongside the parameter vector.
pub const INPUT_ARRAYS: [&str; 3] = ["tdata", "empirical_correlogram", "num_pairs"];

/// Validity predicate over one choice of form per part.
///
/// Invalid combinations are skipped silently by the enumerator; they are not
/// errors.
pub fn is_valid_combination(daily: PartForm, modulation: PartForm, annual: PartForm) -> bool {
    if !daily.valid_for(CorrelationPart::Daily)
        || !modulation.valid_for(CorrelationPart::DailyModulation)
        || !annual.valid_for(CorrelationPart::Annual)
    {
        return false;
    }
    // A constant daily cycle leaves nothing to modulate.
    if daily == PartForm::Constant && modulation != PartForm::Constant {
        return false;
    }
    true
}

/// Full parameter name list: each part's parameters in part order, then the
/// four fixed trailing parameters.
pub fn full_parameter_list(daily: PartForm, modulation: PartForm, annual: PartForm) -> Vec<String> {
    let mut names = Vec::new();
    names.extend(daily.parameters(CorrelationPart::Daily));
    names.extend(modulation.parameters(CorrelationPart::DailyModulation));
    names.extend(annual.parameters(CorrelationPart::Annual));
    names.extend(TRAILING_PARAMETERS.iter().map(|p| p.to_string()));
    names
}

/// Residual decay timescale in days (exposed parameter is in fortnights).
pub fn resid_timescale_days() -> Expr {
    sym("resid_timescale") * konst("DAYS_PER_FORTNIGHT")
}

/// Error-correlation decay timescale in days (exposed parameter is in hours).
pub fn ec_timescale_days() -> Expr {
    sym("ec_timescale") / konst("HOURS_PER_DAY")
}

/// `coef · exp(-t / timescale)`, zero when the timescale is not positive.
fn guarded_decay(coef: &'static str, timescale_days: Expr) -> Expr {
    Expr::if_positive(
        timescale_days.clone(),
        sym(coef) * exp(neg(sym("tdata") / timescale_days)),
    )
}

/// The closed-form model for one combination, over `tdata`, the combination's
/// parameters, and the physical constants.
pub fn full_expression(daily: PartForm, modulation: PartForm, annual: PartForm) -> Expr {
    daily.expression(CorrelationPart::Daily)
        * modulation.expression(CorrelationPart::DailyModulation)
        + annual.expression(CorrelationPart::Annual)
        + guarded_decay("resid_coef", resid_timescale_days())
        + guarded_decay("ec_coef", ec_timescale_days())
}

/// Per-sample weighted squared residual: `num_pairs · (model − empirical)²`.
///
/// The vectorized evaluator sums this over all samples.
pub fn weighted_fit_expression(
    daily: PartForm,
    modulation: PartForm,
    annual: PartForm,
) -> Expr {
    sym("num_pairs") * (full_expression(daily, modulation, annual) - sym("empirical_correlogram")).powi(2)
}
