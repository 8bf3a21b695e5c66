//! The catalog of functional forms usable for each part.
//!
//! Forms are a closed set: the enumerator relies on exhaustiveness, so the
//! catalog is an enum with capability methods rather than open-ended dynamic
//! dispatch. Each form supplies, per part:
//!
//! - the parameter names it introduces (prefixed by the part)
//! - its symbolic expression
//! - one analytic partial derivative per parameter, in parameter order
//!
//! The derivative list and parameter list are index-aligned by construction;
//! the planner turns those local indices into global ones.

use serde::{Deserialize, Serialize};

use crate::expr::{Expr, cos, exp, konst, neg, num, sin, sym};

use super::part::CorrelationPart;

/// A functional shape usable for a correlation part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartForm {
    /// Single cosine at the part's fundamental frequency.
    Cosine,
    /// Two-term cosine series (fundamental + second harmonic).
    CosineSeries,
    /// Periodic exponential-sine-squared bump.
    ExpSinSquared,
    /// No-op: multiplicative identity for the modulation, additive identity
    /// otherwise. Contributes zero parameters.
    Constant,
}

impl PartForm {
    /// All forms, in enumeration order.
    pub const ALL: [PartForm; 4] = [
        PartForm::Cosine,
        PartForm::CosineSeries,
        PartForm::ExpSinSquared,
        PartForm::Constant,
    ];

    /// Short name used in generated function names.
    pub fn short_name(self) -> &'static str {
        match self {
            PartForm::Cosine => "c",
            PartForm::CosineSeries => "c2",
            PartForm::ExpSinSquared => "e",
            PartForm::Constant => "0",
        }
    }

    /// Whether this form is structurally meaningful for the given part.
    ///
    /// The modulation envelope must stay a single slow harmonic, so the
    /// two-term series is rejected there.
    pub fn valid_for(self, part: CorrelationPart) -> bool {
        match self {
            PartForm::CosineSeries => part != CorrelationPart::DailyModulation,
            _ => true,
        }
    }

    /// Parameter names this form introduces for `part`, in derivative order.
    pub fn parameters(self, part: CorrelationPart) -> Vec<String> {
        let p = part.prefix();
        match self {
            PartForm::Cosine => vec![format!("{p}coef")],
            PartForm::CosineSeries => vec![format!("{p}coef1"), format!("{p}coef2")],
            PartForm::ExpSinSquared => vec![format!("{p}coef"), format!("{p}width")],
            PartForm::Constant => Vec::new(),
        }
    }

    /// Symbolic expression of this form for `part`, over `tdata` and the
    /// part's parameters.
    pub fn expression(self, part: CorrelationPart) -> Expr {
        let p = part.prefix();
        let t = || sym("tdata");
        match self {
            PartForm::Cosine => sym(format!("{p}coef")) * cos(konst(part.fundamental()) * t()),
            PartForm::CosineSeries => {
                sym(format!("{p}coef1")) * cos(konst(part.fundamental()) * t())
                    + sym(format!("{p}coef2")) * cos(konst(part.second_harmonic()) * t())
            }
            PartForm::ExpSinSquared => {
                sym(format!("{p}coef")) * Self::sin_squared_envelope(part)
            }
            // The modulation multiplies the daily cycle, so its no-op is 1;
            // the additive parts' no-op is 0.
            PartForm::Constant => {
                if part == CorrelationPart::DailyModulation {
                    num(1.0)
                } else {
                    num(0.0)
                }
            }
        }
    }

    /// Partial derivatives of `expression`, one per parameter, in the same
    /// order as `parameters`.
    pub fn derivatives(self, part: CorrelationPart) -> Vec<Expr> {
        let p = part.prefix();
        let t = || sym("tdata");
        match self {
            PartForm::Cosine => vec![cos(konst(part.fundamental()) * t())],
            PartForm::CosineSeries => vec![
                cos(konst(part.fundamental()) * t()),
                cos(konst(part.second_harmonic()) * t()),
            ],
            PartForm::ExpSinSquared => {
                let envelope = Self::sin_squared_envelope(part);
                // d/dwidth: coef * exp(-(sin/width)²) * 2·sin² / width³
                let d_width = sym(format!("{p}coef"))
                    * envelope.clone()
                    * num(2.0)
                    * sin(konst(part.half_frequency()) * t()).powi(2)
                    / sym(format!("{p}width")).powi(3);
                vec![envelope, d_width]
            }
            PartForm::Constant => Vec::new(),
        }
    }

    /// `exp(-(sin(π̂·t) / width)²)` — shared by the value and both partials.
    fn sin_squared_envelope(part: CorrelationPart) -> Expr {
        let p = part.prefix();
        exp(neg(
            (sin(konst(part.half_frequency()) * sym("tdata")) / sym(format!("{p}width"))).powi(2),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::EvalCtx;

    #[test]
    fn derivative_count_matches_parameter_count() {
        for part in CorrelationPart::ALL {
            for form in PartForm::ALL {
                assert_eq!(
                    form.parameters(part).len(),
                    form.derivatives(part).len(),
                    "{form:?} for {part:?}"
                );
            }
        }
    }

    #[test]
    fn parameters_carry_part_prefix() {
        for part in CorrelationPart::ALL {
            for form in PartForm::ALL {
                for name in form.parameters(part) {
                    assert!(
                        name.starts_with(part.prefix()),
                        "{name} should start with {}",
                        part.prefix()
                    );
                }
            }
        }
    }

    #[test]
    fn series_is_rejected_for_modulation() {
        assert!(!PartForm::CosineSeries.valid_for(CorrelationPart::DailyModulation));
        assert!(PartForm::CosineSeries.valid_for(CorrelationPart::Daily));
        assert!(PartForm::Constant.valid_for(CorrelationPart::DailyModulation));
    }

    #[test]
    fn constant_form_is_the_right_identity() {
        let ctx: EvalCtx<f64> = EvalCtx::new();
        let one = PartForm::Constant
            .expression(CorrelationPart::DailyModulation)
            .eval(&ctx)
            .unwrap();
        let zero = PartForm::Constant
            .expression(CorrelationPart::Annual)
            .eval(&ctx)
            .unwrap();
        assert_eq!(one, 1.0);
        assert_eq!(zero, 0.0);
    }

    #[test]
    fn cosine_value_at_zero_lag_is_coef() {
        let mut ctx: EvalCtx<f64> = EvalCtx::new();
        ctx.bind("daily_coef", 0.75);
        ctx.bind("tdata", 0.0);
        let v = PartForm::Cosine
            .expression(CorrelationPart::Daily)
            .eval(&ctx)
            .unwrap();
        assert!((v - 0.75).abs() < 1e-12);
    }

    #[test]
    fn exp_sin_squared_width_derivative_matches_finite_difference() {
        let part = CorrelationPart::Annual;
        let form = PartForm::ExpSinSquared;
        let f = form.expression(part);
        let d_width = &form.derivatives(part)[1];

        let mut ctx: EvalCtx<f64> = EvalCtx::new();
        ctx.bind("ann_coef", 0.6);
        ctx.bind("tdata", 80.0);

        let h = 1e-6;
        ctx.bind("ann_width", 1.3 + h);
        let up = f.eval(&ctx).unwrap();
        ctx.bind("ann_width", 1.3 - h);
        let down = f.eval(&ctx).unwrap();
        ctx.bind("ann_width", 1.3);
        let analytic = d_width.eval(&ctx).unwrap();

        let fd = (up - down) / (2.0 * h);
        assert!(
            (analytic - fd).abs() < 1e-6,
            "analytic {analytic} vs fd {fd}"
        );
    }
}
