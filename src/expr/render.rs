//! Rendering expression trees to Rust source text.
//!
//! The emitted module binds every referenced name before the expression is
//! used, so rendering is purely local:
//!
//! - parameters render as their own names (`let daily_coef = lift::<F>(...)`
//!   appears earlier in the generated function)
//! - physical constants render as lowercased locals bound from the preamble
//!   consts (`let two_pi_over_day = lift::<F>(TWO_PI_OVER_DAY);`)
//! - input-array samples render as the generated loop's locals (`t`, `corr`,
//!   `num_pairs`)
//!
//! Every composite node is parenthesized; precedence never has to be
//! reconstructed from context.

use super::Expr;

/// Rust local used for an input-array sample inside generated bodies.
pub fn sample_name(symbol: &str) -> &str {
    match symbol {
        "tdata" => "t",
        "empirical_correlogram" => "corr",
        other => other,
    }
}

impl Expr {
    /// Render to Rust source text for the emitted module.
    pub fn to_rust(&self) -> String {
        match self {
            Expr::Num(x) if *x == 0.0 => "F::zero()".to_string(),
            Expr::Num(x) if *x == 1.0 => "F::one()".to_string(),
            Expr::Num(x) => format!("lift::<F>({x:?})"),
            Expr::Const(name) => name.to_lowercase(),
            Expr::Sym(name) => sample_name(name).to_string(),
            Expr::Neg(a) => format!("(-{})", a.to_rust()),
            Expr::Sin(a) => format!("({}).sin()", a.to_rust()),
            Expr::Cos(a) => format!("({}).cos()", a.to_rust()),
            Expr::Exp(a) => format!("({}).exp()", a.to_rust()),
            Expr::Add(a, b) => format!("({} + {})", a.to_rust(), b.to_rust()),
            Expr::Sub(a, b) => format!("({} - {})", a.to_rust(), b.to_rust()),
            Expr::Mul(a, b) => format!("({} * {})", a.to_rust(), b.to_rust()),
            Expr::Div(a, b) => format!("({} / {})", a.to_rust(), b.to_rust()),
            Expr::Powi(a, n) => format!("({}).powi({n})", a.to_rust()),
            Expr::IfPositive { guard, value } => format!(
                "(if {} > F::zero() {{ {} }} else {{ F::zero() }})",
                guard.to_rust(),
                value.to_rust()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::expr::{Expr, cos, exp, konst, neg, num, sym};

    #[test]
    fn renders_cosine_term() {
        let e = sym("daily_coef") * cos(konst("TWO_PI_OVER_DAY") * sym("tdata"));
        assert_eq!(e.to_rust(), "(daily_coef * ((two_pi_over_day * t)).cos())");
    }

    #[test]
    fn renders_guarded_decay() {
        let e = Expr::if_positive(sym("ts"), sym("c") * exp(neg(sym("tdata") / sym("ts"))));
        let rendered = e.to_rust();
        assert!(rendered.starts_with("(if ts > F::zero()"));
        assert!(rendered.contains("((-(t / ts))).exp()"));
        assert!(rendered.ends_with("else { F::zero() })"));
    }

    #[test]
    fn renders_zero_and_one_as_float_identities() {
        assert_eq!(num(0.0).to_rust(), "F::zero()");
        assert_eq!(num(1.0).to_rust(), "F::one()");
        assert_eq!(num(2.0).to_rust(), "lift::<F>(2.0)");
    }
}
