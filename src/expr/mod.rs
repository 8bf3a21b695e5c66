//! Expression trees for kernel synthesis.
//!
//! Kernels are synthesized as expression trees rather than format strings, so
//! that index and offset bookkeeping stays visible to the type system instead
//! of hiding inside string interpolation. One tree serves three uses:
//!
//! - symbol collection, for undefined-symbol validation at synthesis time
//! - numeric evaluation, generic over the kernel's float width
//! - rendering to Rust source text for the emitted module
//!
//! Arithmetic operators are overloaded on `Expr` so the registry's form
//! expressions read close to their mathematical notation.

use std::collections::BTreeSet;

pub mod eval;
pub mod render;

pub use eval::{EvalCtx, lift};

/// A node in a synthesized expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal number.
    Num(f64),
    /// Named physical constant from the registry table.
    Const(&'static str),
    /// Named symbol: a model parameter or an input-array sample (`tdata`,
    /// `empirical_correlogram`, `num_pairs`).
    Sym(String),
    Neg(Box<Expr>),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
    Exp(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    /// Integer power (`x.powi(n)` in rendered code).
    Powi(Box<Expr>, i32),
    /// `if guard > 0 { value } else { 0 }`.
    ///
    /// This is the timescale guard: a decay term contributes exactly zero
    /// when its timescale is not strictly positive.
    IfPositive { guard: Box<Expr>, value: Box<Expr> },
}

pub fn num(x: f64) -> Expr {
    Expr::Num(x)
}

pub fn konst(name: &'static str) -> Expr {
    Expr::Const(name)
}

pub fn sym(name: impl Into<String>) -> Expr {
    Expr::Sym(name.into())
}

pub fn neg(e: Expr) -> Expr {
    Expr::Neg(Box::new(e))
}

pub fn sin(e: Expr) -> Expr {
    Expr::Sin(Box::new(e))
}

pub fn cos(e: Expr) -> Expr {
    Expr::Cos(Box::new(e))
}

pub fn exp(e: Expr) -> Expr {
    Expr::Exp(Box::new(e))
}

impl Expr {
    pub fn powi(self, n: i32) -> Expr {
        Expr::Powi(Box::new(self), n)
    }

    pub fn if_positive(guard: Expr, value: Expr) -> Expr {
        Expr::IfPositive {
            guard: Box::new(guard),
            value: Box::new(value),
        }
    }

    /// All `Sym` names referenced anywhere in the tree.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Num(_) | Expr::Const(_) => {}
            Expr::Sym(name) => {
                out.insert(name.clone());
            }
            Expr::Neg(a) | Expr::Sin(a) | Expr::Cos(a) | Expr::Exp(a) | Expr::Powi(a, _) => {
                a.collect_symbols(out);
            }
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) => {
                a.collect_symbols(out);
                b.collect_symbols(out);
            }
            Expr::IfPositive { guard, value } => {
                guard.collect_symbols(out);
                value.collect_symbols(out);
            }
        }
    }

    /// All `Const` names referenced anywhere in the tree.
    pub fn constants(&self) -> BTreeSet<&'static str> {
        let mut out = BTreeSet::new();
        self.collect_constants(&mut out);
        out
    }

    fn collect_constants(&self, out: &mut BTreeSet<&'static str>) {
        match self {
            Expr::Num(_) | Expr::Sym(_) => {}
            Expr::Const(name) => {
                out.insert(name);
            }
            Expr::Neg(a) | Expr::Sin(a) | Expr::Cos(a) | Expr::Exp(a) | Expr::Powi(a, _) => {
                a.collect_constants(out);
            }
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) => {
                a.collect_constants(out);
                b.collect_constants(out);
            }
            Expr::IfPositive { guard, value } => {
                guard.collect_constants(out);
                value.collect_constants(out);
            }
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        Expr::Add(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Sub for Expr {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        Expr::Sub(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Mul for Expr {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        Expr::Mul(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Div for Expr {
    type Output = Expr;
    fn div(self, rhs: Expr) -> Expr {
        Expr::Div(Box::new(self), Box::new(rhs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_collection_walks_the_whole_tree() {
        let e = sym("a") * cos(konst("TWO_PI_OVER_DAY") * sym("tdata")) + sym("b").powi(2);
        let syms = e.symbols();
        assert!(syms.contains("a"));
        assert!(syms.contains("b"));
        assert!(syms.contains("tdata"));
        assert_eq!(e.constants().len(), 1);
    }

    #[test]
    fn guard_collects_both_branches() {
        let e = Expr::if_positive(sym("ts"), sym("coef") * exp(neg(sym("tdata") / sym("ts"))));
        let syms = e.symbols();
        assert!(syms.contains("ts"));
        assert!(syms.contains("coef"));
        assert!(syms.contains("tdata"));
    }
}
