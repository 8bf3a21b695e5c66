//! Kernel synthesis: enumeration, parameter planning, and the two evaluator
//! representations per combination.
//!
//! Data flows strictly forward — registry → enumerator → planner →
//! synthesizers — and everything here is pure: re-running synthesis for the
//! same combination always yields the same kernels.

use num_traits::Float;

use crate::error::AppError;
use crate::expr::{EvalCtx, Expr, lift};
use crate::registry::constants;

pub mod enumerate;
pub mod plan;
pub mod scalar_loop;
pub mod vectorized;

pub use enumerate::{Combination, valid_combinations};
pub use plan::{ParameterPlan, plan_parameters};
pub use scalar_loop::LoopKernel;
pub use vectorized::VectorKernel;

/// Both synthesized evaluators for one combination.
#[derive(Debug, Clone)]
pub struct KernelPair {
    pub combination: Combination,
    pub plan: ParameterPlan,
    pub vectorized: VectorKernel,
    pub scalar_loop: LoopKernel,
}

impl KernelPair {
    pub fn function_stem(&self) -> String {
        self.combination.function_stem()
    }
}

/// Synthesize the kernel pair for one valid combination.
pub fn synthesize(combination: Combination) -> Result<KernelPair, AppError> {
    let plan = plan_parameters(&combination)?;
    let vectorized = vectorized::synthesize_vectorized(&combination, &plan)?;
    let scalar_loop = scalar_loop::synthesize_scalar_loop(&combination, &plan)?;
    Ok(KernelPair {
        combination,
        plan,
        vectorized,
        scalar_loop,
    })
}

/// Synthesize every valid combination, in enumeration order.
///
/// A synthesis error for any combination aborts the whole run: partial output
/// would otherwise surface much later as a confusing compile failure of the
/// generated module.
pub fn synthesize_all() -> Result<Vec<KernelPair>, AppError> {
    valid_combinations().map(synthesize).collect()
}

/// Validate that every symbol in `expr` is a planned parameter or one of the
/// allowed input arrays, and that every named constant exists in the registry
/// table.
pub(crate) fn check_expression(
    expr: &Expr,
    plan: &ParameterPlan,
    allowed_inputs: &[&str],
    combination: &Combination,
) -> Result<(), AppError> {
    for s in expr.symbols() {
        if allowed_inputs.contains(&s.as_str()) || plan.index_of(&s).is_some() {
            continue;
        }
        return Err(AppError::synthesis(format!(
            "Undefined symbol '{s}' in combination {}: not a planned parameter or input array.",
            combination.function_stem()
        )));
    }
    for c in expr.constants() {
        if constants::value(c).is_none() {
            return Err(AppError::synthesis(format!(
                "Unknown physical constant '{c}' in combination {}.",
                combination.function_stem()
            )));
        }
    }
    Ok(())
}

/// Build an evaluation context with every planned parameter bound
/// positionally from the caller's parameter vector.
pub(crate) fn ctx_with_parameters<F: Float>(
    plan: &ParameterPlan,
    parameters: &[f64],
) -> Result<EvalCtx<F>, AppError> {
    if parameters.len() != plan.n_total {
        return Err(AppError::new(
            3,
            format!(
                "Kernel expects {} parameters, got {}.",
                plan.n_total,
                parameters.len()
            ),
        ));
    }
    let mut ctx = EvalCtx::new();
    for (name, &value) in plan.names.iter().zip(parameters) {
        ctx.bind(name.clone(), lift(value));
    }
    Ok(ctx)
}

/// The three data arrays must share one length.
pub(crate) fn check_data_lengths(
    tdata: usize,
    empirical: usize,
    pair_count: usize,
) -> Result<(), AppError> {
    if tdata != empirical || tdata != pair_count {
        return Err(AppError::new(
            3,
            format!(
                "Input arrays must share one length: tdata={tdata}, \
                 empirical_correlogram={empirical}, pair_count={pair_count}."
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::sym;

    #[test]
    fn synthesize_all_succeeds_for_the_whole_catalog() {
        let kernels = synthesize_all().unwrap();
        assert_eq!(kernels.len(), valid_combinations().count());
    }

    #[test]
    fn undefined_symbol_is_reported_with_the_combination() {
        let combination = valid_combinations().next().unwrap();
        let plan = plan_parameters(&combination).unwrap();
        let bogus = sym("not_a_parameter") * sym("tdata");
        let err = check_expression(&bogus, &plan, &["tdata"], &combination).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("not_a_parameter"));
        assert!(msg.contains(&combination.function_stem()));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn parameter_count_mismatch_is_rejected() {
        let combination = valid_combinations().next().unwrap();
        let plan = plan_parameters(&combination).unwrap();
        let err = ctx_with_parameters::<f64>(&plan, &[0.0]).unwrap_err();
        assert!(err.to_string().contains("parameters"));
    }
}
