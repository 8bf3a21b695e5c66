//! Vectorized weighted-least-squares kernel.
//!
//! One expression per combination:
//!
//! `Σ_i num_pairs_i · (model(tdata_i; parameters) − empirical_i)²`
//!
//! The summand is a single tree over named parameters, named constants, and
//! the input arrays; the evaluator binds parameters positionally (by the
//! planner's ordering) and folds the summand over the samples. Synthesis is
//! pure text/tree construction — the only failure mode is a symbol that the
//! plan cannot bind.

use num_traits::Float;

use crate::error::AppError;
use crate::expr::Expr;
use crate::registry::{INPUT_ARRAYS, compose};

use super::enumerate::Combination;
use super::plan::ParameterPlan;

/// The vectorized evaluator for one combination.
#[derive(Debug, Clone)]
pub struct VectorKernel {
    /// Emitted function name: `{stem}_ne`.
    pub name: String,
    pub plan: ParameterPlan,
    /// Per-sample weighted squared residual; the evaluator sums it.
    pub summand: Expr,
}

pub fn synthesize_vectorized(
    combination: &Combination,
    plan: &ParameterPlan,
) -> Result<VectorKernel, AppError> {
    let summand = compose::weighted_fit_expression(
        combination.daily,
        combination.modulation,
        combination.annual,
    );
    super::check_expression(&summand, plan, &INPUT_ARRAYS, combination)?;
    Ok(VectorKernel {
        name: format!("{}_ne", combination.function_stem()),
        plan: plan.clone(),
        summand,
    })
}

impl VectorKernel {
    /// Weighted sum of squared residuals over the whole sample set.
    ///
    /// `parameters` is always `f64` (the exposed parameter vector); the data
    /// arrays and every intermediate share the float width `F`.
    pub fn evaluate<F: Float>(
        &self,
        parameters: &[f64],
        tdata: &[F],
        empirical_correlogram: &[F],
        pair_count: &[F],
    ) -> Result<F, AppError> {
        super::check_data_lengths(tdata.len(), empirical_correlogram.len(), pair_count.len())?;
        let mut ctx = super::ctx_with_parameters::<F>(&self.plan, parameters)?;

        let mut weighted_fit = F::zero();
        for i in 0..tdata.len() {
            ctx.bind("tdata", tdata[i]);
            ctx.bind("empirical_correlogram", empirical_correlogram[i]);
            ctx.bind("num_pairs", pair_count[i]);
            weighted_fit = weighted_fit + self.summand.eval(&ctx)?;
        }
        Ok(weighted_fit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PartForm;
    use crate::synth::plan::plan_parameters;

    fn kernel(daily: PartForm, modulation: PartForm, annual: PartForm) -> VectorKernel {
        let combination = Combination {
            daily,
            modulation,
            annual,
        };
        let plan = plan_parameters(&combination).unwrap();
        synthesize_vectorized(&combination, &plan).unwrap()
    }

    #[test]
    fn residual_only_point_at_zero_lag_costs_one() {
        // t = 0, pair_count = 1, empirical = 0, every parameter zero except
        // resid_coef = 1 and resid_timescale = 1 (exposed units): the model is
        // exp(0) = 1 and the weighted sum is 1.
        let k = kernel(PartForm::Cosine, PartForm::Cosine, PartForm::Cosine);
        let mut params = vec![0.0; k.plan.n_total];
        params[k.plan.resid_offset()] = 1.0;
        params[k.plan.resid_offset() + 1] = 1.0;

        let wf = k.evaluate(&params, &[0.0], &[0.0], &[1.0]).unwrap();
        assert!((wf - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pair_counts_weight_the_residuals() {
        let k = kernel(PartForm::Constant, PartForm::Constant, PartForm::Constant);
        // Model is identically zero with zero parameters, so each sample
        // contributes num_pairs * empirical².
        let params = vec![0.0; k.plan.n_total];
        let wf = k
            .evaluate(&params, &[0.0, 1.0], &[0.5, 0.5], &[4.0, 8.0])
            .unwrap();
        assert!((wf - (4.0 + 8.0) * 0.25).abs() < 1e-12);
    }

    #[test]
    fn mismatched_array_lengths_are_rejected() {
        let k = kernel(PartForm::Cosine, PartForm::Constant, PartForm::Constant);
        let params = vec![0.0; k.plan.n_total];
        let err = k.evaluate(&params, &[0.0, 1.0], &[0.0], &[1.0]).unwrap_err();
        assert!(err.to_string().contains("length"));
    }
}
