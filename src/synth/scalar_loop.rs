//! Scalar per-sample loop kernel with analytic derivative accumulation.
//!
//! Per sample `i`:
//!
//! 1. evaluate the daily and modulation sub-forms; their product joins the
//!    model, and the product rule splits the derivative contributions:
//!    daily parameters pick up `∂(daily)·dm_corr`, modulation parameters pick
//!    up `daily_corr·∂(modulation)`
//! 2. the annual sub-form adds directly, so its partials accumulate as-is
//! 3. the residual and error-correlation exponential-decay terms add, each
//!    guarded: a non-positive timescale contributes exactly zero to both the
//!    model and its two derivative entries
//! 4. `num_pairs_i · (model_i − empirical_i)²` accumulates into the weighted
//!    fit
//!
//! The derivative vector holds the model's partials summed over samples, in
//! the planner's parameter order. The timescale parameters are exposed in
//! fortnights (residual) and hours (error correlation) but used in days
//! inside the loop; the matching derivative entries are corrected once after
//! the loop instead of once per sample.

use nalgebra::DVector;
use num_traits::Float;

use crate::error::AppError;
use crate::expr::{Expr, lift};
use crate::registry::constants::{DAYS_PER_FORTNIGHT, HOURS_PER_DAY};

use super::enumerate::Combination;
use super::plan::ParameterPlan;

/// The scalar-loop evaluator for one combination.
#[derive(Debug, Clone)]
pub struct LoopKernel {
    /// Emitted function name: `{stem}_loop`.
    pub name: String,
    pub plan: ParameterPlan,
    pub daily: Expr,
    pub modulation: Expr,
    pub annual: Expr,
    /// Partials of the daily sub-form, local index order; global index is
    /// `plan.offsets[0] + j`.
    pub daily_derivs: Vec<Expr>,
    pub modulation_derivs: Vec<Expr>,
    pub annual_derivs: Vec<Expr>,
}

pub fn synthesize_scalar_loop(
    combination: &Combination,
    plan: &ParameterPlan,
) -> Result<LoopKernel, AppError> {
    for (part, form) in combination.forms() {
        let part_derivs = form.derivatives(part);
        if part_derivs.len() != form.parameters(part).len() {
            return Err(AppError::synthesis(format!(
                "Registry inconsistency in combination {}: {:?} for {:?} has {} parameters but {} derivatives.",
                combination.function_stem(),
                form,
                part,
                form.parameters(part).len(),
                part_derivs.len()
            )));
        }
        super::check_expression(&form.expression(part), plan, &["tdata"], combination)?;
        for d in &part_derivs {
            super::check_expression(d, plan, &["tdata"], combination)?;
        }
    }

    use crate::registry::CorrelationPart::{Annual, Daily, DailyModulation};
    Ok(LoopKernel {
        name: format!("{}_loop", combination.function_stem()),
        plan: plan.clone(),
        daily: combination.daily.expression(Daily),
        modulation: combination.modulation.expression(DailyModulation),
        annual: combination.annual.expression(Annual),
        daily_derivs: combination.daily.derivatives(Daily),
        modulation_derivs: combination.modulation.derivatives(DailyModulation),
        annual_derivs: combination.annual.derivatives(Annual),
    })
}

impl LoopKernel {
    /// Weighted sum of squared residuals plus the accumulated model partials.
    ///
    /// The derivative vector has the same length and order as the parameter
    /// vector and is returned in `f64` regardless of the data width `F`
    /// (accumulation itself runs entirely in `F`).
    pub fn evaluate<F: Float>(
        &self,
        parameters: &[f64],
        tdata: &[F],
        empirical_correlogram: &[F],
        pair_count: &[F],
    ) -> Result<(F, DVector<f64>), AppError> {
        super::check_data_lengths(tdata.len(), empirical_correlogram.len(), pair_count.len())?;
        let mut ctx = super::ctx_with_parameters::<F>(&self.plan, parameters)?;

        let n = self.plan.n_total;
        let daily_off = self.plan.offsets[0];
        let dm_off = self.plan.offsets[1];
        let ann_off = self.plan.offsets[2];
        let resid_off = self.plan.resid_offset();
        let ec_off = self.plan.ec_offset();

        let resid_coef = lift::<F>(parameters[resid_off]);
        let resid_timescale = lift::<F>(parameters[resid_off + 1]) * lift::<F>(DAYS_PER_FORTNIGHT);
        let ec_coef = lift::<F>(parameters[ec_off]);
        let ec_timescale = lift::<F>(parameters[ec_off + 1]) / lift::<F>(HOURS_PER_DAY);

        let mut weighted_fit = F::zero();
        let mut deriv = vec![F::zero(); n];

        for i in 0..tdata.len() {
            let t = tdata[i];
            ctx.bind("tdata", t);

            let daily_corr = self.daily.eval(&ctx)?;
            let dm_corr = self.modulation.eval(&ctx)?;
            let mut here_corr = daily_corr * dm_corr;
            for (j, d) in self.daily_derivs.iter().enumerate() {
                deriv[daily_off + j] = deriv[daily_off + j] + d.eval(&ctx)? * dm_corr;
            }
            for (j, d) in self.modulation_derivs.iter().enumerate() {
                deriv[dm_off + j] = deriv[dm_off + j] + daily_corr * d.eval(&ctx)?;
            }

            let ann_corr = self.annual.eval(&ctx)?;
            here_corr = here_corr + ann_corr;
            for (j, d) in self.annual_derivs.iter().enumerate() {
                deriv[ann_off + j] = deriv[ann_off + j] + d.eval(&ctx)?;
            }

            if resid_timescale > F::zero() {
                let decay = (-t / resid_timescale).exp();
                let resid_corr = resid_coef * decay;
                here_corr = here_corr + resid_corr;
                deriv[resid_off] = deriv[resid_off] + decay;
                deriv[resid_off + 1] =
                    deriv[resid_off + 1] + resid_corr * t / resid_timescale.powi(2);
            }

            if ec_timescale > F::zero() {
                let decay = (-t / ec_timescale).exp();
                let ec_corr = ec_coef * decay;
                here_corr = here_corr + ec_corr;
                deriv[ec_off] = deriv[ec_off] + decay;
                deriv[ec_off + 1] = deriv[ec_off + 1] + ec_corr * t / ec_timescale.powi(2);
            }

            weighted_fit =
                weighted_fit + pair_count[i] * (here_corr - empirical_correlogram[i]).powi(2);
        }

        // Deferred unit corrections: the loop accumulated the partials with
        // respect to the day-scaled timescales; the exposed parameters are in
        // fortnights and hours respectively. Exactly once per gradient entry.
        deriv[resid_off + 1] = deriv[resid_off + 1] * lift::<F>(DAYS_PER_FORTNIGHT);
        deriv[ec_off + 1] = deriv[ec_off + 1] / lift::<F>(HOURS_PER_DAY);

        let deriv = DVector::from_iterator(n, deriv.iter().map(|d| d.to_f64().unwrap_or(f64::NAN)));
        Ok((weighted_fit, deriv))
    }
}
