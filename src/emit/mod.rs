//! Rendering and writing the generated kernel module.
//!
//! This is the only component with an observable side effect. The output file
//! is created once, receives the physical-constants preamble exactly once,
//! and is appended once per valid combination in enumeration order; the
//! scoped `File` handle closes on every exit path, including an early return
//! from a write failure.
//!
//! Generated functions are generic over the float width `F`, mirroring the
//! in-crate evaluators: parameters arrive as `f64` and are lifted into `F`
//! once, at the top of each function; data arrays and accumulators stay in
//! `F` throughout.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::AppError;
use crate::registry::constants::GLOBAL_CONSTANTS;
use crate::synth::KernelPair;

/// Render the module header and constants preamble.
pub fn render_preamble() -> String {
    let mut out = String::new();
    out.push_str("//! Flux-correlation cost-function kernels.\n");
    out.push_str("//!\n");
    out.push_str("//! Generated by `corrgen`. Do not edit by hand; regenerate instead.\n");
    out.push_str("\n");
    out.push_str("use num_traits::Float;\n");
    out.push_str("\n");
    for (name, value) in GLOBAL_CONSTANTS {
        let _ = writeln!(out, "pub const {name}: f64 = {value:?};");
    }
    out.push_str("\n");
    out.push_str("/// Lift an `f64` into the kernel float width.\n");
    out.push_str("fn lift<F: Float>(x: f64) -> F {\n");
    out.push_str("    F::from(x).unwrap_or_else(F::nan)\n");
    out.push_str("}\n");
    out
}

/// Render both function definitions for one combination.
pub fn render_kernel_pair(kernel: &KernelPair) -> String {
    format!("{}{}", render_vectorized(kernel), render_loop(kernel))
}

/// Render the whole module (preamble + every kernel pair).
pub fn render_module(kernels: &[KernelPair]) -> String {
    let mut out = render_preamble();
    for k in kernels {
        out.push_str(&render_kernel_pair(k));
    }
    out
}

/// Write the generated module to `path`.
pub fn write_module(path: &Path, kernels: &[KernelPair]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::io(format!(
            "Failed to create kernel module '{}': {e}",
            path.display()
        ))
    })?;

    file.write_all(render_preamble().as_bytes())
        .map_err(|e| AppError::io(format!("Failed to write kernel module preamble: {e}")))?;

    for k in kernels {
        file.write_all(render_kernel_pair(k).as_bytes()).map_err(|e| {
            AppError::io(format!(
                "Failed to write kernel {}: {e}",
                k.function_stem()
            ))
        })?;
    }

    Ok(())
}

/// Positional parameter bindings, one per planned parameter.
fn param_bindings(kernel: &KernelPair) -> String {
    let mut out = String::new();
    for (i, name) in kernel.plan.names.iter().enumerate() {
        let _ = writeln!(out, "    let {name} = lift::<F>(parameters[{i}]);");
    }
    out
}

/// Local bindings for the physical constants an expression set references.
fn const_bindings(constants: &BTreeSet<&'static str>) -> String {
    let mut out = String::new();
    for name in constants {
        let _ = writeln!(out, "    let {} = lift::<F>({name});", name.to_lowercase());
    }
    out
}

fn render_vectorized(kernel: &KernelPair) -> String {
    let v = &kernel.vectorized;
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "/// Weighted sum of squared residuals for `{}`, vectorized.",
        kernel.function_stem()
    );
    let _ = writeln!(out, "pub fn {}<F: Float>(", v.name);
    out.push_str("    parameters: &[f64],\n");
    out.push_str("    tdata: &[F],\n");
    out.push_str("    empirical_correlogram: &[F],\n");
    out.push_str("    pair_count: &[F],\n");
    out.push_str(") -> F {\n");
    out.push_str(&param_bindings(kernel));
    out.push_str(&const_bindings(&v.summand.constants()));
    out.push_str("    tdata\n");
    out.push_str("        .iter()\n");
    out.push_str("        .zip(empirical_correlogram)\n");
    out.push_str("        .zip(pair_count)\n");
    let _ = writeln!(
        out,
        "        .map(|((&t, &corr), &num_pairs)| {})",
        v.summand.to_rust()
    );
    out.push_str("        .fold(F::zero(), |acc, term| acc + term)\n");
    out.push_str("}\n");
    out
}

fn render_loop(kernel: &KernelPair) -> String {
    let k = &kernel.scalar_loop;
    let plan = &kernel.plan;
    let mut out = String::new();

    let mut constants: BTreeSet<&'static str> = BTreeSet::new();
    for e in [&k.daily, &k.modulation, &k.annual] {
        constants.extend(e.constants());
    }
    for e in k
        .daily_derivs
        .iter()
        .chain(&k.modulation_derivs)
        .chain(&k.annual_derivs)
    {
        constants.extend(e.constants());
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "/// Scalar loop for `{}`: weighted sum of squared residuals plus the",
        kernel.function_stem()
    );
    let _ = writeln!(out, "/// model partials accumulated per parameter.");
    let _ = writeln!(out, "pub fn {}<F: Float>(", k.name);
    out.push_str("    parameters: &[f64],\n");
    out.push_str("    tdata: &[F],\n");
    out.push_str("    empirical_correlogram: &[F],\n");
    out.push_str("    pair_count: &[F],\n");
    out.push_str(") -> (F, Vec<f64>) {\n");
    let _ = writeln!(out, "    let n_parameters = {};", plan.n_total);
    out.push_str(&param_bindings(kernel));
    out.push_str(&const_bindings(&constants));
    out.push_str("\n");
    out.push_str("    // Exposed units: fortnights and hours; the loop runs in days.\n");
    out.push_str("    let resid_timescale = resid_timescale * lift::<F>(DAYS_PER_FORTNIGHT);\n");
    out.push_str("    let ec_timescale = ec_timescale / lift::<F>(HOURS_PER_DAY);\n");
    out.push_str("\n");
    out.push_str("    let mut weighted_fit = F::zero();\n");
    out.push_str("    let mut deriv = vec![F::zero(); n_parameters];\n");
    out.push_str("\n");
    out.push_str("    for i in 0..tdata.len() {\n");
    out.push_str("        let t = tdata[i];\n");
    out.push_str("\n");
    let _ = writeln!(out, "        let daily_corr = {};", k.daily.to_rust());
    let _ = writeln!(out, "        let dm_corr = {};", k.modulation.to_rust());
    out.push_str("        let mut here_corr = daily_corr * dm_corr;\n");
    for (j, d) in k.daily_derivs.iter().enumerate() {
        let idx = plan.offsets[0] + j;
        let _ = writeln!(
            out,
            "        deriv[{idx}] = deriv[{idx}] + {} * dm_corr;",
            d.to_rust()
        );
    }
    for (j, d) in k.modulation_derivs.iter().enumerate() {
        let idx = plan.offsets[1] + j;
        let _ = writeln!(
            out,
            "        deriv[{idx}] = deriv[{idx}] + daily_corr * {};",
            d.to_rust()
        );
    }
    out.push_str("\n");
    let _ = writeln!(out, "        let ann_corr = {};", k.annual.to_rust());
    out.push_str("        here_corr = here_corr + ann_corr;\n");
    for (j, d) in k.annual_derivs.iter().enumerate() {
        let idx = plan.offsets[2] + j;
        let _ = writeln!(
            out,
            "        deriv[{idx}] = deriv[{idx}] + {};",
            d.to_rust()
        );
    }
    out.push_str("\n");
    out.push_str("        if resid_timescale > F::zero() {\n");
    out.push_str("            let decay = (-t / resid_timescale).exp();\n");
    out.push_str("            let resid_corr = resid_coef * decay;\n");
    out.push_str("            here_corr = here_corr + resid_corr;\n");
    out.push_str(
        "            deriv[n_parameters - 4] = deriv[n_parameters - 4] + decay;\n",
    );
    out.push_str(
        "            deriv[n_parameters - 3] = deriv[n_parameters - 3] + resid_corr * t / resid_timescale.powi(2);\n",
    );
    out.push_str("        }\n");
    out.push_str("\n");
    out.push_str("        if ec_timescale > F::zero() {\n");
    out.push_str("            let decay = (-t / ec_timescale).exp();\n");
    out.push_str("            let ec_corr = ec_coef * decay;\n");
    out.push_str("            here_corr = here_corr + ec_corr;\n");
    out.push_str(
        "            deriv[n_parameters - 2] = deriv[n_parameters - 2] + decay;\n",
    );
    out.push_str(
        "            deriv[n_parameters - 1] = deriv[n_parameters - 1] + ec_corr * t / ec_timescale.powi(2);\n",
    );
    out.push_str("        }\n");
    out.push_str("\n");
    out.push_str(
        "        weighted_fit = weighted_fit + pair_count[i] * (here_corr - empirical_correlogram[i]).powi(2);\n",
    );
    out.push_str("    }\n");
    out.push_str("\n");
    out.push_str("    // Deferred unit corrections, once per gradient entry.\n");
    out.push_str(
        "    deriv[n_parameters - 3] = deriv[n_parameters - 3] * lift::<F>(DAYS_PER_FORTNIGHT);\n",
    );
    out.push_str(
        "    deriv[n_parameters - 1] = deriv[n_parameters - 1] / lift::<F>(HOURS_PER_DAY);\n",
    );
    out.push_str("\n");
    out.push_str("    let deriv = deriv\n");
    out.push_str("        .iter()\n");
    out.push_str("        .map(|d| d.to_f64().unwrap_or(f64::NAN))\n");
    out.push_str("        .collect();\n");
    out.push_str("    (weighted_fit, deriv)\n");
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PartForm;
    use crate::synth::{Combination, synthesize, synthesize_all};

    #[test]
    fn preamble_defines_every_constant_once() {
        let kernels = synthesize_all().unwrap();
        let module = render_module(&kernels);
        for (name, _) in GLOBAL_CONSTANTS {
            let needle = format!("pub const {name}: f64");
            assert_eq!(
                module.matches(&needle).count(),
                1,
                "{name} should be defined exactly once"
            );
        }
        assert_eq!(module.matches("fn lift<F: Float>").count(), 1);
    }

    #[test]
    fn every_kernel_gets_both_functions() {
        let kernels = synthesize_all().unwrap();
        let module = render_module(&kernels);
        for k in &kernels {
            let stem = k.function_stem();
            assert!(module.contains(&format!("pub fn {stem}_ne<F: Float>")), "{stem}");
            assert!(module.contains(&format!("pub fn {stem}_loop<F: Float>")), "{stem}");
        }
    }

    #[test]
    fn generated_function_names_are_unique() {
        let kernels = synthesize_all().unwrap();
        let module = render_module(&kernels);
        let mut names: Vec<&str> = module
            .lines()
            .filter_map(|l| l.strip_prefix("pub fn "))
            .collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn parameter_bindings_are_positional() {
        let kernel = synthesize(Combination {
            daily: PartForm::CosineSeries,
            modulation: PartForm::ExpSinSquared,
            annual: PartForm::Cosine,
        })
        .unwrap();
        let text = render_kernel_pair(&kernel);
        assert!(text.contains("let daily_coef1 = lift::<F>(parameters[0]);"));
        assert!(text.contains("let daily_coef2 = lift::<F>(parameters[1]);"));
        assert!(text.contains("let dm_coef = lift::<F>(parameters[2]);"));
        assert!(text.contains("let ann_coef = lift::<F>(parameters[4]);"));
        assert!(text.contains("let resid_coef = lift::<F>(parameters[5]);"));
        assert!(text.contains("let ec_timescale = lift::<F>(parameters[8]);"));
    }

    #[test]
    fn loop_body_indexes_derivatives_by_plan_offsets() {
        let kernel = synthesize(Combination {
            daily: PartForm::CosineSeries,
            modulation: PartForm::ExpSinSquared,
            annual: PartForm::Cosine,
        })
        .unwrap();
        let text = render_kernel_pair(&kernel);
        // Daily block at 0..2, modulation at 2..4, annual at 4.
        assert!(text.contains("deriv[0] = deriv[0] +"));
        assert!(text.contains("deriv[1] = deriv[1] +"));
        assert!(text.contains("deriv[2] = deriv[2] + daily_corr *"));
        assert!(text.contains("deriv[3] = deriv[3] + daily_corr *"));
        assert!(text.contains("deriv[4] = deriv[4] +"));
        // Trailing blocks always address from the end.
        assert!(text.contains("deriv[n_parameters - 4]"));
        assert!(text.contains("deriv[n_parameters - 1]"));
    }

    #[test]
    fn unit_corrections_appear_after_the_loop() {
        let kernel = synthesize(Combination {
            daily: PartForm::Cosine,
            modulation: PartForm::Constant,
            annual: PartForm::Constant,
        })
        .unwrap();
        let text = render_kernel_pair(&kernel);
        let correction =
            "deriv[n_parameters - 3] = deriv[n_parameters - 3] * lift::<F>(DAYS_PER_FORTNIGHT);";
        assert_eq!(text.matches(correction).count(), 1);
        let close = text.rfind('}').unwrap();
        assert!(text.find(correction).unwrap() < close);
    }

    #[test]
    fn write_module_creates_the_file_with_preamble_first() {
        let kernels: Vec<_> = synthesize_all().unwrap().into_iter().take(2).collect();
        let path = std::env::temp_dir().join("corrgen_emit_test.rs");
        write_module(&path, &kernels).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("//! Flux-correlation cost-function kernels."));
        assert!(written.contains("pub fn dc_dmc_ac_ne"));

        std::fs::remove_file(&path).unwrap();
    }
}
