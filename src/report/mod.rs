//! Terminal reporting for generation runs.

use std::path::Path;

use crate::synth::KernelPair;

/// Multi-line summary printed after `corrgen generate`.
pub fn format_run_summary(kernels: &[KernelPair], out_path: &Path) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Generated {} kernel pairs -> {}\n",
        kernels.len(),
        out_path.display()
    ));
    out.push_str(&format_combination_list(kernels));
    out
}

/// One line per combination: stem, parameter count, parameter names.
pub fn format_combination_list(kernels: &[KernelPair]) -> String {
    let name_width = kernels
        .iter()
        .map(|k| k.function_stem().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!(
        "{:<name_width$}  {:>6}  parameters\n",
        "kernel", "params"
    ));
    for k in kernels {
        out.push_str(&format!(
            "{:<name_width$}  {:>6}  {}\n",
            k.function_stem(),
            k.plan.n_total,
            k.plan.names.join(", ")
        ));
    }
    out
}
