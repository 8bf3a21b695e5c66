//! The generation pipeline shared by `generate` and `check`.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! enumerate -> plan -> synthesize -> emit
//!
//! Synthesis runs to completion before the output file is touched, so a
//! synthesis error never leaves a partially written module behind.

use std::path::PathBuf;

use crate::error::AppError;
use crate::synth::{KernelPair, synthesize_all};

/// Configuration for one generation run, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct GenConfig {
    pub out: PathBuf,
    pub manifest: Option<PathBuf>,
}

/// All computed outputs of a single `corrgen generate` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub kernels: Vec<KernelPair>,
    pub out_path: PathBuf,
}

/// Execute the full generation pipeline and write the module.
pub fn run_generate(config: &GenConfig) -> Result<RunOutput, AppError> {
    let kernels = synthesize_all()?;
    crate::emit::write_module(&config.out, &kernels)?;

    if let Some(path) = &config.manifest {
        let manifest = crate::io::manifest::build_manifest(&kernels, &config.out);
        crate::io::manifest::write_manifest_json(path, &manifest)?;
    }

    Ok(RunOutput {
        kernels,
        out_path: config.out.clone(),
    })
}

/// Synthesize and validate everything without writing.
pub fn run_check() -> Result<Vec<KernelPair>, AppError> {
    synthesize_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_writes_module_and_manifest() {
        let dir = std::env::temp_dir();
        let config = GenConfig {
            out: dir.join("corrgen_pipeline_test.rs"),
            manifest: Some(dir.join("corrgen_pipeline_test.json")),
        };

        let run = run_generate(&config).unwrap();
        assert!(!run.kernels.is_empty());

        let module = std::fs::read_to_string(&config.out).unwrap();
        assert!(module.contains("pub const DAYS_PER_FORTNIGHT"));
        for k in &run.kernels {
            assert!(module.contains(&format!("pub fn {}_loop", k.function_stem())));
        }

        let manifest =
            crate::io::manifest::read_manifest_json(config.manifest.as_ref().unwrap()).unwrap();
        assert_eq!(manifest.kernels.len(), run.kernels.len());

        std::fs::remove_file(&config.out).unwrap();
        std::fs::remove_file(config.manifest.as_ref().unwrap()).unwrap();
    }

    #[test]
    fn check_validates_the_whole_catalog() {
        let kernels = run_check().unwrap();
        assert_eq!(kernels.len(), crate::synth::valid_combinations().count());
    }
}
