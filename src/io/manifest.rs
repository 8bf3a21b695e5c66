//! Read/write the kernel manifest JSON.
//!
//! The manifest is the "portable" description of one generation run: which
//! module was produced and, per kernel, the function-name stem and the exact
//! parameter ordering. Downstream fitting code binds parameter vectors from
//! this file instead of parsing the generated source.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::synth::KernelPair;

/// A saved manifest file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelManifest {
    pub tool: String,
    /// Path of the generated module, as written.
    pub module: String,
    pub kernels: Vec<KernelEntry>,
}

/// One generated kernel pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelEntry {
    /// Function-name stem; the evaluators are `{name}_ne` and `{name}_loop`.
    pub name: String,
    pub n_parameters: usize,
    /// Parameter names in positional order.
    pub parameters: Vec<String>,
}

/// Build the manifest for one run.
pub fn build_manifest(kernels: &[KernelPair], module_path: &Path) -> KernelManifest {
    KernelManifest {
        tool: "corrgen".to_string(),
        module: module_path.display().to_string(),
        kernels: kernels
            .iter()
            .map(|k| KernelEntry {
                name: k.function_stem(),
                n_parameters: k.plan.n_total,
                parameters: k.plan.names.clone(),
            })
            .collect(),
    }
}

/// Write a manifest JSON file.
pub fn write_manifest_json(path: &Path, manifest: &KernelManifest) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::io(format!(
            "Failed to create manifest JSON '{}': {e}",
            path.display()
        ))
    })?;
    serde_json::to_writer_pretty(file, manifest)
        .map_err(|e| AppError::io(format!("Failed to write manifest JSON: {e}")))?;
    Ok(())
}

/// Read a manifest JSON file.
pub fn read_manifest_json(path: &Path) -> Result<KernelManifest, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::io(format!(
            "Failed to open manifest JSON '{}': {e}",
            path.display()
        ))
    })?;
    let manifest: KernelManifest = serde_json::from_reader(file)
        .map_err(|e| AppError::io(format!("Invalid manifest JSON: {e}")))?;
    Ok(manifest)
}
