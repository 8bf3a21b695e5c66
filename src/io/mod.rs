//! Output formats other than the generated module itself.
//!
//! - `manifest`: machine-readable JSON description of the generated kernels

pub mod manifest;
