//! Process-level error type.
//!
//! Synthesis is pure and deterministic, so there is exactly one error policy:
//! surface the failure with the offending combination named, and abort the
//! whole run. Retrying without changed inputs cannot change the outcome.

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// I/O failure (output module, manifest).
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Synthesis failure (naming conflict, undefined symbol, unknown constant).
    ///
    /// These abort the run before any output for the offending combination is
    /// written: partially generated source would otherwise fail much later at
    /// compile time with a confusing error.
    pub fn synthesis(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
