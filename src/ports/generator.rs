//! Generative text port.

use super::ExternalServiceError;

/// Trait for the external generative text collaborator.
///
/// Callers must tolerate the returned text being wrapped in code-fence
/// markers, and must tolerate structured-parse failure downstream; this
/// port promises text, not shape.
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`.
    ///
    /// `expect_structured` asks the collaborator for machine-parseable
    /// output (a best-effort hint, not a guarantee).
    ///
    /// # Errors
    /// Returns `ExternalServiceError` on transport or collaborator failure.
    fn generate(&self, prompt: &str, expect_structured: bool)
        -> Result<String, ExternalServiceError>;
}
