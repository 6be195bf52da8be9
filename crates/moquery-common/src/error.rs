//! Common error handling utilities and patterns
//!
//! Each moquery crate owns its error enum; this module gives them a shared
//! constructor interface so helpers here can produce crate-specific errors.

/// Constructors for error variants that appear across multiple crates
pub trait CommonError: std::error::Error + Send + Sync + 'static {
    /// Create a configuration error variant
    fn config_error(msg: impl Into<String>) -> Self
    where
        Self: Sized;
}

/// Require a parameter to carry non-whitespace text
///
/// Returns the trimmed value on success.
///
/// # Errors
/// Returns the caller's configuration error variant when `value` is absent,
/// empty, or whitespace only.
pub fn require_non_blank<'a, E: CommonError>(
    value: Option<&'a str>,
    field: &str,
) -> Result<&'a str, E> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(E::config_error(format!(
            "{field} is empty, but is required by this search."
        ))),
    }
}
