//! Common utilities and patterns shared across moquery crates
//!
//! This crate holds the pieces every moquery crate leans on: correlation IDs
//! for tying log lines of one search together, the shared error constructor
//! trait, and process-level initialization of logging.

pub mod error;
pub mod init;

pub use error::{CommonError, require_non_blank};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation ID type for tracking one search from submission to completion
///
/// Uses UUID v4 so concurrent searches in the same process never collide
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generate a new correlation ID using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// True when the value is absent, empty, or whitespace only
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
