//! Error types for the section layer.
//!
//! Identity misses are not errors: every lookup that can miss returns
//! `Option` and the caller treats `None` as "nothing to do". The only failure
//! that is reported as an error is binding content of the wrong type to a
//! content host.

/// Result type alias for section operations.
pub type Result<T> = std::result::Result<T, SectionError>;

/// Errors raised by the section layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectionError {
    /// A content host was asked to display a type it was not created for.
    #[error("content host {host} holds `{expected}`, cannot bind `{found}`")]
    ContentTypeMismatch {
        host: u64,
        expected: &'static str,
        found: &'static str,
    },
}

impl SectionError {
    /// Create a type-mismatch error.
    pub fn type_mismatch(host: u64, expected: &'static str, found: &'static str) -> Self {
        Self::ContentTypeMismatch {
            host,
            expected,
            found,
        }
    }
}
