//! Error types for the timed cache
//!
//! Cache operations themselves are total; errors only arise while setting
//! the cache up.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A configuration variable held a value that could not be parsed
    #[error("Invalid value for {var}: {value:?}")]
    InvalidConfig {
        /// Name of the offending variable
        var: &'static str,
        /// The raw value that failed to parse
        value: String,
    },
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_message() {
        let err = CacheError::InvalidConfig {
            var: "CACHE_DURATION",
            value: "soon".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value for CACHE_DURATION: \"soon\"");
    }
}
