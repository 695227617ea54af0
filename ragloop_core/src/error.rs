//! Error types for ragloop.
//!
//! Query synthesis and ranking are total and never fail. Errors only come
//! from the edges: loading configuration and parsing spec records.

/// Main error type for ragloop.
#[derive(thiserror::Error, Debug)]
pub enum RetrievalError {
    /// Configuration values are inconsistent with each other.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Input records have an unexpected shape.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML config parse error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Type alias for Result with RetrievalError.
pub type Result<T> = std::result::Result<T, RetrievalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RetrievalError::InvalidConfig("top_k".to_string());
        assert_eq!(err.to_string(), "Invalid config: top_k");
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: RetrievalError = parse.unwrap_err().into();
        assert!(matches!(err, RetrievalError::Json(_)));
    }
}
