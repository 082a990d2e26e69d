use thiserror::Error;

/// Top-level error type for Tally.
///
/// Crates above the core define their own error types and implement
/// `From<TallyError>` so that `?` works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TallyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for TallyError {
    fn from(err: toml::de::Error) -> Self {
        TallyError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for TallyError {
    fn from(err: toml::ser::Error) -> Self {
        TallyError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        TallyError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Tally operations.
pub type Result<T> = std::result::Result<T, TallyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(TallyError, &str)> = vec![
            (
                TallyError::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                TallyError::Serialization("invalid json".to_string()),
                "Serialization error: invalid json",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: TallyError = io_err.into();
        assert!(matches!(err, TallyError::Io(_)));
        assert!(err.to_string().starts_with("I/O error:"));
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let err: std::result::Result<toml::Value, _> = toml::from_str("invalid = [[[");
        let tally_err: TallyError = err.unwrap_err().into();
        assert!(matches!(tally_err, TallyError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope }");
        let tally_err: TallyError = err.unwrap_err().into();
        assert!(matches!(tally_err, TallyError::Serialization(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let value = io_result?;
            Ok(value.to_string())
        }

        assert_eq!(inner().unwrap(), "42");
    }
}
