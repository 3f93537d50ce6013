//! Error types for the tagging pipeline

use thiserror::Error;

/// Result type alias for tagging operations
pub type TaggerResult<T> = Result<T, TaggerError>;

/// Error type for every stage of a tagging run
///
/// A run stops at the first error; its display string is what ends up in the
/// error slot of the plugin response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaggerError {
    /// Malformed plugin parameter, unknown option key or bad config file
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Unsupported schema syntax, undecodable extension payload or a
    /// requested file missing from the descriptor set
    #[error("schema error: {0}")]
    SchemaError(String),

    /// Malformed tag literal, from a schema extension or from existing source
    #[error("annotation parse error: {0}")]
    AnnotationParseError(String),

    /// Generated source text could not be lexed or parsed
    #[error("target parse error: {0}")]
    TargetParseError(String),

    /// Generated source file exists but could not be read
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// Request or response bytes could not be decoded or encoded
    #[error("serialization error: {0}")]
    SerializationError(String),
}

impl TaggerError {
    /// Returns a stable numeric code for the error class
    pub fn error_code(&self) -> u32 {
        match self {
            TaggerError::ConfigError(_) => 1,
            TaggerError::SchemaError(_) => 2,
            TaggerError::AnnotationParseError(_) => 3,
            TaggerError::TargetParseError(_) => 4,
            TaggerError::SourceUnavailable(_) => 5,
            TaggerError::SerializationError(_) => 6,
        }
    }

    /// Prefix the message with `context`, keeping the error class
    ///
    /// ```
    /// use gotagger_core::TaggerError;
    ///
    /// let err = TaggerError::SchemaError("unsupported syntax 'proto2'".into())
    ///     .with_context("failed to analyze proto file 'a.proto'");
    /// assert_eq!(
    ///     err.to_string(),
    ///     "schema error: failed to analyze proto file 'a.proto': unsupported syntax 'proto2'"
    /// );
    /// ```
    pub fn with_context(self, context: impl std::fmt::Display) -> Self {
        let wrap = |message: String| format!("{context}: {message}");
        match self {
            TaggerError::ConfigError(m) => TaggerError::ConfigError(wrap(m)),
            TaggerError::SchemaError(m) => TaggerError::SchemaError(wrap(m)),
            TaggerError::AnnotationParseError(m) => TaggerError::AnnotationParseError(wrap(m)),
            TaggerError::TargetParseError(m) => TaggerError::TargetParseError(wrap(m)),
            TaggerError::SourceUnavailable(m) => TaggerError::SourceUnavailable(wrap(m)),
            TaggerError::SerializationError(m) => TaggerError::SerializationError(wrap(m)),
        }
    }

    /// The message without the class prefix
    pub fn message(&self) -> &str {
        match self {
            TaggerError::ConfigError(m)
            | TaggerError::SchemaError(m)
            | TaggerError::AnnotationParseError(m)
            | TaggerError::TargetParseError(m)
            | TaggerError::SourceUnavailable(m)
            | TaggerError::SerializationError(m) => m,
        }
    }
}
