//! Error types surfaced by the logging core.

use thiserror::Error;

/// Errors reported by the severity registry and the call-site resolver.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LoggingError {
    /// A named or explicit (`as_level`) lookup did not match any level.
    #[error("No handler named '{level}' found (requested as '{requested}').")]
    UnknownLevel {
        /// Upper-cased level name that was looked up.
        level: String,
        /// The name exactly as the caller spelled it.
        requested: String,
    },

    /// The bootstrap ladder did not establish the default `LOG` level.
    #[error("No handler named 'LOG' found; cannot bootstrap the severity ladder")]
    MissingDefaultLevel,

    /// A raw relation was not one of `-1`, `0`, or `1`.
    #[error("Invalid level relation {0}; expected -1, 0 or 1")]
    InvalidRelation(i8),
}

impl LoggingError {
    pub(crate) fn unknown_level(requested: &str) -> Self {
        Self::UnknownLevel {
            level: requested.to_ascii_uppercase(),
            requested: requested.to_owned(),
        }
    }
}

/// Failure to interpret persisted namespace configuration.
///
/// The loader never propagates this to callers; it is logged and the
/// configuration falls back to "no overrides".
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The stored value is not valid JSON of the expected shape.
    #[error("malformed namespace configuration: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_level_names_both_spellings() {
        let err = LoggingError::unknown_level("bogus");
        let message = err.to_string();
        assert!(message.contains("'BOGUS'"));
        assert!(message.contains("'bogus'"));
    }

    #[test]
    fn invalid_relation_reports_value() {
        assert!(LoggingError::InvalidRelation(2).to_string().contains('2'));
    }

    #[test]
    fn config_error_wraps_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ConfigError::from(json_err);
        let message = err.to_string();
        assert!(message.starts_with("malformed namespace configuration"));
    }
}
