//! Error types module
//!
//! Configuration failures are fatal at startup and are reported before any
//! storage client is built.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<&'static str>),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

impl ConfigError {
    /// Names of the variables that were not set, empty for other variants
    pub fn missing(&self) -> &[&'static str] {
        match self {
            ConfigError::MissingVariables(names) => names,
            ConfigError::InvalidValue { .. } => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variables_message_lists_every_name() {
        let err = ConfigError::MissingVariables(vec!["S3_BUCKET_NAME", "S3_BASE_URL"]);
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: S3_BUCKET_NAME, S3_BASE_URL"
        );
        assert_eq!(err.missing(), &["S3_BUCKET_NAME", "S3_BASE_URL"]);
    }

    #[test]
    fn invalid_value_has_no_missing_names() {
        let err = ConfigError::InvalidValue {
            name: "S3_BASE_URL",
            reason: "must start with http:// or https://".to_string(),
        };
        assert!(err.missing().is_empty());
        assert!(err.to_string().contains("S3_BASE_URL"));
    }
}
