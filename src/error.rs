//! Error types and handling for the `BeachSafe` application

use thiserror::Error;

/// Main error type for the `BeachSafe` application
#[derive(Error, Debug)]
pub enum BeachSafeError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The location query could not be geocoded
    #[error("Could not find coordinates for: {query}")]
    Resolution { query: String, reason: String },
}

impl BeachSafeError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new resolution error for a query that could not be geocoded
    pub fn resolution<Q: Into<String>, R: Into<String>>(query: Q, reason: R) -> Self {
        Self::Resolution {
            query: query.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error is a warning about missing input rather than a failure
    #[must_use]
    pub fn is_warning(&self) -> bool {
        matches!(self, BeachSafeError::Validation { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            BeachSafeError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            BeachSafeError::Validation { message } => message.clone(),
            BeachSafeError::Resolution { query, .. } => {
                format!("Could not find coordinates for: {query}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = BeachSafeError::config("missing API key");
        assert!(matches!(config_err, BeachSafeError::Config { .. }));

        let resolution_err = BeachSafeError::resolution("Atlantis", "no results");
        assert!(matches!(resolution_err, BeachSafeError::Resolution { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = BeachSafeError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let validation_err = BeachSafeError::validation("Please enter a location");
        assert_eq!(validation_err.user_message(), "Please enter a location");
        assert!(validation_err.is_warning());

        let resolution_err = BeachSafeError::resolution("Atlantis", "ZERO_RESULTS");
        assert_eq!(
            resolution_err.user_message(),
            "Could not find coordinates for: Atlantis"
        );
        assert!(!resolution_err.is_warning());
    }
}
