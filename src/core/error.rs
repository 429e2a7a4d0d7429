//! Error types for the decision jungle library.
//!
//! Every fallible operation returns [`Result<T>`]. Errors split into two
//! broad families: configuration errors raised eagerly before any work
//! starts, and runtime errors raised while loading data, training, or
//! (de)serializing models. Nothing in this crate retries; a bulk load
//! either succeeds completely or fails with the first offending row.

use thiserror::Error;

/// Convenient result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, JungleError>;

/// Unified error type for all jungle operations.
#[derive(Error, Debug)]
pub enum JungleError {
    /// Invalid configuration parameters, detected before training starts.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the invalid parameter.
        message: String,
    },

    /// Training data violates an invariant (empty set, inconsistent
    /// feature dimensions, negative labels).
    #[error("Dataset error: {message}")]
    Dataset {
        /// Description of the violation.
        message: String,
    },

    /// A data file could not be parsed.
    #[error("Data loading error: {message}")]
    DataLoading {
        /// Description of the malformed content.
        message: String,
    },

    /// Training failed after it started.
    #[error("Training error: {message}")]
    Training {
        /// Description of the failure.
        message: String,
    },

    /// A model file could not be written or reconstructed.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the failure.
        message: String,
    },

    /// Internal invariant violation. Indicates a bug, not a user error.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the broken invariant.
        message: String,
    },

    /// Underlying I/O failure.
    #[error("I/O error: {source}")]
    Io {
        /// The wrapped I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Underlying CSV parsing failure.
    #[error("CSV error: {source}")]
    Csv {
        /// The wrapped csv error.
        #[from]
        source: csv::Error,
    },
}

impl JungleError {
    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        JungleError::Config { message: message.into() }
    }

    /// Creates a dataset error.
    pub fn dataset<S: Into<String>>(message: S) -> Self {
        JungleError::Dataset { message: message.into() }
    }

    /// Creates a data loading error.
    pub fn data_loading<S: Into<String>>(message: S) -> Self {
        JungleError::DataLoading { message: message.into() }
    }

    /// Creates a training error.
    pub fn training<S: Into<String>>(message: S) -> Self {
        JungleError::Training { message: message.into() }
    }

    /// Creates a serialization error.
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        JungleError::Serialization { message: message.into() }
    }

    /// Creates an internal error.
    pub fn internal<S: Into<String>>(message: S) -> Self {
        JungleError::Internal { message: message.into() }
    }

    /// Coarse category string, useful for logging and triage.
    pub fn category(&self) -> &'static str {
        match self {
            JungleError::Config { .. } => "config",
            JungleError::Dataset { .. } => "dataset",
            JungleError::DataLoading { .. } => "data_loading",
            JungleError::Training { .. } => "training",
            JungleError::Serialization { .. } => "serialization",
            JungleError::Internal { .. } => "internal",
            JungleError::Io { .. } => "io",
            JungleError::Csv { .. } => "csv",
        }
    }

    /// True for errors the caller can fix by changing inputs or
    /// configuration, false for bugs and environment failures.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            JungleError::Config { .. }
                | JungleError::Dataset { .. }
                | JungleError::DataLoading { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_message() {
        let e = JungleError::config("maximum depth must be positive");
        assert_eq!(
            e.to_string(),
            "Configuration error: maximum depth must be positive"
        );
    }

    #[test]
    fn error_categories() {
        assert_eq!(JungleError::config("x").category(), "config");
        assert_eq!(JungleError::dataset("x").category(), "dataset");
        assert_eq!(JungleError::data_loading("x").category(), "data_loading");
        assert_eq!(JungleError::training("x").category(), "training");
        assert_eq!(JungleError::serialization("x").category(), "serialization");
        assert_eq!(JungleError::internal("x").category(), "internal");
    }

    #[test]
    fn io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e: JungleError = io.into();
        assert_eq!(e.category(), "io");
        assert!(!e.is_user_error());
    }

    #[test]
    fn user_error_classification() {
        assert!(JungleError::config("x").is_user_error());
        assert!(JungleError::data_loading("x").is_user_error());
        assert!(!JungleError::training("x").is_user_error());
        assert!(!JungleError::internal("x").is_user_error());
    }
}
