use std::num::ParseIntError;

use thiserror::Error;

/// Unified error type for version generation
#[derive(Error, Debug)]
pub enum VersionGeneratorError {
    #[error("No applicable version generator (tried: {})", .tried.join(", "))]
    NoApplicableGenerator { tried: Vec<String> },

    #[error("Invalid build number in {variable}: '{value}' is not an integer")]
    InvalidBuildNumber {
        variable: String,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Environment variable {variable} is no longer set")]
    MissingVariable { variable: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version number out of range: {0}")]
    OutOfRange(String),

    #[error("Failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in version-generator
pub type Result<T> = std::result::Result<T, VersionGeneratorError>;

impl VersionGeneratorError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        VersionGeneratorError::Config(msg.into())
    }

    /// Create an error for arithmetic that left the i64 range
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        VersionGeneratorError::OutOfRange(msg.into())
    }

    /// Create a missing-variable error for the named environment variable
    pub fn missing_variable(variable: impl Into<String>) -> Self {
        VersionGeneratorError::MissingVariable {
            variable: variable.into(),
        }
    }
}
