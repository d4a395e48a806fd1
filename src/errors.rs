/*!
 * Error types for the doctran application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur while translating a single file
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The backend answered but produced nothing usable
    #[error("Empty translation result for {0}")]
    EmptyResult(PathBuf),

    /// No backend is configured for this category
    #[error("No translator configured for {0}")]
    BackendUnavailable(String),

    /// The source file is missing or unreadable
    #[error("Source file is not readable: {0}")]
    UnreadableSource(PathBuf),

    /// A notebook could not be parsed or rebuilt
    #[error("Invalid notebook {path}: {message}")]
    InvalidNotebook {
        /// Notebook path
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Reading or writing an artifact failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl TranslationError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Fatal setup problems, detected before orchestration starts
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Root directory missing or not a directory
    #[error("Invalid root directory: {0}")]
    InvalidRootDirectory(PathBuf),

    /// No target languages requested
    #[error("No target language codes were provided")]
    NoLanguages,

    /// A language code could not be recognized
    #[error("Invalid language code: {0}")]
    InvalidLanguageCode(String),

    /// Credentials required by the text backend are missing
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Any other invalid setting
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}
