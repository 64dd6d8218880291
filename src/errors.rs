/*!
 * Error types for the vtt-translate application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised while parsing, consolidating or serializing a caption track
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VttError {
    /// Timecode text does not match `HH:MM:SS.mmm`
    #[error("Malformed timecode: '{input}'")]
    MalformedTimecode {
        /// The offending text
        input: String,
    },

    /// Cue identifier line is not a positive integer
    #[error("Malformed cue index: '{input}'")]
    MalformedCueIndex {
        /// The offending identifier line
        input: String,
    },

    /// Cue block has no timing line
    #[error("Cue {cue} has no time range line")]
    MissingTimeRange {
        /// Identifier of the cue missing its timing
        cue: u64,
    },

    /// Timing line lacks the `-->` separator
    #[error("Malformed time range: '{input}'")]
    MalformedTimeRange {
        /// The offending timing line
        input: String,
    },

    /// The consolidator needs at least one cue
    #[error("Empty track: no cues to consolidate")]
    EmptyTrack,

    /// The consolidator reached a state its splitting rule cannot produce
    #[error("Consolidator invariant violated: {0}")]
    InvariantViolation(String),
}

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
        message: String,
    },

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider answered but the payload carried no usable text
    #[error("No translation returned for '{0}'")]
    Empty(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file or network read/write
    #[error("File error: {0}")]
    File(String),

    /// Error from caption processing
    #[error("Caption error: {0}")]
    Vtt(#[from] VttError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
