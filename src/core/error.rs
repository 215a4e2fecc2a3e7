//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`GnitError`] which covers every failure mode of the
//! gnit client: talking to the evaluator, decoding its responses, chunked
//! transfers and the local repository record. It uses `thiserror` for
//! ergonomic error definitions and includes constructors for the variants
//! that carry context.
//!
//! # Public API
//! - [`GnitError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, GnitError>`
//!
//! # Error Categories
//! - **Repository**: missing or duplicate `.gnit` record, no realm path
//! - **Evaluator**: process failures, malformed or undecodable responses
//! - **Transfer**: chunk/size invariant violations, partial failures
//! - **Local I/O**: file system and JSON errors

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for gnit
#[derive(Error, Debug)]
pub enum GnitError {
    // Repository errors
    #[error("Not a gnit repository (no .gnit file found in {path})")]
    NotARepository { path: PathBuf },

    #[error("A gnit repository already exists at {path}")]
    RepositoryExists { path: PathBuf },

    #[error("Directory '{path}' already exists")]
    DirectoryExists { path: PathBuf },

    #[error("No realm path configured. Use --realm or add a module line to gnomod.toml")]
    NoRealmPath,

    #[error("Invalid realm path: '{path}'")]
    InvalidRealmPath { path: String },

    // Evaluator errors
    #[error("Evaluator command '{command}' failed: {message}")]
    Evaluator { command: String, message: String },

    #[error("Malformed evaluator response: {fragment}")]
    MalformedResponse { fragment: String },

    #[error("Cannot decode '{fragment}': {reason}")]
    DecodeError { fragment: String, reason: String },

    // Transfer errors
    #[error("Protocol error while fetching {resource} at offset {offset}: {message}")]
    ProtocolError {
        resource: String,
        offset: u64,
        message: String,
    },

    #[error("Failed on '{path}': {source}")]
    PartialFailure {
        path: String,
        source: Box<GnitError>,
    },

    #[error("Realm '{realm}' does not exist or is not accessible: {source}")]
    RealmUnavailable {
        realm: String,
        source: Box<GnitError>,
    },

    // Command errors
    #[error("No files staged for commit. Use 'gnit add <file>' to stage files")]
    NothingStaged,

    #[error("No files or directories specified")]
    NoPathsGiven,

    #[error("File does not exist: {path}")]
    FileNotFound { path: PathBuf },

    // Local I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse repository record '{path}': {source}")]
    RecordParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using GnitError
pub type Result<T> = std::result::Result<T, GnitError>;

impl GnitError {
    /// Create a not-a-repository error for the given directory
    pub fn not_a_repository(path: impl Into<PathBuf>) -> Self {
        Self::NotARepository { path: path.into() }
    }

    /// Create a malformed response error carrying the offending fragment
    pub fn malformed_response(fragment: impl Into<String>) -> Self {
        Self::MalformedResponse {
            fragment: fragment.into(),
        }
    }

    /// Create a decode error for a literal that matched a known form
    pub fn decode_error(fragment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DecodeError {
            fragment: fragment.into(),
            reason: reason.into(),
        }
    }

    /// Create a protocol error for a chunked transfer
    pub fn protocol_error(
        resource: impl Into<String>,
        offset: u64,
        message: impl Into<String>,
    ) -> Self {
        Self::ProtocolError {
            resource: resource.into(),
            offset,
            message: message.into(),
        }
    }

    /// Wrap an error with the path of the file that was being processed
    pub fn partial_failure(path: impl Into<String>, source: GnitError) -> Self {
        Self::PartialFailure {
            path: path.into(),
            source: Box::new(source),
        }
    }

    pub fn realm_unavailable(realm: impl Into<String>, source: GnitError) -> Self {
        Self::RealmUnavailable {
            realm: realm.into(),
            source: Box::new(source),
        }
    }

    /// Create an evaluator process error
    pub fn evaluator(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Evaluator {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a write failed error
    pub fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a record parse error
    pub fn record_parse_failed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::RecordParseFailed {
            path: path.into(),
            source,
        }
    }
}
