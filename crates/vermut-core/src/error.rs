//! Error types and error code constants for vermut.
//!
//! This module provides a unified error type (`VermutError`) that bridges
//! domain-specific errors from the subsystems (location parsing, candidate
//! sinks, operator construction) into a common format suitable for the CLI.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad location, unknown operator, bad argument)
//! - `3`: Resolution errors (input tree file missing or unreadable)
//! - `4`: Apply errors (failed to write the mutant or the candidate file)
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! A mutation that finds no target is *not* an error: it is reported as a
//! normal outcome with the tree left unchanged.

use std::fmt;

use thiserror::Error;

use crate::candidate::{CandidateParseError, UnknownOperatorKind};
use crate::sink::SinkError;
use crate::span::LocationParseError;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes used as CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad input, malformed request).
    InvalidArguments = 2,
    /// Resolution errors (input not found or not loadable).
    ResolutionError = 3,
    /// Apply errors (failed to write results).
    ApplyError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for the front door.
#[derive(Debug, Error)]
pub enum VermutError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Input tree could not be found or decoded.
    #[error("cannot load program tree from {path}: {message}")]
    TreeUnavailable { path: String, message: String },

    /// Failed to write results.
    #[error("apply error: {message}")]
    ApplyError {
        message: String,
        file: Option<String>,
    },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

impl From<&VermutError> for OutputErrorCode {
    fn from(err: &VermutError) -> Self {
        match err {
            VermutError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            VermutError::TreeUnavailable { .. } => OutputErrorCode::ResolutionError,
            VermutError::ApplyError { .. } => OutputErrorCode::ApplyError,
            VermutError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<VermutError> for OutputErrorCode {
    fn from(err: VermutError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Bridges
// ============================================================================

impl From<LocationParseError> for VermutError {
    fn from(err: LocationParseError) -> Self {
        VermutError::invalid_args(err.to_string())
    }
}

impl From<UnknownOperatorKind> for VermutError {
    fn from(err: UnknownOperatorKind) -> Self {
        VermutError::invalid_args(err.to_string())
    }
}

impl From<CandidateParseError> for VermutError {
    fn from(err: CandidateParseError) -> Self {
        VermutError::invalid_args(err.to_string())
    }
}

impl From<SinkError> for VermutError {
    fn from(err: SinkError) -> Self {
        match err {
            SinkError::Io { ref path, .. } => VermutError::ApplyError {
                message: err.to_string(),
                file: Some(path.display().to_string()),
            },
            SinkError::Malformed { .. } => VermutError::invalid_args(err.to_string()),
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl VermutError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        VermutError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        VermutError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
