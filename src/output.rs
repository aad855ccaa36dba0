//! JSON output types for the CLI.
//!
//! Every command writes exactly one JSON object to stdout. Successful
//! responses carry `"status": "ok"`; failures carry `"status": "error"` and
//! an [`ErrorInfo`] whose `code` is also the process exit code.

use std::io::{self, Write};

use serde::Serialize;

use vermut_ast::Module;
use vermut_core::{MutationCandidate, OutputErrorCode, VermutError};
use vermut_mutate::MutationReport;

/// Schema version of the JSON responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Scan
// ============================================================================

/// One candidate as it appears in a scan response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateInfo {
    /// `"12"` for an anchor, `"12-40"` for a span.
    pub location: String,
    /// Operator short code.
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub argument: String,
}

impl From<&MutationCandidate> for CandidateInfo {
    fn from(candidate: &MutationCandidate) -> Self {
        CandidateInfo {
            location: candidate.location.to_string(),
            kind: candidate.kind.code().to_string(),
            argument: candidate.argument.clone(),
        }
    }
}

/// Response for `scan`.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResponse {
    pub status: String,
    pub schema_version: String,
    /// Module that was scanned.
    pub module: String,
    /// Number of candidates found.
    pub count: usize,
    /// File the candidates were appended to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out: Option<String>,
    /// The candidates themselves, when no output file was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<CandidateInfo>>,
}

impl ScanResponse {
    /// Response listing `candidates` inline.
    pub fn inline(module: impl Into<String>, candidates: &[MutationCandidate]) -> Self {
        ScanResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            module: module.into(),
            count: candidates.len(),
            out: None,
            candidates: Some(candidates.iter().map(CandidateInfo::from).collect()),
        }
    }

    /// Response for candidates appended to `out`.
    pub fn written(module: impl Into<String>, count: usize, out: impl Into<String>) -> Self {
        ScanResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            module: module.into(),
            count,
            out: Some(out.into()),
            candidates: None,
        }
    }
}

// ============================================================================
// Mutate
// ============================================================================

/// Response for `mutate`.
#[derive(Debug, Clone, Serialize)]
pub struct MutateResponse {
    pub status: String,
    pub schema_version: String,
    /// What the engine did.
    pub mutation: MutationReport,
    /// File the mutant was written to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out: Option<String>,
    /// The mutant tree, when no output file was given and the mutation
    /// applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mutant: Option<Module>,
}

impl MutateResponse {
    pub fn new(mutation: MutationReport) -> Self {
        MutateResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            mutation,
            out: None,
            mutant: None,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    /// Numeric error code, equal to the exit code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// File the error refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl ErrorInfo {
    /// Create from a VermutError.
    pub fn from_error(err: &VermutError) -> Self {
        let file = match err {
            VermutError::TreeUnavailable { path, .. } => Some(path.clone()),
            VermutError::ApplyError { file, .. } => file.clone(),
            _ => None,
        };
        ErrorInfo {
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
            file,
        }
    }
}

/// Response for any failed command.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn from_error(err: &VermutError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

/// Write `response` as pretty JSON followed by a newline.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response).map_err(io::Error::other)?;
    writeln!(writer, "{}", json)
}
