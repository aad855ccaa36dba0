//! Core infrastructure for vermut.
//!
//! This crate provides the language-agnostic vocabulary shared by the
//! node model, the mutation engine and the front door:
//! - Source positions, spans and target locations
//! - Mutation candidates and operator kinds
//! - The append-only candidate sink
//! - Error types and error codes

pub mod candidate;
pub mod error;
pub mod sink;
pub mod span;

pub use candidate::{CandidateParseError, MutationCandidate, OperatorKind, UnknownOperatorKind};
pub use error::{OutputErrorCode, VermutError};
pub use sink::{read_candidates, CandidateSink, SinkError};
pub use span::{LocationParseError, Position, SourceSpan, TargetLocation};
