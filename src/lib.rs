//! vermut: mutation testing engine for verified programs.
//!
//! The engine works on a resolved program tree handed over by an external
//! front end. It has two entry points:
//! - [`scan_module`] proposes every legal mutation as a [`MutationCandidate`]
//! - [`apply_mutation`] applies one candidate to the tree in place
//!
//! The `vermut` binary wraps both behind `scan` and `mutate` subcommands that
//! read and write trees as JSON.

// Core vocabulary - re-exported from vermut-core
pub use vermut_core::candidate;
pub use vermut_core::error;
pub use vermut_core::sink;
pub use vermut_core::span;

pub use vermut_core::{
    CandidateSink, MutationCandidate, OperatorKind, OutputErrorCode, SourceSpan, TargetLocation,
    VermutError,
};

// Node model
pub use vermut_ast::{build, nodes, visitor};
pub use vermut_ast::Module;

// Mutation engine
pub use vermut_mutate::{
    apply_mutation, apply_mutation_with, scan_module, FoundTarget, MutateOptions,
    MutationReport, MutationRequest, MutationStatus, ScanOptions,
};

// Front door
pub mod cli;
pub mod output;
