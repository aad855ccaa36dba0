// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Mutation engine for vermut.
//!
//! - [`scan_module`]: walk a resolved tree and propose every legal mutation
//! - [`apply_mutation`]: locate one target and rewrite it in place
//!
//! The two halves share the operator catalogue in [`ops`], so a candidate
//! produced by the scanner is always accepted by the operator it names.

pub mod error;
pub mod locator;
pub mod ops;
pub mod scanner;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vermut_ast::visitor::walk_module_mut;
use vermut_ast::Module;
use vermut_core::{MutationCandidate, OperatorKind, SourceSpan, TargetLocation};

use crate::scanner::DeclIndex;

pub use error::MutateError;
pub use locator::{FoundTarget, Locator};
pub use ops::{build_mutator, MutationContext, Mutator, Outcome, DEFAULT_MAX_CASCADE_DEPTH};
pub use scanner::{scan_module, ScanOptions};

// ============================================================================
// Requests and reports
// ============================================================================

/// One mutation to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRequest {
    pub location: TargetLocation,
    pub kind: OperatorKind,
    /// Operator argument; `None` for operators that take none.
    #[serde(default)]
    pub argument: Option<String>,
}

impl MutationRequest {
    pub fn new(location: TargetLocation, kind: OperatorKind, argument: Option<&str>) -> Self {
        MutationRequest {
            location,
            kind,
            argument: argument.map(str::to_string),
        }
    }
}

impl From<&MutationCandidate> for MutationRequest {
    fn from(candidate: &MutationCandidate) -> Self {
        MutationRequest::new(candidate.location, candidate.kind, candidate.argument())
    }
}

/// Whether a request changed the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationStatus {
    Applied,
    NotFound,
}

/// Result of [`apply_mutation`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationReport {
    pub kind: OperatorKind,
    pub location: TargetLocation,
    pub status: MutationStatus,
    /// Kind of node that was rewritten.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found: Option<FoundTarget>,
    /// Span of the node that was rewritten.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_span: Option<SourceSpan>,
    /// Method or function the walk was in when it stopped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub containing: Option<String>,
    /// Why a matching node refused the edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<String>,
}

impl MutationReport {
    pub fn is_applied(&self) -> bool {
        self.status == MutationStatus::Applied
    }
}

/// Options for [`apply_mutation_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutateOptions {
    /// Bound on the chained deletions VDL may perform.
    pub max_cascade_depth: usize,
}

impl Default for MutateOptions {
    fn default() -> Self {
        MutateOptions {
            max_cascade_depth: DEFAULT_MAX_CASCADE_DEPTH,
        }
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Apply `request` to `module` with default options.
pub fn apply_mutation(
    module: &mut Module,
    request: &MutationRequest,
) -> Result<MutationReport, MutateError> {
    apply_mutation_with(module, request, &MutateOptions::default())
}

/// Apply `request` to `module` in place.
///
/// Returns an error only for a malformed request. A request that matches no
/// node, or whose target refuses the edit, leaves `module` unchanged and
/// reports [`MutationStatus::NotFound`].
pub fn apply_mutation_with(
    module: &mut Module,
    request: &MutationRequest,
    options: &MutateOptions,
) -> Result<MutationReport, MutateError> {
    let span = tracing::debug_span!(
        "apply_mutation",
        kind = %request.kind,
        location = %request.location,
    );
    let _guard = span.enter();

    let mut mutator = build_mutator(request.kind, request.argument.as_deref())?;
    let mut cx = MutationContext::new(request.location).with_decls(DeclIndex::build(module));
    cx.max_cascade_depth = options.max_cascade_depth;

    let mut locator = Locator::new(mutator.as_mut(), cx);
    walk_module_mut(&mut locator, module);

    let found = locator.found();
    let status = if found.is_some() {
        MutationStatus::Applied
    } else {
        MutationStatus::NotFound
    };
    let report = MutationReport {
        kind: request.kind,
        location: request.location,
        status,
        found,
        target_span: locator.target_span(),
        containing: locator.containing().map(str::to_string),
        rejected: locator.rejection().map(str::to_string),
    };

    match (&report.rejected, report.status) {
        (Some(reason), _) => info!(
            containing = report.containing.as_deref().unwrap_or("-"),
            reason = reason.as_str(),
            "target refused the mutation"
        ),
        (None, MutationStatus::NotFound) => info!(
            containing = report.containing.as_deref().unwrap_or("-"),
            "no node at the target location"
        ),
        (None, MutationStatus::Applied) => debug!(found = ?report.found, "mutation applied"),
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vermut_ast::build;
    use vermut_ast::nodes::{BinaryOp, ExprKind, Member, StmtKind, Type};

    /// `class C { method m(a: int, b: int) { print a + b; } }`
    fn sample() -> Module {
        let sum = build::binary(
            BinaryOp::Add,
            build::name("a", Type::Int, 8),
            build::name("b", Type::Int, 10),
            9,
        );
        let body = build::block(vec![build::print(vec![sum], 7, 11)], 6, 12);
        let method = build::method(
            "m",
            vec![build::formal("a", Type::Int, 3), build::formal("b", Type::Int, 4)],
            vec![],
            body,
            2,
            12,
        );
        build::module("M", vec![build::class("C", vec![Member::Method(method)], 1, 13)])
    }

    fn printed_op(module: &Module) -> BinaryOp {
        let method = module.find_method("C", "m").unwrap();
        let StmtKind::Print(args) = &method.body.as_ref().unwrap().stmts[0].kind else {
            panic!("expected print");
        };
        match &args[0].kind {
            ExprKind::Binary { op, .. } => *op,
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_applied_report_names_target() {
        let mut module = sample();
        let request = MutationRequest::new(
            TargetLocation::anchor(9),
            OperatorKind::BinaryOperatorReplacement,
            Some("Sub"),
        );
        let report = apply_mutation(&mut module, &request).unwrap();
        assert!(report.is_applied());
        assert_eq!(report.found, Some(FoundTarget::Expression));
        assert_eq!(report.containing.as_deref(), Some("m"));
        assert_eq!(report.target_span, Some(SourceSpan::range(8, 10)));
        assert_eq!(printed_op(&module), BinaryOp::Sub);
    }

    #[test]
    fn test_miss_leaves_tree_unchanged() {
        let mut module = sample();
        let request = MutationRequest::new(
            TargetLocation::anchor(40),
            OperatorKind::BinaryOperatorReplacement,
            Some("Sub"),
        );
        let report = apply_mutation(&mut module, &request).unwrap();
        assert_eq!(report.status, MutationStatus::NotFound);
        assert_eq!(report.found, None);
        assert_eq!(module, sample());
    }

    #[test]
    fn test_rejection_is_reported_as_not_found() {
        let mut module = sample();
        // `And` is not in the arithmetic class.
        let request = MutationRequest::new(
            TargetLocation::anchor(9),
            OperatorKind::BinaryOperatorReplacement,
            Some("And"),
        );
        let report = apply_mutation(&mut module, &request).unwrap();
        assert_eq!(report.status, MutationStatus::NotFound);
        assert!(report.rejected.is_some());
        assert_eq!(module, sample());
    }

    #[test]
    fn test_malformed_request_is_an_error() {
        let mut module = sample();
        let request = MutationRequest::new(
            TargetLocation::anchor(9),
            OperatorKind::BinaryOperatorReplacement,
            None,
        );
        assert!(apply_mutation(&mut module, &request).is_err());
    }

    #[test]
    fn test_report_serializes_snake_case() {
        let mut module = sample();
        let request = MutationRequest::new(
            TargetLocation::anchor(9),
            OperatorKind::BinaryOperatorReplacement,
            Some("Mul"),
        );
        let report = apply_mutation(&mut module, &request).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "applied");
        assert_eq!(json["found"], "expression");
        assert_eq!(json["kind"], "BOR");
        assert!(json.get("rejected").is_none());
    }
}
