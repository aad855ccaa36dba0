// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Target location.
//!
//! The [`Locator`] is a [`VisitorMut`] that walks only the nodes whose span
//! could contain the target, offering each to a [`Mutator`]. It stops at the
//! first node the mutator edits or rejects. Because statement lists are
//! offered before their elements and elements before their expressions, an
//! enclosing node always gets the first chance at a location it shares with
//! a descendant.

use serde::Serialize;
use vermut_ast::nodes::{
    ChainExpr, ClassDecl, DatatypeDecl, Expr, ExprKind, FunctionDecl, Member, MethodDecl, Stmt,
    UpdateStmt,
};
use vermut_ast::{Transform, VisitResult, VisitorMut};
use vermut_core::{SourceSpan, TargetLocation};

use crate::ops::{MutationContext, Mutator, Outcome};

/// The kind of node the mutation landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FoundTarget {
    /// An expression outside any assignment.
    Expression,
    /// A statement, or a statement list edited as a whole.
    Statement,
    /// An expression inside an assignment or declaration, either a value
    /// or a subscript of a target; the assignment's shadow copy was
    /// resynced.
    Assignment,
    /// A class or datatype member list.
    Member,
}

/// Visitor that finds the target of a mutation and applies it.
pub struct Locator<'m> {
    mutator: &'m mut dyn Mutator,
    cx: MutationContext,
    found: Option<FoundTarget>,
    target_span: Option<SourceSpan>,
    rejected: Option<&'static str>,
    containing: Option<String>,
}

impl<'m> Locator<'m> {
    pub fn new(mutator: &'m mut dyn Mutator, cx: MutationContext) -> Self {
        Locator {
            mutator,
            cx,
            found: None,
            target_span: None,
            rejected: None,
            containing: None,
        }
    }

    pub fn found(&self) -> Option<FoundTarget> {
        self.found
    }

    /// Span of the node that was edited.
    pub fn target_span(&self) -> Option<SourceSpan> {
        self.target_span
    }

    /// Why the target refused the edit, if it did.
    pub fn rejection(&self) -> Option<&'static str> {
        self.rejected
    }

    /// Name of the innermost method or function the walk entered.
    pub fn containing(&self) -> Option<&str> {
        self.containing.as_deref()
    }

    /// A statement hook may edit a node nested in the statement it was
    /// offered (IBD unlinks an `else if` through the head of its chain).
    fn landed_on(&self, offered: SourceSpan) -> SourceSpan {
        match self.cx.target {
            TargetLocation::Span { start, end } if !self.cx.is_target(&offered) => SourceSpan {
                start,
                end,
                anchor: start,
            },
            _ => offered,
        }
    }

    fn settle<T>(
        &mut self,
        outcome: Outcome<T>,
        found: FoundTarget,
        span: impl FnOnce(T) -> SourceSpan,
    ) -> VisitResult {
        match outcome {
            Outcome::Pass => VisitResult::Continue,
            Outcome::Mutated(value) => {
                self.found = Some(found);
                self.target_span = Some(span(value));
                VisitResult::Stop
            }
            Outcome::Rejected(reason) => {
                self.rejected = Some(reason);
                VisitResult::Stop
            }
        }
    }
}

impl VisitorMut for Locator<'_> {
    fn worth_visiting(&self, span: &SourceSpan) -> bool {
        self.cx.target.may_be_inside(span)
    }

    fn halted(&self) -> bool {
        self.found.is_some() || self.rejected.is_some()
    }

    fn visit_class(&mut self, node: &mut ClassDecl) -> VisitResult {
        self.cx.enclosing_type = Some(node.name.clone());
        VisitResult::Continue
    }

    fn visit_datatype(&mut self, node: &mut DatatypeDecl) -> VisitResult {
        self.cx.enclosing_type = Some(node.name.clone());
        VisitResult::Continue
    }

    fn visit_method(&mut self, node: &mut MethodDecl) -> VisitResult {
        self.containing = Some(node.name.clone());
        VisitResult::Continue
    }

    fn visit_function(&mut self, node: &mut FunctionDecl) -> VisitResult {
        self.containing = Some(node.name.clone());
        VisitResult::Continue
    }

    // Assignment targets are only mutated inside an index subscript.
    fn visit_lhs(&mut self, node: &mut Expr) -> VisitResult {
        match node.kind {
            ExprKind::Index { .. } => VisitResult::Continue,
            _ => VisitResult::SkipChildren,
        }
    }

    fn visit_member_list(&mut self, members: &mut Vec<Member>) -> VisitResult {
        let outcome = self.mutator.mutate_member_list(members, &self.cx);
        self.settle(outcome, FoundTarget::Member, |span| span)
    }

    fn visit_stmt_list(&mut self, stmts: &mut Vec<Stmt>) -> VisitResult {
        let outcome = self.mutator.mutate_stmt_list(stmts, &self.cx);
        self.settle(outcome, FoundTarget::Statement, |span| span)
    }

    fn transform_stmt(&mut self, node: &mut Stmt) -> Transform<Stmt> {
        let span = node.span;
        match self.mutator.mutate_stmt(node, &self.cx) {
            Outcome::Pass => Transform::Keep,
            Outcome::Mutated(edit) => {
                self.found = Some(FoundTarget::Statement);
                self.target_span = Some(self.landed_on(span));
                edit
            }
            Outcome::Rejected(reason) => {
                self.rejected = Some(reason);
                Transform::Keep
            }
        }
    }

    fn visit_expr(&mut self, node: &mut Expr) -> VisitResult {
        let span = node.span;
        let outcome = self.mutator.mutate_expr(node, &self.cx);
        self.settle(outcome, FoundTarget::Expression, |()| span)
    }

    fn resync_update(&mut self, node: &mut UpdateStmt) {
        if self.found == Some(FoundTarget::Expression) {
            node.sync_resolved();
            self.found = Some(FoundTarget::Assignment);
        }
    }

    fn resync_chain(&mut self, node: &mut ChainExpr) {
        if self.found.is_some() {
            node.rebuild_resolved();
        }
    }
}
