// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait definitions for program tree traversal.

use vermut_core::SourceSpan;

use super::scope::SpecContext;
use crate::nodes::{
    Block, ChainExpr, ClassDecl, DatatypeDecl, Expr, FieldDecl, FunctionDecl, MatchCase, Member,
    MethodDecl, Module, Stmt, UpdateStmt,
};

/// Result of visiting a node - controls traversal behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VisitResult {
    /// Continue traversal into children.
    ///
    /// After visiting children, `leave_*` will be called for this node.
    #[default]
    Continue,

    /// Skip children, continue with siblings.
    ///
    /// The walker will not descend into this node's children, but `leave_*`
    /// will still be called for this node.
    SkipChildren,

    /// Stop traversal entirely.
    ///
    /// No further `visit_*` or `leave_*` methods will be called. The walk
    /// function will return immediately.
    Stop,
}

/// Edit applied to an element of a statement list.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform<T> {
    /// Leave the element in place (it may have been edited in place).
    Keep,
    /// Replace the element with a new node.
    Replace(T),
    /// Remove the element from the list.
    Remove,
    /// Replace the element with a sequence of nodes spliced into the list.
    Flatten(Vec<T>),
}

impl<T> Transform<T> {
    /// Returns true if this is a `Keep` variant.
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    /// Returns true if this is a `Remove` variant.
    pub fn is_remove(&self) -> bool {
        matches!(self, Self::Remove)
    }

    /// Returns true if this is a `Flatten` variant.
    pub fn is_flatten(&self) -> bool {
        matches!(self, Self::Flatten(_))
    }

    /// Maps the carried node(s) using the provided function.
    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> Transform<U> {
        match self {
            Transform::Keep => Transform::Keep,
            Transform::Replace(t) => Transform::Replace(f(t)),
            Transform::Remove => Transform::Remove,
            Transform::Flatten(v) => Transform::Flatten(v.into_iter().map(f).collect()),
        }
    }

    /// Apply this edit to `list[index]`, returning the number of elements
    /// now occupying that slot.
    pub fn apply_at(self, list: &mut Vec<T>, index: usize) -> usize {
        match self {
            Transform::Keep => 1,
            Transform::Replace(t) => {
                list[index] = t;
                1
            }
            Transform::Remove => {
                list.remove(index);
                0
            }
            Transform::Flatten(items) => {
                let count = items.len();
                list.splice(index..=index, items);
                count
            }
        }
    }
}

/// Macro to generate read-only visitor method pairs.
///
/// ```ignore
/// visitor_methods! {
///     // Generates visit_expr and leave_expr for Expr
///     expr: Expr,
/// }
/// ```
macro_rules! visitor_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called before descending into children. Return `VisitResult` to control traversal."]
                #[allow(unused_variables)]
                fn [<visit_ $base_name>](&mut self, node: &$node_type) -> VisitResult {
                    VisitResult::Continue
                }

                $(#[$meta])*
                #[doc = concat!("Leave a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called after all children have been visited. Called even if `SkipChildren` was returned."]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](&mut self, node: &$node_type) {}
            )*
        }
    };
}

/// Macro to generate mutating visitor method pairs.
macro_rules! visitor_mut_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] node, which may be edited in place.")]
                #[doc = ""]
                #[doc = "Called before descending into children. Return `VisitResult` to control traversal."]
                #[allow(unused_variables)]
                fn [<visit_ $base_name>](&mut self, node: &mut $node_type) -> VisitResult {
                    VisitResult::Continue
                }

                $(#[$meta])*
                #[doc = concat!("Leave a [`", stringify!($node_type), "`] node.")]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](&mut self, node: &mut $node_type) {}
            )*
        }
    };
}

/// Immutable visitor for program tree traversal.
///
/// # Traversal Order
///
/// - `visit_*` is called in **pre-order** (before children)
/// - `leave_*` is called in **post-order** (after children)
/// - Children are visited in source order
///
/// # Pruning
///
/// Before entering any member, statement, case or expression the walker asks
/// [`worth_visiting`](Visitor::worth_visiting); a `false` answer skips the
/// node and its whole subtree without calling `visit_*` or `leave_*`.
///
/// Specification clauses (`requires`, `ensures`, invariants, `assert`,
/// `old(..)`) and ghost code are skipped unless the visitor opts in with
/// [`include_specifications`](Visitor::include_specifications) and
/// [`include_ghost`](Visitor::include_ghost).
///
/// # Example
///
/// ```
/// use vermut_ast::nodes::{Expr, ExprKind};
/// use vermut_ast::visitor::{VisitResult, Visitor};
///
/// struct NameCounter {
///     count: usize,
/// }
///
/// impl Visitor for NameCounter {
///     fn visit_expr(&mut self, node: &Expr) -> VisitResult {
///         if matches!(node.kind, ExprKind::Name(_)) {
///             self.count += 1;
///         }
///         VisitResult::Continue
///     }
/// }
/// ```
pub trait Visitor {
    /// Pruning predicate evaluated before entering a node.
    #[allow(unused_variables)]
    fn worth_visiting(&self, span: &SourceSpan) -> bool {
        true
    }

    /// Walk specification clauses and statements.
    fn include_specifications(&self) -> bool {
        false
    }

    /// Walk ghost members and ghost statements.
    fn include_ghost(&self) -> bool {
        false
    }

    /// Called when the walk enters a non-executable region.
    #[allow(unused_variables)]
    fn enter_context(&mut self, context: SpecContext) {}

    /// Called when the walk leaves a region entered with `enter_context`.
    #[allow(unused_variables)]
    fn exit_context(&mut self, context: SpecContext) {}

    /// Visit the target of an assignment. Return `SkipChildren` to keep the
    /// walker from treating the target as an ordinary expression.
    #[allow(unused_variables)]
    fn visit_lhs(&mut self, node: &Expr) -> VisitResult {
        VisitResult::Continue
    }

    /// Visit a statement list before its elements are walked.
    #[allow(unused_variables)]
    fn visit_stmt_list(&mut self, stmts: &[Stmt]) -> VisitResult {
        VisitResult::Continue
    }

    /// Visit a member list before its elements are walked.
    #[allow(unused_variables)]
    fn visit_member_list(&mut self, members: &[Member]) -> VisitResult {
        VisitResult::Continue
    }

    visitor_methods! {
        module: Module,
        class: ClassDecl,
        datatype: DatatypeDecl,
        field: FieldDecl,
        method: MethodDecl,
        function: FunctionDecl,
        block: Block,
        stmt: Stmt,
        match_case: MatchCase,
        expr: Expr,
    }
}

/// Mutating visitor.
///
/// Same traversal as [`Visitor`], over `&mut` nodes. On top of in-place
/// edits from `visit_*`, a mutating visitor can:
///
/// - edit whole statement and member lists through
///   [`visit_stmt_list`](VisitorMut::visit_stmt_list) and
///   [`visit_member_list`](VisitorMut::visit_member_list)
/// - replace, remove or splice a single list element through
///   [`transform_stmt`](VisitorMut::transform_stmt)
/// - end the walk early through [`halted`](VisitorMut::halted), which the
///   walker checks after every list element
///
/// When a walk stops inside the right-hand sides of an assignment or the
/// operands of a chained comparison, the walker calls
/// [`resync_update`](VisitorMut::resync_update) or
/// [`resync_chain`](VisitorMut::resync_chain) on the way out so the visitor
/// can bring shadow copies back in step.
pub trait VisitorMut {
    /// Pruning predicate evaluated before entering a node.
    #[allow(unused_variables)]
    fn worth_visiting(&self, span: &SourceSpan) -> bool {
        true
    }

    /// Walk specification clauses and statements.
    fn include_specifications(&self) -> bool {
        false
    }

    /// Walk ghost members and ghost statements.
    fn include_ghost(&self) -> bool {
        false
    }

    /// True once the visitor needs no further nodes.
    fn halted(&self) -> bool {
        false
    }

    #[allow(unused_variables)]
    fn enter_context(&mut self, context: SpecContext) {}

    #[allow(unused_variables)]
    fn exit_context(&mut self, context: SpecContext) {}

    /// Visit the target of an assignment.
    #[allow(unused_variables)]
    fn visit_lhs(&mut self, node: &mut Expr) -> VisitResult {
        VisitResult::Continue
    }

    /// Visit a statement list before its elements are walked.
    #[allow(unused_variables)]
    fn visit_stmt_list(&mut self, stmts: &mut Vec<Stmt>) -> VisitResult {
        VisitResult::Continue
    }

    /// Visit a member list before its elements are walked.
    #[allow(unused_variables)]
    fn visit_member_list(&mut self, members: &mut Vec<Member>) -> VisitResult {
        VisitResult::Continue
    }

    /// Offer a statement of a list for replacement before it is walked.
    ///
    /// Returning anything but `Transform::Keep` applies the edit and skips
    /// the statement's children.
    #[allow(unused_variables)]
    fn transform_stmt(&mut self, node: &mut Stmt) -> Transform<Stmt> {
        Transform::Keep
    }

    /// The walk stopped inside `node`'s right-hand sides.
    #[allow(unused_variables)]
    fn resync_update(&mut self, node: &mut UpdateStmt) {}

    /// The walk stopped inside `node`'s operands.
    #[allow(unused_variables)]
    fn resync_chain(&mut self, node: &mut ChainExpr) {}

    visitor_mut_methods! {
        module: Module,
        class: ClassDecl,
        datatype: DatatypeDecl,
        field: FieldDecl,
        method: MethodDecl,
        function: FunctionDecl,
        block: Block,
        stmt: Stmt,
        match_case: MatchCase,
        expr: Expr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_apply_at() {
        let mut list = vec![1, 2, 3];
        assert_eq!(Transform::Replace(9).apply_at(&mut list, 1), 1);
        assert_eq!(list, vec![1, 9, 3]);

        assert_eq!(Transform::Flatten(vec![7, 8]).apply_at(&mut list, 0), 2);
        assert_eq!(list, vec![7, 8, 9, 3]);

        assert_eq!(Transform::<i32>::Remove.apply_at(&mut list, 3), 0);
        assert_eq!(list, vec![7, 8, 9]);

        assert_eq!(Transform::<i32>::Keep.apply_at(&mut list, 0), 1);
        assert_eq!(list, vec![7, 8, 9]);
    }

    #[test]
    fn test_transform_map() {
        let t = Transform::Flatten(vec![1, 2]).map(|x| x * 10);
        assert_eq!(t, Transform::Flatten(vec![10, 20]));
        assert!(Transform::<i32>::Remove.map(|x| x).is_remove());
    }

    #[test]
    fn test_visit_result_default() {
        assert_eq!(VisitResult::default(), VisitResult::Continue);
    }
}
