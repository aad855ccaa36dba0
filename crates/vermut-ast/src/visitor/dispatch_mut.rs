// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions for mutating traversal.
//!
//! Same order and gating as [`dispatch`](super::dispatch). In addition,
//! statement lists offer each element to [`VisitorMut::transform_stmt`] and
//! check [`VisitorMut::halted`] after every element, so a visitor that has
//! finished its edit ends the walk before any later sibling is entered.

use super::scope::{classify_member, classify_stmt, SpecContext};
use super::traits::{VisitResult, VisitorMut};
use crate::nodes::{
    Block, ClassDecl, DatatypeDecl, Expr, ExprKind, FunctionDecl, MatchCase, Member, MethodDecl,
    Module, Stmt, StmtKind, TopLevelDecl, UpdateStmt,
};

fn gated<V: VisitorMut + ?Sized>(visitor: &V, context: SpecContext) -> bool {
    match context {
        SpecContext::Executable => false,
        SpecContext::Specification => !visitor.include_specifications(),
        SpecContext::Ghost => !visitor.include_ghost(),
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// Walk a [`Module`] and every declaration in it.
pub fn walk_module_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut Module) -> VisitResult {
    match visitor.visit_module(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            for decl in &mut node.decls {
                let result = match decl {
                    TopLevelDecl::Class(class) => walk_class_mut(visitor, class),
                    TopLevelDecl::Datatype(datatype) => walk_datatype_mut(visitor, datatype),
                };
                if result == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
        }
    }
    visitor.leave_module(node);
    VisitResult::Continue
}

pub fn walk_class_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut ClassDecl) -> VisitResult {
    if !visitor.worth_visiting(&node.span) {
        return VisitResult::Continue;
    }
    match visitor.visit_class(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            if walk_members_mut(visitor, &mut node.members) == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_class(node);
    VisitResult::Continue
}

pub fn walk_datatype_mut<V: VisitorMut + ?Sized>(
    visitor: &mut V,
    node: &mut DatatypeDecl,
) -> VisitResult {
    if !visitor.worth_visiting(&node.span) {
        return VisitResult::Continue;
    }
    match visitor.visit_datatype(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            if walk_members_mut(visitor, &mut node.members) == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_datatype(node);
    VisitResult::Continue
}

/// Walk a member list: the list hook first, then each member.
pub fn walk_members_mut<V: VisitorMut + ?Sized>(
    visitor: &mut V,
    members: &mut Vec<Member>,
) -> VisitResult {
    match visitor.visit_member_list(members) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => return VisitResult::Continue,
        VisitResult::Continue => {}
    }
    if visitor.halted() {
        return VisitResult::Stop;
    }
    for member in members.iter_mut() {
        if walk_member_mut(visitor, member) == VisitResult::Stop || visitor.halted() {
            return VisitResult::Stop;
        }
    }
    VisitResult::Continue
}

pub fn walk_member_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut Member) -> VisitResult {
    let context = classify_member(node);
    if gated(visitor, context) || !visitor.worth_visiting(&node.span()) {
        return VisitResult::Continue;
    }
    if context != SpecContext::Executable {
        visitor.enter_context(context);
    }
    let result = match node {
        Member::Field(field) => match visitor.visit_field(field) {
            VisitResult::Stop => VisitResult::Stop,
            _ => {
                visitor.leave_field(field);
                VisitResult::Continue
            }
        },
        Member::Method(method) => walk_method_mut(visitor, method),
        Member::Function(function) => walk_function_mut(visitor, function),
    };
    if result == VisitResult::Stop {
        return VisitResult::Stop;
    }
    if context != SpecContext::Executable {
        visitor.exit_context(context);
    }
    VisitResult::Continue
}

pub fn walk_method_mut<V: VisitorMut + ?Sized>(
    visitor: &mut V,
    node: &mut MethodDecl,
) -> VisitResult {
    match visitor.visit_method(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            for clause in [
                &mut node.requires,
                &mut node.ensures,
                &mut node.modifies,
                &mut node.decreases,
            ] {
                if walk_spec_exprs_mut(visitor, clause) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
            if let Some(body) = &mut node.body {
                if walk_block_mut(visitor, body) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
        }
    }
    visitor.leave_method(node);
    VisitResult::Continue
}

pub fn walk_function_mut<V: VisitorMut + ?Sized>(
    visitor: &mut V,
    node: &mut FunctionDecl,
) -> VisitResult {
    match visitor.visit_function(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            for clause in [
                &mut node.requires,
                &mut node.ensures,
                &mut node.reads,
                &mut node.decreases,
            ] {
                if walk_spec_exprs_mut(visitor, clause) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
            if let Some(body) = &mut node.body {
                if walk_expr_mut(visitor, body) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
        }
    }
    visitor.leave_function(node);
    VisitResult::Continue
}

pub fn walk_spec_exprs_mut<V: VisitorMut + ?Sized>(
    visitor: &mut V,
    exprs: &mut [Expr],
) -> VisitResult {
    if exprs.is_empty() || gated(visitor, SpecContext::Specification) {
        return VisitResult::Continue;
    }
    visitor.enter_context(SpecContext::Specification);
    if walk_exprs_mut(visitor, exprs.iter_mut()) == VisitResult::Stop {
        return VisitResult::Stop;
    }
    visitor.exit_context(SpecContext::Specification);
    VisitResult::Continue
}

// ============================================================================
// Statements
// ============================================================================

pub fn walk_block_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut Block) -> VisitResult {
    if !visitor.worth_visiting(&node.span) {
        return VisitResult::Continue;
    }
    match visitor.visit_block(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            if walk_stmts_mut(visitor, &mut node.stmts) == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_block(node);
    VisitResult::Continue
}

/// Walk a statement list.
///
/// Each element that survives pruning and gating is first offered to
/// `transform_stmt`; a `Keep` answer walks into it, anything else is spliced
/// into the list in its place.
pub fn walk_stmts_mut<V: VisitorMut + ?Sized>(
    visitor: &mut V,
    stmts: &mut Vec<Stmt>,
) -> VisitResult {
    match visitor.visit_stmt_list(stmts) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => return VisitResult::Continue,
        VisitResult::Continue => {}
    }
    if visitor.halted() {
        return VisitResult::Stop;
    }

    let mut index = 0;
    while index < stmts.len() {
        let stmt = &mut stmts[index];
        if gated(visitor, classify_stmt(stmt)) || !visitor.worth_visiting(&stmt.span) {
            index += 1;
            continue;
        }

        let edit = visitor.transform_stmt(stmt);
        if visitor.halted() {
            edit.apply_at(stmts, index);
            return VisitResult::Stop;
        }
        if edit.is_keep() {
            if walk_stmt_mut(visitor, &mut stmts[index]) == VisitResult::Stop {
                return VisitResult::Stop;
            }
            index += 1;
        } else {
            index += edit.apply_at(stmts, index);
        }
        if visitor.halted() {
            return VisitResult::Stop;
        }
    }
    VisitResult::Continue
}

pub fn walk_stmt_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut Stmt) -> VisitResult {
    let context = classify_stmt(node);
    if gated(visitor, context) || !visitor.worth_visiting(&node.span) {
        return VisitResult::Continue;
    }
    if context != SpecContext::Executable {
        visitor.enter_context(context);
    }
    match visitor.visit_stmt(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            if walk_stmt_children_mut(visitor, node) == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_stmt(node);
    if context != SpecContext::Executable {
        visitor.exit_context(context);
    }
    VisitResult::Continue
}

fn walk_stmt_children_mut<V: VisitorMut + ?Sized>(
    visitor: &mut V,
    node: &mut Stmt,
) -> VisitResult {
    match &mut node.kind {
        StmtKind::VarDecl(decl) => match &mut decl.init {
            Some(init) => walk_rhss_mut(visitor, init),
            None => VisitResult::Continue,
        },
        StmtKind::Update(update) => {
            for index in 0..update.lhss.len() {
                match visitor.visit_lhs(&mut update.lhss[index]) {
                    VisitResult::Stop => return VisitResult::Stop,
                    VisitResult::SkipChildren => {}
                    VisitResult::Continue => {
                        if walk_expr_mut(visitor, &mut update.lhss[index]) == VisitResult::Stop {
                            // The shadow copy holds the targets too.
                            visitor.resync_update(update);
                            return VisitResult::Stop;
                        }
                    }
                }
            }
            walk_rhss_mut(visitor, update)
        }
        StmtKind::Expr(expr) => walk_expr_mut(visitor, expr),
        StmtKind::Return(ret) => walk_exprs_mut(visitor, ret.values.iter_mut()),
        StmtKind::If(if_stmt) => {
            if let Some(guard) = &mut if_stmt.guard {
                if walk_expr_mut(visitor, guard) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
            if walk_block_mut(visitor, &mut if_stmt.then_branch) == VisitResult::Stop {
                return VisitResult::Stop;
            }
            match &mut if_stmt.else_branch {
                Some(else_branch) => walk_stmt_mut(visitor, else_branch),
                None => VisitResult::Continue,
            }
        }
        StmtKind::While(while_stmt) => {
            if let Some(guard) = &mut while_stmt.guard {
                if walk_expr_mut(visitor, guard) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
            for clause in [&mut while_stmt.invariants, &mut while_stmt.decreases] {
                if walk_spec_exprs_mut(visitor, clause) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
            walk_block_mut(visitor, &mut while_stmt.body)
        }
        StmtKind::For(for_stmt) => {
            if walk_expr_mut(visitor, &mut for_stmt.start) == VisitResult::Stop {
                return VisitResult::Stop;
            }
            if let Some(end) = &mut for_stmt.end {
                if walk_expr_mut(visitor, end) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
            if walk_spec_exprs_mut(visitor, &mut for_stmt.invariants) == VisitResult::Stop {
                return VisitResult::Stop;
            }
            walk_block_mut(visitor, &mut for_stmt.body)
        }
        StmtKind::Break | StmtKind::Continue => VisitResult::Continue,
        StmtKind::Block(block) => walk_block_mut(visitor, block),
        StmtKind::Match(match_stmt) => {
            if walk_expr_mut(visitor, &mut match_stmt.source) == VisitResult::Stop {
                return VisitResult::Stop;
            }
            for case in match_stmt.cases.iter_mut() {
                if walk_match_case_mut(visitor, case) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
            VisitResult::Continue
        }
        StmtKind::Assert(expr) | StmtKind::Assume(expr) => walk_expr_mut(visitor, expr),
        StmtKind::Print(args) => walk_exprs_mut(visitor, args.iter_mut()),
    }
}

/// Walk the values of an assignment, giving the visitor a chance to resync
/// the shadow copy if the walk stops inside one of them.
fn walk_rhss_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut UpdateStmt) -> VisitResult {
    for index in 0..node.rhss.len() {
        if walk_expr_mut(visitor, &mut node.rhss[index]) == VisitResult::Stop {
            visitor.resync_update(node);
            return VisitResult::Stop;
        }
    }
    VisitResult::Continue
}

pub fn walk_match_case_mut<V: VisitorMut + ?Sized>(
    visitor: &mut V,
    node: &mut MatchCase,
) -> VisitResult {
    if !visitor.worth_visiting(&node.span) {
        return VisitResult::Continue;
    }
    match visitor.visit_match_case(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            if walk_stmts_mut(visitor, &mut node.body) == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_match_case(node);
    VisitResult::Continue
}

// ============================================================================
// Expressions
// ============================================================================

fn walk_exprs_mut<'e, V: VisitorMut + ?Sized>(
    visitor: &mut V,
    exprs: impl IntoIterator<Item = &'e mut Expr>,
) -> VisitResult {
    for expr in exprs {
        if walk_expr_mut(visitor, expr) == VisitResult::Stop {
            return VisitResult::Stop;
        }
    }
    VisitResult::Continue
}

/// Walk an [`Expr`] and its subexpressions.
pub fn walk_expr_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut Expr) -> VisitResult {
    if !visitor.worth_visiting(&node.span) {
        return VisitResult::Continue;
    }
    match visitor.visit_expr(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            if walk_expr_children_mut(visitor, node) == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_expr(node);
    VisitResult::Continue
}

fn walk_expr_children_mut<V: VisitorMut + ?Sized>(
    visitor: &mut V,
    node: &mut Expr,
) -> VisitResult {
    match &mut node.kind {
        ExprKind::Literal(_) | ExprKind::Name(_) | ExprKind::This => VisitResult::Continue,
        ExprKind::Binary { lhs, rhs, .. } => {
            walk_exprs_mut(visitor, [lhs.as_mut(), rhs.as_mut()])
        }
        ExprKind::Unary { operand, .. } => walk_expr_mut(visitor, operand),
        ExprKind::Chain(chain) => {
            for index in 0..chain.operands.len() {
                if walk_expr_mut(visitor, &mut chain.operands[index]) == VisitResult::Stop {
                    visitor.resync_chain(chain);
                    return VisitResult::Stop;
                }
            }
            VisitResult::Continue
        }
        ExprKind::Member { receiver, .. } => walk_expr_mut(visitor, receiver),
        ExprKind::TupleIndex { tuple, .. } => walk_expr_mut(visitor, tuple),
        ExprKind::Index { seq, index } => walk_exprs_mut(visitor, [seq.as_mut(), index.as_mut()]),
        ExprKind::Call(call) => walk_exprs_mut(
            visitor,
            call.receiver
                .as_deref_mut()
                .into_iter()
                .chain(call.args.iter_mut()),
        ),
        ExprKind::Display { elements, .. } => walk_exprs_mut(visitor, elements.iter_mut()),
        ExprKind::MapDisplay { entries } => walk_exprs_mut(
            visitor,
            entries
                .iter_mut()
                .flat_map(|entry| [&mut entry.key, &mut entry.value]),
        ),
        ExprKind::ArrayAlloc { dims, init, .. } => walk_exprs_mut(
            visitor,
            dims.iter_mut().chain(init.iter_mut().flatten()),
        ),
        ExprKind::Ctor { args, .. } => walk_exprs_mut(visitor, args.iter_mut()),
        ExprKind::Ite {
            cond,
            then_expr,
            else_expr,
        } => walk_exprs_mut(
            visitor,
            [cond.as_mut(), then_expr.as_mut(), else_expr.as_mut()],
        ),
        ExprKind::Old(inner) => walk_spec_exprs_mut(visitor, std::slice::from_mut(inner.as_mut())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build;
    use crate::nodes::{Literal, Type, UpdateStmt};
    use crate::visitor::Transform;

    /// Deletes the first `print` statement it is offered.
    #[derive(Default)]
    struct DropFirstPrint {
        done: bool,
    }

    impl VisitorMut for DropFirstPrint {
        fn halted(&self) -> bool {
            self.done
        }

        fn transform_stmt(&mut self, node: &mut Stmt) -> Transform<Stmt> {
            if matches!(node.kind, StmtKind::Print(_)) {
                self.done = true;
                return Transform::Remove;
            }
            Transform::Keep
        }
    }

    /// Bumps the first integer literal it meets and stops.
    #[derive(Default)]
    struct BumpFirstInt {
        resynced: usize,
    }

    impl VisitorMut for BumpFirstInt {
        fn visit_expr(&mut self, node: &mut Expr) -> VisitResult {
            if let ExprKind::Literal(Literal::Int(v)) = &mut node.kind {
                *v += 1;
                return VisitResult::Stop;
            }
            VisitResult::Continue
        }

        fn resync_update(&mut self, node: &mut UpdateStmt) {
            self.resynced += 1;
            node.sync_resolved();
        }
    }

    fn body() -> Vec<Stmt> {
        vec![
            build::print(vec![build::int(1, 2)], 1, 3),
            build::block_stmt(vec![build::print(vec![build::int(2, 6)], 5, 7)], 4, 8),
            build::print(vec![build::int(3, 10)], 9, 11),
        ]
    }

    #[test]
    fn test_transform_removes_only_first_match() {
        let mut stmts = body();
        let mut visitor = DropFirstPrint::default();
        assert_eq!(walk_stmts_mut(&mut visitor, &mut stmts), VisitResult::Stop);
        assert_eq!(stmts.len(), 2);
        assert!(matches!(stmts[0].kind, StmtKind::Block(_)));
    }

    #[test]
    fn test_stop_in_rhs_resyncs_shadow_copy() {
        let mut stmts = vec![build::assign(
            build::name("x", Type::Int, 1),
            build::int(5, 3),
            1,
            4,
        )];
        let mut visitor = BumpFirstInt::default();
        walk_stmts_mut(&mut visitor, &mut stmts);

        assert_eq!(visitor.resynced, 1);
        let StmtKind::Update(update) = &stmts[0].kind else {
            panic!("expected update");
        };
        assert_eq!(update.rhss[0].as_literal(), Some(&Literal::Int(6)));
        assert_eq!(update.resolved[0].rhs.as_literal(), Some(&Literal::Int(6)));
    }
}
