// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions for read-only traversal.
//!
//! - **Pre-order**: `visit_*` is called before descending into children
//! - **Post-order**: `leave_*` is called after all children have been visited
//! - **Source order**: Children are visited left-to-right, top-to-bottom
//!
//! # Control Flow
//!
//! - `VisitResult::Continue` - traverse into children
//! - `VisitResult::SkipChildren` - skip children but still call `leave_*`
//! - `VisitResult::Stop` - halt traversal immediately (no `leave_*` called)

use super::scope::{classify_member, classify_stmt, SpecContext};
use super::traits::{VisitResult, Visitor};
use crate::nodes::{
    Block, ClassDecl, DatatypeDecl, Expr, ExprKind, FunctionDecl, MatchCase, Member, MethodDecl,
    Module, Stmt, StmtKind, TopLevelDecl, UpdateStmt,
};

/// True if a node of `context` must be skipped by `visitor`.
fn gated<V: Visitor + ?Sized>(visitor: &V, context: SpecContext) -> bool {
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
pub fn walk_module<V: Visitor + ?Sized>(visitor: &mut V, node: &Module) -> VisitResult {
    match visitor.visit_module(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            for decl in &node.decls {
                let result = match decl {
                    TopLevelDecl::Class(class) => walk_class(visitor, class),
                    TopLevelDecl::Datatype(datatype) => walk_datatype(visitor, datatype),
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

/// Walk a [`ClassDecl`] and its members.
pub fn walk_class<V: Visitor + ?Sized>(visitor: &mut V, node: &ClassDecl) -> VisitResult {
    if !visitor.worth_visiting(&node.span) {
        return VisitResult::Continue;
    }
    match visitor.visit_class(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            if walk_members(visitor, &node.members) == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_class(node);
    VisitResult::Continue
}

/// Walk a [`DatatypeDecl`] and its members. Constructors carry no code.
pub fn walk_datatype<V: Visitor + ?Sized>(visitor: &mut V, node: &DatatypeDecl) -> VisitResult {
    if !visitor.worth_visiting(&node.span) {
        return VisitResult::Continue;
    }
    match visitor.visit_datatype(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            if walk_members(visitor, &node.members) == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_datatype(node);
    VisitResult::Continue
}

/// Walk a member list.
pub fn walk_members<V: Visitor + ?Sized>(visitor: &mut V, members: &[Member]) -> VisitResult {
    match visitor.visit_member_list(members) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => return VisitResult::Continue,
        VisitResult::Continue => {}
    }
    for member in members {
        if walk_member(visitor, member) == VisitResult::Stop {
            return VisitResult::Stop;
        }
    }
    VisitResult::Continue
}

/// Walk one [`Member`], honoring ghost gating and pruning.
pub fn walk_member<V: Visitor + ?Sized>(visitor: &mut V, node: &Member) -> VisitResult {
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
        Member::Method(method) => walk_method(visitor, method),
        Member::Function(function) => walk_function(visitor, function),
    };
    if result == VisitResult::Stop {
        return VisitResult::Stop;
    }
    if context != SpecContext::Executable {
        visitor.exit_context(context);
    }
    VisitResult::Continue
}

/// Walk a [`MethodDecl`]: contracts first, then the body.
pub fn walk_method<V: Visitor + ?Sized>(visitor: &mut V, node: &MethodDecl) -> VisitResult {
    match visitor.visit_method(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            for clause in [&node.requires, &node.ensures, &node.modifies, &node.decreases] {
                if walk_spec_exprs(visitor, clause) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
            if let Some(body) = &node.body {
                if walk_block(visitor, body) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
        }
    }
    visitor.leave_method(node);
    VisitResult::Continue
}

/// Walk a [`FunctionDecl`]: contracts first, then the body expression.
pub fn walk_function<V: Visitor + ?Sized>(visitor: &mut V, node: &FunctionDecl) -> VisitResult {
    match visitor.visit_function(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            for clause in [&node.requires, &node.ensures, &node.reads, &node.decreases] {
                if walk_spec_exprs(visitor, clause) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
            if let Some(body) = &node.body {
                if walk_expr(visitor, body) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
        }
    }
    visitor.leave_function(node);
    VisitResult::Continue
}

/// Walk specification expressions inside a `Specification` context, or skip
/// them if the visitor does not include specifications.
pub fn walk_spec_exprs<V: Visitor + ?Sized>(visitor: &mut V, exprs: &[Expr]) -> VisitResult {
    if exprs.is_empty() || gated(visitor, SpecContext::Specification) {
        return VisitResult::Continue;
    }
    visitor.enter_context(SpecContext::Specification);
    for expr in exprs {
        if walk_expr(visitor, expr) == VisitResult::Stop {
            return VisitResult::Stop;
        }
    }
    visitor.exit_context(SpecContext::Specification);
    VisitResult::Continue
}

// ============================================================================
// Statements
// ============================================================================

/// Walk a [`Block`] and its statements.
pub fn walk_block<V: Visitor + ?Sized>(visitor: &mut V, node: &Block) -> VisitResult {
    if !visitor.worth_visiting(&node.span) {
        return VisitResult::Continue;
    }
    match visitor.visit_block(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            if walk_stmts(visitor, &node.stmts) == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_block(node);
    VisitResult::Continue
}

/// Walk a statement list.
pub fn walk_stmts<V: Visitor + ?Sized>(visitor: &mut V, stmts: &[Stmt]) -> VisitResult {
    match visitor.visit_stmt_list(stmts) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => return VisitResult::Continue,
        VisitResult::Continue => {}
    }
    for stmt in stmts {
        if walk_stmt(visitor, stmt) == VisitResult::Stop {
            return VisitResult::Stop;
        }
    }
    VisitResult::Continue
}

/// Walk a [`Stmt`], honoring specification/ghost gating and pruning.
pub fn walk_stmt<V: Visitor + ?Sized>(visitor: &mut V, node: &Stmt) -> VisitResult {
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
            if walk_stmt_children(visitor, node) == VisitResult::Stop {
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

fn walk_stmt_children<V: Visitor + ?Sized>(visitor: &mut V, node: &Stmt) -> VisitResult {
    match &node.kind {
        StmtKind::VarDecl(decl) => match &decl.init {
            // The targets of an initializer are the declared names themselves.
            Some(init) => walk_exprs(visitor, &init.rhss),
            None => VisitResult::Continue,
        },
        StmtKind::Update(update) => walk_update(visitor, update),
        StmtKind::Expr(expr) => walk_expr(visitor, expr),
        StmtKind::Return(ret) => walk_exprs(visitor, &ret.values),
        StmtKind::If(if_stmt) => {
            if let Some(guard) = &if_stmt.guard {
                if walk_expr(visitor, guard) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
            if walk_block(visitor, &if_stmt.then_branch) == VisitResult::Stop {
                return VisitResult::Stop;
            }
            match &if_stmt.else_branch {
                Some(else_branch) => walk_stmt(visitor, else_branch),
                None => VisitResult::Continue,
            }
        }
        StmtKind::While(while_stmt) => {
            if let Some(guard) = &while_stmt.guard {
                if walk_expr(visitor, guard) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
            for clause in [&while_stmt.invariants, &while_stmt.decreases] {
                if walk_spec_exprs(visitor, clause) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
            walk_block(visitor, &while_stmt.body)
        }
        StmtKind::For(for_stmt) => {
            if walk_expr(visitor, &for_stmt.start) == VisitResult::Stop {
                return VisitResult::Stop;
            }
            if let Some(end) = &for_stmt.end {
                if walk_expr(visitor, end) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
            if walk_spec_exprs(visitor, &for_stmt.invariants) == VisitResult::Stop {
                return VisitResult::Stop;
            }
            walk_block(visitor, &for_stmt.body)
        }
        StmtKind::Break | StmtKind::Continue => VisitResult::Continue,
        StmtKind::Block(block) => walk_block(visitor, block),
        StmtKind::Match(match_stmt) => {
            if walk_expr(visitor, &match_stmt.source) == VisitResult::Stop {
                return VisitResult::Stop;
            }
            for case in &match_stmt.cases {
                if walk_match_case(visitor, case) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
            VisitResult::Continue
        }
        StmtKind::Assert(expr) | StmtKind::Assume(expr) => walk_expr(visitor, expr),
        StmtKind::Print(args) => walk_exprs(visitor, args),
    }
}

/// Walk an assignment: targets through `visit_lhs`, then values.
pub fn walk_update<V: Visitor + ?Sized>(visitor: &mut V, node: &UpdateStmt) -> VisitResult {
    for lhs in &node.lhss {
        match visitor.visit_lhs(lhs) {
            VisitResult::Stop => return VisitResult::Stop,
            VisitResult::SkipChildren => {}
            VisitResult::Continue => {
                if walk_expr(visitor, lhs) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
        }
    }
    walk_exprs(visitor, &node.rhss)
}

/// Walk a [`MatchCase`] and its body.
pub fn walk_match_case<V: Visitor + ?Sized>(visitor: &mut V, node: &MatchCase) -> VisitResult {
    if !visitor.worth_visiting(&node.span) {
        return VisitResult::Continue;
    }
    match visitor.visit_match_case(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            if walk_stmts(visitor, &node.body) == VisitResult::Stop {
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

/// Walk an expression list in order.
pub fn walk_exprs<V: Visitor + ?Sized>(visitor: &mut V, exprs: &[Expr]) -> VisitResult {
    for expr in exprs {
        if walk_expr(visitor, expr) == VisitResult::Stop {
            return VisitResult::Stop;
        }
    }
    VisitResult::Continue
}

/// Walk an [`Expr`] and its subexpressions.
///
/// The operand of `old(..)` is a specification context; the shadow copy of a
/// chained comparison is never walked.
pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, node: &Expr) -> VisitResult {
    if !visitor.worth_visiting(&node.span) {
        return VisitResult::Continue;
    }
    match visitor.visit_expr(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = match &node.kind {
                ExprKind::Old(inner) => walk_spec_exprs(visitor, std::slice::from_ref(&**inner)),
                _ => {
                    let mut result = VisitResult::Continue;
                    for child in node.children() {
                        if walk_expr(visitor, child) == VisitResult::Stop {
                            result = VisitResult::Stop;
                            break;
                        }
                    }
                    result
                }
            };
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_expr(node);
    VisitResult::Continue
}
