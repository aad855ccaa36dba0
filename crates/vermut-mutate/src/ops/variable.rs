// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Variable deletion (VDL).
//!
//! Deleting a local removes its declaration and then purges every later use
//! in the rest of the declaring block, including nested blocks:
//!
//! - a binary expression with one dead operand collapses to the live operand
//!   when that operand's type fits where the expression stood
//! - anything else that still mentions the variable is dead, and a statement
//!   holding a dead expression is deleted
//! - a declaration whose initializer dies takes its locals with it, and those
//!   are purged in turn (a cascade)
//!
//! A redeclaration of the same name ends the purge at that point, after its
//! own initializer has been processed. Cascades are bounded by
//! [`DEFAULT_MAX_CASCADE_DEPTH`] and never revisit a `(name, declaration)`
//! pair.

use std::collections::HashSet;

use vermut_ast::nodes::{Expr, ExprKind, Stmt, StmtKind, Type, VarDeclStmt};
use vermut_ast::visitor::names::expr_mentions;
use vermut_core::{OperatorKind, SourceSpan};

use tracing::debug;

use super::{MutationContext, Mutator, Outcome};

/// Default bound on chained declaration deletions.
pub const DEFAULT_MAX_CASCADE_DEPTH: usize = 64;

/// Delete a local variable and the code that depends on it.
#[derive(Debug)]
pub(crate) struct DeleteVariable {
    name: String,
}

impl DeleteVariable {
    pub(crate) fn new(name: &str) -> Self {
        DeleteVariable {
            name: name.trim().to_string(),
        }
    }
}

impl Mutator for DeleteVariable {
    fn kind(&self) -> OperatorKind {
        OperatorKind::VariableDeletion
    }

    fn mutate_stmt_list(&mut self, stmts: &mut Vec<Stmt>, cx: &MutationContext) -> Outcome<SourceSpan> {
        let Some(index) = stmts
            .iter()
            .position(|s| cx.is_target(&s.span) && s.declared_names().contains(&self.name.as_str()))
        else {
            return Outcome::Pass;
        };
        let span = stmts[index].span;

        let original = stmts.clone();
        let mut purge = Purge::new(cx.max_cascade_depth);
        purge.delete_local(stmts, index, &self.name);
        if purge.exhausted {
            *stmts = original;
            debug!(variable = %self.name, "cascade cut short, list restored");
            return Outcome::Rejected("cascade depth exhausted");
        }
        debug!(
            variable = %self.name,
            state = ?purge.state(),
            deleted_statements = purge.deleted_statements,
            collapsed_expressions = purge.collapsed_expressions,
            cascaded = ?purge.cascaded,
            "variable deleted"
        );
        Outcome::Mutated(span)
    }
}

// ============================================================================
// Purge
// ============================================================================

/// Summary of what a deletion did to the surrounding code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeletionState {
    /// Only the declaration went away.
    DeclarationOnly,
    /// Uses were collapsed into their live operands.
    Collapsed,
    /// Whole statements depending on the variable were deleted.
    StatementsDeleted,
}

/// Fate of a statement after purging a dead name from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fate {
    Keep,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Liveness {
    Alive,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Locals whose declaration died with another variable: `(name, declaring
/// statement span)`.
type Orphans = Vec<(String, SourceSpan)>;

#[derive(Debug)]
struct Purge {
    max_depth: usize,
    visited: HashSet<(String, SourceSpan)>,
    deleted_statements: usize,
    collapsed_expressions: usize,
    cascaded: Vec<String>,
    /// Set when an orphan could not be purged within `max_depth`.
    exhausted: bool,
}

impl Purge {
    fn new(max_depth: usize) -> Self {
        Purge {
            max_depth,
            visited: HashSet::new(),
            deleted_statements: 0,
            collapsed_expressions: 0,
            cascaded: Vec::new(),
            exhausted: false,
        }
    }

    fn state(&self) -> DeletionState {
        if self.deleted_statements > 0 {
            DeletionState::StatementsDeleted
        } else if self.collapsed_expressions > 0 {
            DeletionState::Collapsed
        } else {
            DeletionState::DeclarationOnly
        }
    }

    /// Remove `name` from the declaration at `stmts[index]`, then purge it
    /// from the rest of the list.
    fn delete_local(&mut self, stmts: &mut Vec<Stmt>, index: usize, name: &str) {
        let span = stmts[index].span;
        self.visited.insert((name.to_string(), span));

        let mut orphans = Orphans::new();
        let next = match &mut stmts[index].kind {
            StmtKind::VarDecl(decl) => {
                if remove_from_decl(decl, name, span, &mut orphans) == Fate::Delete {
                    stmts.remove(index);
                    self.deleted_statements += 1;
                    index
                } else {
                    index + 1
                }
            }
            _ => index + 1,
        };
        self.purge_list(stmts, next, name, 0);
        self.adopt(stmts, next, orphans, 0);
    }

    /// Purge locals orphaned by a deleted declaration from `stmts[from..]`.
    fn adopt(&mut self, stmts: &mut Vec<Stmt>, from: usize, orphans: Orphans, depth: usize) {
        for (name, span) in orphans {
            if depth >= self.max_depth {
                debug!(variable = %name, depth, "cascade depth exhausted");
                self.exhausted = true;
                return;
            }
            if !self.visited.insert((name.clone(), span)) {
                continue;
            }
            self.cascaded.push(name.clone());
            let from = from.min(stmts.len());
            self.purge_list(stmts, from, &name, depth + 1);
        }
    }

    /// Purge `dead` from `stmts[from..]`, stopping after a redeclaration.
    fn purge_list(&mut self, stmts: &mut Vec<Stmt>, from: usize, dead: &str, depth: usize) {
        let mut index = from;
        while index < stmts.len() && !self.exhausted {
            let shadows = stmts[index].declared_names().contains(&dead);
            let mut orphans = Orphans::new();
            match self.purge_stmt(&mut stmts[index], dead, depth, &mut orphans) {
                Fate::Keep => index += 1,
                Fate::Delete => {
                    stmts.remove(index);
                    self.deleted_statements += 1;
                }
            }
            self.adopt(stmts, index, orphans, depth);
            if shadows {
                break;
            }
        }
    }

    fn purge_stmt(&mut self, stmt: &mut Stmt, dead: &str, depth: usize, orphans: &mut Orphans) -> Fate {
        let span = stmt.span;
        match &mut stmt.kind {
            StmtKind::VarDecl(decl) => self.purge_decl(decl, span, dead, orphans),
            StmtKind::Update(update) => {
                if !update.is_parallel() {
                    let mentioned = update
                        .lhss
                        .iter()
                        .chain(&update.rhss)
                        .any(|e| expr_mentions(e, dead));
                    return if mentioned { Fate::Delete } else { Fate::Keep };
                }
                let mut k = 0;
                while k < update.lhss.len() {
                    let target_ty = update.lhss[k].ty.clone();
                    let dead_pair = expr_mentions(&update.lhss[k], dead)
                        || self.reduce(&mut update.rhss[k], dead, Some(&target_ty)) == Liveness::Dead;
                    if dead_pair {
                        update.remove_pair(k);
                    } else {
                        k += 1;
                    }
                }
                update.sync_resolved();
                if update.lhss.is_empty() {
                    Fate::Delete
                } else {
                    Fate::Keep
                }
            }
            StmtKind::Expr(expr) => self.fate_of(expr, dead),
            StmtKind::Return(ret) => {
                for value in ret.values.iter_mut() {
                    if self.fate_of(value, dead) == Fate::Delete {
                        return Fate::Delete;
                    }
                }
                Fate::Keep
            }
            StmtKind::If(if_stmt) => {
                if let Some(guard) = &mut if_stmt.guard {
                    if self.fate_of(guard, dead) == Fate::Delete {
                        return Fate::Delete;
                    }
                }
                self.purge_list(&mut if_stmt.then_branch.stmts, 0, dead, depth);
                let else_dead = match if_stmt.else_branch.as_deref_mut() {
                    Some(branch) => self.purge_stmt(branch, dead, depth, orphans) == Fate::Delete,
                    None => false,
                };
                if else_dead {
                    let removed = if_stmt.else_branch.take();
                    if_stmt.else_branch = removed.and_then(|s| match s.kind {
                        StmtKind::If(link) => link.else_branch,
                        _ => None,
                    });
                }
                Fate::Keep
            }
            StmtKind::While(while_stmt) => {
                if let Some(guard) = &mut while_stmt.guard {
                    if self.fate_of(guard, dead) == Fate::Delete {
                        return Fate::Delete;
                    }
                }
                while_stmt.invariants.retain(|e| !expr_mentions(e, dead));
                while_stmt.decreases.retain(|e| !expr_mentions(e, dead));
                self.purge_list(&mut while_stmt.body.stmts, 0, dead, depth);
                Fate::Keep
            }
            StmtKind::For(for_stmt) => {
                if self.fate_of(&mut for_stmt.start, dead) == Fate::Delete {
                    return Fate::Delete;
                }
                if let Some(end) = &mut for_stmt.end {
                    if self.fate_of(end, dead) == Fate::Delete {
                        return Fate::Delete;
                    }
                }
                if for_stmt.index.name != dead {
                    for_stmt.invariants.retain(|e| !expr_mentions(e, dead));
                    self.purge_list(&mut for_stmt.body.stmts, 0, dead, depth);
                }
                Fate::Keep
            }
            StmtKind::Match(match_stmt) => {
                if self.fate_of(&mut match_stmt.source, dead) == Fate::Delete {
                    return Fate::Delete;
                }
                for case in match_stmt.cases.iter_mut() {
                    let binds = case.pattern.bindings().iter().any(|(n, _)| *n == dead);
                    if !binds {
                        self.purge_list(&mut case.body, 0, dead, depth);
                    }
                }
                Fate::Keep
            }
            StmtKind::Block(block) => {
                self.purge_list(&mut block.stmts, 0, dead, depth);
                Fate::Keep
            }
            StmtKind::Assert(expr) | StmtKind::Assume(expr) => {
                if expr_mentions(expr, dead) {
                    Fate::Delete
                } else {
                    Fate::Keep
                }
            }
            StmtKind::Print(args) => {
                let mut k = 0;
                while k < args.len() {
                    if self.fate_of(&mut args[k], dead) == Fate::Delete {
                        args.remove(k);
                    } else {
                        k += 1;
                    }
                }
                if args.is_empty() {
                    Fate::Delete
                } else {
                    Fate::Keep
                }
            }
            StmtKind::Break | StmtKind::Continue => Fate::Keep,
        }
    }

    /// Purge `dead` from a declaration's initializer. Locals whose value dies
    /// are removed and reported as orphans.
    fn purge_decl(
        &mut self,
        decl: &mut VarDeclStmt,
        span: SourceSpan,
        dead: &str,
        orphans: &mut Orphans,
    ) -> Fate {
        let Some(init) = &mut decl.init else {
            return Fate::Keep;
        };
        let aligned = init.is_parallel() && init.lhss.len() == decl.locals.len();
        if !aligned {
            // one call initializes every local
            if init.rhss.iter().any(|e| expr_mentions(e, dead)) {
                orphans.extend(decl.locals.iter().map(|l| (l.name.clone(), span)));
                return Fate::Delete;
            }
            return Fate::Keep;
        }

        let mut k = 0;
        while k < init.rhss.len() {
            let target_ty = decl.locals[k].ty.clone();
            if self.reduce(&mut init.rhss[k], dead, Some(&target_ty)) == Liveness::Dead {
                let local = decl.locals.remove(k);
                init.remove_pair(k);
                orphans.push((local.name, span));
            } else {
                k += 1;
            }
        }
        init.sync_resolved();
        if decl.locals.is_empty() {
            Fate::Delete
        } else {
            Fate::Keep
        }
    }

    fn fate_of(&mut self, expr: &mut Expr, dead: &str) -> Fate {
        let ty = expr.ty.clone();
        match self.reduce(expr, dead, Some(&ty)) {
            Liveness::Alive => Fate::Keep,
            Liveness::Dead => Fate::Delete,
        }
    }

    /// Remove `dead` from `expr` where possible.
    ///
    /// `restriction` is the type the position holding `expr` requires; a
    /// collapsed binary expression must still satisfy it.
    fn reduce(&mut self, expr: &mut Expr, dead: &str, restriction: Option<&Type>) -> Liveness {
        if let ExprKind::Name(name) = &expr.kind {
            return if name == dead {
                Liveness::Dead
            } else {
                Liveness::Alive
            };
        }
        if matches!(expr.kind, ExprKind::Binary { .. }) {
            return self.reduce_binary(expr, dead, restriction);
        }
        if let ExprKind::Chain(chain) = &mut expr.kind {
            for operand in chain.operands.iter_mut() {
                let ty = operand.ty.clone();
                if self.reduce(operand, dead, Some(&ty)) == Liveness::Dead {
                    return Liveness::Dead;
                }
            }
            chain.rebuild_resolved();
            return Liveness::Alive;
        }
        for child in expr.children_mut() {
            let ty = child.ty.clone();
            if self.reduce(child, dead, Some(&ty)) == Liveness::Dead {
                return Liveness::Dead;
            }
        }
        Liveness::Alive
    }

    fn reduce_binary(&mut self, expr: &mut Expr, dead: &str, restriction: Option<&Type>) -> Liveness {
        let (survivor, survivor_ty) = {
            let ExprKind::Binary { lhs, rhs, .. } = &mut expr.kind else {
                return Liveness::Alive;
            };
            let lhs_ty = lhs.ty.clone();
            let rhs_ty = rhs.ty.clone();
            let left = self.reduce(lhs, dead, Some(&lhs_ty));
            let right = self.reduce(rhs, dead, Some(&rhs_ty));
            match (left, right) {
                (Liveness::Alive, Liveness::Alive) => return Liveness::Alive,
                (Liveness::Dead, Liveness::Dead) => return Liveness::Dead,
                (Liveness::Dead, Liveness::Alive) => (Side::Right, rhs_ty),
                (Liveness::Alive, Liveness::Dead) => (Side::Left, lhs_ty),
            }
        };

        let fits = survivor_ty.compatible_with(&expr.ty)
            && restriction.map_or(true, |t| survivor_ty.compatible_with(t));
        if !fits {
            return Liveness::Dead;
        }
        let ExprKind::Binary { lhs, rhs, .. } = std::mem::take(&mut expr.kind) else {
            return Liveness::Dead;
        };
        *expr = match survivor {
            Side::Left => *lhs,
            Side::Right => *rhs,
        };
        self.collapsed_expressions += 1;
        Liveness::Alive
    }
}

/// Remove `name` from the declaration. The whole statement goes when no
/// local is left, or when one initializer call feeds every local (the other
/// locals become orphans).
fn remove_from_decl(decl: &mut VarDeclStmt, name: &str, span: SourceSpan, orphans: &mut Orphans) -> Fate {
    let Some(position) = decl.locals.iter().position(|l| l.name == name) else {
        return Fate::Keep;
    };
    match &mut decl.init {
        None => {
            decl.locals.remove(position);
        }
        Some(init) if init.is_parallel() && init.lhss.len() == decl.locals.len() => {
            decl.locals.remove(position);
            init.remove_pair(position);
        }
        Some(_) => {
            orphans.extend(
                decl.locals
                    .iter()
                    .filter(|l| l.name != name)
                    .map(|l| (l.name.clone(), span)),
            );
            return Fate::Delete;
        }
    }
    if decl.locals.is_empty() {
        Fate::Delete
    } else {
        Fate::Keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vermut_ast::build;
    use vermut_ast::nodes::{BinaryOp, LocalVar, Literal, UpdateStmt};
    use vermut_core::TargetLocation;

    fn run(stmts: &mut Vec<Stmt>, at: SourceSpan, name: &str) -> Outcome<SourceSpan> {
        let cx = MutationContext::new(at.as_span_location());
        DeleteVariable::new(name).mutate_stmt_list(stmts, &cx)
    }

    #[test]
    fn test_declaration_and_sole_use_deleted() {
        // var x := f(); return x;
        let mut stmts = vec![
            build::var_decl("x", Type::Int, Some(build::call(None, "f", vec![], Type::Int, 4, 6)), 1, 7),
            build::ret(vec![build::name("x", Type::Int, 9)], 8, 10),
        ];
        assert_eq!(run(&mut stmts, SourceSpan::range(1, 7), "x"), Outcome::Mutated(SourceSpan::range(1, 7)));
        assert!(stmts.is_empty());
    }

    #[test]
    fn test_binary_use_collapses_to_live_operand() {
        // var x := 1; y := y + x; print y;
        let mut stmts = vec![
            build::var_decl("x", Type::Int, Some(build::int(1, 4)), 1, 5),
            build::assign(
                build::name("y", Type::Int, 6),
                build::binary(
                    BinaryOp::Add,
                    build::name("y", Type::Int, 8),
                    build::name("x", Type::Int, 10),
                    9,
                ),
                6,
                11,
            ),
            build::print(vec![build::name("y", Type::Int, 13)], 12, 14),
        ];
        run(&mut stmts, SourceSpan::range(1, 5), "x");

        assert_eq!(stmts.len(), 2);
        let StmtKind::Update(update) = &stmts[0].kind else {
            panic!("expected assignment");
        };
        assert_eq!(update.rhss[0].as_name(), Some("y"));
        assert_eq!(update.resolved[0].rhs.as_name(), Some("y"));
    }

    #[test]
    fn test_comparison_with_dead_operand_is_deleted() {
        // var x := 1; if x < 3 { print 1; } print 2;
        let mut stmts = vec![
            build::var_decl("x", Type::Int, Some(build::int(1, 4)), 1, 5),
            build::if_stmt(
                build::binary(BinaryOp::Lt, build::name("x", Type::Int, 7), build::int(3, 9), 8),
                build::block(vec![build::print(vec![build::int(1, 12)], 11, 13)], 10, 14),
                None,
                6,
                14,
            ),
            build::print(vec![build::int(2, 16)], 15, 17),
        ];
        run(&mut stmts, SourceSpan::range(1, 5), "x");
        assert_eq!(stmts.len(), 1);
        assert!(matches!(stmts[0].kind, StmtKind::Print(_)));
    }

    #[test]
    fn test_dependent_declaration_cascades() {
        // var x := 1; var y := x; print y; print 7;
        let mut stmts = vec![
            build::var_decl("x", Type::Int, Some(build::int(1, 4)), 1, 5),
            build::var_decl("y", Type::Int, Some(build::name("x", Type::Int, 9)), 6, 10),
            build::print(vec![build::name("y", Type::Int, 12)], 11, 13),
            build::print(vec![build::int(7, 15)], 14, 16),
        ];
        run(&mut stmts, SourceSpan::range(1, 5), "x");
        assert_eq!(stmts.len(), 1);
        assert_eq!(
            stmts[0].span,
            SourceSpan::range(14, 16),
            "only the unrelated print survives"
        );
    }

    #[test]
    fn test_shadowing_redeclaration_stops_purge() {
        // var x := 1; { var x := 2; print x; } print x;
        let inner = build::block_stmt(
            vec![
                build::var_decl("x", Type::Int, Some(build::int(2, 9)), 6, 10),
                build::print(vec![build::name("x", Type::Int, 12)], 11, 13),
            ],
            5,
            14,
        );
        let mut stmts = vec![
            build::var_decl("x", Type::Int, Some(build::int(1, 3)), 1, 4),
            inner,
            build::print(vec![build::name("x", Type::Int, 16)], 15, 17),
        ];
        run(&mut stmts, SourceSpan::range(1, 4), "x");

        assert_eq!(stmts.len(), 1);
        let StmtKind::Block(block) = &stmts[0].kind else {
            panic!("expected block");
        };
        assert_eq!(block.stmts.len(), 2, "inner x and its use are untouched");
    }

    #[test]
    fn test_multi_local_call_removes_whole_declaration() {
        // var q, r := divmod(a, b); print r;
        let locals = vec![
            LocalVar {
                name: "q".into(),
                ty: Type::Int,
                span: SourceSpan::token(2),
                ghost: false,
            },
            LocalVar {
                name: "r".into(),
                ty: Type::Int,
                span: SourceSpan::token(4),
                ghost: false,
            },
        ];
        let call = build::call(None, "divmod", vec![], Type::Unknown, 6, 10);
        let decl = VarDeclStmt::with_init(locals, vec![call]);
        let mut stmts = vec![
            Stmt::new(StmtKind::VarDecl(decl), SourceSpan::range(1, 11)),
            build::print(vec![build::name("r", Type::Int, 13)], 12, 14),
            build::print(vec![build::int(0, 16)], 15, 17),
        ];
        run(&mut stmts, SourceSpan::range(1, 11), "q");

        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].span, SourceSpan::range(15, 17));
    }

    #[test]
    fn test_parallel_declaration_keeps_other_local() {
        // var a, b := 1, 2; print a;
        let mut stmt = build::var_decl("a", Type::Int, None, 1, 9);
        let StmtKind::VarDecl(decl) = &mut stmt.kind else {
            unreachable!()
        };
        decl.locals.push(LocalVar {
            name: "b".into(),
            ty: Type::Int,
            span: SourceSpan::token(4),
            ghost: false,
        });
        let lhss = decl
            .locals
            .iter()
            .map(|l| Expr::new(ExprKind::Name(l.name.clone()), l.span, l.ty.clone()))
            .collect();
        decl.init = Some(UpdateStmt::new(lhss, vec![build::int(1, 6), build::int(2, 8)]));

        let mut stmts = vec![stmt, build::print(vec![build::name("a", Type::Int, 11)], 10, 12)];
        run(&mut stmts, SourceSpan::range(1, 9), "b");

        assert_eq!(stmts.len(), 2);
        let StmtKind::VarDecl(decl) = &stmts[0].kind else {
            panic!("expected declaration");
        };
        assert_eq!(decl.locals.len(), 1);
        let init = decl.init.as_ref().unwrap();
        assert_eq!(init.rhss[0].as_literal(), Some(&Literal::Int(1)));
        assert_eq!(init.resolved.len(), 1);
    }

    #[test]
    fn test_passes_when_list_lacks_declaration() {
        let mut stmts = vec![build::print(vec![build::int(1, 2)], 1, 3)];
        let cx = MutationContext::new(TargetLocation::span(1, 3));
        assert_eq!(
            DeleteVariable::new("x").mutate_stmt_list(&mut stmts, &cx),
            Outcome::Pass
        );
    }

    #[test]
    fn test_cascade_depth_is_bounded() {
        // var v0 := 1; var v1 := v0; ... var v9 := v8; print v9;
        let mut stmts: Vec<Stmt> = (0..10u32)
            .map(|i| {
                let init = if i == 0 {
                    build::int(1, i * 5 + 3)
                } else {
                    build::name(&format!("v{}", i - 1), Type::Int, i * 5 + 3)
                };
                build::var_decl(&format!("v{i}"), Type::Int, Some(init), i * 5, i * 5 + 4)
            })
            .collect();
        stmts.push(build::print(vec![build::name("v9", Type::Int, 61)], 60, 62));

        let original = stmts.clone();

        let cx = MutationContext {
            max_cascade_depth: 3,
            ..MutationContext::new(TargetLocation::span(0, 4))
        };
        assert_eq!(
            DeleteVariable::new("v0").mutate_stmt_list(&mut stmts, &cx),
            Outcome::Rejected("cascade depth exhausted")
        );
        assert_eq!(stmts, original);

        // The same chain fits under the default bound and empties the list.
        let cx = MutationContext::new(TargetLocation::span(0, 4));
        assert_eq!(
            DeleteVariable::new("v0").mutate_stmt_list(&mut stmts, &cx),
            Outcome::Mutated(SourceSpan::range(0, 4))
        );
        assert!(stmts.is_empty(), "left behind: {:?}", stmts);
    }
}
