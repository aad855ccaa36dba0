// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statement operators: SDL, LBI, MRR, IBE and IBD.
//!
//! All of them act on an element of a statement list and answer with the
//! [`Transform`] to apply to that element's slot.

use vermut_ast::nodes::{Block, Expr, ExprKind, IfStmt, Literal, Stmt, StmtKind};
use vermut_ast::Transform;
use vermut_core::{OperatorKind, SourceSpan};

use super::{MutationContext, Mutator, Outcome};
use crate::error::MutateError;

/// Splice a block's statements into the enclosing list, or keep them in a
/// nested block when one of them declares a local.
pub(crate) fn unwrap_block(block: Block, span: SourceSpan) -> Transform<Stmt> {
    if block.declares_locals() {
        Transform::Replace(Stmt::new(StmtKind::Block(block), span))
    } else {
        Transform::Flatten(block.stmts)
    }
}

/// Turn a detached `else` branch into the edit for the slot its `if` held.
fn else_replacement(branch: Stmt) -> Transform<Stmt> {
    let span = branch.span;
    match branch.kind {
        StmtKind::Block(block) => unwrap_block(block, span),
        _ => Transform::Replace(branch),
    }
}

// ============================================================================
// SDL
// ============================================================================

/// Delete a statement. Declarations are left to VDL.
#[derive(Debug)]
pub(crate) struct DeleteStatement;

impl Mutator for DeleteStatement {
    fn kind(&self) -> OperatorKind {
        OperatorKind::StatementDeletion
    }

    fn mutate_stmt(&mut self, stmt: &mut Stmt, cx: &MutationContext) -> Outcome<Transform<Stmt>> {
        if !cx.is_target(&stmt.span) {
            return Outcome::Pass;
        }
        if stmt.is_var_decl() {
            return Outcome::Rejected("declarations are removed by VDL");
        }
        Outcome::Mutated(Transform::Remove)
    }
}

// ============================================================================
// LBI
// ============================================================================

/// Insert `break` as the first statement of a loop body.
#[derive(Debug)]
pub(crate) struct InsertBreak;

impl Mutator for InsertBreak {
    fn kind(&self) -> OperatorKind {
        OperatorKind::LoopBreakInsertion
    }

    fn mutate_stmt(&mut self, stmt: &mut Stmt, cx: &MutationContext) -> Outcome<Transform<Stmt>> {
        if !cx.is_target(&stmt.span) {
            return Outcome::Pass;
        }
        let body = match &mut stmt.kind {
            StmtKind::While(w) => &mut w.body,
            StmtKind::For(f) => &mut f.body,
            _ => return Outcome::Pass,
        };
        let at = body.span.start.0;
        body.stmts
            .insert(0, Stmt::new(StmtKind::Break, SourceSpan::token(at)));
        Outcome::Mutated(Transform::Keep)
    }
}

// ============================================================================
// MRR
// ============================================================================

/// Replace every returned value with its type's default.
#[derive(Debug)]
pub(crate) struct ReturnDefaults {
    values: Vec<String>,
}

impl ReturnDefaults {
    pub(crate) fn new(argument: &str) -> Self {
        ReturnDefaults {
            values: argument.split(';').map(|v| v.trim().to_string()).collect(),
        }
    }
}

impl Mutator for ReturnDefaults {
    fn kind(&self) -> OperatorKind {
        OperatorKind::MethodReturnReplacement
    }

    fn mutate_stmt(&mut self, stmt: &mut Stmt, cx: &MutationContext) -> Outcome<Transform<Stmt>> {
        if !cx.is_target(&stmt.span) {
            return Outcome::Pass;
        }
        let StmtKind::Return(ret) = &mut stmt.kind else {
            return Outcome::Pass;
        };
        if ret.values.len() != self.values.len() {
            return Outcome::Rejected("value count differs from the return statement");
        }

        let mut replaced = Vec::with_capacity(ret.values.len());
        for (value, text) in ret.values.iter().zip(&self.values) {
            let literal = value
                .ty
                .default_value()
                .and_then(|default| Literal::parse_as(default.kind(), text));
            match literal {
                Some(literal) => replaced.push(Expr::new(
                    ExprKind::Literal(literal),
                    value.span,
                    value.ty.clone(),
                )),
                None => return Outcome::Rejected("value does not parse as the returned type"),
            }
        }
        ret.values = replaced;
        Outcome::Mutated(Transform::Keep)
    }
}

// ============================================================================
// IBE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    Then,
    Else,
}

/// Replace an `if` with one of its branches.
#[derive(Debug)]
pub(crate) struct ExtractBranch {
    branch: Branch,
}

impl ExtractBranch {
    pub(crate) fn parse(argument: &str) -> Result<Self, MutateError> {
        let branch = match argument.trim() {
            "then" => Branch::Then,
            "else" => Branch::Else,
            _ => {
                return Err(MutateError::invalid(
                    OperatorKind::IfBranchExtraction,
                    argument,
                    "expected 'then' or 'else'",
                ))
            }
        };
        Ok(ExtractBranch { branch })
    }
}

impl Mutator for ExtractBranch {
    fn kind(&self) -> OperatorKind {
        OperatorKind::IfBranchExtraction
    }

    fn mutate_stmt(&mut self, stmt: &mut Stmt, cx: &MutationContext) -> Outcome<Transform<Stmt>> {
        if !cx.is_target(&stmt.span) {
            return Outcome::Pass;
        }
        let span = stmt.span;
        let StmtKind::If(if_stmt) = &mut stmt.kind else {
            return Outcome::Pass;
        };
        match self.branch {
            Branch::Then => {
                let then_branch = std::mem::replace(
                    &mut if_stmt.then_branch,
                    Block::new(Vec::new(), span),
                );
                Outcome::Mutated(unwrap_block(then_branch, span))
            }
            Branch::Else => match if_stmt.else_branch.take() {
                Some(branch) => Outcome::Mutated(else_replacement(*branch)),
                None => Outcome::Rejected("if has no else branch"),
            },
        }
    }
}

// ============================================================================
// IBD
// ============================================================================

/// Delete one branch of an `if` chain.
///
/// The target is the `if` that owns the branch: the head of the chain, or one
/// of its `else if` links. Deleting the head promotes its `else` into its
/// place; deleting a link splices the link's own `else` into its parent.
#[derive(Debug)]
pub(crate) struct DeleteBranch;

/// Remove the `else if` link identified by `cx` from the chain below `head`.
fn unlink_else_if(head: &mut IfStmt, cx: &MutationContext) -> bool {
    let mut parent = head;
    loop {
        let hit = match parent.else_branch.as_deref() {
            Some(branch) => {
                if !cx.target.may_be_inside(&branch.span) {
                    return false;
                }
                matches!(branch.kind, StmtKind::If(_)) && cx.is_target(&branch.span)
            }
            None => return false,
        };
        if hit {
            let removed = parent.else_branch.take();
            parent.else_branch = removed.and_then(|s| match s.kind {
                StmtKind::If(link) => link.else_branch,
                _ => None,
            });
            return true;
        }
        match parent.else_branch.as_deref_mut() {
            Some(Stmt {
                kind: StmtKind::If(next),
                ..
            }) => parent = next,
            _ => return false,
        }
    }
}

impl Mutator for DeleteBranch {
    fn kind(&self) -> OperatorKind {
        OperatorKind::IfBranchDeletion
    }

    fn mutate_stmt(&mut self, stmt: &mut Stmt, cx: &MutationContext) -> Outcome<Transform<Stmt>> {
        if !cx.target.may_be_inside(&stmt.span) {
            return Outcome::Pass;
        }
        let is_head = cx.is_target(&stmt.span);
        let StmtKind::If(if_stmt) = &mut stmt.kind else {
            return Outcome::Pass;
        };
        if is_head {
            return match if_stmt.else_branch.take() {
                Some(branch) => Outcome::Mutated(else_replacement(*branch)),
                None => Outcome::Mutated(Transform::Remove),
            };
        }
        if unlink_else_if(if_stmt, cx) {
            Outcome::Mutated(Transform::Keep)
        } else {
            Outcome::Pass
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vermut_ast::build;
    use vermut_ast::nodes::Type;
    use vermut_core::TargetLocation;

    fn at(start: u32, end: u32) -> MutationContext {
        MutationContext::new(TargetLocation::span(start, end))
    }

    fn print(pos: u32) -> Stmt {
        build::print(vec![build::int(pos as i128, pos + 1)], pos, pos + 2)
    }

    /// if a { print } else if b { print } else { print }
    ///  1    3-7          9       11-15         17-21     ..22
    fn chain() -> Stmt {
        let last = build::block_stmt(vec![print(18)], 17, 21);
        let link = build::if_stmt(
            build::name("b", Type::Bool, 10),
            build::block(vec![print(12)], 11, 15),
            Some(last),
            9,
            21,
        );
        build::if_stmt(
            build::name("a", Type::Bool, 2),
            build::block(vec![print(4)], 3, 7),
            Some(link),
            1,
            22,
        )
    }

    fn printed(transform: &Transform<Stmt>) -> Vec<i128> {
        let stmts = match transform {
            Transform::Flatten(stmts) => stmts.clone(),
            Transform::Replace(stmt) => vec![stmt.clone()],
            _ => Vec::new(),
        };
        stmts
            .iter()
            .filter_map(|s| match &s.kind {
                StmtKind::Print(args) => match args[0].as_literal() {
                    Some(Literal::Int(v)) => Some(*v),
                    _ => None,
                },
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_sdl_removes_statement_but_not_declaration() {
        let mut stmt = print(4);
        assert_eq!(
            DeleteStatement.mutate_stmt(&mut stmt, &at(4, 6)),
            Outcome::Mutated(Transform::Remove)
        );
        let mut decl = build::var_decl("x", Type::Int, Some(build::int(1, 4)), 1, 5);
        assert!(matches!(
            DeleteStatement.mutate_stmt(&mut decl, &at(1, 5)),
            Outcome::Rejected(_)
        ));
    }

    #[test]
    fn test_lbi_prepends_break() {
        let mut stmt = build::while_stmt(
            build::name("go", Type::Bool, 2),
            vec![],
            build::block(vec![print(4)], 3, 7),
            1,
            7,
        );
        assert_eq!(
            InsertBreak.mutate_stmt(&mut stmt, &at(1, 7)),
            Outcome::Mutated(Transform::Keep)
        );
        let StmtKind::While(w) = &stmt.kind else {
            panic!("expected while");
        };
        assert!(matches!(w.body.stmts[0].kind, StmtKind::Break));
        assert_eq!(w.body.stmts.len(), 2);
    }

    #[test]
    fn test_mrr_parses_defaults_per_value() {
        let mut stmt = build::ret(
            vec![build::name("n", Type::Int, 2), build::name("s", Type::String, 4)],
            1,
            5,
        );
        let mut op = ReturnDefaults::new("0;\"\"");
        assert_eq!(
            op.mutate_stmt(&mut stmt, &at(1, 5)),
            Outcome::Mutated(Transform::Keep)
        );
        let StmtKind::Return(ret) = &stmt.kind else {
            panic!("expected return");
        };
        assert_eq!(ret.values[0].as_literal(), Some(&Literal::Int(0)));
        assert_eq!(ret.values[1].as_literal(), Some(&Literal::String(String::new())));

        let mut op = ReturnDefaults::new("0");
        assert!(matches!(op.mutate_stmt(&mut stmt, &at(1, 5)), Outcome::Rejected(_)));
    }

    #[test]
    fn test_ibe_extracts_then_branch() {
        let mut stmt = chain();
        let mut op = ExtractBranch::parse("then").unwrap();
        let Outcome::Mutated(transform) = op.mutate_stmt(&mut stmt, &at(1, 22)) else {
            panic!("expected mutation");
        };
        assert_eq!(printed(&transform), vec![4]);
        assert!(transform.is_flatten());
    }

    #[test]
    fn test_ibe_extracts_else_if_as_statement() {
        let mut stmt = chain();
        let mut op = ExtractBranch::parse("else").unwrap();
        let Outcome::Mutated(Transform::Replace(replacement)) = op.mutate_stmt(&mut stmt, &at(1, 22))
        else {
            panic!("expected replacement");
        };
        assert_eq!(replacement.span, SourceSpan::range(9, 21));
    }

    #[test]
    fn test_ibd_head_promotes_else() {
        let mut stmt = chain();
        let Outcome::Mutated(Transform::Replace(replacement)) =
            DeleteBranch.mutate_stmt(&mut stmt, &at(1, 22))
        else {
            panic!("expected replacement");
        };
        assert!(matches!(replacement.kind, StmtKind::If(_)));
        assert_eq!(replacement.span, SourceSpan::range(9, 21));
    }

    #[test]
    fn test_ibd_unlinks_else_if() {
        let mut stmt = chain();
        assert_eq!(
            DeleteBranch.mutate_stmt(&mut stmt, &at(9, 21)),
            Outcome::Mutated(Transform::Keep)
        );
        let StmtKind::If(head) = &stmt.kind else {
            panic!("expected if");
        };
        let tail = head.else_branch.as_deref().expect("final else kept");
        assert_eq!(tail.span, SourceSpan::range(17, 21));
        assert!(matches!(tail.kind, StmtKind::Block(_)));
    }

    #[test]
    fn test_ibd_passes_on_unrelated_statements() {
        let mut stmt = chain();
        assert_eq!(DeleteBranch.mutate_stmt(&mut stmt, &at(3, 7)), Outcome::Pass);
        assert_eq!(stmt, chain());
    }
}
