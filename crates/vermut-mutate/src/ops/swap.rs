// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Pairwise operators: SWV and MBS.
//!
//! Both sides of a pairwise edit are siblings in one list, so the operators
//! work from the list hook: find both elements, check both, then write both.
//! If either side is missing nothing is written.

use vermut_ast::nodes::{Member, Stmt, StmtKind, UpdateStmt};
use vermut_core::{OperatorKind, SourceSpan, TargetLocation};

use super::{MutationContext, Mutator, Outcome};
use crate::error::MutateError;

/// Borrow two distinct elements of a slice mutably.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert!(a != b);
    if a < b {
        let (head, tail) = items.split_at_mut(b);
        (&mut head[a], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(a);
        (&mut tail[0], &mut head[b])
    }
}

fn initializer_mut(stmt: &mut Stmt) -> Option<&mut UpdateStmt> {
    match &mut stmt.kind {
        StmtKind::VarDecl(decl) => decl.init.as_mut(),
        _ => None,
    }
}

// ============================================================================
// SWV
// ============================================================================

/// Swap the initializers of two same-typed declarations in one block.
///
/// The target is the first declaration; the argument is the span of the
/// second.
#[derive(Debug)]
pub(crate) struct SwapInitializers {
    other: TargetLocation,
}

impl SwapInitializers {
    pub(crate) fn parse(argument: &str) -> Result<Self, MutateError> {
        match argument.parse::<TargetLocation>() {
            Ok(other @ TargetLocation::Span { .. }) => Ok(SwapInitializers { other }),
            _ => Err(MutateError::invalid(
                OperatorKind::SwapVariableDeclarations,
                argument,
                "expected the span 'start-end' of the second declaration",
            )),
        }
    }
}

impl Mutator for SwapInitializers {
    fn kind(&self) -> OperatorKind {
        OperatorKind::SwapVariableDeclarations
    }

    fn mutate_stmt_list(&mut self, stmts: &mut Vec<Stmt>, cx: &MutationContext) -> Outcome<SourceSpan> {
        let find = |location: &TargetLocation| {
            stmts
                .iter()
                .position(|s| location.matches(&s.span) && s.as_simple_decl().is_some())
        };
        let Some(first) = find(&cx.target) else {
            return Outcome::Pass;
        };
        let Some(second) = find(&self.other).filter(|second| *second != first) else {
            return Outcome::Rejected("second declaration is not in the same block");
        };

        let same_type = match (stmts[first].as_simple_decl(), stmts[second].as_simple_decl()) {
            (Some((a, _)), Some((b, _))) => a.ty == b.ty,
            _ => false,
        };
        if !same_type {
            return Outcome::Rejected("declarations have different types");
        }

        let span = stmts[first].span;
        let (a, b) = pair_mut(stmts, first, second);
        let (Some(a), Some(b)) = (initializer_mut(a), initializer_mut(b)) else {
            return Outcome::Rejected("declaration has no initializer");
        };
        std::mem::swap(&mut a.rhss[0], &mut b.rhss[0]);
        a.sync_resolved();
        b.sync_resolved();
        Outcome::Mutated(span)
    }
}

// ============================================================================
// MBS
// ============================================================================

/// Swap the bodies of two methods with identical formals.
///
/// The target is the first method's span; the argument names the second.
#[derive(Debug)]
pub(crate) struct SwapBodies {
    other: String,
}

impl SwapBodies {
    pub(crate) fn new(other: &str) -> Self {
        SwapBodies {
            other: other.trim().to_string(),
        }
    }
}

impl Mutator for SwapBodies {
    fn kind(&self) -> OperatorKind {
        OperatorKind::MethodBodySwap
    }

    fn mutate_member_list(
        &mut self,
        members: &mut Vec<Member>,
        cx: &MutationContext,
    ) -> Outcome<SourceSpan> {
        let Some(first) = members
            .iter()
            .position(|m| m.as_method().is_some() && cx.is_target(&m.span()))
        else {
            return Outcome::Pass;
        };
        let Some(second) = members
            .iter()
            .position(|m| m.as_method().is_some() && m.name() == self.other)
            .filter(|second| *second != first)
        else {
            return Outcome::Rejected("second method is not in the same declaration");
        };

        let (Member::Method(a), Member::Method(b)) = pair_mut(members, first, second) else {
            return Outcome::Rejected("members are not methods");
        };
        if !a.same_formals_as(b) || a.body.is_none() || b.body.is_none() {
            return Outcome::Rejected("methods have different formals or no body");
        }
        std::mem::swap(&mut a.body, &mut b.body);
        Outcome::Mutated(a.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vermut_ast::build;
    use vermut_ast::nodes::{Literal, Type};

    fn decls() -> Vec<Stmt> {
        vec![
            build::var_decl("a", Type::Int, Some(build::int(1, 4)), 1, 5),
            build::var_decl("flag", Type::Bool, Some(build::boolean(true, 9)), 6, 10),
            build::var_decl("b", Type::Int, Some(build::int(2, 14)), 11, 15),
        ]
    }

    fn init_of(stmt: &Stmt) -> Option<&Literal> {
        stmt.as_simple_decl().and_then(|(_, init)| init.as_literal())
    }

    #[test]
    fn test_swv_swaps_initializers_and_resyncs() {
        let mut stmts = decls();
        let mut op = SwapInitializers::parse("11-15").unwrap();
        let cx = MutationContext::new(TargetLocation::span(1, 5));
        assert_eq!(
            op.mutate_stmt_list(&mut stmts, &cx),
            Outcome::Mutated(SourceSpan::range(1, 5))
        );
        assert_eq!(init_of(&stmts[0]), Some(&Literal::Int(2)));
        assert_eq!(init_of(&stmts[2]), Some(&Literal::Int(1)));

        let StmtKind::VarDecl(decl) = &stmts[2].kind else {
            panic!("expected declaration");
        };
        let init = decl.init.as_ref().unwrap();
        assert_eq!(init.resolved[0].rhs.as_literal(), Some(&Literal::Int(1)));
    }

    #[test]
    fn test_swv_rejects_mixed_types() {
        let mut stmts = decls();
        let mut op = SwapInitializers::parse("6-10").unwrap();
        let cx = MutationContext::new(TargetLocation::span(1, 5));
        assert!(matches!(
            op.mutate_stmt_list(&mut stmts, &cx),
            Outcome::Rejected(_)
        ));
        assert_eq!(stmts, decls());
    }

    #[test]
    fn test_swv_passes_on_other_lists() {
        let mut stmts = decls();
        let mut op = SwapInitializers::parse("11-15").unwrap();
        let cx = MutationContext::new(TargetLocation::span(40, 44));
        assert_eq!(op.mutate_stmt_list(&mut stmts, &cx), Outcome::Pass);
    }

    fn methods() -> Vec<Member> {
        let method = |name: &str, value: i128, start: u32| {
            Member::Method(build::method(
                name,
                vec![build::formal("x", Type::Int, start + 2)],
                vec![],
                build::block(
                    vec![build::print(vec![build::int(value, start + 5)], start + 4, start + 6)],
                    start + 3,
                    start + 7,
                ),
                start,
                start + 7,
            ))
        };
        vec![method("Up", 1, 1), method("Down", 2, 10)]
    }

    #[test]
    fn test_mbs_swaps_bodies() {
        let mut members = methods();
        let mut op = SwapBodies::new("Down");
        let cx = MutationContext::new(TargetLocation::span(1, 8));
        assert_eq!(
            op.mutate_member_list(&mut members, &cx),
            Outcome::Mutated(SourceSpan::range(1, 8))
        );
        let body_of = |m: &Member| m.as_method().and_then(|m| m.body.clone()).unwrap();
        assert_eq!(body_of(&members[0]).span.start.0, 13);
        assert_eq!(body_of(&members[1]).span.start.0, 4);
    }

    #[test]
    fn test_mbs_rejects_missing_partner() {
        let mut members = methods();
        let mut op = SwapBodies::new("Sideways");
        let cx = MutationContext::new(TargetLocation::span(1, 8));
        assert!(matches!(
            op.mutate_member_list(&mut members, &cx),
            Outcome::Rejected(_)
        ));
        assert_eq!(members, methods());
    }
}
