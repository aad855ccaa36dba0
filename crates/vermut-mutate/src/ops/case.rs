// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Match operators: CBR and CBE.

use vermut_ast::nodes::{Block, MatchCase, Stmt, StmtKind};
use vermut_ast::visitor::stmts_mention_any;
use vermut_ast::Transform;
use vermut_core::OperatorKind;

use super::statement::unwrap_block;
use super::{MutationContext, Mutator, Outcome};
use crate::error::MutateError;

/// Whether `case`'s body can run without its pattern: none of the
/// variables the pattern binds is read in the body.
pub(crate) fn reads_no_bindings(case: &MatchCase) -> bool {
    let bound = case.pattern.bindings();
    !stmts_mention_any(&case.body, bound.iter().map(|(name, _)| *name))
}

/// Exchange the body of one constructor case with the default case.
///
/// Every case other than the default takes a copy of the default body, and
/// the default takes the body of the named case. The cases are captured
/// before either side is written.
#[derive(Debug)]
pub(crate) struct ReplaceWithDefault {
    ctor: String,
}

impl ReplaceWithDefault {
    pub(crate) fn new(ctor: &str) -> Self {
        ReplaceWithDefault {
            ctor: ctor.trim().to_string(),
        }
    }
}

impl Mutator for ReplaceWithDefault {
    fn kind(&self) -> OperatorKind {
        OperatorKind::CaseBlockReplacement
    }

    fn mutate_stmt(&mut self, stmt: &mut Stmt, cx: &MutationContext) -> Outcome<Transform<Stmt>> {
        if !cx.is_target(&stmt.span) {
            return Outcome::Pass;
        }
        let StmtKind::Match(match_stmt) = &mut stmt.kind else {
            return Outcome::Pass;
        };
        let (Some(target), Some(default)) = (
            match_stmt.case_for_ctor(&self.ctor),
            match_stmt.default_case(),
        ) else {
            return Outcome::Rejected("match lacks the named case or a default case");
        };
        if target == default {
            return Outcome::Rejected("named case is the default case");
        }
        if !reads_no_bindings(&match_stmt.cases[target])
            || !reads_no_bindings(&match_stmt.cases[default])
        {
            return Outcome::Rejected("moved case body reads a pattern variable");
        }

        let target_body = match_stmt.cases[target].body.clone();
        let default_body = match_stmt.cases[default].body.clone();
        for (index, case) in match_stmt.cases.iter_mut().enumerate() {
            case.body = if index == default {
                target_body.clone()
            } else {
                default_body.clone()
            };
        }
        Outcome::Mutated(Transform::Keep)
    }
}

/// Replace a match statement with the body of one of its cases.
#[derive(Debug)]
pub(crate) struct ExtractCase {
    index: usize,
}

impl ExtractCase {
    pub(crate) fn parse(argument: &str) -> Result<Self, MutateError> {
        argument
            .trim()
            .parse()
            .map(|index| ExtractCase { index })
            .map_err(|_| {
                MutateError::invalid(
                    OperatorKind::CaseBlockExtraction,
                    argument,
                    "expected a case index",
                )
            })
    }
}

impl Mutator for ExtractCase {
    fn kind(&self) -> OperatorKind {
        OperatorKind::CaseBlockExtraction
    }

    fn mutate_stmt(&mut self, stmt: &mut Stmt, cx: &MutationContext) -> Outcome<Transform<Stmt>> {
        if !cx.is_target(&stmt.span) {
            return Outcome::Pass;
        }
        let span = stmt.span;
        let StmtKind::Match(match_stmt) = &mut stmt.kind else {
            return Outcome::Pass;
        };
        if self.index >= match_stmt.cases.len() {
            return Outcome::Rejected("case index out of range");
        }
        if !reads_no_bindings(&match_stmt.cases[self.index]) {
            return Outcome::Rejected("case body reads a pattern variable");
        }
        let case = match_stmt.cases.swap_remove(self.index);
        Outcome::Mutated(unwrap_block(Block::new(case.body, case.span), span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vermut_ast::build;
    use vermut_ast::nodes::{Literal, MatchStmt, Pattern, Type};
    use vermut_core::TargetLocation;

    fn print(value: i128, pos: u32) -> Stmt {
        build::print(vec![build::int(value, pos + 1)], pos, pos + 2)
    }

    /// match d { case Foo => print 1; case Bar => print 2; case _ => print 3; }
    fn shape() -> Stmt {
        let ty = Type::Datatype("D".into());
        build::match_stmt(
            build::name("d", ty, 2),
            vec![
                build::case(build::ctor_pattern("Foo", &[]), vec![print(1, 5)], 3, 7),
                build::case(build::ctor_pattern("Bar", &[]), vec![print(2, 10)], 8, 12),
                build::case(Pattern::Wildcard, vec![print(3, 15)], 13, 17),
            ],
            1,
            18,
        )
    }

    fn bodies(stmt: &Stmt) -> Vec<i128> {
        let StmtKind::Match(MatchStmt { cases, .. }) = &stmt.kind else {
            panic!("expected match");
        };
        cases
            .iter()
            .map(|case| match &case.body[0].kind {
                StmtKind::Print(args) => match args[0].as_literal() {
                    Some(Literal::Int(v)) => *v,
                    _ => panic!("expected int"),
                },
                _ => panic!("expected print"),
            })
            .collect()
    }

    fn cx() -> MutationContext {
        MutationContext::new(TargetLocation::span(1, 18))
    }

    #[test]
    fn test_cbr_swaps_with_default() {
        let mut stmt = shape();
        let mut op = ReplaceWithDefault::new("Foo");
        assert_eq!(
            op.mutate_stmt(&mut stmt, &cx()),
            Outcome::Mutated(Transform::Keep)
        );
        // Foo and Bar now run the default body; the default runs Foo's.
        assert_eq!(bodies(&stmt), vec![3, 3, 1]);
    }

    #[test]
    fn test_cbr_rejects_unknown_ctor() {
        let mut stmt = shape();
        let mut op = ReplaceWithDefault::new("Baz");
        assert!(matches!(op.mutate_stmt(&mut stmt, &cx()), Outcome::Rejected(_)));
        assert_eq!(stmt, shape());
    }

    /// match d { case Foo(a) => print a; case _ => print 3; }
    fn binding_shape() -> Stmt {
        let ty = Type::Datatype("D".into());
        build::match_stmt(
            build::name("d", ty, 2),
            vec![
                build::case(
                    build::ctor_pattern("Foo", &[("a", Type::Int)]),
                    vec![build::print(vec![build::name("a", Type::Int, 6)], 5, 7)],
                    3,
                    8,
                ),
                build::case(Pattern::Wildcard, vec![print(3, 10)], 9, 13),
            ],
            1,
            18,
        )
    }

    #[test]
    fn test_case_bodies_reading_pattern_variables_stay_put() {
        let mut stmt = binding_shape();
        let mut replace = ReplaceWithDefault::new("Foo");
        assert!(matches!(replace.mutate_stmt(&mut stmt, &cx()), Outcome::Rejected(_)));
        assert_eq!(stmt, binding_shape());

        let mut extract = ExtractCase::parse("0").unwrap();
        assert!(matches!(extract.mutate_stmt(&mut stmt, &cx()), Outcome::Rejected(_)));
        assert_eq!(stmt, binding_shape());

        // The default case binds nothing and can still be extracted.
        let mut extract = ExtractCase::parse("1").unwrap();
        assert!(matches!(
            extract.mutate_stmt(&mut stmt, &cx()),
            Outcome::Mutated(Transform::Flatten(_))
        ));
    }

    #[test]
    fn test_cbe_flattens_case_body() {
        let mut stmt = shape();
        let mut op = ExtractCase::parse("1").unwrap();
        let Outcome::Mutated(Transform::Flatten(stmts)) = op.mutate_stmt(&mut stmt, &cx()) else {
            panic!("expected flatten");
        };
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].span.start.0, 10);
    }
}
