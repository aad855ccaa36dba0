// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! End-to-end scenarios: scan a tree, pick a candidate, apply it, and check
//! the rewritten tree.
//!
//! # Running These Tests
//!
//! ```bash
//! cargo nextest run -p vermut-mutate scenarios
//! ```

mod common;

use vermut_ast::build;
use vermut_ast::nodes::{
    BinaryOp, ExprKind, Literal, Member, Module, Pattern, Stmt, StmtKind, Type,
};
use vermut_core::{OperatorKind, TargetLocation};
use vermut_mutate::{
    apply_mutation, apply_mutation_with, scan_module, FoundTarget, MutateOptions,
    MutationRequest, MutationStatus, ScanOptions,
};

use common::{account_module, body_of, printed};

fn in_method(stmts: Vec<Stmt>) -> Module {
    let method = build::method(
        "m",
        vec![
            build::formal("a", Type::Int, 3),
            build::formal("b", Type::Int, 4),
        ],
        vec![],
        build::block(stmts, 10, 99),
        2,
        99,
    );
    build::module("M", vec![build::class("C", vec![Member::Method(method)], 1, 100)])
}

fn request(location: TargetLocation, kind: OperatorKind, argument: &str) -> MutationRequest {
    MutationRequest::new(location, kind, Some(argument))
}

// ============================================================================
// Core scenarios
// ============================================================================

mod basics {
    use super::*;

    #[test]
    fn test_integer_literal_scan() {
        let module = in_method(vec![build::print(vec![build::int(5, 12)], 11, 13)]);
        let options = ScanOptions::restricted_to([OperatorKind::LiteralValueReplacement]);
        let arguments: Vec<String> = scan_module(&module, &options)
            .into_iter()
            .map(|c| c.argument)
            .collect();
        assert_eq!(arguments, vec!["6", "4", "0"]);
    }

    #[test]
    fn test_binary_operator_replacement_keeps_operands() {
        let sum = build::binary(
            BinaryOp::Add,
            build::name("a", Type::Int, 12),
            build::name("b", Type::Int, 14),
            13,
        );
        let original = sum.clone();
        let mut module = in_method(vec![build::print(vec![sum], 11, 15)]);

        let report = apply_mutation(
            &mut module,
            &request(
                TargetLocation::anchor(13),
                OperatorKind::BinaryOperatorReplacement,
                "Sub",
            ),
        )
        .unwrap();
        assert!(report.is_applied());

        let body = &module.find_method("C", "m").unwrap().body.as_ref().unwrap().stmts;
        let (
            ExprKind::Binary { op, lhs, rhs },
            ExprKind::Binary {
                lhs: old_lhs,
                rhs: old_rhs,
                ..
            },
        ) = (&printed(&body[0])[0].kind, &original.kind)
        else {
            panic!("expected binary expressions");
        };
        assert_eq!(*op, BinaryOp::Sub);
        assert_eq!(lhs, old_lhs);
        assert_eq!(rhs, old_rhs);
    }

    #[test]
    fn test_variable_deletion_removes_dependent_return() {
        // { var x := f(); return x; }
        let mut module = in_method(vec![
            build::var_decl(
                "x",
                Type::Int,
                Some(build::call(None, "f", vec![], Type::Int, 13, 15)),
                11,
                16,
            ),
            build::ret(vec![build::name("x", Type::Int, 18)], 17, 19),
        ]);

        let report = apply_mutation(
            &mut module,
            &request(TargetLocation::span(11, 16), OperatorKind::VariableDeletion, "x"),
        )
        .unwrap();
        assert_eq!(report.status, MutationStatus::Applied);
        assert_eq!(report.found, Some(FoundTarget::Statement));

        let body = &module.find_method("C", "m").unwrap().body.as_ref().unwrap().stmts;
        assert!(body.is_empty(), "left behind: {:?}", body);
    }

    #[test]
    fn test_case_block_replacement_exchanges_with_default() {
        // match d { Foo(a) => A; Bar(b) => B; _ => C }
        let ty = Type::Datatype("D".into());
        let body = |n: i128, pos: u32| vec![build::print(vec![build::int(n, pos + 1)], pos, pos + 2)];
        let cases = vec![
            build::case(build::ctor_pattern("Foo", &[("a", Type::Int)]), body(1, 14), 13, 17),
            build::case(build::ctor_pattern("Bar", &[("b", Type::Int)]), body(2, 19), 18, 22),
            build::case(Pattern::Wildcard, body(3, 24), 23, 27),
        ];
        let stmt = build::match_stmt(build::name("d", ty, 12), cases, 11, 28);
        let mut module = in_method(vec![stmt]);

        let options = ScanOptions::restricted_to([OperatorKind::CaseBlockReplacement]);
        let proposed: Vec<String> = scan_module(&module, &options)
            .into_iter()
            .map(|c| c.argument)
            .collect();
        assert_eq!(proposed, vec!["Foo", "Bar"]);

        let report = apply_mutation(
            &mut module,
            &request(
                TargetLocation::span(11, 28),
                OperatorKind::CaseBlockReplacement,
                "Foo",
            ),
        )
        .unwrap();
        assert!(report.is_applied());

        let body = &module.find_method("C", "m").unwrap().body.as_ref().unwrap().stmts;
        let StmtKind::Match(match_stmt) = &body[0].kind else {
            panic!("expected match");
        };
        let printed_values: Vec<&Literal> = match_stmt
            .cases
            .iter()
            .map(|case| printed(&case.body[0])[0].as_literal().unwrap())
            .collect();
        assert_eq!(
            printed_values,
            vec![&Literal::Int(3), &Literal::Int(3), &Literal::Int(1)]
        );
    }

    #[test]
    fn test_case_body_reading_its_pattern_is_never_moved() {
        // match d { Foo(a) => print a; Bar(b) => print 2; _ => print 3 }
        let ty = Type::Datatype("D".into());
        let cases = vec![
            build::case(
                build::ctor_pattern("Foo", &[("a", Type::Int)]),
                vec![build::print(vec![build::name("a", Type::Int, 15)], 14, 16)],
                13,
                17,
            ),
            build::case(
                build::ctor_pattern("Bar", &[("b", Type::Int)]),
                vec![build::print(vec![build::int(2, 20)], 19, 21)],
                18,
                22,
            ),
            build::case(
                Pattern::Wildcard,
                vec![build::print(vec![build::int(3, 25)], 24, 26)],
                23,
                27,
            ),
        ];
        let module = in_method(vec![build::match_stmt(build::name("d", ty, 12), cases, 11, 28)]);

        let options = ScanOptions::restricted_to([
            OperatorKind::CaseBlockReplacement,
            OperatorKind::CaseBlockExtraction,
        ]);
        let proposed: Vec<(OperatorKind, String)> = scan_module(&module, &options)
            .into_iter()
            .map(|c| (c.kind, c.argument))
            .collect();
        assert!(proposed.contains(&(OperatorKind::CaseBlockReplacement, "Bar".to_string())));
        assert!(proposed.contains(&(OperatorKind::CaseBlockExtraction, "1".to_string())));
        assert!(!proposed.contains(&(OperatorKind::CaseBlockReplacement, "Foo".to_string())));
        assert!(!proposed.contains(&(OperatorKind::CaseBlockExtraction, "0".to_string())));

        for (kind, argument) in [
            (OperatorKind::CaseBlockReplacement, "Foo"),
            (OperatorKind::CaseBlockExtraction, "0"),
        ] {
            let mut mutant = module.clone();
            let report =
                apply_mutation(&mut mutant, &request(TargetLocation::span(11, 28), kind, argument))
                    .unwrap();
            assert_eq!(report.status, MutationStatus::NotFound, "{} {}", kind, argument);
            assert!(report.rejected.is_some(), "{} {}", kind, argument);
            assert_eq!(mutant, module, "{} {}", kind, argument);
        }
    }

    #[test]
    fn test_variable_deletion_past_the_cascade_bound_changes_nothing() {
        // var v0 := 1; var v1 := v0; ... var v9 := v8; print v9;
        let mut stmts: Vec<Stmt> = (0..10u32)
            .map(|i| {
                let start = 11 + i * 5;
                let init = if i == 0 {
                    build::int(1, start + 3)
                } else {
                    build::name(&format!("v{}", i - 1), Type::Int, start + 3)
                };
                build::var_decl(&format!("v{i}"), Type::Int, Some(init), start, start + 4)
            })
            .collect();
        stmts.push(build::print(vec![build::name("v9", Type::Int, 62)], 61, 63));
        let module = in_method(stmts);
        let delete_v0 = request(TargetLocation::span(11, 15), OperatorKind::VariableDeletion, "v0");

        let mut mutant = module.clone();
        let shallow = MutateOptions {
            max_cascade_depth: 3,
        };
        let report = apply_mutation_with(&mut mutant, &delete_v0, &shallow).unwrap();
        assert_eq!(report.status, MutationStatus::NotFound);
        assert_eq!(report.rejected.as_deref(), Some("cascade depth exhausted"));
        assert_eq!(mutant, module);

        let report = apply_mutation_with(&mut mutant, &delete_v0, &MutateOptions::default()).unwrap();
        assert!(report.is_applied());
        let body = &mutant.find_method("C", "m").unwrap().body.as_ref().unwrap().stmts;
        assert!(body.is_empty(), "left behind: {:?}", body);
    }
}

// ============================================================================
// Account fixture
// ============================================================================

mod account {
    use super::*;

    fn candidates_of(kind: OperatorKind) -> Vec<(TargetLocation, String)> {
        scan_module(&account_module(), &ScanOptions::restricted_to([kind]))
            .into_iter()
            .map(|c| (c.location, c.argument))
            .collect()
    }

    #[test]
    fn test_shadowed_field_gets_this_insertion_and_deletion() {
        assert_eq!(
            candidates_of(OperatorKind::ThisInsertion),
            vec![(TargetLocation::anchor(91), "limit".to_string())]
        );
        assert_eq!(
            candidates_of(OperatorKind::ThisDeletion),
            vec![(TargetLocation::anchor(89), "limit".to_string())]
        );

        let mut module = account_module();
        let report = apply_mutation(
            &mut module,
            &request(TargetLocation::anchor(91), OperatorKind::ThisInsertion, "limit"),
        )
        .unwrap();
        assert!(report.is_applied());
        assert_eq!(report.containing.as_deref(), Some("Withdraw"));

        let StmtKind::Update(update) = &body_of(&module, "Withdraw")[0].kind else {
            panic!("expected assignment");
        };
        let ExprKind::Binary { rhs, .. } = &update.rhss[0].kind else {
            panic!("expected binary");
        };
        assert!(matches!(&rhs.kind, ExprKind::Member { receiver, field } if receiver.is_this() && field == "limit"));
        assert_eq!(update.resolved[0].rhs, update.rhss[0]);
    }

    #[test]
    fn test_field_access_replacement_uses_sibling_field() {
        assert_eq!(
            candidates_of(OperatorKind::FieldAccessReplacement),
            vec![(TargetLocation::anchor(89), "balance".to_string())]
        );
    }

    #[test]
    fn test_call_replacement_offers_same_signature_methods() {
        let callees: Vec<String> = candidates_of(OperatorKind::MethodCallReplacement)
            .into_iter()
            .map(|(_, callee)| callee)
            .collect();
        assert_eq!(callees, vec!["Deposit", "Withdraw", "Triple"]);
    }

    #[test]
    fn test_if_branch_deletion_promotes_else() {
        let mut module = account_module();
        let report = apply_mutation(
            &mut module,
            &MutationRequest::new(
                TargetLocation::span(39, 57),
                OperatorKind::IfBranchDeletion,
                None,
            ),
        )
        .unwrap();
        assert!(report.is_applied());

        let body = body_of(&module, "Deposit");
        assert!(!body.iter().any(|s| matches!(s.kind, StmtKind::If(_))));
    }

    #[test]
    fn test_method_body_swap() {
        assert_eq!(
            candidates_of(OperatorKind::MethodBodySwap),
            vec![(TargetLocation::span(132, 144), "Triple".to_string())]
        );

        let mut module = account_module();
        let original = account_module();
        let report = apply_mutation(
            &mut module,
            &request(TargetLocation::span(132, 144), OperatorKind::MethodBodySwap, "Triple"),
        )
        .unwrap();
        assert_eq!(report.found, Some(FoundTarget::Member));
        assert_eq!(body_of(&module, "Double"), body_of(&original, "Triple"));
        assert_eq!(body_of(&module, "Triple"), body_of(&original, "Double"));
    }

    #[test]
    fn test_declaration_swap() {
        assert_eq!(
            candidates_of(OperatorKind::SwapVariableDeclarations),
            vec![(TargetLocation::span(24, 27), "28-31".to_string())]
        );

        let mut module = account_module();
        let report = apply_mutation(
            &mut module,
            &request(
                TargetLocation::span(24, 27),
                OperatorKind::SwapVariableDeclarations,
                "28-31",
            ),
        )
        .unwrap();
        assert!(report.is_applied());

        let body = body_of(&module, "Deposit");
        let (_, fee) = body[0].as_simple_decl().unwrap();
        let (_, bonus) = body[1].as_simple_decl().unwrap();
        assert_eq!(fee.as_name(), Some("amount"));
        assert_eq!(bonus.as_literal(), Some(&Literal::Int(2)));
    }

    #[test]
    fn test_declaration_value_is_mutated_and_resynced() {
        let mut module = account_module();
        let report = apply_mutation(
            &mut module,
            &request(TargetLocation::anchor(26), OperatorKind::LiteralValueReplacement, "3"),
        )
        .unwrap();
        assert_eq!(report.found, Some(FoundTarget::Assignment));

        let StmtKind::VarDecl(decl) = &body_of(&module, "Deposit")[0].kind else {
            panic!("expected declaration");
        };
        let init = decl.init.as_ref().unwrap();
        assert_eq!(init.rhss[0].as_literal(), Some(&Literal::Int(3)));
        assert_eq!(init.resolved[0].rhs, init.rhss[0]);
    }

    #[test]
    fn test_subscript_of_assignment_target_is_mutated_and_resynced() {
        let mut module = account_module();
        let report = apply_mutation(
            &mut module,
            &request(TargetLocation::anchor(165), OperatorKind::LiteralValueReplacement, "1"),
        )
        .unwrap();
        assert_eq!(report.found, Some(FoundTarget::Assignment));

        let StmtKind::Update(update) = &body_of(&module, "Triple")[2].kind else {
            panic!("expected assignment");
        };
        assert_eq!(update.resolved[0].lhs, update.lhss[0]);
        let ExprKind::Index { index, .. } = &update.lhss[0].kind else {
            panic!("expected index target");
        };
        assert_eq!(index.as_literal(), Some(&Literal::Int(1)));
    }

    #[test]
    fn test_case_candidates_skip_cases_using_their_bindings() {
        let span = TargetLocation::span(107, 125);
        assert_eq!(
            candidates_of(OperatorKind::CaseBlockReplacement),
            vec![(span, "Red".to_string())]
        );
        assert_eq!(
            candidates_of(OperatorKind::CaseBlockExtraction),
            vec![(span, "0".to_string()), (span, "2".to_string())]
        );
        assert_eq!(
            candidates_of(OperatorKind::DatatypeCtorReplacement),
            vec![(TargetLocation::anchor(108), "Green".to_string())]
        );
    }

    #[test]
    fn test_collection_initializers() {
        assert_eq!(
            candidates_of(OperatorKind::CollectionInitReplacement),
            vec![
                (TargetLocation::span(60, 63), "empty".to_string()),
                (TargetLocation::span(151, 154), "init".to_string()),
            ]
        );
    }
}
