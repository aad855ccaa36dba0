// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Call operators: MAP, MNR, MCR and SWA.

use vermut_ast::nodes::{Expr, ExprKind};
use vermut_core::OperatorKind;

use super::{MutationContext, Mutator, Outcome};
use crate::error::MutateError;

/// Replace a call with one of its arguments.
#[derive(Debug)]
pub(crate) struct PropagateArgument {
    index: usize,
}

impl PropagateArgument {
    pub(crate) fn parse(argument: &str) -> Result<Self, MutateError> {
        argument
            .trim()
            .parse()
            .map(|index| PropagateArgument { index })
            .map_err(|_| {
                MutateError::invalid(
                    OperatorKind::MethodArgumentPropagation,
                    argument,
                    "expected an argument index",
                )
            })
    }
}

impl Mutator for PropagateArgument {
    fn kind(&self) -> OperatorKind {
        OperatorKind::MethodArgumentPropagation
    }

    fn mutate_expr(&mut self, expr: &mut Expr, cx: &MutationContext) -> Outcome {
        if !cx.is_target(&expr.span) {
            return Outcome::Pass;
        }
        let ExprKind::Call(call) = &mut expr.kind else {
            return Outcome::Pass;
        };
        let Some(arg) = call.args.get_mut(self.index) else {
            return Outcome::Rejected("argument index out of range");
        };
        if !arg.ty.compatible_with(&expr.ty) {
            return Outcome::Rejected("argument type differs from call type");
        }
        let arg = std::mem::take(arg);
        *expr = arg;
        Outcome::Mutated(())
    }
}

/// Replace a call with its receiver.
#[derive(Debug)]
pub(crate) struct NakedReceiver;

impl Mutator for NakedReceiver {
    fn kind(&self) -> OperatorKind {
        OperatorKind::MethodNakedReceiver
    }

    fn mutate_expr(&mut self, expr: &mut Expr, cx: &MutationContext) -> Outcome {
        if !cx.is_target(&expr.span) {
            return Outcome::Pass;
        }
        let ExprKind::Call(call) = &mut expr.kind else {
            return Outcome::Pass;
        };
        let Some(receiver) = call.receiver.as_deref_mut() else {
            return Outcome::Rejected("call has no receiver");
        };
        if !receiver.ty.compatible_with(&expr.ty) {
            return Outcome::Rejected("receiver type differs from call type");
        }
        let receiver = std::mem::take(receiver);
        *expr = receiver;
        Outcome::Mutated(())
    }
}

/// Redirect a call to another callee with the same signature.
#[derive(Debug)]
pub(crate) struct ReplaceCallee {
    method: String,
}

impl ReplaceCallee {
    pub(crate) fn new(method: &str) -> Self {
        ReplaceCallee {
            method: method.trim().to_string(),
        }
    }
}

impl Mutator for ReplaceCallee {
    fn kind(&self) -> OperatorKind {
        OperatorKind::MethodCallReplacement
    }

    fn mutate_expr(&mut self, expr: &mut Expr, cx: &MutationContext) -> Outcome {
        if !cx.is_target(&expr.span) {
            return Outcome::Pass;
        }
        let ExprKind::Call(call) = &mut expr.kind else {
            return Outcome::Pass;
        };
        if call.method == self.method {
            return Outcome::Rejected("call already targets the replacement");
        }
        let owner = match call.receiver.as_deref() {
            Some(receiver) if !receiver.is_this() => receiver.ty.class_name(),
            _ => cx.enclosing_type.as_deref(),
        };
        let compatible = owner.is_some_and(|owner| {
            cx.decls
                .compatible_callables(owner, &call.method)
                .contains(&self.method.as_str())
        });
        if !compatible {
            return Outcome::Rejected("replacement is not a compatible callable");
        }
        call.method.clone_from(&self.method);
        Outcome::Mutated(())
    }
}

/// Exchange two call arguments of the same type.
#[derive(Debug)]
pub(crate) struct SwapArguments {
    first: usize,
    second: usize,
}

impl SwapArguments {
    pub(crate) fn parse(argument: &str) -> Result<Self, MutateError> {
        let invalid = |reason| MutateError::invalid(OperatorKind::SwapArguments, argument, reason);
        let (first, second) = argument
            .split_once(';')
            .ok_or_else(|| invalid("expected 'i;j'"))?;
        let parse = |text: &str| {
            text.trim()
                .parse::<usize>()
                .map_err(|_| invalid("expected 'i;j'"))
        };
        let (first, second) = (parse(first)?, parse(second)?);
        if first == second {
            return Err(invalid("indices must differ"));
        }
        Ok(SwapArguments { first, second })
    }
}

impl Mutator for SwapArguments {
    fn kind(&self) -> OperatorKind {
        OperatorKind::SwapArguments
    }

    fn mutate_expr(&mut self, expr: &mut Expr, cx: &MutationContext) -> Outcome {
        if !cx.is_target(&expr.span) {
            return Outcome::Pass;
        }
        let ExprKind::Call(call) = &mut expr.kind else {
            return Outcome::Pass;
        };
        let same_type = match (call.args.get(self.first), call.args.get(self.second)) {
            (Some(a), Some(b)) => a.ty == b.ty,
            _ => false,
        };
        if !same_type {
            return Outcome::Rejected("arguments missing or of different types");
        }
        call.args.swap(self.first, self.second);
        Outcome::Mutated(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vermut_ast::build;
    use vermut_ast::nodes::{Member, Type};
    use vermut_core::TargetLocation;

    use crate::scanner::DeclIndex;

    fn cx() -> MutationContext {
        MutationContext::new(TargetLocation::span(1, 8))
    }

    /// `list.insert(x, 3)` typed as the list
    fn insert_call() -> Expr {
        let list = Type::Class("List".into());
        build::call(
            Some(build::name("list", list.clone(), 1)),
            "insert",
            vec![build::name("x", Type::Int, 5), build::int(3, 7)],
            list,
            1,
            8,
        )
    }

    #[test]
    fn test_map_needs_matching_argument_type() {
        let mut expr = insert_call();
        let mut op = PropagateArgument::parse("0").unwrap();
        assert!(matches!(op.mutate_expr(&mut expr, &cx()), Outcome::Rejected(_)));
        assert_eq!(expr, insert_call());

        let mut call = build::call(None, "id", vec![build::name("x", Type::Int, 3)], Type::Int, 1, 8);
        assert_eq!(op.mutate_expr(&mut call, &cx()), Outcome::Mutated(()));
        assert_eq!(call.as_name(), Some("x"));
    }

    #[test]
    fn test_mnr_returns_receiver() {
        let mut expr = insert_call();
        assert_eq!(NakedReceiver.mutate_expr(&mut expr, &cx()), Outcome::Mutated(()));
        assert_eq!(expr.as_name(), Some("list"));
    }

    /// `class List` with `insert` and `append` of one shape and `drop` of
    /// another.
    fn with_list() -> MutationContext {
        let list = Type::Class("List".into());
        let method = |name: &str, second: Type| {
            let params = vec![build::formal("x", Type::Int, 2), build::formal("y", second, 3)];
            let outs = vec![build::formal("r", list.clone(), 4)];
            Member::Method(build::method(name, params, outs, build::block(vec![], 5, 6), 1, 6))
        };
        let class = build::class(
            "List",
            vec![
                method("insert", Type::Int),
                method("append", Type::Int),
                method("drop", Type::Bool),
            ],
            0,
            7,
        );
        cx().with_decls(DeclIndex::build(&build::module("M", vec![class])))
    }

    #[test]
    fn test_mcr_renames_callee() {
        let mut expr = insert_call();
        let mut op = ReplaceCallee::new("append");
        assert_eq!(op.mutate_expr(&mut expr, &with_list()), Outcome::Mutated(()));
        assert_eq!(expr.as_call().map(|c| c.method.as_str()), Some("append"));
    }

    #[test]
    fn test_mcr_refuses_unknown_or_differently_shaped_callees() {
        for name in ["drop", "remove"] {
            let mut expr = insert_call();
            let outcome = ReplaceCallee::new(name).mutate_expr(&mut expr, &with_list());
            assert!(matches!(outcome, Outcome::Rejected(_)), "{}", name);
            assert_eq!(expr, insert_call());
        }
    }

    #[test]
    fn test_swa_swaps_same_typed_arguments() {
        let mut expr = insert_call();
        let mut op = SwapArguments::parse("0;1").unwrap();
        assert_eq!(op.mutate_expr(&mut expr, &cx()), Outcome::Mutated(()));
        let args = &expr.as_call().unwrap().args;
        assert!(args[0].as_literal().is_some());
        assert_eq!(args[1].as_name(), Some("x"));
    }
}
