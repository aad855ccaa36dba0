// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Unary operators: UOI and UOD.

use vermut_ast::nodes::{Expr, ExprKind, Type, UnaryOp};
use vermut_core::OperatorKind;

use super::{MutationContext, Mutator, Outcome};
use crate::error::MutateError;

/// The negation that fits a name of type `ty`, if any.
pub(crate) fn negation_for(ty: &Type) -> Option<UnaryOp> {
    match ty {
        Type::Bool => Some(UnaryOp::Not),
        Type::Int | Type::Real => Some(UnaryOp::Neg),
        _ => None,
    }
}

/// Wrap a name reference in `!` or unary `-`.
#[derive(Debug)]
pub(crate) struct InsertNegation {
    op: UnaryOp,
}

impl InsertNegation {
    pub(crate) fn parse(argument: &str) -> Result<Self, MutateError> {
        UnaryOp::from_name(argument)
            .map(|op| InsertNegation { op })
            .ok_or_else(|| {
                MutateError::invalid(
                    OperatorKind::UnaryOperatorInsertion,
                    argument,
                    "expected 'Not' or 'Neg'",
                )
            })
    }
}

impl Mutator for InsertNegation {
    fn kind(&self) -> OperatorKind {
        OperatorKind::UnaryOperatorInsertion
    }

    fn mutate_expr(&mut self, expr: &mut Expr, cx: &MutationContext) -> Outcome {
        if !cx.is_target(&expr.span) || !matches!(expr.kind, ExprKind::Name(_)) {
            return Outcome::Pass;
        }
        if negation_for(&expr.ty) != Some(self.op) {
            return Outcome::Rejected("negation does not fit the operand type");
        }
        let span = expr.span;
        let ty = expr.ty.clone();
        let operand = std::mem::take(expr);
        *expr = Expr::new(
            ExprKind::Unary {
                op: self.op,
                operand: Box::new(operand),
            },
            span,
            ty,
        );
        Outcome::Mutated(())
    }
}

/// Replace a unary expression with its operand.
#[derive(Debug)]
pub(crate) struct RemoveNegation;

impl Mutator for RemoveNegation {
    fn kind(&self) -> OperatorKind {
        OperatorKind::UnaryOperatorDeletion
    }

    fn mutate_expr(&mut self, expr: &mut Expr, cx: &MutationContext) -> Outcome {
        if !cx.is_target(&expr.span) {
            return Outcome::Pass;
        }
        let ExprKind::Unary { operand, .. } = &mut expr.kind else {
            return Outcome::Pass;
        };
        if !operand.ty.compatible_with(&expr.ty) {
            return Outcome::Rejected("operand type differs from expression type");
        }
        let operand = std::mem::take(operand.as_mut());
        *expr = operand;
        Outcome::Mutated(())
    }
}
