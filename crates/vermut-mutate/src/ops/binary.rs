// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Binary expression operators: BOR, BBR and ODL.

use vermut_ast::nodes::{BinaryOp, Expr, ExprKind, Literal, Type};
use vermut_core::OperatorKind;

use super::{MutationContext, Mutator, Outcome};
use crate::error::MutateError;

/// Operators a binary operator may be replaced with, given the type of its
/// left operand.
///
/// The result never contains `op` itself and never mixes classes: an
/// arithmetic operator is only replaced by another arithmetic operator that
/// is defined on the operand type.
pub fn replacements(op: BinaryOp, operand: &Type) -> Vec<BinaryOp> {
    use BinaryOp::*;

    let class = if op.is_arithmetic() {
        match operand {
            t if t.is_integral() => vec![Add, Sub, Mul, Div, Mod],
            Type::Real => vec![Add, Sub, Mul, Div],
            // union, difference, intersection
            t if t.is_set_like() => vec![Add, Sub, Mul],
            _ => Vec::new(),
        }
    } else if op.is_relational() {
        match operand {
            t if t.is_numeric() || *t == Type::Char || t.is_set_like() => {
                vec![Lt, Le, Gt, Ge, Eq, Neq]
            }
            t if t.is_sequence_like() => vec![Lt, Le, Eq, Neq],
            _ => vec![Eq, Neq],
        }
    } else if op.is_logical() {
        match op {
            Iff => vec![Imp],
            _ => vec![And, Or, Imp],
        }
    } else if op.is_shift() {
        vec![Shl, Shr]
    } else if op.is_bitwise() {
        vec![BitAnd, BitOr, BitXor]
    } else if op.is_membership() {
        vec![In, NotIn]
    } else {
        Vec::new()
    };

    class.into_iter().filter(|candidate| *candidate != op).collect()
}

// ============================================================================
// BOR
// ============================================================================

/// Replace the operator of a binary expression.
#[derive(Debug)]
pub(crate) struct ReplaceOperator {
    replacement: BinaryOp,
}

impl ReplaceOperator {
    pub(crate) fn parse(argument: &str) -> Result<Self, MutateError> {
        BinaryOp::from_name(argument)
            .map(|replacement| ReplaceOperator { replacement })
            .ok_or_else(|| {
                MutateError::invalid(
                    OperatorKind::BinaryOperatorReplacement,
                    argument,
                    "not a binary operator name",
                )
            })
    }
}

impl Mutator for ReplaceOperator {
    fn kind(&self) -> OperatorKind {
        OperatorKind::BinaryOperatorReplacement
    }

    fn mutate_expr(&mut self, expr: &mut Expr, cx: &MutationContext) -> Outcome {
        if !cx.is_target(&expr.span) {
            return Outcome::Pass;
        }
        let ExprKind::Binary { op, lhs, .. } = &mut expr.kind else {
            return Outcome::Pass;
        };
        if !replacements(*op, &lhs.ty).contains(&self.replacement) {
            return Outcome::Rejected("replacement operator is not compatible");
        }
        *op = self.replacement;
        Outcome::Mutated(())
    }
}

// ============================================================================
// BBR
// ============================================================================

/// Replace a boolean-valued binary expression with `true` or `false`.
#[derive(Debug)]
pub(crate) struct CollapseToBool {
    value: bool,
}

impl CollapseToBool {
    pub(crate) fn parse(argument: &str) -> Result<Self, MutateError> {
        match argument.trim() {
            "true" => Ok(CollapseToBool { value: true }),
            "false" => Ok(CollapseToBool { value: false }),
            _ => Err(MutateError::invalid(
                OperatorKind::BinaryBooleanReplacement,
                argument,
                "expected 'true' or 'false'",
            )),
        }
    }
}

impl Mutator for CollapseToBool {
    fn kind(&self) -> OperatorKind {
        OperatorKind::BinaryBooleanReplacement
    }

    fn mutate_expr(&mut self, expr: &mut Expr, cx: &MutationContext) -> Outcome {
        if !cx.is_target(&expr.span) || !matches!(expr.kind, ExprKind::Binary { .. }) {
            return Outcome::Pass;
        }
        if expr.ty != Type::Bool {
            return Outcome::Rejected("expression is not boolean");
        }
        *expr = Expr::new(
            ExprKind::Literal(Literal::Bool(self.value)),
            expr.span,
            Type::Bool,
        );
        Outcome::Mutated(())
    }
}

// ============================================================================
// ODL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Replace a binary expression with one of its operands.
#[derive(Debug)]
pub(crate) struct DropOperand {
    keep: Side,
}

impl DropOperand {
    pub(crate) fn parse(argument: &str) -> Result<Self, MutateError> {
        let keep = match argument.trim() {
            "left" => Side::Left,
            "right" => Side::Right,
            _ => {
                return Err(MutateError::invalid(
                    OperatorKind::OperatorDeletion,
                    argument,
                    "expected 'left' or 'right'",
                ))
            }
        };
        Ok(DropOperand { keep })
    }
}

impl Mutator for DropOperand {
    fn kind(&self) -> OperatorKind {
        OperatorKind::OperatorDeletion
    }

    fn mutate_expr(&mut self, expr: &mut Expr, cx: &MutationContext) -> Outcome {
        if !cx.is_target(&expr.span) {
            return Outcome::Pass;
        }
        let ExprKind::Binary { lhs, rhs, .. } = &mut expr.kind else {
            return Outcome::Pass;
        };
        let survivor = match self.keep {
            Side::Left => lhs,
            Side::Right => rhs,
        };
        if !survivor.ty.compatible_with(&expr.ty) {
            return Outcome::Rejected("operand type differs from expression type");
        }
        let survivor = std::mem::take(survivor.as_mut());
        *expr = survivor;
        Outcome::Mutated(())
    }
}
