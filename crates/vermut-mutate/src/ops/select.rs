// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Selector operators: FAR, TAR and DCR.

use vermut_ast::nodes::{Expr, ExprKind, Type};
use vermut_core::OperatorKind;

use super::{MutationContext, Mutator, Outcome};
use crate::error::MutateError;

/// Select a different field of the same receiver.
#[derive(Debug)]
pub(crate) struct ReplaceField {
    field: String,
}

impl ReplaceField {
    pub(crate) fn new(field: &str) -> Self {
        ReplaceField {
            field: field.trim().to_string(),
        }
    }
}

impl Mutator for ReplaceField {
    fn kind(&self) -> OperatorKind {
        OperatorKind::FieldAccessReplacement
    }

    fn mutate_expr(&mut self, expr: &mut Expr, cx: &MutationContext) -> Outcome {
        if !cx.is_target(&expr.span) {
            return Outcome::Pass;
        }
        let ExprKind::Member { receiver, field } = &mut expr.kind else {
            return Outcome::Pass;
        };
        if *field == self.field {
            return Outcome::Rejected("field already selected");
        }
        let sibling = receiver.ty.class_name().is_some_and(|class| {
            cx.decls
                .sibling_fields(class, field.as_str())
                .contains(&self.field.as_str())
        });
        if !sibling {
            return Outcome::Rejected("no field of the class with the same type");
        }
        field.clone_from(&self.field);
        Outcome::Mutated(())
    }
}

/// Select a different component of a tuple.
#[derive(Debug)]
pub(crate) struct ReplaceTupleIndex {
    index: usize,
}

impl ReplaceTupleIndex {
    pub(crate) fn parse(argument: &str) -> Result<Self, MutateError> {
        argument
            .trim()
            .parse()
            .map(|index| ReplaceTupleIndex { index })
            .map_err(|_| {
                MutateError::invalid(
                    OperatorKind::TupleAccessReplacement,
                    argument,
                    "expected a component index",
                )
            })
    }
}

impl Mutator for ReplaceTupleIndex {
    fn kind(&self) -> OperatorKind {
        OperatorKind::TupleAccessReplacement
    }

    fn mutate_expr(&mut self, expr: &mut Expr, cx: &MutationContext) -> Outcome {
        if !cx.is_target(&expr.span) {
            return Outcome::Pass;
        }
        let ExprKind::TupleIndex { tuple, index } = &mut expr.kind else {
            return Outcome::Pass;
        };
        let Type::Tuple(components) = &tuple.ty else {
            return Outcome::Rejected("receiver is not a tuple");
        };
        match (components.get(*index), components.get(self.index)) {
            (Some(current), Some(other)) if *index != self.index && current == other => {
                *index = self.index;
                Outcome::Mutated(())
            }
            _ => Outcome::Rejected("component index out of range or of another type"),
        }
    }
}

/// Build a value with a different constructor of the same datatype.
#[derive(Debug)]
pub(crate) struct ReplaceCtor {
    ctor: String,
}

impl ReplaceCtor {
    pub(crate) fn new(ctor: &str) -> Self {
        ReplaceCtor {
            ctor: ctor.trim().to_string(),
        }
    }
}

impl Mutator for ReplaceCtor {
    fn kind(&self) -> OperatorKind {
        OperatorKind::DatatypeCtorReplacement
    }

    fn mutate_expr(&mut self, expr: &mut Expr, cx: &MutationContext) -> Outcome {
        if !cx.is_target(&expr.span) {
            return Outcome::Pass;
        }
        let ExprKind::Ctor { datatype, ctor, .. } = &mut expr.kind else {
            return Outcome::Pass;
        };
        if *ctor == self.ctor {
            return Outcome::Rejected("constructor already used");
        }
        if !cx.decls.sibling_ctors(datatype, ctor).contains(&self.ctor.as_str()) {
            return Outcome::Rejected("no constructor of the datatype with the same formals");
        }
        ctor.clone_from(&self.ctor);
        Outcome::Mutated(())
    }
}
