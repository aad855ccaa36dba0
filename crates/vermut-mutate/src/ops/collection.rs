// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Collection initializer replacement (CIR).

use vermut_ast::nodes::{Expr, ExprKind, Literal, Type};
use vermut_core::{OperatorKind, SourceSpan};

use super::{MutationContext, Mutator, Outcome};
use crate::error::MutateError;

/// What CIR does to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InitChange {
    /// Empty a non-empty display.
    Empty,
    /// Fill an empty display with three sample values.
    Samples,
    /// Drop an array's explicit initializer, keeping its length.
    Dims,
    /// Give a sized array three sample elements.
    Init,
}

impl InitChange {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            InitChange::Empty => "empty",
            InitChange::Samples => "samples",
            InitChange::Dims => "dims",
            InitChange::Init => "init",
        }
    }
}

fn sample_exprs(elem_ty: &Type, span: SourceSpan) -> Option<Vec<Expr>> {
    let samples = elem_ty.sample_values()?;
    Some(
        samples
            .into_iter()
            .map(|value| Expr::new(ExprKind::Literal(value), span, elem_ty.clone()))
            .collect(),
    )
}

fn length_literal(len: usize, span: SourceSpan) -> Expr {
    Expr::new(ExprKind::Literal(Literal::Int(len as i128)), span, Type::Int)
}

/// Replace the initializer of a collection display or array allocation.
#[derive(Debug)]
pub(crate) struct ReplaceInit {
    change: InitChange,
}

impl ReplaceInit {
    pub(crate) fn parse(argument: &str) -> Result<Self, MutateError> {
        let change = [
            InitChange::Empty,
            InitChange::Samples,
            InitChange::Dims,
            InitChange::Init,
        ]
        .into_iter()
        .find(|c| c.name() == argument.trim())
        .ok_or_else(|| {
            MutateError::invalid(
                OperatorKind::CollectionInitReplacement,
                argument,
                "expected one of 'empty', 'samples', 'dims', 'init'",
            )
        })?;
        Ok(ReplaceInit { change })
    }
}

impl Mutator for ReplaceInit {
    fn kind(&self) -> OperatorKind {
        OperatorKind::CollectionInitReplacement
    }

    fn mutate_expr(&mut self, expr: &mut Expr, cx: &MutationContext) -> Outcome {
        if !cx.is_target(&expr.span) {
            return Outcome::Pass;
        }
        let span = expr.span;
        let elem_ty = expr.ty.element_type();
        match (&mut expr.kind, self.change) {
            (ExprKind::Display { elements, .. }, InitChange::Empty) if !elements.is_empty() => {
                elements.clear();
                Outcome::Mutated(())
            }
            (ExprKind::Display { elements, .. }, InitChange::Samples) if elements.is_empty() => {
                match elem_ty.as_ref().and_then(|t| sample_exprs(t, span)) {
                    Some(samples) => {
                        *elements = samples;
                        Outcome::Mutated(())
                    }
                    None => Outcome::Rejected("element type has no sample values"),
                }
            }
            (ExprKind::ArrayAlloc { dims, init, .. }, InitChange::Dims) => match init.take() {
                Some(values) if dims.len() <= 1 => {
                    *dims = vec![length_literal(values.len(), span)];
                    Outcome::Mutated(())
                }
                restore => {
                    *init = restore;
                    Outcome::Rejected("array has no one-dimensional initializer")
                }
            },
            (
                ExprKind::ArrayAlloc {
                    elem_ty,
                    dims,
                    init,
                },
                InitChange::Init,
            ) if init.is_none() && dims.len() == 1 => match sample_exprs(elem_ty, span) {
                Some(samples) => {
                    *dims = vec![length_literal(samples.len(), span)];
                    *init = Some(samples);
                    Outcome::Mutated(())
                }
                None => Outcome::Rejected("element type has no sample values"),
            },
            (ExprKind::Display { .. } | ExprKind::ArrayAlloc { .. }, _) => {
                Outcome::Rejected("initializer is already in the requested form")
            }
            _ => Outcome::Pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vermut_ast::build;
    use vermut_ast::nodes::CollectionKind;
    use vermut_core::TargetLocation;

    fn cx() -> MutationContext {
        MutationContext::new(TargetLocation::span(3, 9))
    }

    #[test]
    fn test_display_emptied_and_filled() {
        let mut expr = build::display(
            CollectionKind::Seq,
            vec![build::int(7, 4)],
            Type::Int,
            3,
            9,
        );
        let mut empty = ReplaceInit::parse("empty").unwrap();
        assert_eq!(empty.mutate_expr(&mut expr, &cx()), Outcome::Mutated(()));
        assert!(matches!(&expr.kind, ExprKind::Display { elements, .. } if elements.is_empty()));

        let mut fill = ReplaceInit::parse("samples").unwrap();
        assert_eq!(fill.mutate_expr(&mut expr, &cx()), Outcome::Mutated(()));
        let ExprKind::Display { elements, .. } = &expr.kind else {
            panic!("expected display");
        };
        let values: Vec<_> = elements.iter().filter_map(Expr::as_literal).cloned().collect();
        assert_eq!(values, vec![Literal::Int(1), Literal::Int(2), Literal::Int(3)]);
    }

    #[test]
    fn test_array_init_becomes_length() {
        let mut expr = build::array_alloc(
            Type::Int,
            vec![],
            Some(vec![build::int(1, 5), build::int(2, 7)]),
            3,
            9,
        );
        let mut op = ReplaceInit::parse("dims").unwrap();
        assert_eq!(op.mutate_expr(&mut expr, &cx()), Outcome::Mutated(()));
        let ExprKind::ArrayAlloc { dims, init, .. } = &expr.kind else {
            panic!("expected array allocation");
        };
        assert!(init.is_none());
        assert_eq!(dims[0].as_literal(), Some(&Literal::Int(2)));
    }

    #[test]
    fn test_sized_array_gets_samples() {
        let mut expr = build::array_alloc(Type::Bool, vec![build::int(10, 5)], None, 3, 9);
        let mut op = ReplaceInit::parse("init").unwrap();
        assert_eq!(op.mutate_expr(&mut expr, &cx()), Outcome::Mutated(()));
        let ExprKind::ArrayAlloc { dims, init, .. } = &expr.kind else {
            panic!("expected array allocation");
        };
        assert_eq!(init.as_ref().map(Vec::len), Some(3));
        assert_eq!(dims[0].as_literal(), Some(&Literal::Int(3)));
    }

    #[test]
    fn test_wrong_form_is_rejected_without_change() {
        let mut expr = build::display(CollectionKind::Set, vec![], Type::Int, 3, 9);
        let before = expr.clone();
        let mut op = ReplaceInit::parse("empty").unwrap();
        assert!(matches!(op.mutate_expr(&mut expr, &cx()), Outcome::Rejected(_)));
        assert_eq!(expr, before);
    }
}
