// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Name reference operators: VER, THI and THD.

use vermut_ast::nodes::{Expr, ExprKind, Type};
use vermut_core::{OperatorKind, SourceSpan};

use super::{MutationContext, Mutator, Outcome};

/// Replace a name reference with another variable of the same type.
#[derive(Debug)]
pub(crate) struct RenameVariable {
    name: String,
}

impl RenameVariable {
    pub(crate) fn new(name: &str) -> Self {
        RenameVariable {
            name: name.trim().to_string(),
        }
    }
}

impl Mutator for RenameVariable {
    fn kind(&self) -> OperatorKind {
        OperatorKind::VariableExpressionReplacement
    }

    fn mutate_expr(&mut self, expr: &mut Expr, cx: &MutationContext) -> Outcome {
        if !cx.is_target(&expr.span) {
            return Outcome::Pass;
        }
        let ExprKind::Name(name) = &mut expr.kind else {
            return Outcome::Pass;
        };
        if *name == self.name {
            return Outcome::Rejected("name already refers to the replacement");
        }
        name.clone_from(&self.name);
        Outcome::Mutated(())
    }
}

/// Turn a bare reference to a field shadowed by a local into `this.field`.
#[derive(Debug)]
pub(crate) struct InsertThis {
    field: String,
}

impl InsertThis {
    pub(crate) fn new(field: &str) -> Self {
        InsertThis {
            field: field.trim().to_string(),
        }
    }
}

impl Mutator for InsertThis {
    fn kind(&self) -> OperatorKind {
        OperatorKind::ThisInsertion
    }

    fn mutate_expr(&mut self, expr: &mut Expr, cx: &MutationContext) -> Outcome {
        if !cx.is_target(&expr.span) {
            return Outcome::Pass;
        }
        match expr.as_name() {
            Some(name) if name == self.field => {}
            Some(_) => return Outcome::Rejected("name differs from the field"),
            None => return Outcome::Pass,
        }
        let Some(class) = cx.enclosing_type.as_deref() else {
            return Outcome::Rejected("no enclosing class");
        };
        let span = expr.span;
        let receiver = Expr::new(
            ExprKind::This,
            SourceSpan::token(span.start.0),
            Type::Class(class.to_string()),
        );
        expr.kind = ExprKind::Member {
            receiver: Box::new(receiver),
            field: self.field.clone(),
        };
        Outcome::Mutated(())
    }
}

/// Turn `this.field` into a bare `field`, which then resolves to the local
/// that shadows it.
#[derive(Debug)]
pub(crate) struct RemoveThis {
    field: String,
}

impl RemoveThis {
    pub(crate) fn new(field: &str) -> Self {
        RemoveThis {
            field: field.trim().to_string(),
        }
    }
}

impl Mutator for RemoveThis {
    fn kind(&self) -> OperatorKind {
        OperatorKind::ThisDeletion
    }

    fn mutate_expr(&mut self, expr: &mut Expr, cx: &MutationContext) -> Outcome {
        if !cx.is_target(&expr.span) {
            return Outcome::Pass;
        }
        let ExprKind::Member { receiver, field } = &expr.kind else {
            return Outcome::Pass;
        };
        if !receiver.is_this() {
            return Outcome::Pass;
        }
        if *field != self.field {
            return Outcome::Rejected("field differs from the argument");
        }
        expr.kind = ExprKind::Name(self.field.clone());
        Outcome::Mutated(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vermut_ast::build;
    use vermut_core::TargetLocation;

    fn at(pos: u32) -> MutationContext {
        MutationContext {
            enclosing_type: Some("Counter".to_string()),
            ..MutationContext::new(TargetLocation::anchor(pos))
        }
    }

    #[test]
    fn test_ver_renames() {
        let mut expr = build::name("a", Type::Int, 3);
        let mut op = RenameVariable::new("b");
        assert_eq!(op.mutate_expr(&mut expr, &at(3)), Outcome::Mutated(()));
        assert_eq!(expr.as_name(), Some("b"));
        assert!(matches!(op.mutate_expr(&mut expr, &at(3)), Outcome::Rejected(_)));
    }

    #[test]
    fn test_this_inserted_and_removed() {
        let original = build::name("count", Type::Int, 6);
        let mut expr = original.clone();

        let mut insert = InsertThis::new("count");
        assert_eq!(insert.mutate_expr(&mut expr, &at(6)), Outcome::Mutated(()));
        let ExprKind::Member { receiver, field } = &expr.kind else {
            panic!("expected member access");
        };
        assert!(receiver.is_this());
        assert_eq!(field, "count");
        assert_eq!(receiver.ty, Type::Class("Counter".into()));

        let mut remove = RemoveThis::new("count");
        assert_eq!(remove.mutate_expr(&mut expr, &at(6)), Outcome::Mutated(()));
        assert_eq!(expr, original);
    }

    #[test]
    fn test_remove_this_passes_on_other_receivers() {
        let mut expr = build::member(build::name("other", Type::Class("Counter".into()), 4), "count", Type::Int, 6);
        assert_eq!(RemoveThis::new("count").mutate_expr(&mut expr, &at(6)), Outcome::Pass);
    }
}
