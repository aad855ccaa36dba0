// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Value operators: LVR and EVR.
//!
//! Both carry their new value as literal text, in the form produced by
//! `Literal`'s `Display`. The text is parsed against the kind of the value
//! being replaced, so `"0"` replaces an integer and `"0.0"` a real.

use vermut_ast::nodes::{Expr, ExprKind, Literal, Type};
use vermut_core::OperatorKind;

use super::{MutationContext, Mutator, Outcome};

/// Replacement values for `literal`, in emission order.
///
/// - integers: `v + 1`, `v - 1`, and `0` unless one of those already is (or
///   `v` is) zero; `nat` literals never go negative
/// - reals: `v + 1`, `v - 1`, `0.0` on the same terms
/// - booleans: the negation
/// - characters: the next and previous code points
/// - strings: the empty string and a scramble of the middle two characters;
///   an empty string gets `sentinel`
pub fn literal_replacements(literal: &Literal, ty: &Type, sentinel: &str) -> Vec<Literal> {
    match literal {
        Literal::Int(v) => {
            let mut out = Vec::new();
            if let Some(up) = v.checked_add(1) {
                out.push(up);
            }
            if let Some(down) = v.checked_sub(1) {
                if *ty != Type::Nat || down >= 0 {
                    out.push(down);
                }
            }
            if *v != 0 && !out.contains(&0) {
                out.push(0);
            }
            out.into_iter().map(Literal::Int).collect()
        }
        Literal::Real(v) => {
            let mut out = vec![v + 1.0, v - 1.0];
            if *v != 0.0 && !out.contains(&0.0) {
                out.push(0.0);
            }
            out.into_iter().map(Literal::Real).collect()
        }
        Literal::Bool(b) => vec![Literal::Bool(!b)],
        Literal::Char(c) => {
            let code = u32::from(*c);
            [code.checked_add(1), code.checked_sub(1)]
                .into_iter()
                .flatten()
                .filter_map(char::from_u32)
                .map(Literal::Char)
                .collect()
        }
        Literal::String(s) if s.is_empty() => vec![Literal::String(sentinel.to_string())],
        Literal::String(s) => {
            let mut out = vec![Literal::String(String::new())];
            let mut chars: Vec<char> = s.chars().collect();
            if chars.len() >= 2 {
                let mid = chars.len() / 2;
                chars.swap(mid - 1, mid);
                let scrambled: String = chars.into_iter().collect();
                if scrambled != *s {
                    out.push(Literal::String(scrambled));
                }
            }
            out
        }
        Literal::Null => Vec::new(),
    }
}

// ============================================================================
// LVR
// ============================================================================

/// Replace a literal with another value of the same kind.
#[derive(Debug)]
pub(crate) struct ReplaceLiteral {
    value: String,
}

impl ReplaceLiteral {
    pub(crate) fn new(value: &str) -> Self {
        ReplaceLiteral {
            value: value.to_string(),
        }
    }
}

impl Mutator for ReplaceLiteral {
    fn kind(&self) -> OperatorKind {
        OperatorKind::LiteralValueReplacement
    }

    fn mutate_expr(&mut self, expr: &mut Expr, cx: &MutationContext) -> Outcome {
        if !cx.is_target(&expr.span) {
            return Outcome::Pass;
        }
        let ExprKind::Literal(literal) = &mut expr.kind else {
            return Outcome::Pass;
        };
        let Some(replacement) = Literal::parse_as(literal.kind(), &self.value) else {
            return Outcome::Rejected("value does not parse as the literal's kind");
        };
        if replacement == *literal {
            return Outcome::Rejected("value equals the original literal");
        }
        *literal = replacement;
        Outcome::Mutated(())
    }
}

// ============================================================================
// EVR
// ============================================================================

/// True for the expression shapes EVR replaces.
pub(crate) fn is_value_source(expr: &Expr) -> bool {
    matches!(
        expr.kind,
        ExprKind::Name(_)
            | ExprKind::Call(_)
            | ExprKind::Member { .. }
            | ExprKind::Index { .. }
            | ExprKind::TupleIndex { .. }
    )
}

/// Replace a name, call, field or element read with its type's default.
#[derive(Debug)]
pub(crate) struct DefaultValue {
    value: String,
}

impl DefaultValue {
    pub(crate) fn new(value: &str) -> Self {
        DefaultValue {
            value: value.to_string(),
        }
    }
}

impl Mutator for DefaultValue {
    fn kind(&self) -> OperatorKind {
        OperatorKind::ExpressionValueReplacement
    }

    fn mutate_expr(&mut self, expr: &mut Expr, cx: &MutationContext) -> Outcome {
        if !cx.is_target(&expr.span) || !is_value_source(expr) {
            return Outcome::Pass;
        }
        let Some(default) = expr.ty.default_value() else {
            return Outcome::Rejected("type has no default value");
        };
        let Some(value) = Literal::parse_as(default.kind(), &self.value) else {
            return Outcome::Rejected("value does not parse as the expression's type");
        };
        *expr = Expr::new(ExprKind::Literal(value), expr.span, expr.ty.clone());
        Outcome::Mutated(())
    }
}
