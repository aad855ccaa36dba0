// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression nodes.

use std::fmt;

use serde::{Deserialize, Serialize};
use vermut_core::SourceSpan;

use super::types::Type;

// ============================================================================
// Literals
// ============================================================================

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i128),
    Real(f64),
    Bool(bool),
    Char(char),
    String(String),
    Null,
}

/// The kind of a [`Literal`], used to parse operator arguments back into
/// values of the same kind as the literal they replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Int,
    Real,
    Bool,
    Char,
    String,
    Null,
}

impl Literal {
    pub fn kind(&self) -> LiteralKind {
        match self {
            Literal::Int(_) => LiteralKind::Int,
            Literal::Real(_) => LiteralKind::Real,
            Literal::Bool(_) => LiteralKind::Bool,
            Literal::Char(_) => LiteralKind::Char,
            Literal::String(_) => LiteralKind::String,
            Literal::Null => LiteralKind::Null,
        }
    }

    /// Parse `text` (as produced by `Display`) as a literal of `kind`.
    ///
    /// Returns `None` if the text does not denote a value of that kind.
    pub fn parse_as(kind: LiteralKind, text: &str) -> Option<Literal> {
        let text = text.trim();
        match kind {
            LiteralKind::Int => text.parse().ok().map(Literal::Int),
            LiteralKind::Real => text.parse().ok().map(Literal::Real),
            LiteralKind::Bool => match text {
                "true" => Some(Literal::Bool(true)),
                "false" => Some(Literal::Bool(false)),
                _ => None,
            },
            LiteralKind::Char => {
                let inner = unescape(text.strip_prefix('\'')?.strip_suffix('\'')?)?;
                let mut chars = inner.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Literal::Char(c)),
                    _ => None,
                }
            }
            LiteralKind::String => {
                let inner = text.strip_prefix('"')?.strip_suffix('"')?;
                unescape(inner).map(Literal::String)
            }
            LiteralKind::Null => (text == "null").then_some(Literal::Null),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{}", v),
            // Debug formatting keeps the decimal point ("4.0", not "4").
            Literal::Real(v) => write!(f, "{:?}", v),
            Literal::Bool(v) => write!(f, "{}", v),
            Literal::Char(c) => write!(f, "'{}'", escape(&c.to_string())),
            Literal::String(s) => write!(f, "\"{}\"", escape(s)),
            Literal::Null => write!(f, "null"),
        }
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            _ => return None,
        }
    }
    Some(out)
}

// ============================================================================
// Operators
// ============================================================================

/// Binary operator tags.
///
/// Set-typed operands reuse the arithmetic tags: `Add` is union, `Sub` is
/// difference, `Mul` is intersection; `Lt`/`Le` are proper subset/subset (or
/// proper prefix/prefix on sequences).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Neq,
    And,
    Or,
    Imp,
    Iff,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
    In,
    NotIn,
}

impl BinaryOp {
    pub const ALL: &'static [BinaryOp] = &[
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Mod,
        BinaryOp::Lt,
        BinaryOp::Le,
        BinaryOp::Gt,
        BinaryOp::Ge,
        BinaryOp::Eq,
        BinaryOp::Neq,
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Imp,
        BinaryOp::Iff,
        BinaryOp::Shl,
        BinaryOp::Shr,
        BinaryOp::BitAnd,
        BinaryOp::BitOr,
        BinaryOp::BitXor,
        BinaryOp::In,
        BinaryOp::NotIn,
    ];

    /// Tag name as used in operator arguments.
    pub fn name(&self) -> &'static str {
        match self {
            BinaryOp::Add => "Add",
            BinaryOp::Sub => "Sub",
            BinaryOp::Mul => "Mul",
            BinaryOp::Div => "Div",
            BinaryOp::Mod => "Mod",
            BinaryOp::Lt => "Lt",
            BinaryOp::Le => "Le",
            BinaryOp::Gt => "Gt",
            BinaryOp::Ge => "Ge",
            BinaryOp::Eq => "Eq",
            BinaryOp::Neq => "Neq",
            BinaryOp::And => "And",
            BinaryOp::Or => "Or",
            BinaryOp::Imp => "Imp",
            BinaryOp::Iff => "Iff",
            BinaryOp::Shl => "Shl",
            BinaryOp::Shr => "Shr",
            BinaryOp::BitAnd => "BitAnd",
            BinaryOp::BitOr => "BitOr",
            BinaryOp::BitXor => "BitXor",
            BinaryOp::In => "In",
            BinaryOp::NotIn => "NotIn",
        }
    }

    /// Look up a tag by [`name`](Self::name), case-insensitively.
    pub fn from_name(name: &str) -> Option<BinaryOp> {
        let name = name.trim();
        BinaryOp::ALL
            .iter()
            .copied()
            .find(|op| op.name().eq_ignore_ascii_case(name))
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Imp => "==>",
            BinaryOp::Iff => "<==>",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::In => "in",
            BinaryOp::NotIn => "!in",
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
        )
    }

    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
                | BinaryOp::Eq
                | BinaryOp::Neq
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(
            self,
            BinaryOp::And | BinaryOp::Or | BinaryOp::Imp | BinaryOp::Iff
        )
    }

    pub fn is_shift(&self) -> bool {
        matches!(self, BinaryOp::Shl | BinaryOp::Shr)
    }

    pub fn is_bitwise(&self) -> bool {
        matches!(self, BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor)
    }

    pub fn is_membership(&self) -> bool {
        matches!(self, BinaryOp::In | BinaryOp::NotIn)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operator tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Boolean negation.
    Not,
    /// Arithmetic negation.
    Neg,
}

impl UnaryOp {
    pub fn name(&self) -> &'static str {
        match self {
            UnaryOp::Not => "Not",
            UnaryOp::Neg => "Neg",
        }
    }

    pub fn from_name(name: &str) -> Option<UnaryOp> {
        match name.trim() {
            n if n.eq_ignore_ascii_case("Not") => Some(UnaryOp::Not),
            n if n.eq_ignore_ascii_case("Neg") => Some(UnaryOp::Neg),
            _ => None,
        }
    }
}

/// Collection display kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    Seq,
    Set,
    Multiset,
}

// ============================================================================
// Expressions
// ============================================================================

/// An expression with its span and resolved type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: SourceSpan,
    pub ty: Type,
}

/// Expression variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    Literal(Literal),
    /// Reference to a local, parameter, bound variable or implicit field.
    Name(String),
    This,
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// Chained comparison `a < b <= c`.
    Chain(ChainExpr),
    /// Field access `receiver.field`.
    Member {
        receiver: Box<Expr>,
        field: String,
    },
    /// Tuple component `tuple.0`.
    TupleIndex {
        tuple: Box<Expr>,
        index: usize,
    },
    /// Sequence or array element `seq[index]`.
    Index {
        seq: Box<Expr>,
        index: Box<Expr>,
    },
    Call(CallExpr),
    /// Collection display `[a, b]`, `{a, b}`, `multiset{a}`.
    Display {
        kind: CollectionKind,
        elements: Vec<Expr>,
    },
    MapDisplay {
        entries: Vec<MapEntry>,
    },
    /// Array allocation `new T[dims]` or `new T[] [init]`.
    ArrayAlloc {
        elem_ty: Type,
        dims: Vec<Expr>,
        init: Option<Vec<Expr>>,
    },
    /// Datatype constructor application `D.Ctor(args)`.
    Ctor {
        datatype: String,
        ctor: String,
        args: Vec<Expr>,
    },
    /// Conditional expression `if c then a else b`.
    Ite {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    /// `old(e)`; specification-only.
    Old(Box<Expr>),
}

impl Default for ExprKind {
    fn default() -> Self {
        ExprKind::Literal(Literal::Null)
    }
}

/// A chained comparison with its resolved conjunction.
///
/// `operands` and `ops` hold the surface form (`a < b < c` has three operands
/// and two ops). `resolved` is the shadow copy later stages consume
/// (`a < b && b < c`); it must be rebuilt whenever an operand changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainExpr {
    pub operands: Vec<Expr>,
    pub ops: Vec<BinaryOp>,
    pub resolved: Option<Box<Expr>>,
}

impl ChainExpr {
    /// Rebuild `resolved` from the current operands.
    pub fn rebuild_resolved(&mut self) {
        let mut conjunction: Option<Expr> = None;
        for (i, op) in self.ops.iter().enumerate() {
            let (Some(lhs), Some(rhs)) = (self.operands.get(i), self.operands.get(i + 1)) else {
                break;
            };
            let link = Expr {
                span: SourceSpan {
                    start: lhs.span.start,
                    end: rhs.span.end,
                    anchor: lhs.span.end,
                },
                kind: ExprKind::Binary {
                    op: *op,
                    lhs: Box::new(lhs.clone()),
                    rhs: Box::new(rhs.clone()),
                },
                ty: Type::Bool,
            };
            conjunction = Some(match conjunction {
                None => link,
                Some(prev) => Expr {
                    span: SourceSpan {
                        start: prev.span.start,
                        end: link.span.end,
                        anchor: prev.span.end,
                    },
                    kind: ExprKind::Binary {
                        op: BinaryOp::And,
                        lhs: Box::new(prev),
                        rhs: Box::new(link),
                    },
                    ty: Type::Bool,
                },
            });
        }
        self.resolved = conjunction.map(Box::new);
    }
}

/// A call `receiver.method(args)`; the receiver is absent for calls to
/// members of the enclosing class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub receiver: Option<Box<Expr>>,
    pub method: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: Expr,
    pub value: Expr,
}

impl Expr {
    pub fn new(kind: ExprKind, span: SourceSpan, ty: Type) -> Self {
        Expr { kind, span, ty }
    }

    /// The referenced name, if this is a name expression.
    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match &self.kind {
            ExprKind::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&CallExpr> {
        match &self.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn is_this(&self) -> bool {
        matches!(self.kind, ExprKind::This)
    }

    /// Direct subexpressions in source order. Specification-only children
    /// (the operand of `old`) are included; the chain's shadow copy is not.
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Literal(_) | ExprKind::Name(_) | ExprKind::This => Vec::new(),
            ExprKind::Binary { lhs, rhs, .. } => vec![&**lhs, &**rhs],
            ExprKind::Unary { operand, .. } => vec![&**operand],
            ExprKind::Chain(chain) => chain.operands.iter().collect(),
            ExprKind::Member { receiver, .. } => vec![&**receiver],
            ExprKind::TupleIndex { tuple, .. } => vec![&**tuple],
            ExprKind::Index { seq, index } => vec![&**seq, &**index],
            ExprKind::Call(call) => call
                .receiver
                .iter()
                .map(|r| &**r)
                .chain(call.args.iter())
                .collect(),
            ExprKind::Display { elements, .. } => elements.iter().collect(),
            ExprKind::MapDisplay { entries } => entries
                .iter()
                .flat_map(|e| [&e.key, &e.value])
                .collect(),
            ExprKind::ArrayAlloc { dims, init, .. } => dims
                .iter()
                .chain(init.iter().flatten())
                .collect(),
            ExprKind::Ctor { args, .. } => args.iter().collect(),
            ExprKind::Ite {
                cond,
                then_expr,
                else_expr,
            } => vec![&**cond, &**then_expr, &**else_expr],
            ExprKind::Old(inner) => vec![&**inner],
        }
    }

    /// Mutable counterpart of [`children`](Self::children).
    pub fn children_mut(&mut self) -> Vec<&mut Expr> {
        match &mut self.kind {
            ExprKind::Literal(_) | ExprKind::Name(_) | ExprKind::This => Vec::new(),
            ExprKind::Binary { lhs, rhs, .. } => vec![&mut **lhs, &mut **rhs],
            ExprKind::Unary { operand, .. } => vec![&mut **operand],
            ExprKind::Chain(chain) => chain.operands.iter_mut().collect(),
            ExprKind::Member { receiver, .. } => vec![&mut **receiver],
            ExprKind::TupleIndex { tuple, .. } => vec![&mut **tuple],
            ExprKind::Index { seq, index } => vec![&mut **seq, &mut **index],
            ExprKind::Call(call) => call
                .receiver
                .as_deref_mut()
                .into_iter()
                .chain(call.args.iter_mut())
                .collect(),
            ExprKind::Display { elements, .. } => elements.iter_mut().collect(),
            ExprKind::MapDisplay { entries } => entries
                .iter_mut()
                .flat_map(|e| [&mut e.key, &mut e.value])
                .collect(),
            ExprKind::ArrayAlloc { dims, init, .. } => dims
                .iter_mut()
                .chain(init.iter_mut().flatten())
                .collect(),
            ExprKind::Ctor { args, .. } => args.iter_mut().collect(),
            ExprKind::Ite {
                cond,
                then_expr,
                else_expr,
            } => vec![&mut **cond, &mut **then_expr, &mut **else_expr],
            ExprKind::Old(inner) => vec![&mut **inner],
        }
    }
}
