// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Resolved static types.
//!
//! Every expression of a resolved tree carries one of these. Operators and the
//! scanner use them to keep rewrites type-preserving: a literal stays a
//! literal of the same kind, a swapped variable has the same type, a default
//! value matches the expression it replaces.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::expression::Literal;

/// A resolved static type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Int,
    Nat,
    Real,
    Bool,
    Char,
    String,
    BitVector(u32),
    Seq(Box<Type>),
    Set(Box<Type>),
    Multiset(Box<Type>),
    Map(Box<Type>, Box<Type>),
    Array { elem: Box<Type>, dims: u32 },
    Tuple(Vec<Type>),
    Class(std::string::String),
    Datatype(std::string::String),
    /// Not resolved, or not expressible (multi-value call results).
    #[default]
    Unknown,
}

impl Type {
    /// Integral and real types.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Type::Int | Type::Nat | Type::Real | Type::BitVector(_)
        )
    }

    /// Integral types (`int`, `nat`, bit-vectors).
    pub fn is_integral(&self) -> bool {
        matches!(self, Type::Int | Type::Nat | Type::BitVector(_))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Bool)
    }

    /// Types with a literal form.
    pub fn is_primitive(&self) -> bool {
        self.is_numeric() || matches!(self, Type::Bool | Type::Char | Type::String)
    }

    /// Unordered collections (`set`, `multiset`).
    pub fn is_set_like(&self) -> bool {
        matches!(self, Type::Set(_) | Type::Multiset(_))
    }

    /// Ordered sequences, including strings.
    pub fn is_sequence_like(&self) -> bool {
        matches!(self, Type::Seq(_) | Type::String)
    }

    /// Reference types declared by a class.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Type::Class(name) | Type::Datatype(name) => Some(name),
            _ => None,
        }
    }

    /// Element type of a collection, array or string.
    pub fn element_type(&self) -> Option<Type> {
        match self {
            Type::Seq(elem) | Type::Set(elem) | Type::Multiset(elem) => Some((**elem).clone()),
            Type::Array { elem, .. } => Some((**elem).clone()),
            Type::String => Some(Type::Char),
            _ => None,
        }
    }

    /// Assignment compatibility: structural equality, with `int` and `nat`
    /// interchangeable. `Unknown` is compatible with nothing.
    pub fn compatible_with(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Unknown, _) | (_, Type::Unknown) => false,
            (Type::Int | Type::Nat, Type::Int | Type::Nat) => true,
            _ => self == other,
        }
    }

    /// The value an expression of this type is replaced with by EVR and MRR.
    pub fn default_value(&self) -> Option<Literal> {
        match self {
            Type::Int | Type::Nat | Type::BitVector(_) => Some(Literal::Int(0)),
            Type::Real => Some(Literal::Real(0.0)),
            Type::Bool => Some(Literal::Bool(false)),
            Type::Char => Some(Literal::Char('D')),
            Type::String => Some(Literal::String(std::string::String::new())),
            _ => None,
        }
    }

    /// Three distinct canonical sample values, used to populate an emptied
    /// collection display or array initializer.
    pub fn sample_values(&self) -> Option<[Literal; 3]> {
        match self {
            Type::Int | Type::Nat | Type::BitVector(_) => {
                Some([Literal::Int(1), Literal::Int(2), Literal::Int(3)])
            }
            Type::Real => Some([Literal::Real(1.0), Literal::Real(2.0), Literal::Real(3.0)]),
            // Only two booleans exist; a set display collapses the duplicate.
            Type::Bool => Some([
                Literal::Bool(true),
                Literal::Bool(false),
                Literal::Bool(true),
            ]),
            Type::Char => Some([Literal::Char('a'), Literal::Char('b'), Literal::Char('c')]),
            Type::String => Some([
                Literal::String("a".to_string()),
                Literal::String("b".to_string()),
                Literal::String("c".to_string()),
            ]),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Nat => write!(f, "nat"),
            Type::Real => write!(f, "real"),
            Type::Bool => write!(f, "bool"),
            Type::Char => write!(f, "char"),
            Type::String => write!(f, "string"),
            Type::BitVector(width) => write!(f, "bv{}", width),
            Type::Seq(elem) => write!(f, "seq<{}>", elem),
            Type::Set(elem) => write!(f, "set<{}>", elem),
            Type::Multiset(elem) => write!(f, "multiset<{}>", elem),
            Type::Map(key, value) => write!(f, "map<{}, {}>", key, value),
            Type::Array { elem, dims } if *dims <= 1 => write!(f, "array<{}>", elem),
            Type::Array { elem, dims } => write!(f, "array{}<{}>", dims, elem),
            Type::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Type::Class(name) | Type::Datatype(name) => write!(f, "{}", name),
            Type::Unknown => write!(f, "?"),
        }
    }
}
