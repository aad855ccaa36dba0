// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declarations: modules, classes, datatypes and their members.

use serde::{Deserialize, Serialize};
use vermut_core::SourceSpan;

use super::expression::Expr;
use super::statement::Block;
use super::types::Type;

/// A compilation unit as handed over by the resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub decls: Vec<TopLevelDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TopLevelDecl {
    Class(ClassDecl),
    Datatype(DatatypeDecl),
}

/// A class, trait, or the implicit default class holding module-level
/// methods and functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub members: Vec<Member>,
    pub span: SourceSpan,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatatypeDecl {
    pub name: String,
    pub ctors: Vec<DatatypeCtor>,
    #[serde(default)]
    pub members: Vec<Member>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatatypeCtor {
    pub name: String,
    pub formals: Vec<Formal>,
    pub span: SourceSpan,
}

impl DatatypeCtor {
    pub fn formal_types(&self) -> Vec<&Type> {
        self.formals.iter().map(|f| &f.ty).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
    Function(FunctionDecl),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Field(f) => &f.name,
            Member::Method(m) => &m.name,
            Member::Function(f) => &f.name,
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            Member::Field(f) => f.span,
            Member::Method(m) => m.span,
            Member::Function(f) => f.span,
        }
    }

    pub fn is_ghost(&self) -> bool {
        match self {
            Member::Field(f) => f.ghost,
            Member::Method(m) => m.ghost,
            Member::Function(f) => f.ghost,
        }
    }

    pub fn as_method(&self) -> Option<&MethodDecl> {
        match self {
            Member::Method(m) => Some(m),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Type,
    pub span: SourceSpan,
    #[serde(default)]
    pub ghost: bool,
}

/// A parameter, out-parameter or constructor formal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formal {
    pub name: String,
    pub ty: Type,
    pub span: SourceSpan,
    #[serde(default)]
    pub ghost: bool,
}

/// A method or lemma (lemmas are ghost methods).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub params: Vec<Formal>,
    #[serde(default)]
    pub outs: Vec<Formal>,
    #[serde(default)]
    pub requires: Vec<Expr>,
    #[serde(default)]
    pub ensures: Vec<Expr>,
    #[serde(default)]
    pub modifies: Vec<Expr>,
    #[serde(default)]
    pub decreases: Vec<Expr>,
    pub body: Option<Block>,
    pub span: SourceSpan,
    #[serde(default)]
    pub ghost: bool,
    #[serde(default)]
    pub is_static: bool,
}

impl MethodDecl {
    /// Parameter and result types, the shape callers depend on.
    pub fn signature(&self) -> (Vec<&Type>, Vec<&Type>) {
        (
            self.params.iter().map(|p| &p.ty).collect(),
            self.outs.iter().map(|p| &p.ty).collect(),
        )
    }

    /// Two methods whose bodies are interchangeable: same parameter and
    /// out-parameter names and types, in order.
    pub fn same_formals_as(&self, other: &MethodDecl) -> bool {
        fn same(a: &[Formal], b: &[Formal]) -> bool {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.name == y.name && x.ty == y.ty)
        }
        same(&self.params, &other.params) && same(&self.outs, &other.outs)
    }
}

/// A function; its body is a single expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Formal>,
    pub result: Type,
    #[serde(default)]
    pub requires: Vec<Expr>,
    #[serde(default)]
    pub ensures: Vec<Expr>,
    #[serde(default)]
    pub reads: Vec<Expr>,
    #[serde(default)]
    pub decreases: Vec<Expr>,
    pub body: Option<Expr>,
    pub span: SourceSpan,
    /// Ghost functions (including predicates) are erased at compilation.
    #[serde(default)]
    pub ghost: bool,
    #[serde(default)]
    pub is_static: bool,
}

impl Module {
    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.decls.iter().filter_map(|d| match d {
            TopLevelDecl::Class(c) => Some(c),
            TopLevelDecl::Datatype(_) => None,
        })
    }

    pub fn datatypes(&self) -> impl Iterator<Item = &DatatypeDecl> {
        self.decls.iter().filter_map(|d| match d {
            TopLevelDecl::Datatype(dt) => Some(dt),
            TopLevelDecl::Class(_) => None,
        })
    }

    /// Find the method with the given name in the given class.
    pub fn find_method(&self, class: &str, name: &str) -> Option<&MethodDecl> {
        self.classes()
            .filter(|c| c.name == class)
            .flat_map(|c| c.members.iter())
            .filter_map(Member::as_method)
            .find(|m| m.name == name)
    }
}
