// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declaration index for the scanner.
//!
//! Built once per module before the walk. Answers the questions the scanner
//! cannot answer from a node's own shape: which fields a class declares,
//! which constructors a datatype has, which callables share a signature.

use std::collections::HashMap;

use vermut_ast::nodes::{Member, Module, Type};

/// Parameter and result types of a method or function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callable {
    pub name: String,
    pub kind: CallableKind,
    pub params: Vec<Type>,
    pub results: Vec<Type>,
    pub ghost: bool,
    pub is_static: bool,
}

/// Whether a callable is a method or a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableKind {
    Method,
    Function,
}

impl Callable {
    /// Same parameter and result types, in order.
    pub fn same_signature(&self, other: &Callable) -> bool {
        self.params == other.params && self.results == other.results
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Field {
    name: String,
    ty: Type,
    ghost: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Ctor {
    name: String,
    formals: Vec<Type>,
}

/// Fields, constructors and callables of every declaration in a module,
/// keyed by the declaring type's name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclIndex {
    fields: HashMap<String, Vec<Field>>,
    ctors: HashMap<String, Vec<Ctor>>,
    callables: HashMap<String, Vec<Callable>>,
}

impl DeclIndex {
    pub fn build(module: &Module) -> Self {
        let mut index = DeclIndex::default();
        for class in module.classes() {
            index.add_members(&class.name, &class.members);
        }
        for datatype in module.datatypes() {
            index.ctors.insert(
                datatype.name.clone(),
                datatype
                    .ctors
                    .iter()
                    .map(|c| Ctor {
                        name: c.name.clone(),
                        formals: c.formal_types().into_iter().cloned().collect(),
                    })
                    .collect(),
            );
            index.add_members(&datatype.name, &datatype.members);
        }
        index
    }

    fn add_members(&mut self, owner: &str, members: &[Member]) {
        for member in members {
            match member {
                Member::Field(f) => self.fields.entry(owner.to_string()).or_default().push(Field {
                    name: f.name.clone(),
                    ty: f.ty.clone(),
                    ghost: f.ghost,
                }),
                Member::Method(m) => {
                    let (params, results) = m.signature();
                    self.callables
                        .entry(owner.to_string())
                        .or_default()
                        .push(Callable {
                            name: m.name.clone(),
                            kind: CallableKind::Method,
                            params: params.into_iter().cloned().collect(),
                            results: results.into_iter().cloned().collect(),
                            ghost: m.ghost,
                            is_static: m.is_static,
                        });
                }
                Member::Function(f) => self
                    .callables
                    .entry(owner.to_string())
                    .or_default()
                    .push(Callable {
                        name: f.name.clone(),
                        kind: CallableKind::Function,
                        params: f.params.iter().map(|p| p.ty.clone()).collect(),
                        results: vec![f.result.clone()],
                        ghost: f.ghost,
                        is_static: f.is_static,
                    }),
            }
        }
    }

    /// Type of a non-ghost field.
    pub fn field_type(&self, owner: &str, field: &str) -> Option<&Type> {
        self.fields
            .get(owner)?
            .iter()
            .find(|f| f.name == field && !f.ghost)
            .map(|f| &f.ty)
    }

    /// Other non-ghost fields of `owner` with the same type as `field`.
    pub fn sibling_fields(&self, owner: &str, field: &str) -> Vec<&str> {
        let Some(ty) = self.field_type(owner, field) else {
            return Vec::new();
        };
        self.fields
            .get(owner)
            .into_iter()
            .flatten()
            .filter(|f| f.name != field && !f.ghost && f.ty == *ty)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Other constructors of `datatype` taking the same formal types as
    /// `ctor`.
    pub fn sibling_ctors(&self, datatype: &str, ctor: &str) -> Vec<&str> {
        let Some(ctors) = self.ctors.get(datatype) else {
            return Vec::new();
        };
        let Some(current) = ctors.iter().find(|c| c.name == ctor) else {
            return Vec::new();
        };
        ctors
            .iter()
            .filter(|c| c.name != ctor && c.formals == current.formals)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn callable(&self, owner: &str, name: &str) -> Option<&Callable> {
        self.callables.get(owner)?.iter().find(|c| c.name == name)
    }

    /// Non-ghost callables of `owner` that can stand in for `name`: same
    /// kind, signature and static-ness, different name.
    pub fn compatible_callables(&self, owner: &str, name: &str) -> Vec<&str> {
        let Some(current) = self.callable(owner, name) else {
            return Vec::new();
        };
        self.callables
            .get(owner)
            .into_iter()
            .flatten()
            .filter(|c| {
                c.name != name
                    && !c.ghost
                    && c.kind == current.kind
                    && c.is_static == current.is_static
                    && c.same_signature(current)
            })
            .map(|c| c.name.as_str())
            .collect()
    }
}
