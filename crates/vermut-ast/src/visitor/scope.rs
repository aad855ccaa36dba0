// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Scope and specification classification.
//!
//! Two independent pieces of bookkeeping used during traversal:
//!
//! - [`classify_stmt`] and [`classify_member`] tell executable code from
//!   specification and ghost code. The walkers skip anything that is not
//!   executable unless the visitor opts in.
//! - [`ScopeStack`] tracks the variables visible at the current point. Blocks,
//!   methods, loops and match cases take a [`ScopeMark`] on entry and restore
//!   it on exit, so bindings never leak out of the construct that introduced
//!   them.

use crate::nodes::{Member, Stmt, StmtKind, Type};

// ============================================================================
// Specification contexts
// ============================================================================

/// Kind of code a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecContext {
    /// Compiled, executable code.
    Executable,
    /// Contracts, loop invariants, `assert`/`assume`, `old(..)`.
    Specification,
    /// Ghost members, ghost variables and ghost statements.
    Ghost,
}

/// Classify a statement on its own (not considering its ancestors).
pub fn classify_stmt(stmt: &Stmt) -> SpecContext {
    if stmt.ghost {
        return SpecContext::Ghost;
    }
    match stmt.kind {
        StmtKind::Assert(_) | StmtKind::Assume(_) => SpecContext::Specification,
        _ => SpecContext::Executable,
    }
}

/// Classify a member on its own.
pub fn classify_member(member: &Member) -> SpecContext {
    if member.is_ghost() {
        SpecContext::Ghost
    } else {
        SpecContext::Executable
    }
}

// ============================================================================
// Variable scopes
// ============================================================================

/// Where a visible variable was introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingOrigin {
    Param,
    Out,
    Local,
    LoopIndex,
    PatternVar,
}

/// A variable visible at the current point.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub ty: Type,
    pub origin: BindingOrigin,
}

/// Saved depth of a [`ScopeStack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeMark(usize);

/// Visible variables, innermost last.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    bindings: Vec<Binding>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save the current depth.
    pub fn mark(&self) -> ScopeMark {
        ScopeMark(self.bindings.len())
    }

    /// Drop every binding declared since `mark` was taken.
    pub fn restore(&mut self, mark: ScopeMark) {
        self.bindings.truncate(mark.0);
    }

    pub fn declare(&mut self, name: impl Into<String>, ty: Type, origin: BindingOrigin) {
        self.bindings.push(Binding {
            name: name.into(),
            ty,
            origin,
        });
    }

    /// Innermost binding for `name`.
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.bindings.iter().rev().find(|b| b.name == name)
    }

    /// Visible bindings, innermost first, with shadowed outer bindings
    /// removed.
    pub fn visible(&self) -> Vec<&Binding> {
        let mut seen = std::collections::HashSet::new();
        self.bindings
            .iter()
            .rev()
            .filter(|b| seen.insert(b.name.as_str()))
            .collect()
    }

    pub fn depth(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
