// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Name reference collection.
//!
//! Collects every name referenced by an expression or statement list,
//! including references inside specification clauses and ghost code. Used to
//! decide whether code can be moved or deleted without leaving a reference
//! to a variable that is no longer in scope.

use std::collections::BTreeSet;

use super::dispatch::{walk_expr, walk_stmts};
use super::traits::{VisitResult, Visitor};
use crate::nodes::{Expr, ExprKind, Stmt};

/// Visitor collecting referenced names.
#[derive(Debug, Default)]
pub struct NameCollector {
    names: BTreeSet<String>,
}

impl NameCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_names(self) -> BTreeSet<String> {
        self.names
    }
}

impl Visitor for NameCollector {
    fn include_specifications(&self) -> bool {
        true
    }

    fn include_ghost(&self) -> bool {
        true
    }

    fn visit_expr(&mut self, node: &Expr) -> VisitResult {
        if let ExprKind::Name(name) = &node.kind {
            self.names.insert(name.clone());
        }
        VisitResult::Continue
    }
}

/// Names referenced anywhere in `expr`.
pub fn names_in_expr(expr: &Expr) -> BTreeSet<String> {
    let mut collector = NameCollector::new();
    walk_expr(&mut collector, expr);
    collector.into_names()
}

/// Names referenced anywhere in `stmts`, including assignment targets.
pub fn names_in_stmts(stmts: &[Stmt]) -> BTreeSet<String> {
    let mut collector = NameCollector::new();
    walk_stmts(&mut collector, stmts);
    collector.into_names()
}

/// True if `expr` references `name`.
pub fn expr_mentions(expr: &Expr, name: &str) -> bool {
    names_in_expr(expr).contains(name)
}

/// True if any statement of `stmts` references any of `names`.
pub fn stmts_mention_any<'n>(stmts: &[Stmt], names: impl IntoIterator<Item = &'n str>) -> bool {
    let referenced = names_in_stmts(stmts);
    names.into_iter().any(|n| referenced.contains(n))
}
