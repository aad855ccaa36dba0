// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Program tree model and traversal core for vermut.
//!
//! The tree is the resolved form of a verified program: every expression
//! carries its static type and every node carries a [`SourceSpan`] with a
//! disambiguating anchor. Parsing and resolution happen upstream; this crate
//! only models the result and walks it.
//!
//! [`SourceSpan`]: vermut_core::SourceSpan

pub mod build;
pub mod nodes;
pub mod visitor;

pub use nodes::{Expr, ExprKind, Member, Module, Stmt, StmtKind, Type};
pub use visitor::{Transform, VisitResult, Visitor, VisitorMut};
