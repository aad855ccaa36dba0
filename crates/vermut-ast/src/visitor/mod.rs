// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for program tree traversal.
//!
//! - [`Visitor`] / [`VisitorMut`]: read-only and mutating visitor traits
//! - [`dispatch`] / [`dispatch_mut`]: the `walk_*` functions driving them
//! - [`scope`]: specification/ghost classification and variable scopes
//! - [`names`]: name reference collection

pub mod dispatch;
pub mod dispatch_mut;
pub mod names;
pub mod scope;
mod traits;

pub use dispatch::{
    walk_block, walk_expr, walk_member, walk_members, walk_method, walk_module, walk_stmt,
    walk_stmts,
};
pub use dispatch_mut::{
    walk_block_mut, walk_expr_mut, walk_member_mut, walk_members_mut, walk_method_mut,
    walk_module_mut, walk_stmt_mut, walk_stmts_mut,
};
pub use names::{expr_mentions, names_in_expr, names_in_stmts, stmts_mention_any, NameCollector};
pub use scope::{
    classify_member, classify_stmt, Binding, BindingOrigin, ScopeMark,
    ScopeStack, SpecContext,
};
pub use traits::{Transform, VisitResult, Visitor, VisitorMut};
