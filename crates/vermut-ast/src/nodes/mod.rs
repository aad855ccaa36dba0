// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Resolved program tree.
//!
//! Every node is plain owned data with serde derives, so a tree can be read
//! from the JSON handed over by the front end, mutated in place, and written
//! back out.

mod decl;
mod expression;
mod statement;
mod types;

pub use decl::{
    ClassDecl, DatatypeCtor, DatatypeDecl, FieldDecl, Formal, FunctionDecl, Member, MethodDecl,
    Module, TopLevelDecl,
};
pub use expression::{
    BinaryOp, CallExpr, ChainExpr, CollectionKind, Expr, ExprKind, Literal, LiteralKind, MapEntry,
    UnaryOp,
};
pub use statement::{
    Block, ForStmt, IfStmt, LocalVar, MatchCase, MatchStmt, Pattern, ResolvedAssign, ReturnStmt,
    Stmt, StmtKind, UpdateStmt, VarDeclStmt, WhileStmt,
};
pub use types::Type;
