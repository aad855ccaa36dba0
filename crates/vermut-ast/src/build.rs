// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Constructors for building program trees in code.
//!
//! Positions are plain token indices. Compound nodes derive their span from
//! their children where the source layout makes that unambiguous (a binary
//! expression runs from its left operand to its right operand) and take
//! explicit `start`/`end` positions otherwise.
//!
//! ```
//! use vermut_ast::build;
//! use vermut_ast::nodes::{BinaryOp, Type};
//!
//! // a + b, with `+` at token 2
//! let sum = build::binary(
//!     BinaryOp::Add,
//!     build::name("a", Type::Int, 1),
//!     build::name("b", Type::Int, 3),
//!     2,
//! );
//! assert_eq!(sum.span.anchor.0, 2);
//! assert_eq!(sum.ty, Type::Int);
//! ```

use vermut_core::{Position, SourceSpan};

use crate::nodes::{
    BinaryOp, Block, CallExpr, ClassDecl, CollectionKind, DatatypeCtor, DatatypeDecl, Expr,
    ExprKind, FieldDecl, Formal, IfStmt, Literal, LocalVar, MatchCase, MatchStmt, Member,
    MethodDecl, Module, Pattern, ReturnStmt, Stmt, StmtKind, TopLevelDecl, Type, UnaryOp,
    UpdateStmt, VarDeclStmt, WhileStmt,
};

fn span(start: u32, end: u32, anchor: u32) -> SourceSpan {
    SourceSpan {
        start: Position(start),
        end: Position(end.max(start)),
        anchor: Position(anchor.clamp(start, end.max(start))),
    }
}

// ============================================================================
// Expressions
// ============================================================================

pub fn literal(value: Literal, ty: Type, pos: u32) -> Expr {
    Expr::new(ExprKind::Literal(value), SourceSpan::token(pos), ty)
}

pub fn int(value: i128, pos: u32) -> Expr {
    literal(Literal::Int(value), Type::Int, pos)
}

pub fn boolean(value: bool, pos: u32) -> Expr {
    literal(Literal::Bool(value), Type::Bool, pos)
}

pub fn string(value: &str, pos: u32) -> Expr {
    literal(Literal::String(value.to_string()), Type::String, pos)
}

pub fn name(name: &str, ty: Type, pos: u32) -> Expr {
    Expr::new(ExprKind::Name(name.to_string()), SourceSpan::token(pos), ty)
}

pub fn this(class: &str, pos: u32) -> Expr {
    Expr::new(
        ExprKind::This,
        SourceSpan::token(pos),
        Type::Class(class.to_string()),
    )
}

/// Binary expression anchored at its operator token.
pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr, op_pos: u32) -> Expr {
    let ty = if op.is_relational() || op.is_logical() || op.is_membership() {
        Type::Bool
    } else {
        lhs.ty.clone()
    };
    let span = span(lhs.span.start.0, rhs.span.end.0, op_pos);
    Expr::new(
        ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        span,
        ty,
    )
}

/// Prefix unary expression anchored at its operator token.
pub fn unary(op: UnaryOp, operand: Expr, op_pos: u32) -> Expr {
    let ty = match op {
        UnaryOp::Not => Type::Bool,
        UnaryOp::Neg if operand.ty == Type::Nat => Type::Int,
        UnaryOp::Neg => operand.ty.clone(),
    };
    let end = operand.span.end.0;
    Expr::new(
        ExprKind::Unary {
            op,
            operand: Box::new(operand),
        },
        span(op_pos, end, op_pos),
        ty,
    )
}

/// Field access anchored at the field name token.
pub fn member(receiver: Expr, field: &str, ty: Type, field_pos: u32) -> Expr {
    let start = receiver.span.start.0;
    Expr::new(
        ExprKind::Member {
            receiver: Box::new(receiver),
            field: field.to_string(),
        },
        span(start, field_pos, field_pos),
        ty,
    )
}

/// Tuple component access anchored at the index token.
pub fn tuple_index(tuple: Expr, index: usize, ty: Type, index_pos: u32) -> Expr {
    let start = tuple.span.start.0;
    Expr::new(
        ExprKind::TupleIndex {
            tuple: Box::new(tuple),
            index,
        },
        span(start, index_pos, index_pos),
        ty,
    )
}

pub fn index(seq: Expr, index: Expr, ty: Type, end: u32) -> Expr {
    let start = seq.span.start.0;
    let anchor = index.span.start.0;
    Expr::new(
        ExprKind::Index {
            seq: Box::new(seq),
            index: Box::new(index),
        },
        span(start, end, anchor),
        ty,
    )
}

/// Call covering `[start, end]`.
pub fn call(
    receiver: Option<Expr>,
    method: &str,
    args: Vec<Expr>,
    ty: Type,
    start: u32,
    end: u32,
) -> Expr {
    Expr::new(
        ExprKind::Call(CallExpr {
            receiver: receiver.map(Box::new),
            method: method.to_string(),
            args,
        }),
        span(start, end, start),
        ty,
    )
}

pub fn display(
    kind: CollectionKind,
    elements: Vec<Expr>,
    elem_ty: Type,
    start: u32,
    end: u32,
) -> Expr {
    let ty = match kind {
        CollectionKind::Seq => Type::Seq(Box::new(elem_ty)),
        CollectionKind::Set => Type::Set(Box::new(elem_ty)),
        CollectionKind::Multiset => Type::Multiset(Box::new(elem_ty)),
    };
    Expr::new(
        ExprKind::Display { kind, elements },
        span(start, end, start),
        ty,
    )
}

pub fn array_alloc(
    elem_ty: Type,
    dims: Vec<Expr>,
    init: Option<Vec<Expr>>,
    start: u32,
    end: u32,
) -> Expr {
    let ty = Type::Array {
        elem: Box::new(elem_ty.clone()),
        dims: dims.len().max(1) as u32,
    };
    Expr::new(
        ExprKind::ArrayAlloc {
            elem_ty,
            dims,
            init,
        },
        span(start, end, start),
        ty,
    )
}

/// Constructor application anchored at the constructor name token.
pub fn ctor(datatype: &str, ctor: &str, args: Vec<Expr>, ctor_pos: u32, end: u32) -> Expr {
    Expr::new(
        ExprKind::Ctor {
            datatype: datatype.to_string(),
            ctor: ctor.to_string(),
            args,
        },
        span(ctor_pos, end, ctor_pos),
        Type::Datatype(datatype.to_string()),
    )
}

// ============================================================================
// Statements
// ============================================================================

pub fn block(stmts: Vec<Stmt>, start: u32, end: u32) -> Block {
    Block::new(stmts, span(start, end, start))
}

pub fn block_stmt(stmts: Vec<Stmt>, start: u32, end: u32) -> Stmt {
    Stmt::new(StmtKind::Block(block(stmts, start, end)), span(start, end, start))
}

/// `var name: ty := init;` with `name` at `start + 1`.
pub fn var_decl(name: &str, ty: Type, init: Option<Expr>, start: u32, end: u32) -> Stmt {
    let local = LocalVar {
        name: name.to_string(),
        ty,
        span: SourceSpan::token(start + 1),
        ghost: false,
    };
    let decl = match init {
        Some(init) => VarDeclStmt::with_init(vec![local], vec![init]),
        None => VarDeclStmt {
            locals: vec![local],
            init: None,
        },
    };
    Stmt::new(StmtKind::VarDecl(decl), span(start, end, start))
}

pub fn assign(lhs: Expr, rhs: Expr, start: u32, end: u32) -> Stmt {
    Stmt::new(
        StmtKind::Update(UpdateStmt::new(vec![lhs], vec![rhs])),
        span(start, end, start),
    )
}

pub fn expr_stmt(expr: Expr, start: u32, end: u32) -> Stmt {
    Stmt::new(StmtKind::Expr(expr), span(start, end, start))
}

pub fn ret(values: Vec<Expr>, start: u32, end: u32) -> Stmt {
    Stmt::new(StmtKind::Return(ReturnStmt { values }), span(start, end, start))
}

pub fn if_stmt(
    guard: Expr,
    then_branch: Block,
    else_branch: Option<Stmt>,
    start: u32,
    end: u32,
) -> Stmt {
    Stmt::new(
        StmtKind::If(IfStmt {
            guard: Some(guard),
            then_branch,
            else_branch: else_branch.map(Box::new),
        }),
        span(start, end, start),
    )
}

pub fn while_stmt(guard: Expr, invariants: Vec<Expr>, body: Block, start: u32, end: u32) -> Stmt {
    Stmt::new(
        StmtKind::While(WhileStmt {
            guard: Some(guard),
            invariants,
            decreases: Vec::new(),
            body,
        }),
        span(start, end, start),
    )
}

pub fn match_stmt(source: Expr, cases: Vec<MatchCase>, start: u32, end: u32) -> Stmt {
    Stmt::new(
        StmtKind::Match(MatchStmt { source, cases }),
        span(start, end, start),
    )
}

pub fn case(pattern: Pattern, body: Vec<Stmt>, start: u32, end: u32) -> MatchCase {
    MatchCase {
        pattern,
        body,
        span: span(start, end, start),
    }
}

/// Constructor pattern whose arguments are the variables `vars`.
pub fn ctor_pattern(name: &str, vars: &[(&str, Type)]) -> Pattern {
    Pattern::Ctor {
        name: name.to_string(),
        args: vars
            .iter()
            .map(|(var, ty)| Pattern::Var {
                name: var.to_string(),
                ty: ty.clone(),
            })
            .collect(),
    }
}

pub fn assert(expr: Expr, start: u32, end: u32) -> Stmt {
    Stmt::new(StmtKind::Assert(expr), span(start, end, start))
}

pub fn print(args: Vec<Expr>, start: u32, end: u32) -> Stmt {
    Stmt::new(StmtKind::Print(args), span(start, end, start))
}

pub fn brk(pos: u32) -> Stmt {
    Stmt::new(StmtKind::Break, SourceSpan::token(pos))
}

// ============================================================================
// Declarations
// ============================================================================

pub fn formal(name: &str, ty: Type, pos: u32) -> Formal {
    Formal {
        name: name.to_string(),
        ty,
        span: SourceSpan::token(pos),
        ghost: false,
    }
}

pub fn field(name: &str, ty: Type, pos: u32) -> Member {
    Member::Field(FieldDecl {
        name: name.to_string(),
        ty,
        span: SourceSpan::token(pos),
        ghost: false,
    })
}

pub fn method(
    name: &str,
    params: Vec<Formal>,
    outs: Vec<Formal>,
    body: Block,
    start: u32,
    end: u32,
) -> MethodDecl {
    MethodDecl {
        name: name.to_string(),
        params,
        outs,
        requires: Vec::new(),
        ensures: Vec::new(),
        modifies: Vec::new(),
        decreases: Vec::new(),
        body: Some(body),
        span: span(start, end, start),
        ghost: false,
        is_static: false,
    }
}

pub fn class(name: &str, members: Vec<Member>, start: u32, end: u32) -> TopLevelDecl {
    TopLevelDecl::Class(ClassDecl {
        name: name.to_string(),
        members,
        span: span(start, end, start),
        is_default: false,
    })
}

pub fn datatype(name: &str, ctors: Vec<(&str, Vec<Formal>)>, start: u32, end: u32) -> TopLevelDecl {
    TopLevelDecl::Datatype(DatatypeDecl {
        name: name.to_string(),
        ctors: ctors
            .into_iter()
            .map(|(ctor, formals)| DatatypeCtor {
                name: ctor.to_string(),
                formals,
                span: span(start, end, start),
            })
            .collect(),
        members: Vec::new(),
        span: span(start, end, start),
    })
}

pub fn module(name: &str, decls: Vec<TopLevelDecl>) -> Module {
    Module {
        name: name.to_string(),
        decls,
    }
}
