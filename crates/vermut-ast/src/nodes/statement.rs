// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statement nodes.

use serde::{Deserialize, Serialize};
use vermut_core::SourceSpan;

use super::expression::{Expr, ExprKind, Literal};
use super::types::Type;

/// A statement with its span.
///
/// `ghost` is set by the resolver for ghost variable declarations, ghost
/// assignments and other statements erased at compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: SourceSpan,
    #[serde(default)]
    pub ghost: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    VarDecl(VarDeclStmt),
    Update(UpdateStmt),
    /// Expression statement (a call evaluated for its effect).
    Expr(Expr),
    Return(ReturnStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Break,
    Continue,
    Block(Block),
    Match(MatchStmt),
    Assert(Expr),
    Assume(Expr),
    Print(Vec<Expr>),
}

/// A braced statement list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: SourceSpan,
}

/// One declared local.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalVar {
    pub name: String,
    pub ty: Type,
    pub span: SourceSpan,
    #[serde(default)]
    pub ghost: bool,
}

/// `var x: T, y := e1, e2;`
///
/// When present, `init.lhss` are name expressions for the declared locals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDeclStmt {
    pub locals: Vec<LocalVar>,
    pub init: Option<UpdateStmt>,
}

/// `lhs1, lhs2 := rhs1, rhs2;`
///
/// Either `lhss.len() == rhss.len()` (parallel assignment) or a single
/// right-hand side call produces every left-hand value. `resolved` is the
/// per-target shadow copy later stages consume; it must be kept in step with
/// `rhss` whenever a right-hand side changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStmt {
    pub lhss: Vec<Expr>,
    pub rhss: Vec<Expr>,
    #[serde(default)]
    pub resolved: Vec<ResolvedAssign>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAssign {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl UpdateStmt {
    pub fn new(lhss: Vec<Expr>, rhss: Vec<Expr>) -> Self {
        let mut update = UpdateStmt {
            lhss,
            rhss,
            resolved: Vec::new(),
        };
        update.sync_resolved();
        update
    }

    /// True for the parallel form, where each target has its own value.
    pub fn is_parallel(&self) -> bool {
        self.lhss.len() == self.rhss.len()
    }

    /// Rebuild the shadow copy from `lhss` and `rhss`.
    pub fn sync_resolved(&mut self) {
        self.resolved = if self.is_parallel() {
            self.lhss
                .iter()
                .zip(&self.rhss)
                .map(|(lhs, rhs)| ResolvedAssign {
                    lhs: lhs.clone(),
                    rhs: rhs.clone(),
                })
                .collect()
        } else {
            Vec::new()
        };
    }

    /// Remove the `index`-th target and its value. Only valid for the
    /// parallel form.
    pub fn remove_pair(&mut self, index: usize) {
        if self.is_parallel() && index < self.lhss.len() {
            self.lhss.remove(index);
            self.rhss.remove(index);
            self.sync_resolved();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStmt {
    pub values: Vec<Expr>,
}

/// `if guard { .. } else ..`
///
/// `else_branch` is either a `Block` statement or another `If`, so an
/// `if / else if / else` chain is a right-leaning list of `IfStmt`s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    /// `None` for a non-deterministic `if *`.
    pub guard: Option<Expr>,
    pub then_branch: Block,
    pub else_branch: Option<Box<Stmt>>,
}

impl IfStmt {
    /// Spans of every `if` in the chain headed by this statement, excluding
    /// the head itself.
    pub fn else_if_spans(&self) -> Vec<SourceSpan> {
        let mut spans = Vec::new();
        let mut cursor = self.else_branch.as_deref();
        while let Some(Stmt {
            kind: StmtKind::If(inner),
            span,
            ..
        }) = cursor
        {
            spans.push(*span);
            cursor = inner.else_branch.as_deref();
        }
        spans
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStmt {
    pub guard: Option<Expr>,
    #[serde(default)]
    pub invariants: Vec<Expr>,
    #[serde(default)]
    pub decreases: Vec<Expr>,
    pub body: Block,
}

/// `for i := start to end { .. }` (or `downto`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStmt {
    pub index: LocalVar,
    pub start: Expr,
    pub end: Option<Expr>,
    #[serde(default = "default_ascending")]
    pub ascending: bool,
    #[serde(default)]
    pub invariants: Vec<Expr>,
    pub body: Block,
}

fn default_ascending() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStmt {
    pub source: Expr,
    pub cases: Vec<MatchCase>,
}

impl MatchStmt {
    /// Index of the catch-all case (`_` or a bare variable pattern).
    pub fn default_case(&self) -> Option<usize> {
        self.cases.iter().position(|c| c.pattern.is_catch_all())
    }

    /// Index of the case whose pattern is headed by constructor `name`.
    pub fn case_for_ctor(&self, name: &str) -> Option<usize> {
        self.cases
            .iter()
            .position(|c| c.pattern.ctor_name() == Some(name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCase {
    pub pattern: Pattern,
    pub body: Vec<Stmt>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    Ctor { name: String, args: Vec<Pattern> },
    Var { name: String, ty: Type },
    Literal(Literal),
    Wildcard,
}

impl Pattern {
    pub fn is_catch_all(&self) -> bool {
        matches!(self, Pattern::Wildcard | Pattern::Var { .. })
    }

    pub fn ctor_name(&self) -> Option<&str> {
        match self {
            Pattern::Ctor { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Variables bound by this pattern, with their types, in source order.
    pub fn bindings(&self) -> Vec<(&str, &Type)> {
        let mut out = Vec::new();
        self.collect_bindings(&mut out);
        out
    }

    fn collect_bindings<'a>(&'a self, out: &mut Vec<(&'a str, &'a Type)>) {
        match self {
            Pattern::Var { name, ty } => out.push((name.as_str(), ty)),
            Pattern::Ctor { args, .. } => {
                for arg in args {
                    arg.collect_bindings(out);
                }
            }
            Pattern::Literal(_) | Pattern::Wildcard => {}
        }
    }
}

impl Stmt {
    pub fn new(kind: StmtKind, span: SourceSpan) -> Self {
        Stmt {
            kind,
            span,
            ghost: false,
        }
    }

    /// Names declared by this statement into the enclosing block.
    pub fn declared_names(&self) -> Vec<&str> {
        match &self.kind {
            StmtKind::VarDecl(decl) => decl.locals.iter().map(|l| l.name.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_var_decl(&self) -> bool {
        matches!(self.kind, StmtKind::VarDecl(_))
    }

    pub fn is_loop(&self) -> bool {
        matches!(self.kind, StmtKind::While(_) | StmtKind::For(_))
    }

    /// The declaration of a single local with a single initializer:
    /// `var x := e;`.
    pub fn as_simple_decl(&self) -> Option<(&LocalVar, &Expr)> {
        let StmtKind::VarDecl(decl) = &self.kind else {
            return None;
        };
        match (decl.locals.as_slice(), decl.init.as_ref()) {
            ([local], Some(init)) if init.rhss.len() == 1 => Some((local, &init.rhss[0])),
            _ => None,
        }
    }
}

impl Block {
    pub fn new(stmts: Vec<Stmt>, span: SourceSpan) -> Self {
        Block { stmts, span }
    }

    /// True if any top-level statement of the block declares a local.
    pub fn declares_locals(&self) -> bool {
        self.stmts.iter().any(Stmt::is_var_decl)
    }
}

impl VarDeclStmt {
    /// Build a declaration whose initializer targets the declared locals.
    pub fn with_init(locals: Vec<LocalVar>, rhss: Vec<Expr>) -> Self {
        let lhss = locals
            .iter()
            .map(|l| Expr::new(ExprKind::Name(l.name.clone()), l.span, l.ty.clone()))
            .collect();
        VarDeclStmt {
            locals,
            init: Some(UpdateStmt::new(lhss, rhss)),
        }
    }
}
