// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Candidate scanner.
//!
//! A read-only walk that proposes every mutation the operator catalogue would
//! accept, using only each node's resolved type and immediate shape plus a
//! few running indices:
//!
//! - a [`ScopeStack`] of the variables visible at the current point
//! - a [`DeclIndex`] of fields, constructors and callables per declaring type
//! - the enclosing class and whether the enclosing member is static
//!
//! Candidates come out in walk order (pre-order, source order), so a scan of
//! the same tree always yields the same list.

mod index;

pub use index::{Callable, CallableKind, DeclIndex};

use std::collections::{BTreeSet, HashSet};

use tracing::debug;
use vermut_ast::nodes::{
    Block, ClassDecl, DatatypeDecl, Expr, ExprKind, FunctionDecl, LocalVar, MatchCase, MatchStmt,
    Member, MethodDecl, Module, Stmt, StmtKind,
};
use vermut_ast::visitor::{
    names_in_expr, walk_expr, walk_module, BindingOrigin, ScopeMark,
    ScopeStack,
};
use vermut_ast::{VisitResult, Visitor};
use vermut_core::{MutationCandidate, OperatorKind, SourceSpan, TargetLocation};

use crate::ops::{
    is_value_source, literal_replacements, negation_for, reads_no_bindings, replacements,
    InitChange,
};

/// Options for [`scan_module`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Emit only these operator kinds; `None` emits all of them.
    pub only: Option<BTreeSet<OperatorKind>>,
    /// Replacement proposed by LVR for an empty string literal.
    pub string_sentinel: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            only: None,
            string_sentinel: "mutant".to_string(),
        }
    }
}

impl ScanOptions {
    /// Options emitting only `kinds`.
    pub fn restricted_to(kinds: impl IntoIterator<Item = OperatorKind>) -> Self {
        ScanOptions {
            only: Some(kinds.into_iter().collect()),
            ..ScanOptions::default()
        }
    }

    pub fn allows(&self, kind: OperatorKind) -> bool {
        self.only.as_ref().map_or(true, |only| only.contains(&kind))
    }
}

/// Propose every applicable mutation in `module`.
pub fn scan_module(module: &Module, options: &ScanOptions) -> Vec<MutationCandidate> {
    let span = tracing::debug_span!("scan_module", module = %module.name);
    let _guard = span.enter();

    let mut scanner = Scanner::new(DeclIndex::build(module), options);
    walk_module(&mut scanner, module);
    debug!(candidates = scanner.candidates.len(), "scan complete");
    scanner.candidates
}

// ============================================================================
// Scanner
// ============================================================================

struct Scanner<'o> {
    options: &'o ScanOptions,
    index: DeclIndex,
    scopes: ScopeStack,
    marks: Vec<ScopeMark>,
    /// Class whose members are being walked.
    enclosing_class: Option<String>,
    /// Class or datatype whose members are being walked.
    enclosing_type: Option<String>,
    in_static: bool,
    /// `else` branches: statements that are not elements of any list.
    chained: HashSet<SourceSpan>,
    /// Loop indices waiting for their body block to open.
    loop_indices: Vec<(SourceSpan, LocalVar)>,
    /// Top expression of the expression statement being walked.
    bare_expr: Option<SourceSpan>,
    candidates: Vec<MutationCandidate>,
}

impl<'o> Scanner<'o> {
    fn new(index: DeclIndex, options: &'o ScanOptions) -> Self {
        Scanner {
            options,
            index,
            scopes: ScopeStack::new(),
            marks: Vec::new(),
            enclosing_class: None,
            enclosing_type: None,
            in_static: false,
            chained: HashSet::new(),
            loop_indices: Vec::new(),
            bare_expr: None,
            candidates: Vec::new(),
        }
    }

    fn emit(&mut self, location: TargetLocation, kind: OperatorKind, argument: impl Into<String>) {
        if self.options.allows(kind) {
            self.candidates
                .push(MutationCandidate::new(location, kind, argument));
        }
    }

    fn open_scope(&mut self) {
        self.marks.push(self.scopes.mark());
    }

    fn close_scope(&mut self) {
        if let Some(mark) = self.marks.pop() {
            self.scopes.restore(mark);
        }
    }

    // ------------------------------------------------------------------------
    // Lists
    // ------------------------------------------------------------------------

    /// SWV: pairs of single declarations of one type in the same block whose
    /// initializers stay in scope when exchanged.
    fn scan_declaration_pairs(&mut self, stmts: &[Stmt]) {
        let decls: Vec<(usize, &LocalVar, &Expr)> = stmts
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.ghost)
            .filter_map(|(i, s)| s.as_simple_decl().map(|(local, init)| (i, local, init)))
            .filter(|(_, local, _)| !local.ghost && local.ty.is_primitive())
            .collect();

        for (a, &(i, first, first_init)) in decls.iter().enumerate() {
            for &(j, second, second_init) in &decls[a + 1..] {
                if first.ty != second.ty {
                    continue;
                }
                // The later initializer moves up: nothing declared from the
                // first declaration on may appear in it.
                let moved_up = names_in_expr(second_init);
                let declared_between = stmts[i..j].iter().flat_map(|s| s.declared_names());
                if declared_between
                    .into_iter()
                    .any(|name| moved_up.contains(name))
                {
                    continue;
                }
                if names_in_expr(first_init).contains(&second.name) {
                    continue;
                }
                let other = stmts[j].span.as_span_location().to_string();
                self.emit(
                    stmts[i].span.as_span_location(),
                    OperatorKind::SwapVariableDeclarations,
                    other,
                );
            }
        }
    }

    /// MBS: pairs of methods with identical formals, both with bodies.
    fn scan_method_pairs(&mut self, members: &[Member]) {
        let methods: Vec<&MethodDecl> = members
            .iter()
            .filter_map(Member::as_method)
            .filter(|m| !m.ghost && m.body.is_some())
            .collect();
        for (a, first) in methods.iter().enumerate() {
            for second in &methods[a + 1..] {
                if first.same_formals_as(second) {
                    self.emit(
                        first.span.as_span_location(),
                        OperatorKind::MethodBodySwap,
                        second.name.clone(),
                    );
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    fn scan_statement(&mut self, stmt: &Stmt) {
        let location = stmt.span.as_span_location();
        if !stmt.is_var_decl() {
            self.emit(location, OperatorKind::StatementDeletion, "");
        }
        match &stmt.kind {
            StmtKind::VarDecl(decl) => {
                for local in decl.locals.iter().filter(|l| !l.ghost) {
                    self.emit(location, OperatorKind::VariableDeletion, local.name.clone());
                }
            }
            StmtKind::Return(ret) => {
                let defaults: Option<Vec<String>> = ret
                    .values
                    .iter()
                    .map(|v| v.ty.default_value().map(|d| d.to_string()))
                    .collect();
                let already = ret
                    .values
                    .iter()
                    .all(|v| v.as_literal().is_some() && v.as_literal() == v.ty.default_value().as_ref());
                match defaults {
                    Some(defaults) if !defaults.is_empty() && !already => {
                        self.emit(location, OperatorKind::MethodReturnReplacement, defaults.join(";"));
                    }
                    _ => {}
                }
            }
            StmtKind::If(if_stmt) => {
                self.emit(location, OperatorKind::IfBranchExtraction, "then");
                if if_stmt.else_branch.is_some() {
                    self.emit(location, OperatorKind::IfBranchExtraction, "else");
                    self.emit(location, OperatorKind::IfBranchDeletion, "");
                }
                for link in if_stmt.else_if_spans() {
                    self.emit(link.as_span_location(), OperatorKind::IfBranchDeletion, "");
                }
            }
            StmtKind::While(_) | StmtKind::For(_) => {
                self.emit(location, OperatorKind::LoopBreakInsertion, "");
            }
            StmtKind::Match(match_stmt) => self.scan_match(location, match_stmt),
            _ => {}
        }
    }

    fn scan_match(&mut self, location: TargetLocation, match_stmt: &MatchStmt) {
        if let Some(default) = match_stmt.default_case() {
            if reads_no_bindings(&match_stmt.cases[default]) {
                for (i, case) in match_stmt.cases.iter().enumerate() {
                    let Some(ctor) = case.pattern.ctor_name() else {
                        continue;
                    };
                    // The operator acts on the first case naming the constructor.
                    if match_stmt.case_for_ctor(ctor) == Some(i) && reads_no_bindings(case) {
                        self.emit(location, OperatorKind::CaseBlockReplacement, ctor);
                    }
                }
            }
        }
        for (i, case) in match_stmt.cases.iter().enumerate() {
            if reads_no_bindings(case) {
                self.emit(location, OperatorKind::CaseBlockExtraction, i.to_string());
            }
        }
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    /// EVR: a value read of a type with a default value.
    fn scan_default(&mut self, expr: &Expr) {
        if !is_value_source(expr) || Some(expr.span) == self.bare_expr {
            return;
        }
        if let Some(default) = expr.ty.default_value() {
            self.emit(
                expr.span.as_span_location(),
                OperatorKind::ExpressionValueReplacement,
                default.to_string(),
            );
        }
    }

    fn scan_name(&mut self, expr: &Expr, name: &str) {
        let at = expr.span.as_anchor_location();
        if let Some(op) = negation_for(&expr.ty) {
            self.emit(at, OperatorKind::UnaryOperatorInsertion, op.name());
        }

        let others: Vec<String> = self
            .scopes
            .visible()
            .into_iter()
            .filter(|b| b.name != name && b.ty == expr.ty && b.ty.is_primitive())
            .map(|b| b.name.clone())
            .collect();
        for other in others {
            self.emit(at, OperatorKind::VariableExpressionReplacement, other);
        }

        let shadows_field = !self.in_static
            && self.scopes.lookup(name).is_some()
            && self
                .enclosing_class
                .as_deref()
                .and_then(|class| self.index.field_type(class, name))
                == Some(&expr.ty);
        if shadows_field {
            self.emit(at, OperatorKind::ThisInsertion, name);
        }
    }

    fn scan_call(&mut self, expr: &Expr) {
        let ExprKind::Call(call) = &expr.kind else {
            return;
        };
        let location = expr.span.as_span_location();
        let bare = Some(expr.span) == self.bare_expr;

        if !bare {
            for (i, arg) in call.args.iter().enumerate() {
                if arg.ty.compatible_with(&expr.ty) {
                    self.emit(location, OperatorKind::MethodArgumentPropagation, i.to_string());
                }
            }
            if call
                .receiver
                .as_deref()
                .is_some_and(|r| r.ty.compatible_with(&expr.ty))
            {
                self.emit(location, OperatorKind::MethodNakedReceiver, "");
            }
        }

        let owner = match call.receiver.as_deref() {
            Some(receiver) if !receiver.is_this() => receiver.ty.class_name().map(str::to_string),
            _ => self.enclosing_type.clone(),
        };
        if let Some(owner) = owner {
            let callees: Vec<String> = self
                .index
                .compatible_callables(&owner, &call.method)
                .into_iter()
                .map(str::to_string)
                .collect();
            for callee in callees {
                self.emit(location, OperatorKind::MethodCallReplacement, callee);
            }
        }

        for (i, a) in call.args.iter().enumerate() {
            for (j, b) in call.args.iter().enumerate().skip(i + 1) {
                if a.ty == b.ty {
                    self.emit(location, OperatorKind::SwapArguments, format!("{i};{j}"));
                }
            }
        }
    }

    fn scan_expr(&mut self, expr: &Expr) {
        let at = expr.span.as_anchor_location();
        let whole = expr.span.as_span_location();
        match &expr.kind {
            ExprKind::Literal(literal) => {
                for value in literal_replacements(literal, &expr.ty, &self.options.string_sentinel)
                {
                    self.emit(at, OperatorKind::LiteralValueReplacement, value.to_string());
                }
            }
            ExprKind::Name(name) => self.scan_name(expr, name),
            ExprKind::Binary { op, lhs, rhs } => {
                for replacement in replacements(*op, &lhs.ty) {
                    self.emit(at, OperatorKind::BinaryOperatorReplacement, replacement.name());
                }
                if expr.ty.is_bool() {
                    self.emit(at, OperatorKind::BinaryBooleanReplacement, "true");
                    self.emit(at, OperatorKind::BinaryBooleanReplacement, "false");
                }
                for (side, operand) in [("left", lhs), ("right", rhs)] {
                    if operand.ty.compatible_with(&expr.ty) {
                        self.emit(at, OperatorKind::OperatorDeletion, side);
                    }
                }
            }
            ExprKind::Unary { operand, .. } => {
                if operand.ty.compatible_with(&expr.ty) {
                    self.emit(at, OperatorKind::UnaryOperatorDeletion, "");
                }
            }
            ExprKind::Member { receiver, field } => {
                if receiver.is_this()
                    && self
                        .scopes
                        .lookup(field)
                        .is_some_and(|binding| binding.ty == expr.ty)
                {
                    self.emit(at, OperatorKind::ThisDeletion, field.clone());
                }
                if let Some(class) = receiver.ty.class_name() {
                    let siblings: Vec<String> = self
                        .index
                        .sibling_fields(class, field)
                        .into_iter()
                        .map(str::to_string)
                        .collect();
                    for sibling in siblings {
                        self.emit(at, OperatorKind::FieldAccessReplacement, sibling);
                    }
                }
            }
            ExprKind::TupleIndex { tuple, index } => {
                if let vermut_ast::Type::Tuple(components) = &tuple.ty {
                    let current = components.get(*index);
                    for (j, component) in components.iter().enumerate() {
                        if j != *index && Some(component) == current {
                            self.emit(at, OperatorKind::TupleAccessReplacement, j.to_string());
                        }
                    }
                }
            }
            ExprKind::Call(_) => self.scan_call(expr),
            ExprKind::Display { elements, .. } => {
                let change = if !elements.is_empty() {
                    Some(InitChange::Empty)
                } else if expr
                    .ty
                    .element_type()
                    .and_then(|t| t.sample_values())
                    .is_some()
                {
                    Some(InitChange::Samples)
                } else {
                    None
                };
                if let Some(change) = change {
                    self.emit(whole, OperatorKind::CollectionInitReplacement, change.name());
                }
            }
            ExprKind::ArrayAlloc {
                elem_ty,
                dims,
                init,
            } => {
                let change = match init {
                    Some(_) if dims.len() <= 1 => Some(InitChange::Dims),
                    None if dims.len() == 1 && elem_ty.sample_values().is_some() => {
                        Some(InitChange::Init)
                    }
                    _ => None,
                };
                if let Some(change) = change {
                    self.emit(whole, OperatorKind::CollectionInitReplacement, change.name());
                }
            }
            ExprKind::Ctor { datatype, ctor, .. } => {
                let siblings: Vec<String> = self
                    .index
                    .sibling_ctors(datatype, ctor)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                for sibling in siblings {
                    self.emit(at, OperatorKind::DatatypeCtorReplacement, sibling);
                }
            }
            ExprKind::This
            | ExprKind::Chain(_)
            | ExprKind::Index { .. }
            | ExprKind::MapDisplay { .. }
            | ExprKind::Ite { .. }
            | ExprKind::Old(_) => {}
        }
        self.scan_default(expr);
    }
}

impl Visitor for Scanner<'_> {
    fn visit_class(&mut self, node: &ClassDecl) -> VisitResult {
        self.enclosing_class = Some(node.name.clone());
        self.enclosing_type = Some(node.name.clone());
        VisitResult::Continue
    }

    fn leave_class(&mut self, _node: &ClassDecl) {
        self.enclosing_class = None;
        self.enclosing_type = None;
    }

    fn visit_datatype(&mut self, node: &DatatypeDecl) -> VisitResult {
        self.enclosing_type = Some(node.name.clone());
        VisitResult::Continue
    }

    fn leave_datatype(&mut self, _node: &DatatypeDecl) {
        self.enclosing_type = None;
    }

    fn visit_member_list(&mut self, members: &[Member]) -> VisitResult {
        self.scan_method_pairs(members);
        VisitResult::Continue
    }

    fn visit_method(&mut self, node: &MethodDecl) -> VisitResult {
        self.open_scope();
        self.in_static = node.is_static;
        for param in node.params.iter().filter(|p| !p.ghost) {
            self.scopes
                .declare(param.name.clone(), param.ty.clone(), BindingOrigin::Param);
        }
        for out in node.outs.iter().filter(|p| !p.ghost) {
            self.scopes
                .declare(out.name.clone(), out.ty.clone(), BindingOrigin::Out);
        }
        VisitResult::Continue
    }

    fn leave_method(&mut self, _node: &MethodDecl) {
        self.close_scope();
        self.in_static = false;
    }

    fn visit_function(&mut self, node: &FunctionDecl) -> VisitResult {
        self.open_scope();
        self.in_static = node.is_static;
        for param in node.params.iter().filter(|p| !p.ghost) {
            self.scopes
                .declare(param.name.clone(), param.ty.clone(), BindingOrigin::Param);
        }
        VisitResult::Continue
    }

    fn leave_function(&mut self, _node: &FunctionDecl) {
        self.close_scope();
        self.in_static = false;
    }

    fn visit_block(&mut self, node: &Block) -> VisitResult {
        self.open_scope();
        if self
            .loop_indices
            .last()
            .is_some_and(|(body, _)| *body == node.span)
        {
            if let Some((_, index)) = self.loop_indices.pop() {
                if !index.ghost {
                    self.scopes
                        .declare(index.name, index.ty, BindingOrigin::LoopIndex);
                }
            }
        }
        VisitResult::Continue
    }

    fn leave_block(&mut self, _node: &Block) {
        self.close_scope();
    }

    fn visit_match_case(&mut self, node: &MatchCase) -> VisitResult {
        self.open_scope();
        for (name, ty) in node.pattern.bindings() {
            self.scopes
                .declare(name, ty.clone(), BindingOrigin::PatternVar);
        }
        VisitResult::Continue
    }

    fn leave_match_case(&mut self, _node: &MatchCase) {
        self.close_scope();
    }

    fn visit_stmt_list(&mut self, stmts: &[Stmt]) -> VisitResult {
        self.scan_declaration_pairs(stmts);
        VisitResult::Continue
    }

    fn visit_stmt(&mut self, node: &Stmt) -> VisitResult {
        match &node.kind {
            StmtKind::If(if_stmt) => {
                if let Some(branch) = &if_stmt.else_branch {
                    self.chained.insert(branch.span);
                }
            }
            StmtKind::For(for_stmt) => {
                self.loop_indices
                    .push((for_stmt.body.span, for_stmt.index.clone()));
            }
            StmtKind::Expr(expr) => self.bare_expr = Some(expr.span),
            _ => {}
        }
        if !self.chained.contains(&node.span) {
            self.scan_statement(node);
        }
        VisitResult::Continue
    }

    fn leave_stmt(&mut self, node: &Stmt) {
        match &node.kind {
            StmtKind::VarDecl(decl) => {
                for local in decl.locals.iter().filter(|l| !l.ghost) {
                    self.scopes
                        .declare(local.name.clone(), local.ty.clone(), BindingOrigin::Local);
                }
            }
            StmtKind::Expr(_) => self.bare_expr = None,
            _ => {}
        }
    }

    // Assignment targets are not mutated, except for an index subscript.
    fn visit_lhs(&mut self, node: &Expr) -> VisitResult {
        if let ExprKind::Index { index, .. } = &node.kind {
            walk_expr(self, index);
        }
        VisitResult::SkipChildren
    }

    fn visit_expr(&mut self, node: &Expr) -> VisitResult {
        self.scan_expr(node);
        VisitResult::Continue
    }
}
