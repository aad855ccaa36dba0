// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Mutation operator catalogue.
//!
//! Every operator implements [`Mutator`]. The [`Locator`](crate::locator::Locator)
//! drives a pruned walk of the program tree and offers each node on the path
//! to the target to the operator's hooks, parents before children:
//!
//! | Hook | Offered | Operators |
//! |------|---------|-----------|
//! | `mutate_member_list` | each member list | MBS |
//! | `mutate_stmt_list` | each statement list | SWV, VDL |
//! | `mutate_stmt` | each list element | SDL, LBI, MRR, IBE, IBD, CBR, CBE |
//! | `mutate_expr` | each expression | all expression operators |
//!
//! A hook answers [`Outcome::Pass`] when the node is not its target (the walk
//! continues), [`Outcome::Mutated`] once the edit is done, and
//! [`Outcome::Rejected`] when the node is the target but a precondition
//! fails. Rejection ends the walk with the tree untouched.

mod binary;
mod call;
mod case;
mod collection;
mod literal;
mod reference;
mod select;
mod statement;
mod swap;
mod unary;
mod variable;

pub use binary::replacements;
pub use literal::literal_replacements;
pub use variable::DEFAULT_MAX_CASCADE_DEPTH;

pub(crate) use case::reads_no_bindings;
pub(crate) use collection::InitChange;
pub(crate) use literal::is_value_source;
pub(crate) use unary::negation_for;

use vermut_ast::nodes::{Expr, Member, Stmt};
use vermut_ast::Transform;
use vermut_core::{OperatorKind, SourceSpan, TargetLocation};

use crate::error::MutateError;
use crate::scanner::DeclIndex;

// ============================================================================
// Hook protocol
// ============================================================================

/// Answer of a [`Mutator`] hook.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T = ()> {
    /// Not the target; keep walking.
    Pass,
    /// The edit was made.
    Mutated(T),
    /// The target was found but the edit does not apply.
    Rejected(&'static str),
}

impl<T> Outcome<T> {
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }
}

/// Read-only state the locator hands to every hook.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationContext {
    /// Where the target is.
    pub target: TargetLocation,
    /// Class or datatype enclosing the node being offered.
    pub enclosing_type: Option<String>,
    /// Bound on chained deletions performed by VDL.
    pub max_cascade_depth: usize,
    /// Declarations of the module being mutated. Empty unless supplied with
    /// [`with_decls`](MutationContext::with_decls).
    pub decls: DeclIndex,
}

impl MutationContext {
    pub fn new(target: TargetLocation) -> Self {
        MutationContext {
            target,
            enclosing_type: None,
            max_cascade_depth: DEFAULT_MAX_CASCADE_DEPTH,
            decls: DeclIndex::default(),
        }
    }

    pub fn with_decls(mut self, decls: DeclIndex) -> Self {
        self.decls = decls;
        self
    }

    pub fn is_target(&self, span: &SourceSpan) -> bool {
        self.target.matches(span)
    }
}

/// A mutation operator, configured with its argument.
pub trait Mutator {
    fn kind(&self) -> OperatorKind;

    #[allow(unused_variables)]
    fn mutate_member_list(
        &mut self,
        members: &mut Vec<Member>,
        cx: &MutationContext,
    ) -> Outcome<SourceSpan> {
        Outcome::Pass
    }

    #[allow(unused_variables)]
    fn mutate_stmt_list(&mut self, stmts: &mut Vec<Stmt>, cx: &MutationContext) -> Outcome<SourceSpan> {
        Outcome::Pass
    }

    /// Offered each element of a statement list. The returned transform is
    /// applied to the element's slot.
    #[allow(unused_variables)]
    fn mutate_stmt(&mut self, stmt: &mut Stmt, cx: &MutationContext) -> Outcome<Transform<Stmt>> {
        Outcome::Pass
    }

    #[allow(unused_variables)]
    fn mutate_expr(&mut self, expr: &mut Expr, cx: &MutationContext) -> Outcome {
        Outcome::Pass
    }
}

// ============================================================================
// Construction
// ============================================================================

/// Build the operator for `kind`, parsing its argument.
///
/// UOD, MNR, SDL, LBI and IBD take no argument; any argument given to them
/// is ignored.
pub fn build_mutator(
    kind: OperatorKind,
    argument: Option<&str>,
) -> Result<Box<dyn Mutator>, MutateError> {
    use OperatorKind::*;

    let argument = argument.filter(|a| !a.trim().is_empty());
    let required = || argument.ok_or(MutateError::MissingArgument { kind });

    let mutator: Box<dyn Mutator> = match kind {
        BinaryOperatorReplacement => Box::new(binary::ReplaceOperator::parse(required()?)?),
        BinaryBooleanReplacement => Box::new(binary::CollapseToBool::parse(required()?)?),
        OperatorDeletion => Box::new(binary::DropOperand::parse(required()?)?),
        UnaryOperatorInsertion => Box::new(unary::InsertNegation::parse(required()?)?),
        UnaryOperatorDeletion => Box::new(unary::RemoveNegation),
        LiteralValueReplacement => Box::new(literal::ReplaceLiteral::new(required()?)),
        ExpressionValueReplacement => Box::new(literal::DefaultValue::new(required()?)),
        VariableExpressionReplacement => Box::new(reference::RenameVariable::new(required()?)),
        CollectionInitReplacement => Box::new(collection::ReplaceInit::parse(required()?)?),
        ThisInsertion => Box::new(reference::InsertThis::new(required()?)),
        ThisDeletion => Box::new(reference::RemoveThis::new(required()?)),
        FieldAccessReplacement => Box::new(select::ReplaceField::new(required()?)),
        TupleAccessReplacement => Box::new(select::ReplaceTupleIndex::parse(required()?)?),
        DatatypeCtorReplacement => Box::new(select::ReplaceCtor::new(required()?)),
        MethodArgumentPropagation => Box::new(call::PropagateArgument::parse(required()?)?),
        MethodNakedReceiver => Box::new(call::NakedReceiver),
        MethodCallReplacement => Box::new(call::ReplaceCallee::new(required()?)),
        SwapArguments => Box::new(call::SwapArguments::parse(required()?)?),
        MethodReturnReplacement => Box::new(statement::ReturnDefaults::new(required()?)),
        StatementDeletion => Box::new(statement::DeleteStatement),
        LoopBreakInsertion => Box::new(statement::InsertBreak),
        IfBranchExtraction => Box::new(statement::ExtractBranch::parse(required()?)?),
        IfBranchDeletion => Box::new(statement::DeleteBranch),
        CaseBlockReplacement => Box::new(case::ReplaceWithDefault::new(required()?)),
        CaseBlockExtraction => Box::new(case::ExtractCase::parse(required()?)?),
        SwapVariableDeclarations => Box::new(swap::SwapInitializers::parse(required()?)?),
        MethodBodySwap => Box::new(swap::SwapBodies::new(required()?)),
        VariableDeletion => Box::new(variable::DeleteVariable::new(required()?)),
    };
    Ok(mutator)
}
