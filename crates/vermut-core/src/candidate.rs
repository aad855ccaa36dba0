//! Mutation candidates and operator kinds.
//!
//! A [`MutationCandidate`] is a `(location, kind, argument)` triple proposed by
//! the scanner. The argument carries everything the rewrite needs (the new
//! operator name, the replacement literal, the destination variable) so that
//! applying a candidate never re-derives type information.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::span::{LocationParseError, TargetLocation};

/// Macro generating the closed operator-kind enum with its short codes.
macro_rules! operator_kinds {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $code:literal
        ),* $(,)?
    ) => {
        /// Identifies a mutation operator by its short code.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum OperatorKind {
            $(
                $(#[$meta])*
                #[serde(rename = $code)]
                $variant,
            )*
        }

        impl OperatorKind {
            /// All operator kinds, in catalogue order.
            pub const ALL: &'static [OperatorKind] = &[$(OperatorKind::$variant),*];

            /// The short code used on the command line and in scan output.
            pub fn code(&self) -> &'static str {
                match self {
                    $(OperatorKind::$variant => $code,)*
                }
            }
        }

        impl FromStr for OperatorKind {
            type Err = UnknownOperatorKind;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($code => Ok(OperatorKind::$variant),)*
                    _ => Err(UnknownOperatorKind { code: s.to_string() }),
                }
            }
        }
    };
}

operator_kinds! {
    /// Binary operator replacement.
    BinaryOperatorReplacement => "BOR",
    /// Binary expression collapsed to a boolean literal.
    BinaryBooleanReplacement => "BBR",
    /// Binary expression reduced to one operand.
    OperatorDeletion => "ODL",
    /// Negation inserted around a name.
    UnaryOperatorInsertion => "UOI",
    /// Negation removed.
    UnaryOperatorDeletion => "UOD",
    /// Literal value replacement.
    LiteralValueReplacement => "LVR",
    /// Expression replaced by its type's default value.
    ExpressionValueReplacement => "EVR",
    /// Name replaced by another same-typed variable.
    VariableExpressionReplacement => "VER",
    /// Collection/array initializer replacement.
    CollectionInitReplacement => "CIR",
    /// `this.` inserted before a shadowed field.
    ThisInsertion => "THI",
    /// `this.` removed from a field access.
    ThisDeletion => "THD",
    /// Field access replaced by a sibling field.
    FieldAccessReplacement => "FAR",
    /// Tuple component index replaced.
    TupleAccessReplacement => "TAR",
    /// Datatype constructor replaced.
    DatatypeCtorReplacement => "DCR",
    /// Call replaced by one of its arguments.
    MethodArgumentPropagation => "MAP",
    /// Call replaced by its receiver.
    MethodNakedReceiver => "MNR",
    /// Call redirected to a signature-compatible callee.
    MethodCallReplacement => "MCR",
    /// Two same-typed call arguments swapped.
    SwapArguments => "SWA",
    /// Returned values replaced by defaults.
    MethodReturnReplacement => "MRR",
    /// Statement deleted.
    StatementDeletion => "SDL",
    /// `break` inserted at the head of a loop body.
    LoopBreakInsertion => "LBI",
    /// `if` replaced by one of its branches.
    IfBranchExtraction => "IBE",
    /// One branch of an `if` chain removed.
    IfBranchDeletion => "IBD",
    /// Case bodies exchanged with the default case.
    CaseBlockReplacement => "CBR",
    /// `match` replaced by one case body.
    CaseBlockExtraction => "CBE",
    /// Initializers of two declarations swapped.
    SwapVariableDeclarations => "SWV",
    /// Bodies of two methods swapped.
    MethodBodySwap => "MBS",
    /// Variable and its dependent code deleted.
    VariableDeletion => "VDL",
}

impl OperatorKind {
    /// True for operators that rewrite two locations at once.
    pub fn is_pairwise(&self) -> bool {
        matches!(
            self,
            OperatorKind::SwapVariableDeclarations | OperatorKind::MethodBodySwap
        )
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error for an operator code outside the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operator kind '{code}'")]
pub struct UnknownOperatorKind {
    pub code: String,
}

// ============================================================================
// MutationCandidate
// ============================================================================

/// A legal mutation opportunity, not yet applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MutationCandidate {
    /// Where the target node lives.
    pub location: TargetLocation,
    /// Which operator applies.
    pub kind: OperatorKind,
    /// Operator-specific argument; empty when the operator takes none.
    pub argument: String,
}

impl MutationCandidate {
    /// Create a new candidate.
    pub fn new(location: TargetLocation, kind: OperatorKind, argument: impl Into<String>) -> Self {
        MutationCandidate {
            location,
            kind,
            argument: argument.into(),
        }
    }

    /// Argument as an option: `None` when empty.
    pub fn argument(&self) -> Option<&str> {
        if self.argument.is_empty() {
            None
        } else {
            Some(&self.argument)
        }
    }

    /// Render as one comma-separated record: `location,KIND,argument`.
    pub fn to_record(&self) -> String {
        format!("{},{},{}", self.location, self.kind, self.argument)
    }

    /// Parse a record produced by [`to_record`](Self::to_record).
    pub fn from_record(line: &str) -> Result<Self, CandidateParseError> {
        let mut fields = line.trim_end_matches(['\r', '\n']).splitn(3, ',');
        let location = fields.next().ok_or(CandidateParseError::MissingField {
            field: "location",
        })?;
        let kind = fields
            .next()
            .ok_or(CandidateParseError::MissingField { field: "kind" })?;
        let argument = fields.next().unwrap_or_default();

        Ok(MutationCandidate {
            location: location.parse()?,
            kind: kind.parse()?,
            argument: argument.to_string(),
        })
    }
}

impl fmt::Display for MutationCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_record())
    }
}

/// Error parsing a candidate record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CandidateParseError {
    /// A required field is missing.
    #[error("candidate record is missing the {field} field")]
    MissingField { field: &'static str },

    /// The location field is malformed.
    #[error(transparent)]
    Location(#[from] LocationParseError),

    /// The kind field is not a known operator code.
    #[error(transparent)]
    Kind(#[from] UnknownOperatorKind),
}
