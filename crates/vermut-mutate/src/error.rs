// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Errors raised while building a mutation operator from a request.
//!
//! Only malformed requests are errors. A well-formed request that finds no
//! matching node, or whose target fails a precondition at apply time, is a
//! normal `NotFound` outcome.

use thiserror::Error;
use vermut_core::{OperatorKind, UnknownOperatorKind, VermutError};

/// Error constructing an operator from its kind and argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutateError {
    /// The operator needs an argument and none was given.
    #[error("operator {} requires an argument", kind.code())]
    MissingArgument { kind: OperatorKind },

    /// The argument does not parse for this operator.
    #[error("invalid argument '{argument}' for operator {}: {reason}", kind.code())]
    InvalidArgument {
        kind: OperatorKind,
        argument: String,
        reason: &'static str,
    },

    /// The operator code is not in the catalogue.
    #[error(transparent)]
    UnknownOperator(#[from] UnknownOperatorKind),
}

impl MutateError {
    pub(crate) fn invalid(kind: OperatorKind, argument: &str, reason: &'static str) -> Self {
        MutateError::InvalidArgument {
            kind,
            argument: argument.to_string(),
            reason,
        }
    }
}

impl From<MutateError> for VermutError {
    fn from(err: MutateError) -> Self {
        VermutError::invalid_args(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vermut_core::OutputErrorCode;

    #[test]
    fn test_messages_use_operator_codes() {
        let err = MutateError::MissingArgument {
            kind: OperatorKind::BinaryOperatorReplacement,
        };
        assert_eq!(err.to_string(), "operator BOR requires an argument");

        let err = MutateError::invalid(OperatorKind::SwapArguments, "1", "expected 'i;j'");
        assert_eq!(
            err.to_string(),
            "invalid argument '1' for operator SWA: expected 'i;j'"
        );
    }

    #[test]
    fn test_bridges_to_invalid_arguments() {
        let err: VermutError = MutateError::MissingArgument {
            kind: OperatorKind::VariableDeletion,
        }
        .into();
        assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
    }
}
