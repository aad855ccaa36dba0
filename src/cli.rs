//! CLI front door.
//!
//! Provides the command helpers behind the `vermut` binary:
//! - `scan` - propose every candidate in a program tree
//! - `mutate` - apply one candidate and write the mutant tree
//!
//! ## Error Handling
//!
//! All functions return `Result<T, VermutError>`. The error's
//! [`OutputErrorCode`](vermut_core::OutputErrorCode) becomes the process exit
//! code.

use std::fs;
use std::path::Path;

use tracing::info;

use vermut_ast::Module;
use vermut_core::{CandidateSink, OperatorKind, TargetLocation, VermutError};
use vermut_mutate::{
    apply_mutation_with, scan_module, MutateOptions, MutationRequest, ScanOptions,
};

use crate::output::{MutateResponse, ScanResponse};

// ============================================================================
// Tree I/O
// ============================================================================

/// Read a program tree from a JSON file.
pub fn load_tree(path: &Path) -> Result<Module, VermutError> {
    let unavailable = |message: String| VermutError::TreeUnavailable {
        path: path.display().to_string(),
        message,
    };
    let text = fs::read_to_string(path).map_err(|e| unavailable(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| unavailable(e.to_string()))
}

/// Write a program tree as JSON.
pub fn write_tree(module: &Module, path: &Path) -> Result<(), VermutError> {
    let apply_error = |message: String| VermutError::ApplyError {
        message,
        file: Some(path.display().to_string()),
    };
    let json = serde_json::to_string_pretty(module).map_err(|e| apply_error(e.to_string()))?;
    fs::write(path, json).map_err(|e| apply_error(e.to_string()))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, VermutError> {
    serde_json::to_string_pretty(value).map_err(|e| VermutError::internal(e.to_string()))
}

// ============================================================================
// Commands
// ============================================================================

/// Scan the tree at `tree` for candidates.
///
/// With `out`, candidates are appended to that file one record per line and
/// the response only counts them. Without it, the response lists them.
/// `only` restricts the scan to the given operator codes.
///
/// # Returns
///
/// JSON string containing a [`ScanResponse`].
pub fn run_scan(tree: &Path, out: Option<&Path>, only: &[String]) -> Result<String, VermutError> {
    let module = load_tree(tree)?;

    let options = if only.is_empty() {
        ScanOptions::default()
    } else {
        let kinds = only
            .iter()
            .map(|code| code.parse::<OperatorKind>())
            .collect::<Result<Vec<_>, _>>()?;
        ScanOptions::restricted_to(kinds)
    };

    let candidates = scan_module(&module, &options);
    info!(module = module.name.as_str(), count = candidates.len(), "scan complete");

    let response = match out {
        Some(path) => {
            let mut sink = CandidateSink::open(path)?;
            sink.extend(&candidates)?;
            let count = sink.finish()?;
            ScanResponse::written(&module.name, count, path.display().to_string())
        }
        None => ScanResponse::inline(&module.name, &candidates),
    };
    to_json(&response)
}

/// Apply one mutation to the tree at `tree`.
///
/// `at` is a location as printed by `scan` (`"12"` or `"12-40"`) and `op` an
/// operator code. The mutant is written to `out` when given, otherwise it is
/// included in the response. A request that matches nothing is not an
/// error: the response reports `not_found` and no mutant.
///
/// # Returns
///
/// JSON string containing a [`MutateResponse`].
pub fn run_mutate(
    tree: &Path,
    at: &str,
    op: &str,
    arg: Option<&str>,
    out: Option<&Path>,
    options: &MutateOptions,
) -> Result<String, VermutError> {
    let location: TargetLocation = at.parse()?;
    let kind: OperatorKind = op.parse()?;
    let mut module = load_tree(tree)?;

    let request = MutationRequest::new(location, kind, arg);
    let report = apply_mutation_with(&mut module, &request, options)?;
    let applied = report.is_applied();

    let mut response = MutateResponse::new(report);
    if applied {
        match out {
            Some(path) => {
                write_tree(&module, path)?;
                response.out = Some(path.display().to_string());
            }
            None => response.mutant = Some(module),
        }
    }
    to_json(&response)
}
