//! Cross-reference invariants over semantic rows.
//!
//! The same checks run in two places: standalone over a [`SemanticModel`]
//! and inside IR validation over raw JSON. Both feed the helpers below
//! with `(index, id)` tuples so the issue shapes stay identical.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::diagnostics::Severity;
use super::semantic::SemanticModel;

/// Invariant codes shared by the semantic engine and the IR validator.
pub mod codes {
    pub const COMPONENT_KEY_MISSING: &str = "RTGL-IR-INV-001";
    pub const COMPONENT_KEY_DUPLICATE: &str = "RTGL-IR-INV-002";
    pub const SYMBOL_ID_MISSING: &str = "RTGL-IR-INV-003";
    pub const SYMBOL_ID_DUPLICATE: &str = "RTGL-IR-INV-004";
    pub const EDGE_FROM_DANGLING: &str = "RTGL-IR-INV-005";
    pub const EDGE_TO_DANGLING: &str = "RTGL-IR-INV-006";
    pub const TYPED_CONTRACT_UNKNOWN_COMPONENT: &str = "RTGL-IR-INV-007";
    pub const UNKNOWN_COMPONENT_REFERENCE: &str = "RTGL-IR-INV-008";
    pub const DIAGNOSTIC_SEVERITY_INVALID: &str = "RTGL-IR-INV-009";
    pub const REF_ID_MISSING: &str = "RTGL-IR-INV-010";
    pub const REF_ID_DUPLICATE: &str = "RTGL-IR-INV-011";
    /// Warning only.
    pub const EDGE_ENDPOINT_EMPTY: &str = "RTGL-IR-INV-012";
}

/// A single structural or invariant problem, located by a JSON-style path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvariantIssue {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    /// e.g. `semantic.edges[3].to`
    pub path: String,
}

impl InvariantIssue {
    pub fn error(code: &str, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            severity: Severity::Error,
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn warning(code: &str, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warn,
            ..Self::error(code, path, message)
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warn
    }
}

impl fmt::Display for InvariantIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.code, self.path, self.message)
    }
}

/// Check that every row of `section` carries a non-empty id and that ids
/// are unique. Returns the set of ids seen.
pub(crate) fn check_unique_ids<'a>(
    rows: impl IntoIterator<Item = (usize, Option<&'a str>)>,
    section: &str,
    field: &str,
    missing_code: &str,
    duplicate_code: &str,
    issues: &mut Vec<InvariantIssue>,
) -> FxHashSet<&'a str> {
    let mut seen = FxHashSet::default();
    for (idx, id) in rows {
        let path = format!("{section}[{idx}].{field}");
        match id.filter(|id| !id.is_empty()) {
            None => issues.push(InvariantIssue::error(
                missing_code,
                path,
                format!("{section} row has no {field}"),
            )),
            Some(id) => {
                if !seen.insert(id) {
                    issues.push(InvariantIssue::error(
                        duplicate_code,
                        path,
                        format!("duplicate {field} '{id}'"),
                    ));
                }
            }
        }
    }
    seen
}

/// Check that non-empty edge endpoints name a known symbol or ref id.
/// Empty endpoints are reported as warnings.
pub(crate) fn check_edge_endpoints<'a>(
    edges: impl IntoIterator<Item = (usize, Option<&'a str>, Option<&'a str>)>,
    known: &FxHashSet<&str>,
    section: &str,
    issues: &mut Vec<InvariantIssue>,
) {
    for (idx, from, to) in edges {
        for (field, endpoint, code) in [
            ("from", from, codes::EDGE_FROM_DANGLING),
            ("to", to, codes::EDGE_TO_DANGLING),
        ] {
            let path = format!("{section}[{idx}].{field}");
            match endpoint.filter(|id| !id.is_empty()) {
                None => issues.push(InvariantIssue::warning(
                    codes::EDGE_ENDPOINT_EMPTY,
                    path,
                    format!("edge has an empty '{field}' endpoint"),
                )),
                Some(id) if !known.contains(id) => issues.push(InvariantIssue::error(
                    code,
                    path,
                    format!("edge '{field}' references unknown id '{id}'"),
                )),
                Some(_) => {}
            }
        }
    }
}

/// Re-derive id uniqueness and dangling-edge checks over a semantic model.
pub fn run_semantic_invariants(model: &SemanticModel) -> Vec<InvariantIssue> {
    let mut issues = Vec::new();

    let symbol_ids = check_unique_ids(
        model
            .symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (i, Some(s.id.as_str()))),
        "semantic.symbols",
        "id",
        codes::SYMBOL_ID_MISSING,
        codes::SYMBOL_ID_DUPLICATE,
        &mut issues,
    );
    let ref_ids = check_unique_ids(
        model
            .refs
            .iter()
            .enumerate()
            .map(|(i, r)| (i, Some(r.id.as_str()))),
        "semantic.refs",
        "id",
        codes::REF_ID_MISSING,
        codes::REF_ID_DUPLICATE,
        &mut issues,
    );

    let known: FxHashSet<&str> = symbol_ids.union(&ref_ids).copied().collect();
    check_edge_endpoints(
        model
            .edges
            .iter()
            .enumerate()
            .map(|(i, e)| (i, Some(e.from.as_str()), Some(e.to.as_str()))),
        &known,
        "semantic.edges",
        &mut issues,
    );

    issues
}
