//! IR validation over raw JSON.
//!
//! Validation never fails: malformed input is reported as issues and the
//! remaining checks run over whatever could be read. `ok` is true iff no
//! error-level issue was found.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::schema::{IR_VERSION, MIN_READABLE_VERSION};
use crate::hir::invariant_codes as inv;
use crate::hir::{InvariantIssue, Severity, check_edge_endpoints, check_unique_ids};

/// An IR validation issue.
pub type IrIssue = InvariantIssue;

/// Structural (`RTGL-IR-VAL-*`) codes.
pub mod codes {
    pub const ROOT_NOT_OBJECT: &str = "RTGL-IR-VAL-001";
    pub const VERSION_INVALID: &str = "RTGL-IR-VAL-002";
    pub const COMPONENTS_NOT_ARRAY: &str = "RTGL-IR-VAL-003";
    pub const DEPENDENCIES_NOT_ARRAY: &str = "RTGL-IR-VAL-004";
    pub const SYMBOLS_NOT_ARRAY: &str = "RTGL-IR-VAL-005";
    pub const SCOPES_NOT_ARRAY: &str = "RTGL-IR-VAL-006";
    pub const EDGES_NOT_ARRAY: &str = "RTGL-IR-VAL-007";
    pub const REFS_NOT_ARRAY: &str = "RTGL-IR-VAL-008";
    pub const TYPED_CONTRACT_NOT_ARRAY: &str = "RTGL-IR-VAL-009";
    pub const DIAGNOSTICS_NOT_ARRAY: &str = "RTGL-IR-VAL-010";
    pub const ROW_NOT_OBJECT: &str = "RTGL-IR-VAL-011";
    /// Warning only.
    pub const VERSION_NEWER: &str = "RTGL-IR-VAL-012";
}

/// Result of [`validate_compiler_ir`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrValidation {
    pub ok: bool,
    pub errors: Vec<IrIssue>,
    pub warnings: Vec<IrIssue>,
}

impl IrValidation {
    fn from_issues(issues: Vec<IrIssue>) -> Self {
        let (warnings, errors): (Vec<_>, Vec<_>) =
            issues.into_iter().partition(IrIssue::is_warning);
        Self {
            ok: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// A snapshot that could not even be turned into JSON.
    pub(crate) fn unreadable(message: String) -> Self {
        Self::from_issues(vec![IrIssue::error(codes::ROOT_NOT_OBJECT, "$", message)])
    }

    pub fn issue_codes(&self) -> Vec<&str> {
        self.errors
            .iter()
            .chain(&self.warnings)
            .map(|issue| issue.code.as_str())
            .collect()
    }
}

/// Validate against [`MIN_READABLE_VERSION`].
pub fn validate_compiler_ir(value: &Value) -> IrValidation {
    validate_compiler_ir_with(value, MIN_READABLE_VERSION)
}

/// Validate, accepting any version from `min_version` upward.
pub fn validate_compiler_ir_with(value: &Value, min_version: u32) -> IrValidation {
    let mut issues = Vec::new();

    let Some(root) = value.as_object() else {
        issues.push(IrIssue::error(
            codes::ROOT_NOT_OBJECT,
            "$",
            "IR root must be an object",
        ));
        return IrValidation::from_issues(issues);
    };

    check_version(root.get("version"), min_version, &mut issues);

    let components = rows(root, "structural", "components", codes::COMPONENTS_NOT_ARRAY, &mut issues);
    let dependencies = rows(root, "structural", "dependencies", codes::DEPENDENCIES_NOT_ARRAY, &mut issues);
    let symbols = rows(root, "semantic", "symbols", codes::SYMBOLS_NOT_ARRAY, &mut issues);
    let scopes = rows(root, "semantic", "scopes", codes::SCOPES_NOT_ARRAY, &mut issues);
    let edges = rows(root, "semantic", "edges", codes::EDGES_NOT_ARRAY, &mut issues);
    let refs = rows(root, "semantic", "refs", codes::REFS_NOT_ARRAY, &mut issues);
    let contracts = rows(root, "typedContract", "components", codes::TYPED_CONTRACT_NOT_ARRAY, &mut issues);
    let diagnostics = rows(root, "diagnostics", "items", codes::DIAGNOSTICS_NOT_ARRAY, &mut issues);

    // Identity.
    let known_components = check_unique_ids(
        field_of(&components, "componentKey"),
        "structural.components",
        "componentKey",
        inv::COMPONENT_KEY_MISSING,
        inv::COMPONENT_KEY_DUPLICATE,
        &mut issues,
    );
    let symbol_ids = check_unique_ids(
        field_of(&symbols, "id"),
        "semantic.symbols",
        "id",
        inv::SYMBOL_ID_MISSING,
        inv::SYMBOL_ID_DUPLICATE,
        &mut issues,
    );
    let ref_ids = check_unique_ids(
        field_of(&refs, "id"),
        "semantic.refs",
        "id",
        inv::REF_ID_MISSING,
        inv::REF_ID_DUPLICATE,
        &mut issues,
    );

    // Edges.
    let known_ids: FxHashSet<&str> = symbol_ids.union(&ref_ids).copied().collect();
    check_edge_endpoints(
        edges
            .iter()
            .map(|(i, row)| (*i, str_field(row, "from"), str_field(row, "to"))),
        &known_ids,
        "semantic.edges",
        &mut issues,
    );

    // Component references.
    for (idx, row) in &contracts {
        let key = str_field(row, "componentKey").unwrap_or_default();
        if !known_components.contains(key) {
            issues.push(IrIssue::error(
                inv::TYPED_CONTRACT_UNKNOWN_COMPONENT,
                format!("typedContract.components[{idx}].componentKey"),
                format!("typed contract for unknown component '{key}'"),
            ));
        }
    }

    let referencing = [
        ("semantic.symbols", &symbols, "componentKey"),
        ("semantic.scopes", &scopes, "componentKey"),
        ("semantic.refs", &refs, "componentKey"),
        ("structural.dependencies", &dependencies, "from"),
        ("structural.dependencies", &dependencies, "to"),
        ("diagnostics.items", &diagnostics, "componentKey"),
    ];
    for (section, section_rows, field) in referencing {
        for (idx, key) in field_of(section_rows, field) {
            let Some(key) = key.filter(|k| !k.is_empty()) else {
                continue;
            };
            if !known_components.contains(key) {
                issues.push(IrIssue::error(
                    inv::UNKNOWN_COMPONENT_REFERENCE,
                    format!("{section}[{idx}].{field}"),
                    format!("reference to unknown component '{key}'"),
                ));
            }
        }
    }

    // Diagnostics.
    for (idx, row) in &diagnostics {
        let severity = row.get("severity").and_then(Value::as_str);
        if severity.and_then(Severity::from_label).is_none() {
            issues.push(IrIssue::error(
                inv::DIAGNOSTIC_SEVERITY_INVALID,
                format!("diagnostics.items[{idx}].severity"),
                format!(
                    "severity must be one of error, warn, info (got {})",
                    row.get("severity").unwrap_or(&Value::Null)
                ),
            ));
        }
    }

    let validation = IrValidation::from_issues(issues);
    tracing::debug!(
        ok = validation.ok,
        errors = validation.errors.len(),
        warnings = validation.warnings.len(),
        "validated compiler IR"
    );
    validation
}

fn check_version(version: Option<&Value>, min_version: u32, issues: &mut Vec<IrIssue>) {
    match version.and_then(Value::as_u64) {
        Some(v) if v < u64::from(min_version) => issues.push(IrIssue::error(
            codes::VERSION_INVALID,
            "version",
            format!("IR version {v} is older than the minimum readable version {min_version}"),
        )),
        Some(v) if v > u64::from(IR_VERSION) => issues.push(IrIssue::warning(
            codes::VERSION_NEWER,
            "version",
            format!("IR version {v} is newer than {IR_VERSION}; unknown fields are ignored"),
        )),
        Some(_) => {}
        None => issues.push(IrIssue::error(
            codes::VERSION_INVALID,
            "version",
            "IR version must be a non-negative integer",
        )),
    }
}

/// Object rows of `root.section.field`, with their original indexes.
/// A missing or non-array collection reports `code`; non-object rows
/// report `ROW_NOT_OBJECT` and are skipped.
fn rows<'v>(
    root: &'v Map<String, Value>,
    section: &str,
    field: &str,
    code: &str,
    issues: &mut Vec<IrIssue>,
) -> Vec<(usize, &'v Map<String, Value>)> {
    let path = format!("{section}.{field}");
    let Some(items) = root
        .get(section)
        .and_then(|s| s.get(field))
        .and_then(Value::as_array)
    else {
        issues.push(IrIssue::error(code, &path, format!("{path} must be an array")));
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| match item.as_object() {
            Some(row) => Some((idx, row)),
            None => {
                issues.push(IrIssue::error(
                    codes::ROW_NOT_OBJECT,
                    format!("{path}[{idx}]"),
                    format!("{path} entries must be objects"),
                ));
                None
            }
        })
        .collect()
}

fn str_field<'v>(row: &'v Map<String, Value>, field: &str) -> Option<&'v str> {
    row.get(field).and_then(Value::as_str)
}

fn field_of<'v>(
    rows: &[(usize, &'v Map<String, Value>)],
    field: &str,
) -> Vec<(usize, Option<&'v str>)> {
    rows.iter()
        .map(|(idx, row)| (*idx, str_field(row, field)))
        .collect()
}
