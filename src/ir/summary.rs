//! Diagnostic summary embedded in IR metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hir::{Diagnostic, Severity};

/// Counts over the IR's diagnostic list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IrSummary {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub by_code: BTreeMap<String, usize>,
}

impl IrSummary {
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        let mut summary = IrSummary {
            total: diagnostics.len(),
            ..Default::default()
        };
        for diag in diagnostics {
            match diag.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warn => summary.warnings += 1,
                Severity::Info => {}
            }
            *summary.by_code.entry(diag.code.clone()).or_default() += 1;
        }
        summary
    }

    /// Apply caller-supplied fields on top of the recomputed summary.
    ///
    /// Fields that disagree with the recomputed value are logged; the
    /// caller's value still wins.
    pub fn with_override(self, over: &SummaryOverride) -> Self {
        fn pick<T: PartialEq + Clone + std::fmt::Debug>(field: &str, computed: T, supplied: Option<&T>) -> T {
            match supplied {
                Some(value) if *value != computed => {
                    tracing::warn!(field, ?computed, supplied = ?value, "summary override differs from diagnostics");
                    value.clone()
                }
                Some(value) => value.clone(),
                None => computed,
            }
        }

        IrSummary {
            total: pick("total", self.total, over.total.as_ref()),
            errors: pick("errors", self.errors, over.errors.as_ref()),
            warnings: pick("warnings", self.warnings, over.warnings.as_ref()),
            by_code: pick("byCode", self.by_code, over.by_code.as_ref()),
        }
    }

    /// One-line human summary, e.g. `3 diagnostics (2 errors, 1 warning)`.
    pub fn headline(&self) -> String {
        let plural = |n: usize, word: &str| {
            if n == 1 {
                format!("{n} {word}")
            } else {
                format!("{n} {word}s")
            }
        };
        format!(
            "{} ({}, {})",
            plural(self.total, "diagnostic"),
            plural(self.errors, "error"),
            plural(self.warnings, "warning")
        )
    }
}

/// Summary fields a caller may pin instead of the recomputed values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SummaryOverride {
    pub total: Option<usize>,
    pub errors: Option<usize>,
    pub warnings: Option<usize>,
    pub by_code: Option<BTreeMap<String, usize>>,
}
