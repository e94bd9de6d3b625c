//! Diagnostics: semantic error reporting.
//!
//! Core passes emit [`Diagnostic`]s through a [`DiagnosticCollector`].
//! Rule packs hand over loosely-typed [`RawDiagnostic`]s instead; both meet
//! in [`RawDiagnostic::normalize`] before the IR embeds them.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::base::SourceSpan;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warn,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Info => "info",
        }
    }

    /// Parse one of the IR severity labels.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "error" => Some(Severity::Error),
            "warn" => Some(Severity::Warn),
            "info" => Some(Severity::Info),
            _ => None,
        }
    }

    /// Coerce a rule-pack severity: `warn`/`warning` become [`Severity::Warn`],
    /// everything else (including missing) becomes [`Severity::Error`].
    pub fn coerce(label: Option<&str>) -> Self {
        match label.map(str::to_ascii_lowercase).as_deref() {
            Some("warn") | Some("warning") => Severity::Warn,
            _ => Severity::Error,
        }
    }

    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warn => 2,
            Severity::Info => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A secondary location attached to a diagnostic.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RelatedLocation {
    pub file_path: Option<String>,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl RelatedLocation {
    pub fn new(file_path: Option<&str>, line: u32, column: u32, message: impl Into<String>) -> Self {
        Self {
            file_path: file_path.map(str::to_string),
            line,
            column,
            message: message.into(),
        }
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Diagnostic code (e.g., "RTGL-CHECK-SEM-001").
    pub code: String,
    pub severity: Severity,
    /// Rule family; `general` when the producer gave none.
    pub category: String,
    pub message: String,
    pub component_key: Option<String>,
    pub file_path: Option<String>,
    #[serde(flatten)]
    pub span: SourceSpan,
    pub related: Vec<RelatedLocation>,
    pub trace: Vec<String>,
}

impl Diagnostic {
    fn new(severity: Severity, code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            severity,
            category: DEFAULT_CATEGORY.to_string(),
            message: message.into(),
            component_key: None,
            file_path: None,
            span: SourceSpan::default(),
            related: Vec::new(),
            trace: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(code: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warn, code, message)
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_component(mut self, component_key: impl Into<String>) -> Self {
        self.component_key = Some(component_key.into());
        self
    }

    pub fn with_file(mut self, file_path: Option<&str>) -> Self {
        self.file_path = file_path.map(str::to_string);
        self
    }

    /// Set the span (range) for this diagnostic.
    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = span;
        self
    }

    /// Add related information.
    pub fn with_related(mut self, info: RelatedLocation) -> Self {
        self.related.push(info);
        self
    }

    pub fn with_trace(mut self, step: impl Into<String>) -> Self {
        self.trace.push(step.into());
        self
    }

    /// Total order used for every diagnostic list the analyzer emits.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        (
            &self.file_path,
            self.span.line,
            self.span.column,
            &self.code,
            &self.message,
            &self.component_key,
        )
            .cmp(&(
                &other.file_path,
                other.span.line,
                other.span.column,
                &other.code,
                &other.message,
                &other.component_key,
            ))
            .then_with(|| self.related.cmp(&other.related))
    }
}

/// Category given to diagnostics whose producer named none.
pub const DEFAULT_CATEGORY: &str = "general";

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Codes emitted by the semantic engine.
pub mod codes {
    /// A template root matches no local, export, prop, constant or ref.
    pub const UNRESOLVED_SYMBOL: &str = "RTGL-CHECK-SEM-001";
    /// One name declared with several kinds in the same component.
    pub const AMBIGUOUS_SYMBOL: &str = "RTGL-CHECK-SEM-002";
    /// A listener handler/action or schema method with no matching export.
    pub const UNRESOLVED_FRAMEWORK_SYMBOL: &str = "RTGL-CHECK-SEM-004";
    /// A component-looking tag that the registry doesn't know.
    pub const UNRESOLVED_COMPONENT_TAG: &str = "RTGL-CHECK-SEM-005";

    /// Category for everything above.
    pub const SEMANTIC_CATEGORY: &str = "semantic";
}

// ============================================================================
// RAW (RULE-PACK) DIAGNOSTICS
// ============================================================================

/// A diagnostic as handed over by a rule pack: every field optional,
/// severity free-form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawDiagnostic {
    pub code: Option<String>,
    pub severity: Option<String>,
    pub category: Option<String>,
    pub message: Option<String>,
    pub component_key: Option<String>,
    pub file_path: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub end_line: Option<u32>,
    pub end_column: Option<u32>,
    pub related: Vec<RelatedLocation>,
    pub trace: Vec<String>,
}

impl RawDiagnostic {
    /// Normalize into a [`Diagnostic`]: default category, coerced severity,
    /// sorted and de-duplicated related/trace lists.
    pub fn normalize(self) -> Diagnostic {
        let line = self.line.unwrap_or(0);
        let column = self.column.unwrap_or(0);
        let mut related = self.related;
        related.sort();
        related.dedup();
        let mut trace = self.trace;
        trace.sort();
        trace.dedup();

        Diagnostic {
            code: self.code.unwrap_or_else(|| "unknown".to_string()),
            severity: Severity::coerce(self.severity.as_deref()),
            category: self
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            message: self.message.unwrap_or_default(),
            component_key: self.component_key,
            file_path: self.file_path,
            span: SourceSpan::new(
                line,
                column,
                self.end_line.unwrap_or(line),
                self.end_column.unwrap_or(column),
            ),
            related,
            trace,
        }
    }
}

impl From<Diagnostic> for RawDiagnostic {
    fn from(diag: Diagnostic) -> Self {
        Self {
            code: Some(diag.code),
            severity: Some(diag.severity.as_str().to_string()),
            category: Some(diag.category),
            message: Some(diag.message),
            component_key: diag.component_key,
            file_path: diag.file_path,
            line: Some(diag.span.line),
            column: Some(diag.span.column),
            end_line: Some(diag.span.end_line),
            end_column: Some(diag.span.end_column),
            related: diag.related,
            trace: diag.trace,
        }
    }
}

/// Normalize and sort a batch of diagnostics, dropping exact duplicates.
pub fn normalize_diagnostics(raw: impl IntoIterator<Item = RawDiagnostic>) -> Vec<Diagnostic> {
    let mut items: Vec<Diagnostic> = raw.into_iter().map(RawDiagnostic::normalize).collect();
    items.sort_by(Diagnostic::sort_cmp);
    items.dedup();
    items
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during semantic analysis.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warn)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Get the collected diagnostics, sorted and deduplicated.
    pub fn finish(self) -> Vec<Diagnostic> {
        let mut diagnostics = self.diagnostics;
        diagnostics.sort_by(Diagnostic::sort_cmp);
        diagnostics.dedup();
        diagnostics
    }
}
