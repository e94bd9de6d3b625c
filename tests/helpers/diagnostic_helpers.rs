//! Diagnostic assertion helpers.

use rtgl_check::hir::Diagnostic;

/// Diagnostics carrying `code`.
pub fn with_code<'a>(diagnostics: &'a [Diagnostic], code: &str) -> Vec<&'a Diagnostic> {
    diagnostics.iter().filter(|d| d.code == code).collect()
}

/// Assert no diagnostic carries `code`.
pub fn assert_no_code(diagnostics: &[Diagnostic], code: &str) {
    let found = with_code(diagnostics, code);
    assert!(
        found.is_empty(),
        "Expected no {code}, got {}:\n{}",
        found.len(),
        found
            .iter()
            .map(|d| format!("  {}: {}", d.component_key.as_deref().unwrap_or("-"), d.message))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
