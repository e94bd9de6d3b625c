//! Scope/reference resolution.
//!
//! Every `(reference, root)` pair of a component is bound to exactly one
//! outcome: local (bound by an enclosing template scope), global (declared
//! in the component's symbol slice) or unresolved.
//!
//! ```text
//! reference roots ──► local_symbols? ──yes──► Local
//!                          │ no
//!                          ▼
//!                   symbol slice (declared kinds only)
//!                          │ hit ──► Global  + ref-root edge
//!                          │ miss ─► Unresolved + SEM-001
//! ```

use serde::{Deserialize, Serialize};

use super::diagnostics::{Diagnostic, RelatedLocation, codes};
use super::suggest::rank_candidates;
use super::symbols::{ComponentUnit, Symbol, SymbolKind, SymbolTable};
use crate::base::{FileKind, SourceSpan};
use crate::model::TemplateReference;

/// Related candidates attached to an unresolved-symbol diagnostic.
pub const MAX_UNRESOLVED_CANDIDATES: usize = 3;
/// Related locations attached to an ambiguity diagnostic.
pub const MAX_AMBIGUITY_LOCATIONS: usize = 5;

/// Edge kind emitted for every global resolution.
pub const REF_ROOT_EDGE: &str = "ref-root";

// ============================================================================
// ROWS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionOutcome {
    Local,
    Global,
    Unresolved,
}

/// The binding of one root of one reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub ref_id: String,
    pub component_key: String,
    pub root: String,
    pub outcome: ResolutionOutcome,
    /// Set only for global resolutions.
    pub symbol_id: Option<String>,
}

/// A template reference as it appears in the semantic section of the IR.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceRow {
    /// `componentKey::ref::ordinal@line:column`
    pub id: String,
    pub component_key: String,
    pub scope_id: String,
    pub file_path: Option<String>,
    #[serde(flatten)]
    pub span: SourceSpan,
    pub expression: String,
    pub context: String,
    pub roots: Vec<String>,
    pub local_symbols: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    Component,
    Template,
}

/// A lexical scope: the component scope, or a template scope that binds
/// loop/conditional locals on top of it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeRow {
    pub id: String,
    pub component_key: String,
    pub kind: ScopeKind,
    pub parent: Option<String>,
    /// Names bound directly by this scope, sorted.
    pub symbols: Vec<String>,
}

/// A `ref → symbol` edge.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticEdge {
    pub from: String,
    pub to: String,
    pub kind: String,
    pub root: String,
}

/// Everything the resolver produced for one component.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComponentResolution {
    pub component_key: String,
    pub refs: Vec<ReferenceRow>,
    pub scopes: Vec<ScopeRow>,
    pub edges: Vec<SemanticEdge>,
    pub resolutions: Vec<Resolution>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ComponentResolution {
    pub fn unresolved(&self) -> impl Iterator<Item = &Resolution> {
        self.resolutions
            .iter()
            .filter(|r| r.outcome == ResolutionOutcome::Unresolved)
    }
}

// ============================================================================
// RESOLUTION
// ============================================================================

fn component_scope_id(component_key: &str) -> String {
    format!("{component_key}::scope::component")
}

fn sorted_references<'a>(unit: &'a ComponentUnit<'a>) -> Vec<&'a TemplateReference> {
    let mut refs: Vec<_> = unit.graph.references.iter().collect();
    refs.sort_by(|a, b| {
        (a.span, &a.expression, &a.context).cmp(&(b.span, &b.expression, &b.context))
    });
    refs
}

/// A global hit needs a declaration; an expression-root row alone only
/// records that the template used the name.
fn declared<'t>(table: &'t SymbolTable, component_key: &str, root: &str) -> Option<&'t Symbol> {
    table
        .lookup(component_key, root)
        .filter(|sym| sym.kinds.iter().any(SymbolKind::is_declaration))
}

/// Resolve every reference of one component against the finished table.
pub fn resolve_component(unit: &ComponentUnit<'_>, table: &SymbolTable) -> ComponentResolution {
    let key = unit.key();
    let view_file = unit.model.file_path(FileKind::View);
    let component_scope = component_scope_id(key);

    let slice = table.component_symbols(key);
    let declarations: Vec<&Symbol> = slice
        .iter()
        .filter(|sym| sym.kinds.iter().any(SymbolKind::is_declaration))
        .collect();

    let mut out = ComponentResolution {
        component_key: key.to_string(),
        ..Default::default()
    };
    out.scopes.push(ScopeRow {
        id: component_scope.clone(),
        component_key: key.to_string(),
        kind: ScopeKind::Component,
        parent: None,
        symbols: declarations.iter().map(|s| s.name.to_string()).collect(),
    });

    for (ordinal, reference) in sorted_references(unit).into_iter().enumerate() {
        let ref_id = format!(
            "{key}::ref::{ordinal}@{}:{}",
            reference.span.line, reference.span.column
        );

        let scope_id = if reference.local_symbols.is_empty() {
            component_scope.clone()
        } else {
            let id = format!("{key}::scope::template::{ordinal}");
            out.scopes.push(ScopeRow {
                id: id.clone(),
                component_key: key.to_string(),
                kind: ScopeKind::Template,
                parent: Some(component_scope.clone()),
                symbols: reference.local_symbols.iter().cloned().collect(),
            });
            id
        };

        for root in &reference.roots {
            let (outcome, symbol_id) = if reference.local_symbols.contains(root) {
                (ResolutionOutcome::Local, None)
            } else if let Some(symbol) = declared(table, key, root) {
                out.edges.push(SemanticEdge {
                    from: ref_id.clone(),
                    to: symbol.id.clone(),
                    kind: REF_ROOT_EDGE.to_string(),
                    root: root.clone(),
                });
                (ResolutionOutcome::Global, Some(symbol.id.clone()))
            } else {
                out.diagnostics
                    .push(unresolved_symbol(key, view_file, reference, root, &declarations));
                (ResolutionOutcome::Unresolved, None)
            };

            tracing::trace!(
                component_key = key,
                ref_id = %ref_id,
                root = %root,
                outcome = ?outcome,
                "resolved root"
            );
            out.resolutions.push(Resolution {
                ref_id: ref_id.clone(),
                component_key: key.to_string(),
                root: root.clone(),
                outcome,
                symbol_id,
            });
        }

        out.refs.push(ReferenceRow {
            id: ref_id,
            component_key: key.to_string(),
            scope_id,
            file_path: view_file.map(str::to_string),
            span: reference.span,
            expression: reference.expression.clone(),
            context: reference.context.clone(),
            roots: reference.roots.iter().cloned().collect(),
            local_symbols: reference.local_symbols.iter().cloned().collect(),
        });
    }

    for symbol in slice {
        if let Some(diag) = ambiguity(unit, symbol) {
            out.diagnostics.push(diag);
        }
    }

    out.diagnostics.sort_by(Diagnostic::sort_cmp);
    out
}

/// Resolve all components in key order. The symbol table must be complete.
pub fn resolve_references(
    units: &[ComponentUnit<'_>],
    table: &SymbolTable,
) -> Vec<ComponentResolution> {
    let mut sorted: Vec<&ComponentUnit<'_>> = units.iter().collect();
    sorted.sort_by(|a, b| a.key().cmp(b.key()));
    sorted
        .into_iter()
        .map(|unit| resolve_component(unit, table))
        .collect()
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

fn unresolved_symbol(
    component_key: &str,
    view_file: Option<&str>,
    reference: &TemplateReference,
    root: &str,
    declarations: &[&Symbol],
) -> Diagnostic {
    let by_name = |name: &str| declarations.iter().find(|s| s.name == name);
    let candidates = rank_candidates(
        root,
        declarations.iter().map(|s| s.name.as_str()),
        MAX_UNRESOLVED_CANDIDATES,
    );

    let mut diag = Diagnostic::error(
        codes::UNRESOLVED_SYMBOL,
        format!(
            "Unresolved symbol '{root}' in expression '{}'",
            reference.expression
        ),
    )
    .with_category(codes::SEMANTIC_CATEGORY)
    .with_component(component_key)
    .with_file(view_file)
    .with_span(reference.span)
    .with_trace("template-scope")
    .with_trace("component-scope");

    for name in candidates {
        if let Some(symbol) = by_name(name) {
            diag = diag.with_related(RelatedLocation::new(
                symbol.file_path.as_deref(),
                0,
                0,
                format!("Did you mean '{name}' ({})?", symbol.kind),
            ));
        }
    }
    diag
}

/// One name declared with more than one kind in the same component.
///
/// `expression-root` never counts towards the ambiguity; when the row has
/// it, the message lists it last after the declaration kinds.
fn ambiguity(unit: &ComponentUnit<'_>, symbol: &Symbol) -> Option<Diagnostic> {
    let kinds: Vec<SymbolKind> = symbol
        .kinds_by_preference()
        .into_iter()
        .filter(SymbolKind::is_declaration)
        .collect();
    let (&preferred, _) = kinds.split_first().filter(|_| kinds.len() > 1)?;

    let mut labels: Vec<_> = kinds.iter().map(SymbolKind::as_str).collect();
    if symbol.kinds.contains(&SymbolKind::ExpressionRoot) {
        labels.push(SymbolKind::ExpressionRoot.as_str());
    }
    let mut diag = Diagnostic::warning(
        codes::AMBIGUOUS_SYMBOL,
        format!(
            "Symbol '{}' is declared as {}; '{}' takes precedence",
            symbol.name,
            labels.join(", "),
            preferred
        ),
    )
    .with_category(codes::SEMANTIC_CATEGORY)
    .with_component(unit.key())
    .with_file(preferred.declaring_file(unit.model));

    for kind in kinds.iter().take(MAX_AMBIGUITY_LOCATIONS) {
        diag = diag.with_related(RelatedLocation::new(
            kind.declaring_file(unit.model),
            0,
            0,
            format!("'{}' declared as {kind}", symbol.name),
        ));
    }
    Some(diag)
}
