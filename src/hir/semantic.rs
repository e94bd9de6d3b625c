//! Whole-workspace semantic model.
//!
//! Phases run strictly in order; resolution never starts before the symbol
//! table is complete:
//!
//! ```text
//! prepare_units → build_symbol_table → resolve (per component)
//!               → listener/tag passes → assemble → invariants
//! ```

use super::checks::{check_component_tags, check_listeners};
use super::diagnostics::{Diagnostic, DiagnosticCollector};
use super::invariants::{InvariantIssue, run_semantic_invariants};
use super::resolve::{ComponentResolution, ReferenceRow, Resolution, ScopeRow, SemanticEdge, resolve_references};
use super::symbols::{ComponentUnit, Symbol, SymbolTable, build_symbol_table};
use crate::model::Registry;

/// Sorted semantic rows plus the diagnostics that produced them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SemanticModel {
    pub symbols: Vec<Symbol>,
    pub scopes: Vec<ScopeRow>,
    pub refs: Vec<ReferenceRow>,
    pub edges: Vec<SemanticEdge>,
    pub resolutions: Vec<Resolution>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SemanticModel {
    /// Fold a finished table and per-component results into one model.
    ///
    /// Component results are re-sorted by key, so callers may hand them
    /// over in any completion order.
    pub fn assemble(
        table: SymbolTable,
        mut resolved: Vec<ComponentResolution>,
        framework: Vec<Diagnostic>,
    ) -> Self {
        resolved.sort_by(|a, b| a.component_key.cmp(&b.component_key));

        let mut model = SemanticModel {
            symbols: table.rows().to_vec(),
            ..Default::default()
        };
        let mut collector = DiagnosticCollector::new();
        for component in resolved {
            model.scopes.extend(component.scopes);
            model.refs.extend(component.refs);
            model.edges.extend(component.edges);
            model.resolutions.extend(component.resolutions);
            collector.extend(component.diagnostics);
        }
        collector.extend(framework);
        model.diagnostics = collector.finish();
        model
    }

    /// Invariant issues of this model; empty when consistent.
    pub fn invariant_issues(&self) -> Vec<InvariantIssue> {
        run_semantic_invariants(self)
    }
}

/// Listener and tag passes over every component, in key order.
pub fn check_framework_symbols(units: &[ComponentUnit<'_>], registry: &Registry) -> Vec<Diagnostic> {
    let mut sorted: Vec<&ComponentUnit<'_>> = units.iter().collect();
    sorted.sort_by(|a, b| a.key().cmp(b.key()));
    sorted
        .into_iter()
        .flat_map(|unit| {
            let mut diags = check_listeners(unit.model);
            diags.extend(check_component_tags(unit.model, registry));
            diags
        })
        .collect()
}

/// Run the whole semantic engine sequentially.
pub fn analyze_semantics(units: &[ComponentUnit<'_>], registry: &Registry) -> SemanticModel {
    let table = build_symbol_table(units);
    let resolved = resolve_references(units, &table);
    let framework = check_framework_symbols(units, registry);
    let model = SemanticModel::assemble(table, resolved, framework);
    tracing::debug!(
        symbols = model.symbols.len(),
        refs = model.refs.len(),
        edges = model.edges.len(),
        diagnostics = model.diagnostics.len(),
        "semantic analysis complete"
    );
    model
}
