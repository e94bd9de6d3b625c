//! Symbol table and reference resolution over a whole workspace.

use std::collections::BTreeSet;

use rtgl_check::hir::{
    MAX_UNRESOLVED_CANDIDATES, ResolutionOutcome, SymbolKind, analyze_semantics,
    build_symbol_table, codes, prepare_units,
};
use rtgl_check::model::EmptyScopeGraphBuilder;

use crate::helpers::diagnostic_helpers::{assert_no_code, with_code};
use crate::helpers::model_fixtures::{HOME_VIEW, registry, workspace};

#[test]
fn test_one_row_per_component_and_name() {
    let models = workspace();
    let units = prepare_units(&models, &EmptyScopeGraphBuilder);
    let table = build_symbol_table(&units);

    let mut seen = BTreeSet::new();
    for symbol in table.rows() {
        assert!(
            seen.insert((symbol.component_key.clone(), symbol.name.to_string())),
            "duplicate symbol row {}",
            symbol.id
        );
    }

    let rows: Vec<_> = table
        .rows()
        .iter()
        .map(|s| (s.component_key.as_str(), s.name.as_str()))
        .collect();
    let mut sorted = rows.clone();
    sorted.sort();
    assert_eq!(rows, sorted);
}

#[test]
fn test_prop_used_in_template_merges_kinds() {
    let models = workspace();
    let units = prepare_units(&models, &EmptyScopeGraphBuilder);
    let table = build_symbol_table(&units);

    let subtotal = table.lookup("pages/home", "subtotal").unwrap();
    // Primary kind is the lexicographically first label.
    assert_eq!(subtotal.kind, SymbolKind::ExpressionRoot);
    assert_eq!(subtotal.kinds, vec![SymbolKind::ExpressionRoot, SymbolKind::Prop]);
    assert_eq!(subtotal.kinds_by_preference()[0], SymbolKind::Prop);
}

#[test]
fn test_unresolved_total_reported_once() {
    let models = workspace();
    let units = prepare_units(&models, &EmptyScopeGraphBuilder);
    let model = analyze_semantics(&units, &registry());

    let unresolved = with_code(&model.diagnostics, codes::UNRESOLVED_SYMBOL);
    assert_eq!(unresolved.len(), 1);

    let diag = unresolved[0];
    assert!(diag.message.contains("'total'"));
    assert_eq!(diag.component_key.as_deref(), Some("pages/home"));
    assert_eq!(diag.file_path.as_deref(), Some(HOME_VIEW));
    assert_eq!(diag.span.line, 4);
    assert!(!diag.related.is_empty());
    assert!(diag.related.len() <= MAX_UNRESOLVED_CANDIDATES);

    assert_no_code(&model.diagnostics, codes::AMBIGUOUS_SYMBOL);
}

#[test]
fn test_local_roots_never_reach_the_table() {
    let models = workspace();
    let units = prepare_units(&models, &EmptyScopeGraphBuilder);
    let model = analyze_semantics(&units, &registry());

    let item = model
        .resolutions
        .iter()
        .find(|r| r.component_key == "components/card" && r.root == "item")
        .unwrap();
    assert_eq!(item.outcome, ResolutionOutcome::Local);
    assert!(item.symbol_id.is_none());
    assert!(
        model
            .edges
            .iter()
            .all(|edge| edge.root != "item"),
        "local roots must not produce edges"
    );
}

#[test]
fn test_pipeline_is_deterministic() {
    let registry = registry();

    let forward = workspace();
    let mut reversed = workspace();
    reversed.reverse();

    let a = analyze_semantics(&prepare_units(&forward, &EmptyScopeGraphBuilder), &registry);
    let b = analyze_semantics(&prepare_units(&reversed, &EmptyScopeGraphBuilder), &registry);
    let c = analyze_semantics(&prepare_units(&forward, &EmptyScopeGraphBuilder), &registry);

    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a.diagnostics).unwrap(),
        serde_json::to_string(&c.diagnostics).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&a.edges).unwrap(),
        serde_json::to_string(&b.edges).unwrap()
    );
}
