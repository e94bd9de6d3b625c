use rstest::rstest;

use rtgl_check::base::Segment;
use rtgl_check::hir::{analyze_semantics, prepare_units};
use rtgl_check::incremental::{DependencyGraph, compute_affected};
use rtgl_check::ir::{MigrateInput, migrate_analysis_to_compiler_ir};
use rtgl_check::model::EmptyScopeGraphBuilder;

use crate::helpers::model_fixtures::{
    BUTTON_VIEW, CARD_SCHEMA, CARD_VIEW, FOOTER_VIEW, HOME_HANDLERS, HOME_VIEW, registry,
    workspace,
};

fn graph() -> DependencyGraph {
    let models = workspace();
    let semantic = analyze_semantics(&prepare_units(&models, &EmptyScopeGraphBuilder), &registry());
    let ir = migrate_analysis_to_compiler_ir(MigrateInput::new(&models).with_semantic(&semantic));
    DependencyGraph::from_ir(&ir)
}

#[rstest]
#[case(BUTTON_VIEW, &["components/button", "components/card", "pages/home"])]
#[case(CARD_SCHEMA, &["components/card", "pages/home"])]
#[case(CARD_VIEW, &["components/card", "pages/home"])]
#[case(HOME_HANDLERS, &["pages/home"])]
#[case(FOOTER_VIEW, &["components/footer"])]
fn test_changes_reach_every_transitive_dependent(#[case] changed: &str, #[case] expected: &[&str]) {
    let affected = compute_affected(&graph(), [changed]);
    assert_eq!(affected.affected_components, expected);
}

#[test]
fn test_dependents_always_included() {
    let graph = graph();
    for component in graph.component_dependencies().keys() {
        for file in graph.files_of(component) {
            let affected = compute_affected(&graph, [file.as_str()]);
            assert!(affected.contains(component));
            // Anything that depends on `component` must be affected too.
            for (other, other_deps) in graph.component_dependencies() {
                if other_deps.contains(component) {
                    assert!(affected.contains(other), "{other} missing for {file}");
                }
            }
        }
    }
}

#[test]
fn test_affected_files_cover_affected_components() {
    let graph = graph();
    let affected = compute_affected(&graph, [BUTTON_VIEW]);
    assert!(affected.affected_files.iter().any(|f| f == HOME_VIEW));
    assert!(affected.affected_files.iter().any(|f| f == CARD_SCHEMA));
    assert!(!affected.affected_files.iter().any(|f| f == FOOTER_VIEW));
    assert!(affected.affected_files.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_segments_follow_file_kinds() {
    let affected = compute_affected(&graph(), [CARD_SCHEMA]);
    assert!(affected.invalidates(Segment::TypedContract));
    assert!(!affected.invalidates(Segment::Template));

    let affected = compute_affected(&graph(), [HOME_VIEW]);
    assert!(affected.invalidates(Segment::Template));
}
