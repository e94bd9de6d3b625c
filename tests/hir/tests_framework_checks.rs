//! Listener and component-tag passes.

use rtgl_check::base::SourceSpan;
use rtgl_check::hir::{analyze_semantics, codes, prepare_units};
use rtgl_check::model::{EmptyScopeGraphBuilder, ListenerConfig, TagUsage};

use crate::helpers::diagnostic_helpers::{assert_no_code, with_code};
use crate::helpers::model_fixtures::{home, registry, workspace};

#[test]
fn test_clean_workspace_has_no_framework_errors() {
    let models = workspace();
    let model = analyze_semantics(&prepare_units(&models, &EmptyScopeGraphBuilder), &registry());
    assert_no_code(&model.diagnostics, codes::UNRESOLVED_FRAMEWORK_SYMBOL);
    assert_no_code(&model.diagnostics, codes::UNRESOLVED_COMPONENT_TAG);
}

#[test]
fn test_misspelled_handler_suggests_export() {
    let mut page = home();
    if let Some(config) = page.view.refs.get_mut("openButton") {
        config.event_listeners.insert(
            "click".to_string(),
            ListenerConfig {
                handler: Some("handleOpne".to_string()),
                action: None,
            },
        );
    }
    let models = vec![page];
    let model = analyze_semantics(&prepare_units(&models, &EmptyScopeGraphBuilder), &registry());

    let found = with_code(&model.diagnostics, codes::UNRESOLVED_FRAMEWORK_SYMBOL);
    assert_eq!(found.len(), 1);
    assert!(found[0].message.contains("handleOpne"));
    assert_eq!(found[0].related.len(), 1);
    assert!(found[0].related[0].message.contains("handleOpen"));
}

#[test]
fn test_unknown_tag_suggests_registered_component() {
    let mut page = home();
    page.view
        .tags
        .push(TagUsage::new("app-crad", SourceSpan::point(9, 2)));
    let models = vec![page];
    let model = analyze_semantics(&prepare_units(&models, &EmptyScopeGraphBuilder), &registry());

    let found = with_code(&model.diagnostics, codes::UNRESOLVED_COMPONENT_TAG);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].span.line, 9);
    assert!(
        found[0]
            .related
            .iter()
            .any(|r| r.message.contains("'app-card' (declared by components/card)"))
    );
}

#[test]
fn test_plain_html_tags_are_ignored() {
    let mut page = home();
    page.view
        .tags
        .push(TagUsage::new("div", SourceSpan::point(2, 2)));
    let models = vec![page];
    let model = analyze_semantics(&prepare_units(&models, &EmptyScopeGraphBuilder), &registry());
    assert_no_code(&model.diagnostics, codes::UNRESOLVED_COMPONENT_TAG);
}
