use rtgl_check::hir::{RawDiagnostic, SemanticModel, analyze_semantics, invariant_codes, prepare_units};
use rtgl_check::ir::{
    CompilerIr, IR_VERSION, MigrateInput, SummaryOverride, codes, diff_compiler_ir,
    migrate_analysis_to_compiler_ir, validate_compiler_ir,
};
use rtgl_check::model::{ComponentModel, EmptyScopeGraphBuilder};
use rtgl_check::types::{LatticeType, PrimitiveKind};

use crate::helpers::model_fixtures::{registry, workspace};

fn semantic(models: &[ComponentModel]) -> SemanticModel {
    analyze_semantics(&prepare_units(models, &EmptyScopeGraphBuilder), &registry())
}

fn rule_pack_diagnostic() -> RawDiagnostic {
    RawDiagnostic {
        code: Some("RTGL-CHECK-YAHTML-003".to_string()),
        severity: Some("WARNING".to_string()),
        message: Some("Attribute binding shadows a prop".to_string()),
        component_key: Some("components/card".to_string()),
        line: Some(3),
        ..Default::default()
    }
}

fn build_ir() -> CompilerIr {
    let models = workspace();
    let semantic = semantic(&models);
    migrate_analysis_to_compiler_ir(
        MigrateInput::new(&models)
            .with_semantic(&semantic)
            .with_diagnostics(vec![rule_pack_diagnostic()]),
    )
}

#[test]
fn test_migrated_ir_validates() {
    let ir = build_ir();
    let validation = ir.validate();
    assert!(validation.ok, "unexpected issues: {:?}", validation.errors);
    assert!(validation.warnings.is_empty());
    assert_eq!(ir.version, IR_VERSION);
}

#[test]
fn test_structure_is_sorted_and_linked() {
    let ir = build_ir();
    let keys: Vec<_> = ir.component_keys().collect();
    assert_eq!(
        keys,
        vec!["components/button", "components/card", "components/footer", "pages/home"]
    );

    let deps: Vec<_> = ir
        .structural
        .dependencies
        .iter()
        .map(|d| (d.from.as_str(), d.to.as_str(), d.tag_name.as_str()))
        .collect();
    assert_eq!(
        deps,
        vec![
            ("components/card", "components/button", "app-button"),
            ("pages/home", "components/card", "app-card"),
        ]
    );
}

#[test]
fn test_typed_contract_uses_schema_types() {
    let ir = build_ir();
    let card = ir
        .typed_contract
        .components
        .iter()
        .find(|c| c.component_key == "components/card")
        .unwrap();
    let title = card.props.iter().find(|p| p.name == "title").unwrap();
    assert!(title.required);
    assert_eq!(title.ty, LatticeType::Primitive(PrimitiveKind::String));
}

#[test]
fn test_rule_pack_diagnostics_are_normalized_and_counted() {
    let ir = build_ir();
    let raw = ir
        .diagnostics
        .items
        .iter()
        .find(|d| d.code == "RTGL-CHECK-YAHTML-003")
        .unwrap();
    assert_eq!(raw.category, "general");
    assert_eq!(raw.severity.as_str(), "warn");

    let summary = &ir.metadata.summary;
    assert_eq!(summary.total, ir.diagnostics.items.len());
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.warnings, 1);
    assert_eq!(summary.by_code.get("RTGL-CHECK-SEM-001"), Some(&1));
}

#[test]
fn test_caller_summary_wins() {
    let models = workspace();
    let ir = migrate_analysis_to_compiler_ir(MigrateInput::new(&models).with_summary(
        SummaryOverride {
            total: Some(7),
            ..Default::default()
        },
    ));
    assert_eq!(ir.metadata.summary.total, 7);
    assert_eq!(ir.metadata.summary.errors, 0);
}

#[test]
fn test_json_round_trip_keeps_validity() {
    let ir = build_ir();
    let text = ir.to_json().unwrap();
    let back = CompilerIr::from_json(&text).unwrap();
    assert_eq!(back, ir);

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(validate_compiler_ir(&value).ok);
}

#[test]
fn test_dangling_edge_target_is_reported() {
    let mut value = build_ir().to_value().unwrap();
    value["semantic"]["edges"][0]["to"] = serde_json::json!("pages/home::symbol::ghost");

    let validation = validate_compiler_ir(&value);
    assert!(!validation.ok);
    assert!(validation.issue_codes().contains(&invariant_codes::EDGE_TO_DANGLING));
}

#[test]
fn test_unknown_component_in_typed_contract() {
    let mut value = build_ir().to_value().unwrap();
    value["typedContract"]["components"][0]["componentKey"] = serde_json::json!("nowhere");

    let validation = validate_compiler_ir(&value);
    assert!(
        validation
            .issue_codes()
            .contains(&invariant_codes::TYPED_CONTRACT_UNKNOWN_COMPONENT)
    );
}

#[test]
fn test_malformed_roots() {
    let validation = validate_compiler_ir(&serde_json::json!([1, 2]));
    assert_eq!(validation.issue_codes(), vec![codes::ROOT_NOT_OBJECT]);

    let mut value = build_ir().to_value().unwrap();
    value["semantic"]["symbols"] = serde_json::json!({});
    let validation = validate_compiler_ir(&value);
    assert!(validation.issue_codes().contains(&codes::SYMBOLS_NOT_ARRAY));
}

#[test]
fn test_diff_is_empty_for_identical_runs() {
    let first = build_ir();
    let second = build_ir();
    let diff = diff_compiler_ir(&first, &second);
    assert!(!diff.changed);
    assert!(diff.changes.is_empty());
}

#[test]
fn test_diff_reports_touched_sections() {
    let before = build_ir();

    let mut models = workspace();
    if let Some(footer) = models.iter_mut().find(|m| m.component_key == "components/footer") {
        footer.schema.prop_names.insert("year".to_string());
    }
    let semantic = semantic(&models);
    let after = migrate_analysis_to_compiler_ir(
        MigrateInput::new(&models)
            .with_semantic(&semantic)
            .with_diagnostics(vec![rule_pack_diagnostic()]),
    );

    let diff = diff_compiler_ir(&before, &after);
    assert!(diff.changed);
    let sections = diff.touched_sections();
    assert!(sections.contains(&"semantic"));
    assert!(sections.contains(&"typedContract"));
    assert!(!sections.contains(&"structural"));
}
