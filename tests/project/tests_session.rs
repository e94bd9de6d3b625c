use std::collections::BTreeMap;
use std::fs;

use tempfile::TempDir;

use rtgl_check::base::{CoreError, FileKind};
use rtgl_check::hir::RawDiagnostic;
use rtgl_check::model::ComponentModel;
use rtgl_check::project::{
    AnalysisConfig, AnalysisSession, ComponentModelBuilder, ComponentSource, compute_fingerprint,
};

use crate::helpers::model_fixtures::{CARD_VIEW, registry, workspace};

/// Hands out fixture models by key; fails for unknown components.
struct FixtureBuilder;

impl ComponentModelBuilder for FixtureBuilder {
    fn build(&self, source: &ComponentSource) -> Result<ComponentModel, CoreError> {
        workspace()
            .into_iter()
            .find(|m| m.component_key == source.component_key)
            .ok_or_else(|| CoreError::json(format!("no fixture for {}", source.component_key)))
    }
}

#[test]
fn test_full_pipeline_through_session() {
    let mut session = AnalysisSession::new(AnalysisConfig {
        concurrency: Some(2),
        ..Default::default()
    });
    let output = session.analyze(&workspace(), &registry(), Vec::new());

    assert!(output.validation.ok);
    assert_eq!(output.ir.metadata.component_count, 4);
    assert_eq!(
        output.summary_line,
        "4 components, 1 diagnostic (1 error, 0 warnings)"
    );

    let affected = session.affected([CARD_VIEW]);
    assert_eq!(affected.affected_components, vec!["components/card", "pages/home"]);
}

#[test]
fn test_second_pass_diffs_against_first() {
    let mut session = AnalysisSession::default();
    session.analyze(&workspace(), &registry(), Vec::new());

    let unchanged = session.analyze(&workspace(), &registry(), Vec::new());
    assert!(unchanged.is_unchanged());

    let extra = RawDiagnostic {
        code: Some("RTGL-CHECK-CONTRACT-001".to_string()),
        message: Some("Missing required prop 'title'".to_string()),
        component_key: Some("pages/home".to_string()),
        ..Default::default()
    };
    let changed = session.analyze(&workspace(), &registry(), vec![extra]);
    let diff = changed.diff.as_ref().unwrap();
    assert!(diff.changed);
    assert!(diff.touched_sections().contains(&"diagnostics"));
    assert!(diff.touched_sections().contains(&"metadata"));
    assert_eq!(changed.ir.metadata.summary.errors, 2);
}

fn ir_json_with_width(width: usize) -> String {
    let mut session = AnalysisSession::new(AnalysisConfig {
        concurrency: Some(width),
        ..Default::default()
    });
    let output = session.analyze(&workspace(), &registry(), Vec::new());
    output.ir.to_json().unwrap()
}

#[test]
fn test_parallel_width_does_not_change_output() {
    let narrow = ir_json_with_width(1);
    assert_eq!(narrow, ir_json_with_width(3));
    assert_eq!(narrow, ir_json_with_width(8));
}

#[tokio::test]
async fn test_load_models_from_disk_sources() {
    let dir = TempDir::new().unwrap();
    let card_view = dir.path().join("card.view.yaml");
    fs::write(&card_view, "template: []").unwrap();

    let sources = vec![
        ComponentSource::new("pages/home"),
        ComponentSource::new("components/card")
            .with_file(FileKind::View, card_view.to_string_lossy()),
    ];
    let mut session = AnalysisSession::default();
    let models = session.load_models(&sources, &FixtureBuilder).await.unwrap();

    let keys: Vec<_> = models.iter().map(|m| m.component_key.as_str()).collect();
    assert_eq!(keys, vec!["components/card", "pages/home"]);
    assert_eq!(session.cached_components(), 2);

    session.load_models(&sources, &FixtureBuilder).await.unwrap();
    assert_eq!(session.cache_stats().hits, 2);
}

#[tokio::test]
async fn test_builder_errors_propagate() {
    let mut session = AnalysisSession::default();
    let result = session
        .load_models(&[ComponentSource::new("components/unknown")], &FixtureBuilder)
        .await;
    assert!(matches!(result, Err(CoreError::Json(_))));
}

#[test]
fn test_fingerprint_tracks_file_removal() {
    let dir = TempDir::new().unwrap();
    let view = dir.path().join("a.view.yaml");
    let schema = dir.path().join("a.schema.yaml");
    fs::write(&view, "x").unwrap();
    fs::write(&schema, "y").unwrap();

    let mut files = BTreeMap::new();
    files.insert(FileKind::View, view.to_string_lossy().to_string());
    files.insert(FileKind::Schema, schema.to_string_lossy().to_string());
    let before = compute_fingerprint(&files).unwrap();

    assert_eq!(before, compute_fingerprint(&files).unwrap());

    fs::remove_file(&schema).unwrap();
    assert_ne!(before, compute_fingerprint(&files).unwrap());
}
