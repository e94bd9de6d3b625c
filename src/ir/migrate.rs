//! Build a [`CompilerIr`] from component models and analysis results.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashMap;
use serde_json::Value;

use super::schema::{
    CompilerIr, DiagnosticsSection, FileEntry, GENERATOR, IR_VERSION, IrMetadata,
    SemanticSection, StructuralComponent, StructuralDependency, StructuralSection,
    TEMPLATE_TAG_DEPENDENCY, TypedContract, TypedContractSection, TypedProp,
};
use super::summary::{IrSummary, SummaryOverride};
use crate::hir::{RawDiagnostic, SemanticModel, normalize_diagnostics};
use crate::model::ComponentModel;
use crate::types::{LatticeType, infer_from_literal, more_specific, schema_to_lattice};

/// Inputs to [`migrate_analysis_to_compiler_ir`].
#[derive(Clone, Debug)]
pub struct MigrateInput<'a> {
    pub models: &'a [ComponentModel],
    pub semantic: Option<&'a SemanticModel>,
    /// Rule-pack diagnostics, merged with the semantic ones.
    pub diagnostics: Vec<RawDiagnostic>,
    pub summary: Option<SummaryOverride>,
}

impl<'a> MigrateInput<'a> {
    pub fn new(models: &'a [ComponentModel]) -> Self {
        Self {
            models,
            semantic: None,
            diagnostics: Vec::new(),
            summary: None,
        }
    }

    pub fn with_semantic(mut self, semantic: &'a SemanticModel) -> Self {
        self.semantic = Some(semantic);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Vec<RawDiagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_summary(mut self, summary: SummaryOverride) -> Self {
        self.summary = Some(summary);
        self
    }
}

/// Assemble the IR. Deterministic for a given input regardless of the
/// order models arrive in.
pub fn migrate_analysis_to_compiler_ir(input: MigrateInput<'_>) -> CompilerIr {
    let mut models: Vec<&ComponentModel> = input.models.iter().collect();
    models.sort_by(|a, b| a.component_key.cmp(&b.component_key));

    let structural = StructuralSection {
        components: models.iter().map(|m| structural_component(m)).collect(),
        dependencies: template_dependencies(&models),
    };

    let semantic = input
        .semantic
        .map(|model| semantic_section(&models, model))
        .unwrap_or_default();

    let typed_contract = TypedContractSection {
        components: models.iter().map(|m| typed_contract(m)).collect(),
    };

    let raw = input
        .semantic
        .into_iter()
        .flat_map(|model| model.diagnostics.iter().cloned().map(RawDiagnostic::from))
        .chain(input.diagnostics);
    let items = normalize_diagnostics(raw);

    let computed = IrSummary::from_diagnostics(&items);
    let summary = match &input.summary {
        Some(over) => computed.with_override(over),
        None => computed,
    };

    tracing::debug!(
        components = structural.components.len(),
        dependencies = structural.dependencies.len(),
        symbols = semantic.symbols.len(),
        diagnostics = items.len(),
        "migrated analysis to compiler IR"
    );

    CompilerIr {
        version: IR_VERSION,
        metadata: IrMetadata {
            generator: GENERATOR.to_string(),
            component_count: structural.components.len(),
            summary,
        },
        structural,
        semantic,
        typed_contract,
        diagnostics: DiagnosticsSection { items },
    }
}

// ============================================================================
// STRUCTURAL
// ============================================================================

fn structural_component(model: &ComponentModel) -> StructuralComponent {
    StructuralComponent {
        component_key: model.component_key.clone(),
        category: model.category.clone(),
        component: model.component.clone(),
        tag_name: model.declared_tag().map(str::to_string),
        files: model
            .tracked_files()
            .into_iter()
            .map(|(kind, path)| FileEntry {
                kind,
                path: path.to_string(),
            })
            .collect(),
    }
}

/// Match every tag usage against other components' declared tags.
fn template_dependencies(models: &[&ComponentModel]) -> Vec<StructuralDependency> {
    let mut declared: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for model in models {
        if let Some(tag) = model.declared_tag() {
            declared
                .entry(tag)
                .or_default()
                .insert(&model.component_key);
        }
    }

    let mut deps = BTreeSet::new();
    for model in models {
        for usage in &model.view.tags {
            let Some(owners) = declared.get(usage.tag_name.as_str()) else {
                continue;
            };
            for owner in owners.iter().filter(|o| **o != model.component_key) {
                deps.insert(StructuralDependency {
                    from: model.component_key.clone(),
                    to: owner.to_string(),
                    kind: TEMPLATE_TAG_DEPENDENCY.to_string(),
                    tag_name: usage.tag_name.clone(),
                });
            }
        }
    }
    // Field order makes the derived Ord sort by (from, to, kind, tagName).
    deps.into_iter().collect()
}

// ============================================================================
// SEMANTIC
// ============================================================================

/// Re-order semantic rows by `(componentIndex, rowIndex)`. Rows for keys
/// outside the model list keep their relative order at the end.
fn ordered<'k, T: Clone>(
    rows: &'k [T],
    index: &FxHashMap<&str, usize>,
    key_of: impl Fn(&'k T) -> &'k str,
) -> Vec<T> {
    let mut keyed: Vec<((usize, usize), &'k T)> = rows
        .iter()
        .enumerate()
        .map(|(row, item)| {
            let component = index.get(key_of(item)).copied().unwrap_or(usize::MAX);
            ((component, row), item)
        })
        .collect();
    keyed.sort_by_key(|(order, _)| *order);
    keyed.into_iter().map(|(_, item)| item.clone()).collect()
}

fn semantic_section(models: &[&ComponentModel], semantic: &SemanticModel) -> SemanticSection {
    let index: FxHashMap<&str, usize> = models
        .iter()
        .enumerate()
        .map(|(i, m)| (m.component_key.as_str(), i))
        .collect();
    let ref_owner: FxHashMap<&str, &str> = semantic
        .refs
        .iter()
        .map(|r| (r.id.as_str(), r.component_key.as_str()))
        .collect();

    SemanticSection {
        symbols: ordered(&semantic.symbols, &index, |s| s.component_key.as_str()),
        scopes: ordered(&semantic.scopes, &index, |s| s.component_key.as_str()),
        edges: ordered(&semantic.edges, &index, |e| {
            ref_owner.get(e.from.as_str()).copied().unwrap_or_default()
        }),
        refs: ordered(&semantic.refs, &index, |r| r.component_key.as_str()),
    }
}

// ============================================================================
// TYPED CONTRACT
// ============================================================================

/// Declared schema type; the `default` literal only types props that
/// declare nothing.
fn prop_type(fragment: Option<&Value>) -> LatticeType {
    let Some(fragment) = fragment else {
        return LatticeType::unknown();
    };
    let declared = schema_to_lattice(fragment);
    if !declared.is_unknown() {
        return declared;
    }
    match fragment.get("default") {
        Some(default) => more_specific(declared, infer_from_literal(&default.to_string())),
        None => declared,
    }
}

fn typed_contract(model: &ComponentModel) -> TypedContract {
    let schema = &model.schema;
    let names: BTreeSet<&String> = schema
        .prop_names
        .iter()
        .chain(schema.props.keys())
        .chain(schema.required_props.iter())
        .collect();

    TypedContract {
        component_key: model.component_key.clone(),
        props: names
            .into_iter()
            .map(|name| TypedProp {
                name: name.clone(),
                required: schema.required_props.contains(name),
                ty: prop_type(schema.props.get(name)),
            })
            .collect(),
        events: schema.event_names.iter().cloned().collect(),
        methods: schema.method_names.iter().cloned().collect(),
    }
}
