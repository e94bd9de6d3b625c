//! AnalysisSession: the long-lived owner of incremental state.
//!
//! One session per watch/LSP process. It owns the model cache, the last IR
//! snapshot and the dependency graph built from it; nothing here is shared
//! between sessions.
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = AnalysisSession::new(AnalysisConfig::default());
//! let models = session.load_models(&sources, &builder).await?;
//! let output = session.analyze(&models, &registry, Vec::new());
//!
//! // later, after a file watcher fires
//! let affected = session.affected(["/src/components/card/card.view.yaml"]);
//! session.invalidate(&affected);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::config::AnalysisConfig;
use super::fingerprint::compute_fingerprint;
use crate::base::{CoreError, FileKind};
use crate::hir::{
    RawDiagnostic, SemanticModel, build_symbol_table, check_framework_symbols, prepare_units,
    resolve_component,
};
use crate::incremental::{
    AffectedSet, CacheStats, DependencyGraph, LruCache, compute_affected, par_map_sorted,
    run_deterministic_parallel,
};
use crate::ir::{
    CompilerIr, IrDiff, IrValidation, MigrateInput, diff_compiler_ir,
    migrate_analysis_to_compiler_ir, validate_compiler_ir_with,
};
use crate::model::{ComponentModel, EmptyScopeGraphBuilder, Registry, ScopeGraphBuilder};

/// Where a component lives on disk.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentSource {
    pub component_key: String,
    pub files: BTreeMap<FileKind, String>,
}

impl ComponentSource {
    pub fn new(component_key: impl Into<String>) -> Self {
        Self {
            component_key: component_key.into(),
            files: BTreeMap::new(),
        }
    }

    pub fn with_file(mut self, kind: FileKind, path: impl Into<String>) -> Self {
        self.files.insert(kind, path.into());
        self
    }
}

/// Turns a component's files into a [`ComponentModel`].
///
/// Document and script parsing live behind this seam.
pub trait ComponentModelBuilder: Sync {
    fn build(&self, source: &ComponentSource) -> Result<ComponentModel, CoreError>;
}

#[derive(Clone, Debug, Serialize)]
struct CachedModel {
    fingerprint: String,
    model: ComponentModel,
}

/// Everything one analysis pass produces.
#[derive(Clone, Debug)]
pub struct AnalysisOutput {
    pub ir: CompilerIr,
    pub validation: IrValidation,
    /// Changes against the previous pass; `None` on the first pass.
    pub diff: Option<IrDiff>,
    pub summary_line: String,
}

impl AnalysisOutput {
    /// True when a previous pass exists and produced an identical IR.
    pub fn is_unchanged(&self) -> bool {
        self.diff.as_ref().is_some_and(|diff| !diff.changed)
    }
}

/// Owns all mutable analysis state.
pub struct AnalysisSession {
    config: AnalysisConfig,
    scope_builder: Box<dyn ScopeGraphBuilder + Send>,
    models: LruCache<String, CachedModel>,
    previous: Option<CompilerIr>,
    graph: DependencyGraph,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl AnalysisSession {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            models: LruCache::new(config.cache_max_entries, config.cache_max_bytes),
            config,
            scope_builder: Box::new(EmptyScopeGraphBuilder),
            previous: None,
            graph: DependencyGraph::default(),
        }
    }

    /// Use `builder` for models that arrive without a scope graph.
    pub fn with_scope_builder(mut self, builder: impl ScopeGraphBuilder + Send + 'static) -> Self {
        self.scope_builder = Box::new(builder);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.models.stats()
    }

    pub fn cached_components(&self) -> usize {
        self.models.len()
    }

    /// The IR of the last [`analyze`](Self::analyze) call.
    pub fn previous_ir(&self) -> Option<&CompilerIr> {
        self.previous.as_ref()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    // ========================================================================
    // MODEL LOADING
    // ========================================================================

    /// Build or reuse a model per source, sorted by component key.
    ///
    /// Fingerprints are computed through the deterministic scheduler; a
    /// cached model is reused only when its fingerprint still matches.
    pub async fn load_models(
        &mut self,
        sources: &[ComponentSource],
        builder: &dyn ComponentModelBuilder,
    ) -> Result<Vec<ComponentModel>, CoreError> {
        let fingerprinted = run_deterministic_parallel(
            sources.iter().collect(),
            |source| source.component_key.clone(),
            |source| async move { compute_fingerprint(&source.files).map(|fp| (source, fp)) },
            self.config.schedule_options(),
        )
        .await;

        let mut models = Vec::with_capacity(fingerprinted.len());
        let (mut reused, mut rebuilt) = (0usize, 0usize);
        for entry in fingerprinted {
            let (source, fingerprint) = entry?;
            let cached = self
                .models
                .get(&source.component_key)
                .filter(|cached| cached.fingerprint == fingerprint)
                .map(|cached| cached.model.clone());

            let model = match cached {
                Some(model) => {
                    reused += 1;
                    model
                }
                None => {
                    let model = builder.build(source)?;
                    self.models.set(
                        source.component_key.clone(),
                        CachedModel {
                            fingerprint,
                            model: model.clone(),
                        },
                    );
                    rebuilt += 1;
                    model
                }
            };
            models.push(model);
        }

        tracing::debug!(reused, rebuilt, "loaded component models");
        Ok(models)
    }

    /// Drop cached models of every affected component.
    pub fn invalidate(&mut self, affected: &AffectedSet) {
        for key in &affected.affected_components {
            if self.models.remove(key).is_some() {
                tracing::trace!(component_key = %key, "invalidated cached model");
            }
        }
    }

    // ========================================================================
    // ANALYSIS
    // ========================================================================

    /// Run every phase over `models` and remember the resulting IR.
    ///
    /// The IR is returned even when validation fails.
    pub fn analyze(
        &mut self,
        models: &[ComponentModel],
        registry: &Registry,
        diagnostics: Vec<RawDiagnostic>,
    ) -> AnalysisOutput {
        let options = self.config.schedule_options();

        let units = prepare_units(models, self.scope_builder.as_ref());
        let table = build_symbol_table(&units);
        tracing::debug!(components = units.len(), symbols = table.len(), "built symbol table");

        let resolved = par_map_sorted(
            units.iter().collect(),
            |unit| unit.key().to_string(),
            |unit| resolve_component(unit, &table),
            options,
        );
        tracing::debug!(components = resolved.len(), "resolved references");

        let framework = check_framework_symbols(&units, registry);
        let semantic = SemanticModel::assemble(table, resolved, framework);
        for issue in semantic.invariant_issues() {
            tracing::warn!(%issue, "semantic invariant violated");
        }

        let ir = migrate_analysis_to_compiler_ir(
            MigrateInput::new(models)
                .with_semantic(&semantic)
                .with_diagnostics(diagnostics),
        );
        tracing::debug!(components = ir.metadata.component_count, "assembled compiler IR");

        let validation = match ir.to_value() {
            Ok(value) => validate_compiler_ir_with(&value, self.config.min_readable_version),
            Err(err) => IrValidation::unreadable(err.to_string()),
        };
        if !validation.ok {
            tracing::warn!(
                errors = validation.errors.len(),
                first = ?validation.errors.first().map(|issue| issue.code.as_str()),
                "compiler IR failed validation"
            );
        }

        let diff = self
            .previous
            .as_ref()
            .map(|previous| diff_compiler_ir(previous, &ir));

        let summary_line = format!(
            "{} components, {}",
            ir.metadata.component_count,
            ir.metadata.summary.headline()
        );
        tracing::info!("{summary_line}");

        self.graph = DependencyGraph::from_ir(&ir);
        self.previous = Some(ir.clone());

        AnalysisOutput {
            ir,
            validation,
            diff,
            summary_line,
        }
    }

    /// Components, files and segments to rebuild after `changed_files`,
    /// based on the graph of the last analysis.
    pub fn affected<I, S>(&self, changed_files: I) -> AffectedSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        compute_affected(&self.graph, changed_files)
    }
}
