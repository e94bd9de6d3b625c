//! Local scope graphs: the template references of one component.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::component::ComponentModel;
use crate::base::SourceSpan;

/// An expression occurrence inside a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TemplateReference {
    pub span: SourceSpan,
    pub expression: String,
    /// Where the expression appears (`attr-prop`, `attr-boolean`, `text`, ...).
    pub context: String,
    /// Free variables of the expression.
    pub roots: BTreeSet<String>,
    /// Names bound by enclosing loop/conditional scopes.
    pub local_symbols: BTreeSet<String>,
}

impl TemplateReference {
    pub fn new(span: SourceSpan, expression: impl Into<String>) -> Self {
        Self {
            span,
            expression: expression.into(),
            ..Self::default()
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_roots<I, S>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roots = roots.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_locals<I, S>(mut self, locals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.local_symbols = locals.into_iter().map(Into::into).collect();
        self
    }
}

/// The reference graph of one component's template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocalScopeGraph {
    pub references: Vec<TemplateReference>,
    /// Roots that escape every local scope; they become expression-root symbols.
    pub global_symbols: BTreeSet<String>,
}

impl LocalScopeGraph {
    /// Build a graph from references, deriving the global symbol set.
    pub fn from_references(references: Vec<TemplateReference>) -> Self {
        let global_symbols = references
            .iter()
            .flat_map(|r| r.roots.iter().filter(|root| !r.local_symbols.contains(*root)))
            .cloned()
            .collect();
        Self {
            references,
            global_symbols,
        }
    }
}

/// Produces a scope graph for models that arrive without one.
pub trait ScopeGraphBuilder: Sync {
    fn build(&self, model: &ComponentModel) -> LocalScopeGraph;
}

/// Builder used when no template analyzer is wired in: every component
/// without a precomputed graph is treated as having no references.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyScopeGraphBuilder;

impl ScopeGraphBuilder for EmptyScopeGraphBuilder {
    fn build(&self, _model: &ComponentModel) -> LocalScopeGraph {
        LocalScopeGraph::default()
    }
}
