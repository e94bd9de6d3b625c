//! Per-component model records.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::scope_graph::LocalScopeGraph;
use crate::base::{FileKind, SourceSpan};

/// Everything the analyzer knows about one component.
///
/// Built by the document/script parsers; the analyzer only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentModel {
    /// Unique identity derived from the component's directory grouping.
    pub component_key: String,
    pub category: String,
    pub component: String,
    /// Tracked files by role.
    pub files: BTreeMap<FileKind, String>,
    pub schema: NormalizedSchema,
    pub handlers: ScriptModule,
    pub store: ScriptModule,
    pub methods: ScriptModule,
    pub view: ViewModel,
    /// Precomputed local scope graph, if the parser produced one.
    pub semantic_graph: Option<LocalScopeGraph>,
}

impl ComponentModel {
    pub fn new(component_key: impl Into<String>) -> Self {
        Self {
            component_key: component_key.into(),
            ..Self::default()
        }
    }

    /// Path of the file playing `kind`, if the component has one.
    pub fn file_path(&self, kind: FileKind) -> Option<&str> {
        self.files.get(&kind).map(String::as_str)
    }

    /// The tag name other components use to embed this one.
    pub fn declared_tag(&self) -> Option<&str> {
        self.schema.component_name.as_deref()
    }

    /// Tracked files as `(kind, path)` pairs, sorted by kind then path.
    pub fn tracked_files(&self) -> Vec<(FileKind, &str)> {
        let mut files: Vec<_> = self
            .files
            .iter()
            .map(|(kind, path)| (*kind, path.as_str()))
            .collect();
        files.sort();
        files
    }
}

/// The normalized schema document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NormalizedSchema {
    /// Declared tag name (e.g. `app-header`).
    pub component_name: Option<String>,
    pub prop_names: BTreeSet<String>,
    pub required_props: BTreeSet<String>,
    pub event_names: BTreeSet<String>,
    pub method_names: BTreeSet<String>,
    /// Raw schema fragment per prop.
    pub props: BTreeMap<String, Value>,
}

/// Names exported by a script module (handlers, store actions or methods).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScriptModule {
    pub exports: BTreeSet<String>,
}

impl ScriptModule {
    pub fn with_exports<I, S>(exports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exports: exports.into_iter().map(Into::into).collect(),
        }
    }

    pub fn exports(&self, name: &str) -> bool {
        self.exports.contains(name)
    }
}

/// The parts of the view document the analyzer consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewModel {
    /// Element refs and their event listener wiring.
    pub refs: BTreeMap<String, RefConfig>,
    /// Names declared in the component's constants block.
    pub constants: BTreeSet<String>,
    /// Every element tag used in the template.
    pub tags: Vec<TagUsage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RefConfig {
    pub event_listeners: BTreeMap<String, ListenerConfig>,
}

/// One `eventListeners` entry: the handler and/or store action it dispatches to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListenerConfig {
    pub handler: Option<String>,
    pub action: Option<String>,
}

/// A tag occurrence inside the template.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TagUsage {
    pub tag_name: String,
    pub span: SourceSpan,
}

impl TagUsage {
    pub fn new(tag_name: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            tag_name: tag_name.into(),
            span,
        }
    }

    /// Tags naming another component carry a `-` separator; plain HTML tags don't.
    pub fn looks_like_component(&self) -> bool {
        self.tag_name.contains('-')
    }
}
