//! Global symbol table: one canonical row per `(component, name)`.
//!
//! Rows live in a single vector (the source of truth); lookups go through
//! indexes into it, the same way the resolver's scopes point back at rows.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::base::FileKind;
use crate::model::{ComponentModel, LocalScopeGraph, ScopeGraphBuilder};

// ============================================================================
// SYMBOL KINDS
// ============================================================================

/// The kind of declaration that introduced a name.
///
/// Variants are declared in label order, so the derived `Ord` is the
/// lexicographic order of the labels. The first kind in that order is a
/// symbol's deterministic primary label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolKind {
    Action,
    Constant,
    ExpressionRoot,
    Handler,
    Method,
    Prop,
    Ref,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Action => "action",
            SymbolKind::Constant => "constant",
            SymbolKind::ExpressionRoot => "expression-root",
            SymbolKind::Handler => "handler",
            SymbolKind::Method => "method",
            SymbolKind::Prop => "prop",
            SymbolKind::Ref => "ref",
        }
    }

    /// Preference when one name carries several kinds:
    /// handler > action > method > prop > constant > ref > expression-root.
    pub fn preference(&self) -> u8 {
        match self {
            SymbolKind::Handler => 0,
            SymbolKind::Action => 1,
            SymbolKind::Method => 2,
            SymbolKind::Prop => 3,
            SymbolKind::Constant => 4,
            SymbolKind::Ref => 5,
            SymbolKind::ExpressionRoot => 6,
        }
    }

    /// Expression roots record a use in the template, not a declaration.
    pub fn is_declaration(&self) -> bool {
        !matches!(self, SymbolKind::ExpressionRoot)
    }

    /// The file a declaration of this kind lives in.
    pub fn declaring_file<'a>(&self, model: &'a ComponentModel) -> Option<&'a str> {
        match self {
            SymbolKind::Handler => model.file_path(FileKind::Handlers),
            SymbolKind::Action => model.file_path(FileKind::Store),
            SymbolKind::Method => model.file_path(FileKind::Methods),
            SymbolKind::Prop => model.file_path(FileKind::Schema),
            SymbolKind::Constant => model
                .file_path(FileKind::Constants)
                .or_else(|| model.file_path(FileKind::View)),
            SymbolKind::Ref | SymbolKind::ExpressionRoot => model.file_path(FileKind::View),
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SYMBOLS
// ============================================================================

/// A named declaration visible within one component.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    /// `componentKey::symbol::name`
    pub id: String,
    pub component_key: String,
    pub name: SmolStr,
    /// Primary label: the lexicographically-first entry of `kinds`.
    pub kind: SymbolKind,
    /// Every kind this name was declared with, sorted.
    pub kinds: Vec<SymbolKind>,
    pub file_path: Option<String>,
}

impl Symbol {
    pub fn make_id(component_key: &str, name: &str) -> String {
        format!("{component_key}::symbol::{name}")
    }

    fn new(component_key: &str, name: &str, kind: SymbolKind, file_path: Option<&str>) -> Self {
        Self {
            id: Self::make_id(component_key, name),
            component_key: component_key.to_string(),
            name: SmolStr::new(name),
            kind,
            kinds: vec![kind],
            file_path: file_path.map(str::to_string),
        }
    }

    fn merge(&mut self, kind: SymbolKind, file_path: Option<&str>) {
        if let Err(pos) = self.kinds.binary_search(&kind) {
            self.kinds.insert(pos, kind);
        }
        self.kind = self.kinds[0];
        if self.file_path.is_none() {
            self.file_path = file_path.map(str::to_string);
        }
    }

    /// Declaration kinds ordered by preference, most preferred first.
    pub fn kinds_by_preference(&self) -> Vec<SymbolKind> {
        let mut kinds = self.kinds.clone();
        kinds.sort_by_key(SymbolKind::preference);
        kinds
    }

    pub fn has_kind(&self, kind: SymbolKind) -> bool {
        self.kinds.binary_search(&kind).is_ok()
    }
}

// ============================================================================
// COMPONENT UNITS
// ============================================================================

/// A component model paired with its (possibly built-on-demand) scope graph.
///
/// Prepared once per pass so the table builder and the resolver see the
/// same graph.
#[derive(Clone, Debug)]
pub struct ComponentUnit<'a> {
    pub model: &'a ComponentModel,
    pub graph: Cow<'a, LocalScopeGraph>,
}

impl<'a> ComponentUnit<'a> {
    pub fn key(&self) -> &'a str {
        &self.model.component_key
    }
}

/// Pair every model with its scope graph, sorted by component key.
pub fn prepare_units<'a>(
    models: &'a [ComponentModel],
    builder: &dyn ScopeGraphBuilder,
) -> Vec<ComponentUnit<'a>> {
    let mut units: Vec<_> = models
        .iter()
        .map(|model| ComponentUnit {
            model,
            graph: match &model.semantic_graph {
                Some(graph) => Cow::Borrowed(graph),
                None => Cow::Owned(builder.build(model)),
            },
        })
        .collect();
    units.sort_by(|a, b| a.key().cmp(b.key()));
    units
}

// ============================================================================
// SYMBOL TABLE
// ============================================================================

/// The workspace-wide symbol table.
///
/// Rows are sorted by `(component_key, name)` once [`SymbolTable::finish`]
/// runs; [`build_symbol_table`] always returns a finished table.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    /// The single source of truth for all symbols.
    rows: Vec<Symbol>,
    /// component key → name → row index.
    by_component: FxHashMap<String, FxHashMap<SmolStr, usize>>,
    /// component key → contiguous row range (valid after `finish`).
    ranges: FxHashMap<String, Range<usize>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a declaration. A second push for the same `(component, name)`
    /// only merges its kind and back-fills a missing file path.
    pub fn push(
        &mut self,
        component_key: &str,
        name: &str,
        kind: SymbolKind,
        file_path: Option<&str>,
    ) {
        let names = self
            .by_component
            .entry(component_key.to_string())
            .or_default();

        if let Some(&idx) = names.get(name) {
            tracing::trace!(component_key, name, kind = kind.as_str(), "merging symbol kind");
            self.rows[idx].merge(kind, file_path);
            return;
        }

        names.insert(SmolStr::new(name), self.rows.len());
        self.rows
            .push(Symbol::new(component_key, name, kind, file_path));
    }

    /// Sort rows by `(component_key, name)` and rebuild the indexes.
    pub fn finish(&mut self) {
        self.rows.sort_by(|a, b| {
            (a.component_key.as_str(), a.name.as_str())
                .cmp(&(b.component_key.as_str(), b.name.as_str()))
        });

        self.by_component.clear();
        self.ranges.clear();
        for (idx, row) in self.rows.iter().enumerate() {
            self.by_component
                .entry(row.component_key.clone())
                .or_default()
                .insert(row.name.clone(), idx);
            self.ranges
                .entry(row.component_key.clone())
                .and_modify(|range| range.end = idx + 1)
                .or_insert(idx..idx + 1);
        }
    }

    /// O(1) lookup of a name within one component.
    pub fn lookup(&self, component_key: &str, name: &str) -> Option<&Symbol> {
        let idx = *self.by_component.get(component_key)?.get(name)?;
        self.rows.get(idx)
    }

    /// All rows of one component, sorted by name.
    pub fn component_symbols(&self, component_key: &str) -> &[Symbol] {
        match self.ranges.get(component_key) {
            Some(range) => &self.rows[range.clone()],
            None => &[],
        }
    }

    /// All rows, sorted by `(component_key, name)`.
    pub fn rows(&self) -> &[Symbol] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the global symbol table from prepared component units.
///
/// Per component (sorted by key) the collection order is fixed: expression
/// roots, handler exports, action exports, method exports, declared
/// constants, ref names, prop names.
pub fn build_symbol_table(units: &[ComponentUnit<'_>]) -> SymbolTable {
    let mut table = SymbolTable::new();

    let mut sorted: Vec<&ComponentUnit<'_>> = units.iter().collect();
    sorted.sort_by(|a, b| a.key().cmp(b.key()));

    for unit in sorted {
        let model = unit.model;
        let key = model.component_key.as_str();
        let mut push_all = |names: &mut dyn Iterator<Item = &String>, kind: SymbolKind| {
            let file_path = kind.declaring_file(model);
            for name in names {
                table.push(key, name, kind, file_path);
            }
        };

        push_all(&mut unit.graph.global_symbols.iter(), SymbolKind::ExpressionRoot);
        push_all(&mut model.handlers.exports.iter(), SymbolKind::Handler);
        push_all(&mut model.store.exports.iter(), SymbolKind::Action);
        push_all(&mut model.methods.exports.iter(), SymbolKind::Method);
        push_all(&mut model.view.constants.iter(), SymbolKind::Constant);
        push_all(&mut model.view.refs.keys(), SymbolKind::Ref);
        push_all(&mut model.schema.prop_names.iter(), SymbolKind::Prop);
    }

    table.finish();
    tracing::debug!(symbols = table.len(), components = units.len(), "built symbol table");
    table
}
