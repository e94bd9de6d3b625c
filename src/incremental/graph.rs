//! Dependency graph built from an IR snapshot.
//!
//! ```text
//! component:pages/home ──structural-file──► file:/…/home.view.yaml
//!        │  └──────────typed-contract─────► typed-contract:pages/home
//!        └─template-tag / semantic-ref-root─► component:components/card
//! ```
//!
//! `A → B` between components means A depends on B: a change to B
//! invalidates A.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::ir::CompilerIr;

pub const STRUCTURAL_FILE_EDGE: &str = "structural-file";
pub const TYPED_CONTRACT_EDGE: &str = "typed-contract";
pub const SEMANTIC_REF_ROOT_EDGE: &str = "semantic-ref-root";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Component,
    File,
    TypedContract,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Component => "component",
            NodeKind::File => "file",
            NodeKind::TypedContract => "typed-contract",
        }
    }

    /// Node id: `kind:key`.
    pub fn node_id(&self, key: &str) -> String {
        format!("{}:{key}", self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    /// Component key or file path.
    pub key: String,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub kind: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    nodes: BTreeMap<String, GraphNode>,
    /// Sorted by `(from, to, kind)`.
    edges: Vec<GraphEdge>,
    /// component → components it depends on.
    forward: BTreeMap<String, BTreeSet<String>>,
    /// component → components that depend on it.
    reverse: FxHashMap<String, BTreeSet<String>>,
    file_owner: FxHashMap<String, String>,
    component_files: BTreeMap<String, Vec<String>>,
}

#[derive(Default)]
struct GraphBuilder {
    nodes: BTreeMap<String, GraphNode>,
    /// Keyed by `from|kind|to`; a later insert replaces an earlier one.
    edges: BTreeMap<String, GraphEdge>,
}

impl GraphBuilder {
    fn node(&mut self, kind: NodeKind, key: &str) -> String {
        let id = kind.node_id(key);
        self.nodes.entry(id.clone()).or_insert_with(|| GraphNode {
            id: id.clone(),
            kind,
            key: key.to_string(),
        });
        id
    }

    fn edge(&mut self, from: String, to: String, kind: &str) {
        self.edges.insert(
            format!("{from}|{kind}|{to}"),
            GraphEdge {
                from,
                to,
                kind: kind.to_string(),
            },
        );
    }
}

impl DependencyGraph {
    pub fn from_ir(ir: &CompilerIr) -> Self {
        let mut builder = GraphBuilder::default();
        let mut file_owner = FxHashMap::default();
        let mut component_files: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for component in &ir.structural.components {
            let key = component.component_key.as_str();
            let node = builder.node(NodeKind::Component, key);
            let files = component_files.entry(key.to_string()).or_default();
            for file in &component.files {
                let file_node = builder.node(NodeKind::File, &file.path);
                builder.edge(node.clone(), file_node, STRUCTURAL_FILE_EDGE);
                file_owner
                    .entry(file.path.clone())
                    .or_insert_with(|| key.to_string());
                files.push(file.path.clone());
            }
            files.sort();
            files.dedup();
        }

        for contract in &ir.typed_contract.components {
            let node = builder.node(NodeKind::Component, &contract.component_key);
            let contract_node = builder.node(NodeKind::TypedContract, &contract.component_key);
            builder.edge(node, contract_node, TYPED_CONTRACT_EDGE);
        }

        for dep in &ir.structural.dependencies {
            let from = builder.node(NodeKind::Component, &dep.from);
            let to = builder.node(NodeKind::Component, &dep.to);
            builder.edge(from, to, &dep.kind);
        }

        // Collapse ref → symbol edges to component → component.
        let owner_of: FxHashMap<&str, &str> = ir
            .semantic
            .symbols
            .iter()
            .map(|s| (s.id.as_str(), s.component_key.as_str()))
            .chain(
                ir.semantic
                    .refs
                    .iter()
                    .map(|r| (r.id.as_str(), r.component_key.as_str())),
            )
            .collect();
        for edge in &ir.semantic.edges {
            let (Some(from), Some(to)) = (
                owner_of.get(edge.from.as_str()),
                owner_of.get(edge.to.as_str()),
            ) else {
                continue;
            };
            if from != to {
                let from = builder.node(NodeKind::Component, from);
                let to = builder.node(NodeKind::Component, to);
                builder.edge(from, to, SEMANTIC_REF_ROOT_EDGE);
            }
        }

        let mut edges: Vec<GraphEdge> = builder.edges.into_values().collect();
        edges.sort();

        let mut forward: BTreeMap<String, BTreeSet<String>> = builder
            .nodes
            .values()
            .filter(|n| n.kind == NodeKind::Component)
            .map(|n| (n.key.clone(), BTreeSet::new()))
            .collect();
        let mut reverse: FxHashMap<String, BTreeSet<String>> = FxHashMap::default();
        for edge in &edges {
            let (Some(from), Some(to)) = (builder.nodes.get(&edge.from), builder.nodes.get(&edge.to))
            else {
                continue;
            };
            if from.kind != NodeKind::Component || to.kind != NodeKind::Component {
                continue;
            }
            forward
                .entry(from.key.clone())
                .or_default()
                .insert(to.key.clone());
            reverse
                .entry(to.key.clone())
                .or_default()
                .insert(from.key.clone());
        }

        tracing::debug!(
            nodes = builder.nodes.len(),
            edges = edges.len(),
            "built dependency graph"
        );

        Self {
            nodes: builder.nodes,
            edges,
            forward,
            reverse,
            file_owner,
            component_files,
        }
    }

    /// All nodes, sorted by id.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// The component → component adjacency projection, sorted.
    pub fn component_dependencies(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.forward
    }

    /// Components that directly depend on `component_key`, sorted.
    pub fn dependents_of(&self, component_key: &str) -> impl Iterator<Item = &str> {
        self.reverse
            .get(component_key)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// The component that tracks `path`, if any.
    pub fn owner_of_file(&self, path: &str) -> Option<&str> {
        self.file_owner.get(path).map(String::as_str)
    }

    /// Tracked files of a component, sorted.
    pub fn files_of(&self, component_key: &str) -> &[String] {
        self.component_files
            .get(component_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains_component(&self, component_key: &str) -> bool {
        self.forward.contains_key(component_key)
    }
}
