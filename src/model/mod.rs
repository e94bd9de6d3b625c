//! Component model records: the analyzer's external input.
//!
//! Parsing view/schema documents and script modules happens outside this
//! crate. What arrives here is already structured:
//!
//! - [`ComponentModel`] - one per component, keyed by `component_key`
//! - [`LocalScopeGraph`] - template references with their free roots
//! - [`Registry`] - tag name → exported component contract
//!
//! When a model carries no scope graph, a [`ScopeGraphBuilder`] supplies one.

mod component;
mod registry;
mod scope_graph;

pub use component::{
    ComponentModel, ListenerConfig, NormalizedSchema, RefConfig, ScriptModule, TagUsage,
    ViewModel,
};
pub use registry::{ComponentContract, Registry};
pub use scope_graph::{
    EmptyScopeGraphBuilder, LocalScopeGraph, ScopeGraphBuilder, TemplateReference,
};
