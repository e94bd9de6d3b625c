//! High-level IR (HIR): symbols, scopes and semantic diagnostics.
//!
//! This module turns component models into resolved semantic rows. Every
//! output list is sorted by an explicit key tuple, never by insertion or
//! completion order.
//!
//! ## Key Types
//!
//! - [`SymbolTable`] - one row per `(component, name)` with O(1) lookup
//! - [`ComponentUnit`] - a model paired with its local scope graph
//! - [`ComponentResolution`] - refs, scopes, edges and diagnostics of one component
//! - [`SemanticModel`] - the folded, sorted result for the whole workspace
//! - [`Diagnostic`] - a located message with code, severity and related info
//!
//! ## Phases
//!
//! ```text
//! prepare_units(models)          ← pair each model with its scope graph
//!     │
//!     ▼
//! build_symbol_table(units)      ← workspace-wide table (must finish first)
//!     │
//!     ▼
//! resolve_component(unit)        ← SEM-001 / SEM-002, ref-root edges
//!     │
//!     ▼
//! check_listeners / check_component_tags   ← SEM-004 / SEM-005
//!     │
//!     ▼
//! SemanticModel::assemble        ← sorted rows + diagnostics
//!     │
//!     ▼
//! run_semantic_invariants        ← id uniqueness, dangling edges
//! ```

mod checks;
mod diagnostics;
mod invariants;
mod resolve;
mod semantic;
mod suggest;
mod symbols;

pub use checks::{MAX_SUGGESTIONS, check_component_tags, check_listeners};
pub use diagnostics::{
    DEFAULT_CATEGORY, Diagnostic, DiagnosticCollector, RawDiagnostic, RelatedLocation, Severity,
    codes, normalize_diagnostics,
};
pub use invariants::{InvariantIssue, run_semantic_invariants};
pub use resolve::{
    ComponentResolution, MAX_AMBIGUITY_LOCATIONS, MAX_UNRESOLVED_CANDIDATES, REF_ROOT_EDGE,
    ReferenceRow, Resolution, ResolutionOutcome, ScopeKind, ScopeRow, SemanticEdge,
    resolve_component, resolve_references,
};
pub use semantic::{SemanticModel, analyze_semantics, check_framework_symbols};
pub use suggest::{edit_distance, rank_candidates};
pub use symbols::{ComponentUnit, Symbol, SymbolKind, SymbolTable, build_symbol_table, prepare_units};

/// `RTGL-IR-INV-*` codes, shared with IR validation.
pub mod invariant_codes {
    pub use super::invariants::codes::*;
}

pub(crate) use invariants::{check_edge_endpoints, check_unique_ids};
