//! # rtgl-check-base
//!
//! Core library for component symbol tables, reference resolution, the
//! compiler IR and incremental re-analysis.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project      → AnalysisSession, AnalysisConfig, fingerprints
//!   ↓
//! incremental  → LRU cache, dependency graph, affected sets, scheduler
//!   ↓
//! ir           → CompilerIr: migrate, validate, diff
//!   ↓
//! hir          → Symbol table, resolver, semantic diagnostics
//!   ↓
//! types        → Type lattice
//!   ↓
//! model        → Component models, registry, scope graphs (inputs)
//!   ↓
//! base         → Primitives (FileKind, Segment, SourceSpan, CoreError)
//! ```

// ============================================================================
// MODULES (dependency order: base → model → types → hir → ir → incremental → project)
// ============================================================================

/// Foundation types: FileKind, Segment, SourceSpan, CoreError
pub mod base;

/// Component model records handed in by the document parsers
pub mod model;

/// Type lattice over schema fragments and literals
pub mod types;

/// High-level IR: symbols, scopes, references and semantic diagnostics
pub mod hir;

/// Compiler IR snapshot: migrate, validate, diff
pub mod ir;

/// Incremental re-analysis: cache, dependency graph, scheduler
pub mod incremental;

/// Session orchestration: config, fingerprints, AnalysisSession
pub mod project;

// Re-export foundation types
pub use base::{CoreError, FileKind, Segment, SourceSpan};

// Re-export the main entry points
pub use hir::{Diagnostic, Severity};
pub use ir::{CompilerIr, IrDiff, IrValidation};
pub use project::{AnalysisConfig, AnalysisOutput, AnalysisSession};
