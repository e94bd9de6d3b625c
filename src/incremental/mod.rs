//! Incremental re-analysis support.
//!
//! ```text
//! CompilerIr ──► DependencyGraph ──► compute_affected(changed files)
//!                                          │
//!                                          ▼
//!                     LruCache (fingerprint → model)   run_deterministic_parallel
//! ```
//!
//! Nothing here knows how a component is parsed; the cache stores whatever
//! the session hands it and the scheduler runs whatever worker it is given.

mod affected;
mod cache;
mod graph;
mod schedule;

pub use affected::{AffectedSet, compute_affected, segments_for};
pub use cache::{CacheEntry, CacheStats, LruCache, Sizer, json_size};
pub use graph::{
    DependencyGraph, GraphEdge, GraphNode, NodeKind, SEMANTIC_REF_ROOT_EDGE, STRUCTURAL_FILE_EDGE,
    TYPED_CONTRACT_EDGE,
};
pub use schedule::{
    MAX_DEFAULT_CONCURRENCY, ScheduleOptions, default_concurrency, par_map_sorted,
    run_deterministic_parallel,
};
