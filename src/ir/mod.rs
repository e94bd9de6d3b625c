//! Compiler IR: the single versioned snapshot consumers read.
//!
//! ```text
//! models + SemanticModel + rule-pack diagnostics
//!     │
//!     ▼
//! migrate_analysis_to_compiler_ir   ← sorted, normalized, summarized
//!     │
//!     ▼
//! validate_compiler_ir (JSON)       ← RTGL-IR-VAL-* / RTGL-IR-INV-*
//!     │
//!     ▼
//! diff_compiler_ir(previous, next)  ← short-circuit unchanged re-analysis
//! ```
//!
//! Validation reports; it never rejects. A snapshot with errors is still
//! returned to the caller.

mod diff;
mod migrate;
mod schema;
mod summary;
mod validate;

pub use diff::{ChangeKind, IrChange, IrDiff, diff_compiler_ir, diff_values};
pub use migrate::{MigrateInput, migrate_analysis_to_compiler_ir};
pub use schema::{
    CompilerIr, DiagnosticsSection, FileEntry, IR_VERSION, IrMetadata, MIN_READABLE_VERSION,
    SemanticSection, StructuralComponent, StructuralDependency, StructuralSection,
    TEMPLATE_TAG_DEPENDENCY, TypedContract, TypedContractSection, TypedProp,
};
pub use summary::{IrSummary, SummaryOverride};
pub use validate::{
    IrIssue, IrValidation, codes, validate_compiler_ir, validate_compiler_ir_with,
};
