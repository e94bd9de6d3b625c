//! Foundation types for the rtgl-check toolchain.
//!
//! This module provides fundamental types used throughout the analyzer:
//! - [`FileKind`] - The role a tracked file plays inside a component
//! - [`Segment`] - Analysis phases a file change can invalidate
//! - [`SourceSpan`] - Line/column ranges inside template documents
//! - [`CoreError`] - The error type for the few fallible I/O operations
//!
//! This module has NO dependencies on other rtgl-check modules.

mod error;
mod file_kind;
mod position;

pub use error::CoreError;
pub use file_kind::{FileKind, Segment};
pub use position::SourceSpan;
