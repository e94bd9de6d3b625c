//! HIR layer tests
//!
//! Symbol table, reference resolution and the listener/tag passes over the
//! fixture workspace.

pub mod tests_framework_checks;
pub mod tests_resolution;
