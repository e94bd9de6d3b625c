//! Compiler IR tests: migrate, validate, diff over the fixture workspace.

pub mod tests_compiler_ir;
