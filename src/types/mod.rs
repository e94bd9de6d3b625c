//! Type lattice: structural types derived from schema fragments.
//!
//! Pure functions, no dependencies on the rest of the analyzer:
//!
//! - [`schema_to_lattice`] - schema fragment → [`LatticeType`]
//! - [`infer_from_literal`] - literal token text → [`LatticeType`]
//! - [`are_types_compatible`] - subset check over primitive kinds
//! - [`more_specific`] - tie-breaker between conflicting guesses

mod lattice;
mod literal;

pub use lattice::{
    LatticeType, PrimitiveKind, are_types_compatible, more_specific, schema_to_lattice, union_of,
};
pub use literal::infer_from_literal;
