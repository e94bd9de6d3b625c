//! Shared fixtures and assertions for integration tests.

pub mod diagnostic_helpers;
pub mod model_fixtures;
