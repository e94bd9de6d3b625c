//! Session orchestration: config, fingerprints and the analysis session.

mod config;
mod fingerprint;
mod session;

pub use config::{AnalysisConfig, DEFAULT_CACHE_MAX_BYTES, DEFAULT_CACHE_MAX_ENTRIES};
pub use fingerprint::compute_fingerprint;
pub use session::{AnalysisOutput, AnalysisSession, ComponentModelBuilder, ComponentSource};
