//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::base::CoreError;
use crate::incremental::ScheduleOptions;
use crate::ir::{IR_VERSION, MIN_READABLE_VERSION};

pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 256;
pub const DEFAULT_CACHE_MAX_BYTES: usize = 64 * 1024 * 1024;

/// Knobs for an [`AnalysisSession`](super::AnalysisSession).
///
/// Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisConfig {
    pub cache_max_entries: usize,
    pub cache_max_bytes: usize,
    /// Scheduler width; `None` means hardware parallelism capped at 8.
    pub concurrency: Option<usize>,
    /// Oldest IR version validation accepts.
    pub min_readable_version: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            cache_max_bytes: DEFAULT_CACHE_MAX_BYTES,
            concurrency: None,
            min_readable_version: MIN_READABLE_VERSION,
        }
    }
}

impl AnalysisConfig {
    /// Parse and check a JSON config.
    pub fn from_json(text: &str) -> Result<Self, CoreError> {
        let config: Self = serde_json::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), CoreError> {
        if self.cache_max_entries == 0 {
            return Err(CoreError::invalid_config("cacheMaxEntries must be at least 1"));
        }
        if self.concurrency == Some(0) {
            return Err(CoreError::invalid_config("concurrency must be at least 1"));
        }
        if self.min_readable_version == 0 || self.min_readable_version > IR_VERSION {
            return Err(CoreError::invalid_config(format!(
                "minReadableVersion must be between 1 and {IR_VERSION}"
            )));
        }
        Ok(())
    }

    pub fn schedule_options(&self) -> ScheduleOptions {
        ScheduleOptions {
            concurrency: self.concurrency,
        }
    }
}
