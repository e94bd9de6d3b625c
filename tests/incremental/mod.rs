//! Incremental layer tests: cache bounds, affected sets and scheduling.

pub mod tests_affected;
pub mod tests_cache;
pub mod tests_scheduler;
