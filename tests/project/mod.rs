//! Session tests: the full pipeline driven through AnalysisSession.

pub mod tests_session;
