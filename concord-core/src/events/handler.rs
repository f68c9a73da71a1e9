//! Observer trait for run lifecycle events.

use super::types::*;

/// Observer trait for run lifecycle events.
///
/// All methods have no-op default implementations, so a handler only
/// implements the events it cares about. Handlers must be `Send + Sync`
/// because batch runs dispatch from worker threads.
pub trait ConcordEventHandler: Send + Sync {
    fn on_run_started(&self, _event: &RunStartedEvent) {}
    fn on_study_started(&self, _event: &StudyStartedEvent) {}
    fn on_study_reconciled(&self, _event: &StudyReconciledEvent) {}
    fn on_study_failed(&self, _event: &StudyFailedEvent) {}
    fn on_rater_source_missing(&self, _event: &RaterSourceMissingEvent) {}
    fn on_run_completed(&self, _event: &RunCompletedEvent) {}
}
