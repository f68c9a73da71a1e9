//! Synchronous dispatch of run lifecycle events to registered handlers.

use std::sync::Arc;

use super::handler::ConcordEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
///
/// With no handlers registered, `emit` iterates an empty Vec and costs
/// nothing.
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn ConcordEventHandler>>,
}

impl EventDispatcher {
    /// Create a new empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn ConcordEventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// Handlers that panic are caught and do not prevent subsequent handlers
    /// from receiving the event.
    fn emit<F: Fn(&dyn ConcordEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!("event handler panicked, continuing with remaining handlers");
            }
        }
    }

    pub fn emit_run_started(&self, event: &RunStartedEvent) {
        self.emit(|h| h.on_run_started(event));
    }

    pub fn emit_study_started(&self, event: &StudyStartedEvent) {
        self.emit(|h| h.on_study_started(event));
    }

    pub fn emit_study_reconciled(&self, event: &StudyReconciledEvent) {
        self.emit(|h| h.on_study_reconciled(event));
    }

    pub fn emit_study_failed(&self, event: &StudyFailedEvent) {
        self.emit(|h| h.on_study_failed(event));
    }

    pub fn emit_rater_source_missing(&self, event: &RaterSourceMissingEvent) {
        self.emit(|h| h.on_rater_source_missing(event));
    }

    pub fn emit_run_completed(&self, event: &RunCompletedEvent) {
        self.emit(|h| h.on_run_completed(event));
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
