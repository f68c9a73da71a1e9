//! Run lifecycle events: observer trait, payload types, and dispatcher.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::ConcordEventHandler;
pub use types::{
    RaterSourceMissingEvent, RunCompletedEvent, RunStartedEvent, StudyFailedEvent,
    StudyReconciledEvent, StudyStartedEvent,
};
