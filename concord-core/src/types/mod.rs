//! Shared data model: scorers, intervals, reconciled events.

pub mod collections;
pub mod epoch;
pub mod event;
pub mod interval;
pub mod mode;
pub mod scorer;

pub use epoch::StageGrid;
pub use event::{Annotation, Onset, ReconciledEvent};
pub use interval::{Interval, StudyAnnotations, StudyWarning};
pub use mode::ScoringMode;
pub use scorer::Scorer;
