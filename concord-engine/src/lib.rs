//! Multi-rater temporal consensus engine.
//!
//! Reconciles three scorers' labeled time intervals into one consensus
//! timeline. The interval pipeline is discretize, segment, resolve, refine:
//! intervals land on a shared fixed-resolution grid ([`timeline`]), the grid
//! splits into maximal active runs ([`segment`]), each run is classified into
//! a confirmed core plus review fringes ([`consensus`]), and confirmed
//! boundaries are restored to original sub-second precision ([`refine`]).
//! Sleep staging bypasses all of that and votes per fixed epoch ([`epoch`]).
//!
//! [`reconcile::ReconcileEngine`] orchestrates the interval pipeline for one
//! study and is the entry point the batch runner calls. Everything here is a
//! deterministic pure function of one study's input; studies never share
//! state.

pub mod consensus;
pub mod epoch;
pub mod reconcile;
pub mod refine;
pub mod segment;
pub mod timeline;

pub use reconcile::{ReconcileEngine, StudyDiagnostics, StudyReconciliation};
