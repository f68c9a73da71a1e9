//! Discretization: shared time grid and per-bin scorer occupancy.

pub mod builder;
pub mod grid;
pub mod occupancy;

pub use builder::Discretizer;
pub use grid::TimeGrid;
pub use occupancy::{BinState, Timeline};
