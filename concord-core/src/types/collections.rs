//! Hash collections with the fx hasher, shared across Concord crates.
//!
//! Study ids, error codes, and label keys are short strings; the fx hasher
//! is measurably faster than SipHash for them and none of these maps hold
//! attacker-controlled keys.

pub use rustc_hash::{FxHashMap, FxHashSet};
