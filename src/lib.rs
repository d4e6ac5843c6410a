//! Weighted random selection over a keyed set of non-negative weights.
pub mod weighted;
