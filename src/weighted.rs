//!
//! A keyed set of weights that can be sampled proportionally to weight.
//!
//! The total weight is cached per set and refreshed lazily after a mutation, so
//! repeated sampling between mutations does not re-sum the weights.
//!
pub mod error;
pub mod pick;
pub mod serialize;
pub mod set;

pub use error::WeightError;
pub use pick::{pick_by_weight, weighted_random, weighted_random_with};
pub use serialize::Entry;
pub use set::WeightedSet;

/// Checks that a weight can be stored. Negative and non-finite weights are rejected.
pub(crate) fn validate_weight(weight: f64) -> Result<f64, WeightError> {
    if !weight.is_finite() {
        log::warn!("Rejected weight {}: not finite", weight);
        return Err(WeightError::NonFiniteWeight(weight));
    }
    if weight < 0.0 {
        log::warn!("Rejected weight {}: weight cannot be negative", weight);
        return Err(WeightError::NegativeWeight(weight));
    }
    Ok(weight)
}
