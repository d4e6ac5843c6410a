#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum WeightError {
    #[error("weight {0} is negative")]
    NegativeWeight(f64),

    #[error("weight {0} is not a finite number")]
    NonFiniteWeight(f64),

    /// Storing the weight would push the set's total past `f64::MAX`.
    #[error("weight {0} would overflow the total weight")]
    TotalOverflow(f64),

    #[error("cannot sample from an empty collection")]
    EmptyCollection,

    /// Every weight is zero, or the weights summed past `f64::MAX`.
    #[error("total weight is zero or not finite")]
    DegenerateWeights,

    #[error("key not found")]
    KeyNotFound,
}
