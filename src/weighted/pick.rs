use super::{validate_weight, WeightError};
use log::{debug, trace, warn};
use rand::Rng;

///
/// Walks `items` accumulating weights until the running sum reaches `draw`.
///
/// Entries with a weight of zero are skipped, so a draw of exactly `0.0` lands on the first
/// positive entry. If rounding leaves the running sum short of `draw` at the end of the walk,
/// the last positive entry is returned. `None` only when no entry has a positive weight.
///
pub fn pick_by_weight<T>(items: impl IntoIterator<Item = (T, f64)>, draw: f64) -> Option<T> {
    let mut running = 0.0;
    let mut last_positive = None;
    for (item, weight) in items {
        if weight.is_nan() || weight <= 0.0 {
            continue;
        }
        running += weight;
        if running >= draw {
            return Some(item);
        }
        last_positive = Some(item);
    }
    if last_positive.is_some() {
        debug!(
            "Draw {} overshot running sum {}, falling back to last entry",
            draw, running
        );
    }
    last_positive
}

/// Picks one item from an owned list, with probability proportional to its weight.
pub fn weighted_random<T>(items: Vec<(T, f64)>) -> Result<T, WeightError> {
    weighted_random_with(items, &mut rand::thread_rng())
}

pub fn weighted_random_with<T, R: Rng + ?Sized>(
    items: Vec<(T, f64)>,
    rng: &mut R,
) -> Result<T, WeightError> {
    if items.is_empty() {
        warn!("Cannot pick from an empty list");
        return Err(WeightError::EmptyCollection);
    }
    let mut total_weight = 0.0;
    for (_, weight) in items.iter() {
        total_weight += validate_weight(*weight)?;
    }
    if total_weight <= 0.0 || !total_weight.is_finite() {
        warn!("Total weight {} cannot be sampled", total_weight);
        return Err(WeightError::DegenerateWeights);
    }
    let draw = rng.gen_range(0.0..total_weight);
    trace!("Drew {} of {}", draw, total_weight);
    pick_by_weight(items, draw).ok_or(WeightError::DegenerateWeights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pick_lands_on_bucket() {
        let items = vec![("a", 1.0), ("b", 2.0), ("c", 3.0)];
        assert_eq!(pick_by_weight(items.clone(), 0.5), Some("a"));
        assert_eq!(pick_by_weight(items.clone(), 1.0), Some("a"));
        assert_eq!(pick_by_weight(items.clone(), 1.5), Some("b"));
        assert_eq!(pick_by_weight(items.clone(), 3.0), Some("b"));
        assert_eq!(pick_by_weight(items, 5.99), Some("c"));
    }

    #[test]
    fn test_pick_zero_draw_skips_zero_weights() {
        let items = vec![("zero", 0.0), ("one", 1.0)];
        assert_eq!(pick_by_weight(items, 0.0), Some("one"));
    }

    #[test]
    fn test_pick_skips_nan_weights() {
        let items = vec![("nan", f64::NAN), ("a", 1.0), ("trailing_nan", f64::NAN)];
        assert_eq!(pick_by_weight(items.clone(), 0.5), Some("a"));
        assert_eq!(pick_by_weight(items, 1.5), Some("a"));
    }

    #[test]
    fn test_pick_overshoot_falls_back_to_last_positive() {
        // Draw beyond the sum, as rounding can produce at the upper boundary
        let items = vec![("a", 1.0), ("b", 2.0), ("trailing_zero", 0.0)];
        assert_eq!(pick_by_weight(items, 3.0000001), Some("b"));
    }

    #[test]
    fn test_pick_all_zero() {
        let items = vec![("a", 0.0), ("b", 0.0)];
        assert_eq!(pick_by_weight(items, 0.0), None);
    }

    #[test]
    fn test_weighted_random_errors() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            weighted_random_with(Vec::<(u8, f64)>::new(), &mut rng),
            Err(WeightError::EmptyCollection)
        );
        assert_eq!(
            weighted_random_with(vec![(1, 0.0), (2, 0.0)], &mut rng),
            Err(WeightError::DegenerateWeights)
        );
        assert_eq!(
            weighted_random_with(vec![(1, 1.0), (2, -1.0)], &mut rng),
            Err(WeightError::NegativeWeight(-1.0))
        );
        assert_eq!(
            weighted_random_with(vec![(1, f64::MAX), (2, f64::MAX)], &mut rng),
            Err(WeightError::DegenerateWeights)
        );
    }

    #[test]
    fn test_weighted_random_only_positive() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let picked = weighted_random_with(vec![(0, 0.0), (1, 2.0), (2, 0.0)], &mut rng);
            assert_eq!(picked, Ok(1));
        }
    }
}
