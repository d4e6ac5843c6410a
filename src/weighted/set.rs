use super::pick::pick_by_weight;
use super::{validate_weight, WeightError};
use linked_hash_set::LinkedHashSet;
use log::{debug, trace, warn};
use rand::Rng;
use std::borrow::Borrow;
use std::cell::Cell;
use std::collections::HashMap;
use std::hash::Hash;

///
/// A mapping from keys to non-negative weights that can be sampled by weight.
///
/// Iteration (and so the sampling walk) follows insertion order. Overwriting a key keeps its
/// position; removing and re-inserting it moves it to the end.
///
/// The total weight is cached and invalidated by every mutation. The cache sits in a `Cell`,
/// so a set can be moved between threads but not shared between them.
///
#[derive(Debug, Clone)]
pub struct WeightedSet<K: Eq + Hash> {
    order: LinkedHashSet<K>,
    weights: HashMap<K, f64>,
    cached_total: Cell<Option<f64>>,
}

impl<K: Eq + Hash> Default for WeightedSet<K> {
    fn default() -> Self {
        WeightedSet {
            order: LinkedHashSet::new(),
            weights: HashMap::new(),
            cached_total: Cell::new(None),
        }
    }
}

impl<K: Eq + Hash + Clone> WeightedSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `id`. A rejected weight leaves the set untouched.
    pub fn insert(&mut self, id: K, weight: f64) -> Result<(), WeightError> {
        let weight = validate_weight(weight)?;
        self.check_total_after(self.weights.get(&id).copied(), weight)?;
        if !self.weights.contains_key(&id) {
            self.order.insert(id.clone());
        }
        self.weights.insert(id, weight);
        self.invalidate_cached_total();
        Ok(())
    }

    /// Inserts each pair in turn, stopping at the first rejected weight.
    pub fn try_extend(
        &mut self,
        items: impl IntoIterator<Item = (K, f64)>,
    ) -> Result<(), WeightError> {
        for (id, weight) in items {
            self.insert(id, weight)?;
        }
        Ok(())
    }
}

impl<K: Eq + Hash> WeightedSet<K> {
    pub fn remove<Q>(&mut self, id: &Q) -> Option<f64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = self.weights.remove(id);
        self.order.remove(id);
        self.invalidate_cached_total();
        removed
    }

    pub fn set_weight<Q>(&mut self, id: &Q, weight: f64) -> Result<(), WeightError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let weight = validate_weight(weight)?;
        if let Some(previous) = self.weights.get(id).copied() {
            self.check_total_after(Some(previous), weight)?;
        }
        match self.weights.get_mut(id) {
            Some(stored) => {
                *stored = weight;
                self.invalidate_cached_total();
                Ok(())
            }
            None => {
                warn!("Cannot set weight of a missing key");
                Err(WeightError::KeyNotFound)
            }
        }
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.weights.clear();
        self.invalidate_cached_total();
    }

    pub fn get<Q>(&self, id: &Q) -> Option<f64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.weights.get(id).copied()
    }

    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.weights.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.weights.get(id).map(|weight| (id, *weight)))
    }

    /// Rejects a weight that would make the total non-finite once `previous` is replaced.
    fn check_total_after(&self, previous: Option<f64>, weight: f64) -> Result<(), WeightError> {
        let total = self.total_weight() - previous.unwrap_or(0.0) + weight;
        if !total.is_finite() {
            warn!("Rejected weight {}: total weight would overflow", weight);
            return Err(WeightError::TotalOverflow(weight));
        }
        Ok(())
    }

    fn invalidate_cached_total(&self) {
        self.cached_total.set(None);
    }

    /// Sum of all weights, recomputed only if a mutation happened since the last call.
    pub fn total_weight(&self) -> f64 {
        if let Some(total) = self.cached_total.get() {
            return total;
        }
        let total: f64 = self.iter().map(|(_, weight)| weight).sum();
        debug!("Recomputed total weight {} over {} entries", total, self.len());
        self.cached_total.set(Some(total));
        total
    }

    pub fn sample(&self) -> Result<&K, WeightError> {
        self.sample_with(&mut rand::thread_rng())
    }

    ///
    /// Draws a key with probability `weight / total` using the given rng.
    ///
    /// The draw is uniform in `[0, total)`, and the set is walked in insertion order until the
    /// running sum reaches it. A draw that rounding pushes past the final running sum resolves
    /// to the last key with a positive weight.
    ///
    pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&K, WeightError> {
        if self.is_empty() {
            warn!("Cannot sample from an empty set");
            return Err(WeightError::EmptyCollection);
        }
        let total = self.total_weight();
        if total <= 0.0 || !total.is_finite() {
            warn!("Total weight {} cannot be sampled", total);
            return Err(WeightError::DegenerateWeights);
        }
        let draw = rng.gen_range(0.0..total);
        trace!("Drew {} of {}", draw, total);
        pick_by_weight(self.iter(), draw).ok_or(WeightError::DegenerateWeights)
    }

    /// `100 * weight / total` for `id`, or `0` when the total is not positive.
    ///
    /// The ratio is taken before scaling so weights near `f64::MAX` stay finite.
    pub fn probability_percentage<Q>(&self, id: &Q) -> Result<f64, WeightError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let weight = match self.weights.get(id) {
            Some(weight) => *weight,
            None => {
                warn!("Cannot compute probability of a missing key");
                return Err(WeightError::KeyNotFound);
            }
        };
        let total = self.total_weight();
        if !total.is_finite() {
            warn!("Total weight {} is not finite", total);
            return Err(WeightError::DegenerateWeights);
        }
        if total <= 0.0 {
            warn!("Total weight {} is not positive", total);
            return Ok(0.0);
        }
        Ok(weight / total * 100.0)
    }
}
